use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::settings::models::CompanyProfile;
use crate::modules::settings::services::CompanyProfileStore;

/// GET /settings/company
pub async fn get_company_profile(
    store: web::Data<CompanyProfileStore>,
) -> Result<HttpResponse, AppError> {
    let profile = store.snapshot().await;
    Ok(HttpResponse::Ok().json(profile.as_ref()))
}

/// PUT /settings/company
pub async fn update_company_profile(
    store: web::Data<CompanyProfileStore>,
    request: web::Json<CompanyProfile>,
) -> Result<HttpResponse, AppError> {
    let profile = store.update(&request).await?;
    Ok(HttpResponse::Ok().json(profile.as_ref()))
}

/// POST /settings/company/reload
pub async fn reload_company_profile(
    store: web::Data<CompanyProfileStore>,
) -> Result<HttpResponse, AppError> {
    let profile = store.reload().await?;
    Ok(HttpResponse::Ok().json(profile.as_ref()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .route("/company", web::get().to(get_company_profile))
            .route("/company", web::put().to(update_company_profile))
            .route("/company/reload", web::post().to(reload_company_profile)),
    );
}
