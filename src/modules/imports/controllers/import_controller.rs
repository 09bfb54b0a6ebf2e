use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::imports::services::ImportService;

/// POST /imports/products (body: CSV text or an .xlsx/.xls workbook)
pub async fn import_products(
    service: web::Data<ImportService>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let report = service.import_products(&body).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// POST /imports/parties (body: CSV text or an .xlsx/.xls workbook)
pub async fn import_parties(
    service: web::Data<ImportService>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let report = service.import_parties(&body).await?;
    Ok(HttpResponse::Ok().json(report))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/imports")
            .app_data(web::PayloadConfig::new(8 * 1024 * 1024))
            .route("/products", web::post().to(import_products))
            .route("/parties", web::post().to(import_parties)),
    );
}
