use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::parties::models::{PartyInput, PartyQuery};
use crate::modules::parties::repositories::PartyRepository;

/// GET /parties?q=&limit=&offset=
pub async fn list_parties(
    repo: web::Data<PartyRepository>,
    query: web::Query<PartyQuery>,
) -> Result<HttpResponse, AppError> {
    let parties = repo.search(&query).await?;
    Ok(HttpResponse::Ok().json(parties))
}

/// GET /parties/{id}
pub async fn get_party(
    repo: web::Data<PartyRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let party = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Party {} not found", id)))?;

    Ok(HttpResponse::Ok().json(party))
}

/// POST /parties
pub async fn create_party(
    repo: web::Data<PartyRepository>,
    request: web::Json<PartyInput>,
) -> Result<HttpResponse, AppError> {
    let party = repo.create(&request).await?;
    tracing::info!(party_id = party.id, name = %party.name, "Party created");

    Ok(HttpResponse::Created().json(party))
}

/// PUT /parties/{id}
pub async fn update_party(
    repo: web::Data<PartyRepository>,
    path: web::Path<i64>,
    request: web::Json<PartyInput>,
) -> Result<HttpResponse, AppError> {
    let party = repo.update(path.into_inner(), &request).await?;
    Ok(HttpResponse::Ok().json(party))
}

/// DELETE /parties/{id}
///
/// Past invoices keep their own copy of the party details.
pub async fn delete_party(
    repo: web::Data<PartyRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    repo.delete(id).await?;
    tracing::info!(party_id = id, "Party deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure party routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/parties")
            .route("", web::get().to(list_parties))
            .route("", web::post().to(create_party))
            .route("/{id}", web::get().to(get_party))
            .route("/{id}", web::put().to(update_party))
            .route("/{id}", web::delete().to(delete_party)),
    );
}
