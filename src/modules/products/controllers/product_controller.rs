use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::products::models::{ProductInput, ProductQuery, ProductResponse};
use crate::modules::products::repositories::ProductRepository;

/// Search the catalog
/// GET /products?q=&in_stock=&limit=&offset=
pub async fn list_products(
    repo: web::Data<ProductRepository>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse, AppError> {
    let products = repo.search(&query).await?;
    let response: Vec<ProductResponse> = products.iter().map(ProductResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /products/{id}
pub async fn get_product(
    repo: web::Data<ProductRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;

    Ok(HttpResponse::Ok().json(ProductResponse::from(&product)))
}

/// POST /products
pub async fn create_product(
    repo: web::Data<ProductRepository>,
    request: web::Json<ProductInput>,
) -> Result<HttpResponse, AppError> {
    let product = repo.create(&request).await?;
    tracing::info!(product_id = product.id, name = %product.name, "Product created");

    Ok(HttpResponse::Created().json(ProductResponse::from(&product)))
}

/// PUT /products/{id}
pub async fn update_product(
    repo: web::Data<ProductRepository>,
    path: web::Path<i64>,
    request: web::Json<ProductInput>,
) -> Result<HttpResponse, AppError> {
    let product = repo.update(path.into_inner(), &request).await?;

    Ok(HttpResponse::Ok().json(ProductResponse::from(&product)))
}

/// DELETE /products/{id}
pub async fn delete_product(
    repo: web::Data<ProductRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    repo.delete(id).await?;
    tracing::info!(product_id = id, "Product deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product)),
    );
}
