use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::AppError;
use crate::modules::invoices::models::{
    CreateInvoiceRequest, InvoicePreviewResponse, InvoiceQuery, InvoiceResponse,
    UpdateStatusRequest,
};
use crate::modules::invoices::services::InvoiceService;

#[derive(Debug, Deserialize)]
pub struct NextNumberQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NextNumberResponse {
    pub invoice_no: String,
}

/// Compute totals for the invoice form without saving
/// POST /invoices/preview
pub async fn preview_invoice(
    service: web::Data<InvoiceService>,
    request: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.preview_invoice(&request).await?;
    Ok(HttpResponse::Ok().json(InvoicePreviewResponse::from(&invoice)))
}

/// POST /invoices
pub async fn create_invoice(
    service: web::Data<InvoiceService>,
    request: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.create_invoice(&request).await?;
    Ok(HttpResponse::Created().json(InvoiceResponse::from(&invoice)))
}

/// GET /invoices/{id}
pub async fn get_invoice(
    service: web::Data<InvoiceService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.get_invoice(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(InvoiceResponse::from(&invoice)))
}

/// GET /invoices?status=&party_id=&start_date=&end_date=&limit=&offset=
pub async fn list_invoices(
    service: web::Data<InvoiceService>,
    query: web::Query<InvoiceQuery>,
) -> Result<HttpResponse, AppError> {
    let invoices = service.list_invoices(&query).await?;
    let response: Vec<InvoiceResponse> = invoices.iter().map(InvoiceResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /invoices/next-number?date=
pub async fn next_invoice_number(
    service: web::Data<InvoiceService>,
    query: web::Query<NextNumberQuery>,
) -> Result<HttpResponse, AppError> {
    let number = service.next_invoice_number(query.date).await?;
    Ok(HttpResponse::Ok().json(NextNumberResponse {
        invoice_no: number.to_string(),
    }))
}

/// PUT /invoices/{id}/status
pub async fn update_invoice_status(
    service: web::Data<InvoiceService>,
    path: web::Path<i64>,
    request: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .update_status(path.into_inner(), request.status)
        .await?;

    Ok(HttpResponse::Ok().json(InvoiceResponse::from(&invoice)))
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::get().to(list_invoices))
            .route("", web::post().to(create_invoice))
            .route("/preview", web::post().to(preview_invoice))
            .route("/next-number", web::get().to(next_invoice_number))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}/status", web::put().to(update_invoice_status)),
    );
}
