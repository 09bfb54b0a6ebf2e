//! Tax endpoints
//!
//! Exposes the supported GST slabs and the pure line computation so the
//! invoice form can recompute a row on every edit without touching storage.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::core::error::AppError;
use crate::modules::invoices::models::{CatalogLine, LineItemResponse};
use crate::modules::taxes::models::{GstRate, SupplyType};
use crate::modules::taxes::services::TaxCalculator;

#[derive(Debug, Serialize)]
pub struct TaxRateResponse {
    pub percent: u8,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct ComputeLineRequest {
    pub line: CatalogLine,
    pub supply_type: SupplyType,
}

#[derive(Debug, Serialize)]
pub struct ComputeLineResponse {
    #[serde(flatten)]
    pub line: LineItemResponse,
    pub supply_type: SupplyType,
}

/// List supported GST rates
///
/// GET /taxes/rates
pub async fn list_tax_rates() -> HttpResponse {
    let rates: Vec<TaxRateResponse> = GstRate::ALL
        .iter()
        .map(|rate| TaxRateResponse {
            percent: rate.percent(),
            label: rate.to_string(),
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({ "rates": rates }))
}

/// Compute one line without persisting anything
///
/// POST /taxes/compute-line
pub async fn compute_line(
    calculator: web::Data<TaxCalculator>,
    request: web::Json<ComputeLineRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let computed = calculator.compute_line(&request.line, request.supply_type)?;

    Ok(HttpResponse::Ok().json(ComputeLineResponse {
        line: LineItemResponse::from(&computed),
        supply_type: computed.supply_type,
    }))
}

/// Configure tax routes
pub fn configure_tax_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/taxes")
            .route("/rates", web::get().to(list_tax_rates))
            .route("/compute-line", web::post().to(compute_line)),
    );
}
