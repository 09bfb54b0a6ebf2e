use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::core::Result;
use crate::modules::reports::models::{DashboardResponse, GstReportResponse};
use crate::modules::reports::services::ReportService;

/// Query parameters for the GST report (YYYY-MM-DD, inclusive)
#[derive(Debug, Deserialize)]
pub struct GstReportQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// GET /reports/dashboard
pub async fn get_dashboard(service: web::Data<ReportService>) -> Result<HttpResponse> {
    let summary = service.dashboard(Local::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(DashboardResponse::from(&summary)))
}

/// GET /reports/gst?start_date=&end_date=
///
/// Cancelled invoices are left out.
pub async fn get_gst_report(
    service: web::Data<ReportService>,
    query: web::Query<GstReportQuery>,
) -> Result<HttpResponse> {
    let report = service.gst_report(query.start_date, query.end_date).await?;
    Ok(HttpResponse::Ok().json(GstReportResponse::from(&report)))
}

/// Configure routes for reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/dashboard", web::get().to(get_dashboard))
            .route("/gst", web::get().to(get_gst_report)),
    );
}
