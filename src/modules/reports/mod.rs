pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{DashboardSummary, GstReport};
pub use repositories::{ReportRepository, SqliteReportRepository};
pub use services::ReportService;
