use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::InventoryConfig;
use crate::core::{money, AppError, Result};
use crate::modules::reports::models::{DashboardSummary, GstReport};
use crate::modules::reports::repositories::ReportRepository;

/// Service for dashboard figures and GST returns
pub struct ReportService {
    report_repo: Arc<dyn ReportRepository>,
    inventory: InventoryConfig,
}

impl ReportService {
    pub fn new(report_repo: Arc<dyn ReportRepository>, inventory: InventoryConfig) -> Self {
        Self {
            report_repo,
            inventory,
        }
    }

    pub async fn dashboard(&self, today: NaiveDate) -> Result<DashboardSummary> {
        let billed = self.report_repo.billed_amounts().await?;
        let catalog = self.report_repo.catalog().await?;

        let threshold = self.inventory.low_stock_threshold;
        let warning_days = self.inventory.expiry_warning_days;

        let total_sales = money::checked_sum(billed.iter().copied()).ok_or_else(|| {
            AppError::internal("Total sales exceed the largest representable amount")
        })?;

        Ok(DashboardSummary {
            total_sales,
            total_invoices: billed.len() as i64,
            low_stock_items: catalog.iter().filter(|p| p.is_low_stock(threshold)).count() as i64,
            expiring_soon_items: catalog
                .iter()
                .filter(|p| p.expires_within(today, warning_days))
                .count() as i64,
            expired_items: catalog.iter().filter(|p| p.is_expired(today)).count() as i64,
        })
    }

    /// GST collected per slab; both dates inclusive
    pub async fn gst_report(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<GstReport> {
        if start_date > end_date {
            return Err(AppError::validation(format!(
                "start_date ({}) must be before or equal to end_date ({})",
                start_date, end_date
            )));
        }

        let lines = self.report_repo.taxed_lines(start_date, end_date).await?;
        let report = GstReport::from_lines(start_date, end_date, &lines)?;

        if report.is_empty() {
            warn!(%start_date, %end_date, "Empty GST report");
        } else {
            info!(
                %start_date,
                %end_date,
                slabs = report.rates.len(),
                lines = lines.len(),
                "GST report generated"
            );
        }

        Ok(report)
    }
}
