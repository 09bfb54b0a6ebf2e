use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money;

/// Headline figures for the home screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    /// Net payable of every invoice that is not cancelled
    pub total_sales: Decimal,
    pub total_invoices: i64,
    pub low_stock_items: i64,
    pub expiring_soon_items: i64,
    pub expired_items: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub total_sales: String,
    pub total_invoices: i64,
    pub low_stock_items: i64,
    pub expiring_soon_items: i64,
    pub expired_items: i64,
}

impl From<&DashboardSummary> for DashboardResponse {
    fn from(summary: &DashboardSummary) -> Self {
        Self {
            total_sales: money::to_display(summary.total_sales),
            total_invoices: summary.total_invoices,
            low_stock_items: summary.low_stock_items,
            expiring_soon_items: summary.expiring_soon_items,
            expired_items: summary.expired_items,
        }
    }
}
