mod dashboard;
mod gst_report;

pub use dashboard::{DashboardResponse, DashboardSummary};
pub use gst_report::{
    GstRateBreakdown, GstRateBreakdownResponse, GstReport, GstReportResponse, TaxedLine,
};
