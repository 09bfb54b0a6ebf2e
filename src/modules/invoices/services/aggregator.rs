use crate::core::Result;
use crate::modules::invoices::models::{ComputedLine, InvoiceTotals};

/// Folds computed lines into invoice totals
pub struct InvoiceAggregator;

impl InvoiceAggregator {
    pub fn aggregate(lines: &[ComputedLine]) -> Result<InvoiceTotals> {
        Ok(InvoiceTotals::aggregate(lines)?)
    }
}
