use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_item::ComputedLine;
use crate::core::{money, LineRejection};

/// Invoice-level sums derived from the computed lines
///
/// Never stored on its own; always recomputed from the lines it summarises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub total_taxable: Decimal,
    pub total_cgst: Decimal,
    pub total_sgst: Decimal,
    pub total_igst: Decimal,
    pub grand_total: Decimal,
}

impl InvoiceTotals {
    /// Fold lines into totals; order does not matter and an empty slice gives zeros
    ///
    /// Each line is bounded on its own, so only the sums can overflow here.
    pub fn aggregate(lines: &[ComputedLine]) -> std::result::Result<Self, LineRejection> {
        let mut totals = lines
            .iter()
            .try_fold(Self::default(), |acc, line| {
                Some(Self {
                    total_taxable: acc.total_taxable.checked_add(line.taxable_value)?,
                    total_cgst: acc.total_cgst.checked_add(line.cgst_amount)?,
                    total_sgst: acc.total_sgst.checked_add(line.sgst_amount)?,
                    total_igst: acc.total_igst.checked_add(line.igst_amount)?,
                    grand_total: Decimal::ZERO,
                })
            })
            .ok_or(LineRejection::AmountOverflow)?;

        totals.grand_total = totals
            .total_taxable
            .checked_add(totals.total_cgst)
            .and_then(|sum| sum.checked_add(totals.total_sgst))
            .and_then(|sum| sum.checked_add(totals.total_igst))
            .ok_or(LineRejection::AmountOverflow)?;
        Ok(totals)
    }

    /// Never exceeds `grand_total`, so it cannot overflow once aggregated
    pub fn total_tax(&self) -> Decimal {
        self.total_cgst + self.total_sgst + self.total_igst
    }
}

/// Totals as returned to API callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalsResponse {
    pub total_taxable: String,
    pub total_cgst: String,
    pub total_sgst: String,
    pub total_igst: String,
    pub grand_total: String,
}

impl From<&InvoiceTotals> for TotalsResponse {
    fn from(totals: &InvoiceTotals) -> Self {
        Self {
            total_taxable: money::to_display(totals.total_taxable),
            total_cgst: money::to_display(totals.total_cgst),
            total_sgst: money::to_display(totals.total_sgst),
            total_igst: money::to_display(totals.total_igst),
            grand_total: money::to_display(totals.grand_total),
        }
    }
}
