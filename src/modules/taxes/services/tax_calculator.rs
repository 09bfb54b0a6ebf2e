use rust_decimal::Decimal;

use crate::core::LineRejection;
use crate::modules::invoices::models::{CatalogLine, ComputedLine};
use crate::modules::taxes::models::{GstRate, SupplyType};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Computes taxable value and GST split for a single invoice line
pub struct TaxCalculator;

impl TaxCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Derive all amounts of one line
    ///
    /// base = unit_price × quantity
    /// taxable = base − base × discount% / 100
    /// tax = taxable × gst% / 100, split in halves for intra-state supply
    /// total = taxable + tax
    ///
    /// No rounding is applied; the same input always yields the same output.
    pub fn compute_line(
        &self,
        line: &CatalogLine,
        supply: SupplyType,
    ) -> Result<ComputedLine, LineRejection> {
        let tax_rate = self.validate_line(line)?;

        let base_amount = line
            .unit_price
            .checked_mul(Decimal::from(line.quantity))
            .ok_or(LineRejection::AmountOverflow)?;

        let discount_amount = base_amount
            .checked_mul(line.discount_percent)
            .ok_or(LineRejection::AmountOverflow)?
            / HUNDRED;

        let taxable_value = base_amount - discount_amount;

        let tax_amount = taxable_value
            .checked_mul(tax_rate.as_decimal())
            .ok_or(LineRejection::AmountOverflow)?
            / HUNDRED;

        let (cgst_amount, sgst_amount, igst_amount) = if supply.is_intra() {
            let half = tax_amount / Decimal::TWO;
            (half, half, Decimal::ZERO)
        } else {
            (Decimal::ZERO, Decimal::ZERO, tax_amount)
        };

        let line_total = taxable_value
            .checked_add(cgst_amount)
            .and_then(|sum| sum.checked_add(sgst_amount))
            .and_then(|sum| sum.checked_add(igst_amount))
            .ok_or(LineRejection::AmountOverflow)?;

        Ok(ComputedLine {
            line: line.clone(),
            tax_rate,
            supply_type: supply,
            base_amount,
            discount_amount,
            taxable_value,
            cgst_amount,
            sgst_amount,
            igst_amount,
            line_total,
        })
    }

    /// Reject lines the calculator must not see
    pub fn validate_line(&self, line: &CatalogLine) -> Result<GstRate, LineRejection> {
        if line.unit_price < Decimal::ZERO {
            return Err(LineRejection::NegativeUnitPrice(line.unit_price.to_string()));
        }

        if line.quantity < 1 {
            return Err(LineRejection::QuantityBelowOne(line.quantity));
        }

        if line.discount_percent < Decimal::ZERO || line.discount_percent > HUNDRED {
            return Err(LineRejection::DiscountOutOfRange(
                line.discount_percent.to_string(),
            ));
        }

        GstRate::try_from(line.tax_rate_percent)
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new()
    }
}
