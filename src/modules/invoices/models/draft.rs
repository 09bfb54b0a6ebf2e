// Invoice in progress
//
// Every edit produces a new draft. An edited line is recomputed from its
// CatalogLine and put back at the same index; the other lines are carried
// over as they were, so display order is stable.

use super::line_item::{CatalogLine, ComputedLine};
use super::totals::InvoiceTotals;
use crate::core::{AppError, Result};
use crate::modules::taxes::{SupplyType, TaxCalculator};

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    supply_type: SupplyType,
    lines: Vec<ComputedLine>,
}

impl InvoiceDraft {
    pub fn new(supply_type: SupplyType) -> Self {
        Self {
            supply_type,
            lines: Vec::new(),
        }
    }

    pub fn supply_type(&self) -> SupplyType {
        self.supply_type
    }

    pub fn lines(&self) -> &[ComputedLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Append a line; a product may appear only once per invoice
    pub fn with_line_added(&self, calculator: &TaxCalculator, line: CatalogLine) -> Result<Self> {
        if self.lines.iter().any(|l| l.product_id() == line.product_id) {
            return Err(AppError::business_rule(format!(
                "Product {} is already on this invoice",
                line.product_id
            )));
        }

        let computed = calculator.compute_line(&line, self.supply_type)?;

        let mut lines = self.lines.clone();
        lines.push(computed);
        Ok(Self {
            supply_type: self.supply_type,
            lines,
        })
    }

    /// Recompute the line at `index` from its edited inputs
    pub fn with_line_replaced(
        &self,
        calculator: &TaxCalculator,
        index: usize,
        line: CatalogLine,
    ) -> Result<Self> {
        let current = self.line_at(index)?;

        if current.product_id() != line.product_id
            && self.lines.iter().any(|l| l.product_id() == line.product_id)
        {
            return Err(AppError::business_rule(format!(
                "Product {} is already on this invoice",
                line.product_id
            )));
        }

        let computed = calculator.compute_line(&line, self.supply_type)?;

        let lines = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, existing)| {
                if i == index {
                    computed.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();

        Ok(Self {
            supply_type: self.supply_type,
            lines,
        })
    }

    pub fn with_line_removed(&self, index: usize) -> Result<Self> {
        self.line_at(index)?;

        let lines = self
            .lines
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, line)| line.clone())
            .collect();

        Ok(Self {
            supply_type: self.supply_type,
            lines,
        })
    }

    pub fn totals(&self) -> Result<InvoiceTotals> {
        Ok(InvoiceTotals::aggregate(&self.lines)?)
    }

    pub fn into_lines(self) -> Vec<ComputedLine> {
        self.lines
    }

    fn line_at(&self, index: usize) -> Result<&ComputedLine> {
        self.lines.get(index).ok_or_else(|| {
            AppError::validation(format!(
                "Line index {} out of range (invoice has {} lines)",
                index,
                self.lines.len()
            ))
        })
    }
}
