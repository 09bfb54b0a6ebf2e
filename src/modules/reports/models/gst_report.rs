use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, AppError, Result};
use crate::modules::taxes::GstRate;

/// Tax amounts of one recorded invoice line
#[derive(Debug, Clone, PartialEq)]
pub struct TaxedLine {
    pub tax_rate: GstRate,
    pub taxable_value: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
}

/// Totals for one GST slab over a period
#[derive(Debug, Clone, PartialEq)]
pub struct GstRateBreakdown {
    pub tax_rate: GstRate,
    pub taxable_value: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub line_count: i64,
}

impl GstRateBreakdown {
    fn empty(tax_rate: GstRate) -> Self {
        Self {
            tax_rate,
            taxable_value: Decimal::ZERO,
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst: Decimal::ZERO,
            line_count: 0,
        }
    }

    pub fn total_tax(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }
}

/// GST collected per slab between two dates (inclusive)
#[derive(Debug, Clone, PartialEq)]
pub struct GstReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rates: Vec<GstRateBreakdown>,
}

impl GstReport {
    /// Fold lines per slab, ordered by rate
    pub fn from_lines(
        start_date: NaiveDate,
        end_date: NaiveDate,
        lines: &[TaxedLine],
    ) -> Result<Self> {
        let overflow = || AppError::internal("GST report amounts exceed the representable range");
        let mut by_rate: BTreeMap<u8, GstRateBreakdown> = BTreeMap::new();

        for line in lines {
            let entry = by_rate
                .entry(line.tax_rate.percent())
                .or_insert_with(|| GstRateBreakdown::empty(line.tax_rate));
            entry.taxable_value = money::checked_sum([entry.taxable_value, line.taxable_value])
                .ok_or_else(overflow)?;
            entry.cgst = money::checked_sum([entry.cgst, line.cgst]).ok_or_else(overflow)?;
            entry.sgst = money::checked_sum([entry.sgst, line.sgst]).ok_or_else(overflow)?;
            entry.igst = money::checked_sum([entry.igst, line.igst]).ok_or_else(overflow)?;
            entry.line_count += 1;
        }

        let rates: Vec<GstRateBreakdown> = by_rate.into_values().collect();

        // total_tax() below sums without checks
        money::checked_sum(
            rates
                .iter()
                .flat_map(|rate| [rate.cgst, rate.sgst, rate.igst]),
        )
        .ok_or_else(overflow)?;

        Ok(Self {
            start_date,
            end_date,
            rates,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn total_tax(&self) -> Decimal {
        self.rates.iter().map(GstRateBreakdown::total_tax).sum()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GstRateBreakdownResponse {
    pub tax_rate: GstRate,
    pub taxable_value: String,
    pub cgst: String,
    pub sgst: String,
    pub igst: String,
    pub line_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GstReportResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rates: Vec<GstRateBreakdownResponse>,
    pub total_tax: String,
}

impl From<&GstReport> for GstReportResponse {
    fn from(report: &GstReport) -> Self {
        Self {
            start_date: report.start_date,
            end_date: report.end_date,
            rates: report
                .rates
                .iter()
                .map(|rate| GstRateBreakdownResponse {
                    tax_rate: rate.tax_rate,
                    taxable_value: money::to_display(rate.taxable_value),
                    cgst: money::to_display(rate.cgst),
                    sgst: money::to_display(rate.sgst),
                    igst: money::to_display(rate.igst),
                    line_count: rate.line_count,
                })
                .collect(),
            total_tax: money::to_display(report.total_tax()),
        }
    }
}
