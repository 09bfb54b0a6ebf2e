// Invoice line models
//
// A CatalogLine is what the user picked: a catalog item snapshot plus the
// quantity and discount entered on the form. A ComputedLine is the same
// line after the tax computation unit has derived its amounts. Amounts
// are kept at full precision; rounding happens when they are displayed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money;
use crate::modules::products::models::Product;
use crate::modules::taxes::models::{GstRate, SupplyType};

/// Input to the tax computation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogLine {
    pub product_id: i64,
    pub name: String,
    #[serde(default)]
    pub batch: String,
    pub expiry: Option<NaiveDate>,
    #[serde(default)]
    pub hsn: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    #[serde(default)]
    pub discount_percent: Decimal,
    /// Raw percent as entered or stored; validated against the GST slabs
    pub tax_rate_percent: Decimal,
}

impl CatalogLine {
    /// Build a line from a catalog item at its current sale rate
    pub fn from_product(product: &Product, quantity: i32, discount_percent: Decimal) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            batch: product.batch.clone(),
            expiry: Some(product.expiry),
            hsn: product.hsn.clone(),
            unit_price: product.sale_rate,
            quantity,
            discount_percent,
            tax_rate_percent: product.gst_rate.as_decimal(),
        }
    }

    pub fn with_quantity(&self, quantity: i32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    pub fn with_discount(&self, discount_percent: Decimal) -> Self {
        Self {
            discount_percent,
            ..self.clone()
        }
    }
}

/// A catalog line plus its derived amounts
///
/// Invariant: `line_total == taxable_value + cgst_amount + sgst_amount + igst_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedLine {
    pub line: CatalogLine,
    pub tax_rate: GstRate,
    pub supply_type: SupplyType,
    pub base_amount: Decimal,
    pub discount_amount: Decimal,
    pub taxable_value: Decimal,
    /// Central component of an intra-state split
    pub cgst_amount: Decimal,
    /// State component of an intra-state split
    pub sgst_amount: Decimal,
    /// Unsplit tax for inter-state supply
    pub igst_amount: Decimal,
    pub line_total: Decimal,
}

impl ComputedLine {
    pub fn product_id(&self) -> i64 {
        self.line.product_id
    }

    pub fn quantity(&self) -> i32 {
        self.line.quantity
    }

    pub fn tax_amount(&self) -> Decimal {
        self.cgst_amount + self.sgst_amount + self.igst_amount
    }

    pub fn is_consistent(&self) -> bool {
        self.line_total == self.taxable_value + self.tax_amount()
    }
}

/// Line as returned to API callers, amounts rounded for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemResponse {
    pub product_id: i64,
    pub name: String,
    pub batch: String,
    pub expiry: Option<NaiveDate>,
    pub hsn: String,
    pub quantity: i32,
    pub unit_price: String,
    pub discount_percent: String,
    pub tax_rate: GstRate,
    pub taxable_value: String,
    pub cgst_amount: String,
    pub sgst_amount: String,
    pub igst_amount: String,
    pub line_total: String,
}

impl From<&ComputedLine> for LineItemResponse {
    fn from(computed: &ComputedLine) -> Self {
        Self {
            product_id: computed.line.product_id,
            name: computed.line.name.clone(),
            batch: computed.line.batch.clone(),
            expiry: computed.line.expiry,
            hsn: computed.line.hsn.clone(),
            quantity: computed.line.quantity,
            unit_price: money::to_display(computed.line.unit_price),
            discount_percent: computed.line.discount_percent.normalize().to_string(),
            tax_rate: computed.tax_rate,
            taxable_value: money::to_display(computed.taxable_value),
            cgst_amount: money::to_display(computed.cgst_amount),
            sgst_amount: money::to_display(computed.sgst_amount),
            igst_amount: money::to_display(computed.igst_amount),
            line_total: money::to_display(computed.line_total),
        }
    }
}
