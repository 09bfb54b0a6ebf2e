use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, AppError, Result};
use crate::modules::taxes::GstRate;

/// A sellable batch of a product in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub batch: String,
    pub expiry: NaiveDate,
    pub hsn: String,
    pub gst_rate: GstRate,
    pub mrp: Decimal,
    pub purchase_rate: Decimal,
    pub sale_rate: Decimal,
    pub stock: i32,
    pub manufacturer: Option<String>,
}

impl Product {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry < today
    }

    /// Not yet expired but expiring within `days`
    pub fn expires_within(&self, today: NaiveDate, days: i64) -> bool {
        !self.is_expired(today) && self.expiry <= today + Duration::days(days)
    }

    pub fn is_low_stock(&self, threshold: i32) -> bool {
        self.stock < threshold
    }
}

/// Fields accepted when creating or updating a product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub batch: String,
    pub expiry: NaiveDate,
    pub hsn: String,
    pub gst_rate: Decimal,
    #[serde(default)]
    pub mrp: Decimal,
    #[serde(default)]
    pub purchase_rate: Decimal,
    pub sale_rate: Decimal,
    #[serde(default)]
    pub stock: i32,
    pub manufacturer: Option<String>,
}

impl ProductInput {
    /// Validate the input and resolve its GST slab
    pub fn validate(&self) -> Result<GstRate> {
        Self::require("name", &self.name)?;
        Self::require("batch", &self.batch)?;
        Self::require("hsn", &self.hsn)?;

        if self.name.len() > 255 {
            return Err(AppError::validation(
                "Product name cannot exceed 255 characters",
            ));
        }

        for (field, value) in [
            ("mrp", self.mrp),
            ("purchase_rate", self.purchase_rate),
            ("sale_rate", self.sale_rate),
        ] {
            if value < Decimal::ZERO {
                return Err(AppError::validation(format!(
                    "{} must be non-negative, got: {}",
                    field, value
                )));
            }
        }

        if self.stock < 0 {
            return Err(AppError::validation(format!(
                "Stock must be non-negative, got: {}",
                self.stock
            )));
        }

        GstRate::try_from(self.gst_rate).map_err(|e| AppError::validation(e.to_string()))
    }

    fn require(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(AppError::validation(format!("Product {} cannot be empty", field)));
        }
        Ok(())
    }
}

/// Search parameters for the catalog list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive match on name or batch
    pub q: Option<String>,
    /// Only items with stock left, as the invoice picker needs
    #[serde(default)]
    pub in_stock: bool,
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub batch: String,
    pub expiry: NaiveDate,
    pub hsn: String,
    pub gst_rate: GstRate,
    pub mrp: String,
    pub purchase_rate: String,
    pub sale_rate: String,
    pub stock: i32,
    pub manufacturer: Option<String>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            batch: product.batch.clone(),
            expiry: product.expiry,
            hsn: product.hsn.clone(),
            gst_rate: product.gst_rate,
            mrp: money::to_display(product.mrp),
            purchase_rate: money::to_display(product.purchase_rate),
            sale_rate: money::to_display(product.sale_rate),
            stock: product.stock,
            manufacturer: product.manufacturer.clone(),
        }
    }
}
