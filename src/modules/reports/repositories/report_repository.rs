use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::core::{money, AppError, Result};
use crate::modules::products::models::Product;
use crate::modules::products::repositories::ProductRepository;
use crate::modules::reports::models::TaxedLine;
use crate::modules::taxes::GstRate;

/// Read-only queries behind the reports
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Net payable of each invoice that has not been cancelled
    async fn billed_amounts(&self) -> Result<Vec<Decimal>>;

    async fn catalog(&self) -> Result<Vec<Product>>;

    /// Lines of invoices dated within the range, cancelled invoices excluded
    async fn taxed_lines(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<Vec<TaxedLine>>;
}

pub struct SqliteReportRepository {
    pool: SqlitePool,
    products: ProductRepository,
}

impl SqliteReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl ReportRepository for SqliteReportRepository {
    async fn billed_amounts(&self) -> Result<Vec<Decimal>> {
        // Stored amounts are exact text; summing happens in Decimal
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT grand_total, round_off FROM invoices WHERE status <> 'CANCELLED'",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(grand_total, round_off)| {
                money::parse_stored("grand_total", &grand_total)?
                    .checked_add(money::parse_stored("round_off", &round_off)?)
                    .ok_or_else(|| AppError::internal("Stored invoice amount out of range"))
            })
            .collect()
    }

    async fn catalog(&self) -> Result<Vec<Product>> {
        self.products.list_all().await
    }

    async fn taxed_lines(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<Vec<TaxedLine>> {
        let rows: Vec<(i64, String, String, String, String)> = sqlx::query_as(
            r#"
            SELECT ii.tax_rate, ii.taxable_value, ii.cgst_amount, ii.sgst_amount, ii.igst_amount
            FROM invoice_items ii
            JOIN invoices i ON i.id = ii.invoice_id
            WHERE i.status <> 'CANCELLED'
              AND i.date >= ?
              AND i.date <= ?
            ORDER BY ii.tax_rate ASC
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(rate, taxable_value, cgst, sgst, igst)| {
                let tax_rate = u8::try_from(rate)
                    .ok()
                    .and_then(|r| GstRate::try_from(r).ok())
                    .ok_or_else(|| {
                        AppError::internal(format!("Invalid GST rate {} stored on invoice item", rate))
                    })?;

                Ok(TaxedLine {
                    tax_rate,
                    taxable_value: money::parse_stored("taxable_value", &taxable_value)?,
                    cgst: money::parse_stored("cgst_amount", &cgst)?,
                    sgst: money::parse_stored("sgst_amount", &sgst)?,
                    igst: money::parse_stored("igst_amount", &igst)?,
                })
            })
            .collect()
    }
}
