// Persistence gateway for recorded invoices
//
// Committing an invoice writes the invoice row, its items and every stock
// decrement in one SQLite transaction. Either all of it lands or none of it
// does. Amounts are stored as exact decimal text.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::core::{money, AppError, Result};
use crate::modules::invoices::models::{
    CatalogLine, ComputedLine, Invoice, InvoiceNumber, InvoiceQuery, InvoiceStatus,
    InvoiceTotals, PartySnapshot,
};
use crate::modules::products::models::Product;
use crate::modules::products::repositories::ProductRepository;
use crate::modules::taxes::{GstRate, SupplyType};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

/// Storage boundary used by the invoice workflow
#[async_trait]
pub trait InvoiceGateway: Send + Sync {
    /// Number after the highest one recorded for `prefix` in `period`
    async fn next_invoice_number(&self, prefix: &str, period: i32) -> Result<InvoiceNumber>;

    /// Record the invoice and apply the stock decrements atomically
    async fn commit_invoice(
        &self,
        invoice: &Invoice,
        stock_decrements: &BTreeMap<i64, i32>,
    ) -> Result<Invoice>;

    async fn lookup_catalog_item(&self, product_id: i64) -> Result<Option<Product>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>>;

    async fn find_by_number(&self, invoice_no: &InvoiceNumber) -> Result<Option<Invoice>>;

    async fn list(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>>;

    /// Move an invoice along its lifecycle; cancelling puts the stock back
    async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice>;
}

/// SQLite-backed invoice gateway
#[derive(Clone)]
pub struct SqliteInvoiceGateway {
    pool: SqlitePool,
    products: ProductRepository,
    sequence_width: usize,
}

impl SqliteInvoiceGateway {
    pub fn new(pool: SqlitePool, sequence_width: usize) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            pool,
            sequence_width,
        }
    }

    async fn insert_invoice_with_tx(
        tx: &mut Transaction<'_, Sqlite>,
        invoice: &Invoice,
    ) -> Result<i64> {
        let number = &invoice.invoice_no;

        let result = sqlx::query(
            r#"
            INSERT INTO invoices (
                invoice_no, prefix, period, sequence, sequence_width, date,
                party_id, party_name, party_gstin, party_address, party_state_code,
                supply_type, total_taxable, total_cgst, total_sgst, total_igst,
                grand_total, round_off, status, notes, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(number.to_string())
        .bind(&number.prefix)
        .bind(number.period)
        .bind(i64::from(number.sequence))
        .bind(number.width as i64)
        .bind(invoice.date)
        .bind(invoice.party.party_id)
        .bind(&invoice.party.name)
        .bind(&invoice.party.gstin)
        .bind(&invoice.party.address)
        .bind(&invoice.party.state_code)
        .bind(invoice.supply_type.to_string())
        .bind(invoice.totals.total_taxable.to_string())
        .bind(invoice.totals.total_cgst.to_string())
        .bind(invoice.totals.total_sgst.to_string())
        .bind(invoice.totals.total_igst.to_string())
        .bind(invoice.totals.grand_total.to_string())
        .bind(invoice.round_off.to_string())
        .bind(invoice.status.to_string())
        .bind(&invoice.notes)
        .bind(invoice.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Invoice {} has already been recorded",
                        number
                    ));
                }
            }
            AppError::Database(e)
        })?;

        Ok(result.last_insert_rowid())
    }

    async fn insert_items_with_tx(
        tx: &mut Transaction<'_, Sqlite>,
        invoice_id: i64,
        lines: &[ComputedLine],
    ) -> Result<()> {
        for (position, computed) in lines.iter().enumerate() {
            let line = &computed.line;

            sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    invoice_id, position, product_id, name, batch, expiry, hsn,
                    unit_price, quantity, discount_percent, tax_rate, supply_type,
                    base_amount, discount_amount, taxable_value,
                    cgst_amount, sgst_amount, igst_amount, line_total
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(invoice_id)
            .bind(position as i64)
            .bind(line.product_id)
            .bind(&line.name)
            .bind(&line.batch)
            .bind(line.expiry)
            .bind(&line.hsn)
            .bind(line.unit_price.to_string())
            .bind(line.quantity)
            .bind(line.discount_percent.to_string())
            .bind(i64::from(computed.tax_rate.percent()))
            .bind(computed.supply_type.to_string())
            .bind(computed.base_amount.to_string())
            .bind(computed.discount_amount.to_string())
            .bind(computed.taxable_value.to_string())
            .bind(computed.cgst_amount.to_string())
            .bind(computed.sgst_amount.to_string())
            .bind(computed.igst_amount.to_string())
            .bind(computed.line_total.to_string())
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    /// Guarded decrement: a row is only touched while enough stock remains
    async fn decrement_stock_with_tx(
        tx: &mut Transaction<'_, Sqlite>,
        product_id: i64,
        quantity: i32,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - ?, updated_at = ?
            WHERE id = ? AND stock >= ?
            "#,
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(product_id)
        .bind(quantity)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Insufficient stock for product {} (requested {})",
                product_id, quantity
            )));
        }

        Ok(())
    }

    async fn load_items(&self, invoice_id: i64) -> Result<Vec<ComputedLine>> {
        let rows = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT product_id, name, batch, expiry, hsn, unit_price, quantity,
                   discount_percent, tax_rate, supply_type, base_amount, discount_amount,
                   taxable_value, cgst_amount, sgst_amount, igst_amount, line_total
            FROM invoice_items
            WHERE invoice_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InvoiceItemRow::into_computed_line).collect()
    }

    async fn hydrate(&self, row: InvoiceRow) -> Result<Invoice> {
        let lines = self.load_items(row.id).await?;
        row.into_invoice(lines)
    }
}

#[async_trait]
impl InvoiceGateway for SqliteInvoiceGateway {
    async fn next_invoice_number(&self, prefix: &str, period: i32) -> Result<InvoiceNumber> {
        let last: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(sequence) FROM invoices WHERE prefix = ? AND period = ?",
        )
        .bind(prefix)
        .bind(period)
        .fetch_one(&self.pool)
        .await?;

        let next = u32::try_from(last.unwrap_or(0) + 1).map_err(|_| {
            AppError::internal(format!("Invoice sequence exhausted for {}/{}", prefix, period))
        })?;

        Ok(InvoiceNumber::new(prefix, period, next, self.sequence_width))
    }

    async fn commit_invoice(
        &self,
        invoice: &Invoice,
        stock_decrements: &BTreeMap<i64, i32>,
    ) -> Result<Invoice> {
        // Dropping the transaction on any early return rolls it back
        let mut tx = self.pool.begin().await?;

        let id = Self::insert_invoice_with_tx(&mut tx, invoice).await?;
        Self::insert_items_with_tx(&mut tx, id, &invoice.lines).await?;
        for (&product_id, &quantity) in stock_decrements {
            Self::decrement_stock_with_tx(&mut tx, product_id, quantity).await?;
        }

        tx.commit().await?;

        tracing::info!(
            invoice_id = id,
            invoice_no = %invoice.invoice_no,
            lines = invoice.lines.len(),
            grand_total = %invoice.totals.grand_total,
            "Invoice committed"
        );

        let mut committed = invoice.clone();
        committed.id = Some(id);
        Ok(committed)
    }

    async fn lookup_catalog_item(&self, product_id: i64) -> Result<Option<Product>> {
        self.products.find_by_id(product_id).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, invoice_no, date, party_id, party_name, party_gstin, party_address,
                   party_state_code, supply_type, total_taxable, total_cgst, total_sgst,
                   total_igst, grand_total, round_off, status, notes, created_at
            FROM invoices
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_number(&self, invoice_no: &InvoiceNumber) -> Result<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, invoice_no, date, party_id, party_name, party_gstin, party_address,
                   party_state_code, supply_type, total_taxable, total_cgst, total_sgst,
                   total_igst, grand_total, round_off, status, notes, created_at
            FROM invoices
            WHERE invoice_no = ?
            "#,
        )
        .bind(invoice_no.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let status = query.status.map(|s| s.to_string());

        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, invoice_no, date, party_id, party_name, party_gstin, party_address,
                   party_state_code, supply_type, total_taxable, total_cgst, total_sgst,
                   total_igst, grand_total, round_off, status, notes, created_at
            FROM invoices
            WHERE (? IS NULL OR status = ?)
              AND (? IS NULL OR party_id = ?)
              AND (? IS NULL OR date >= ?)
              AND (? IS NULL OR date <= ?)
            ORDER BY date DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(&status)
        .bind(&status)
        .bind(query.party_id)
        .bind(query.party_id)
        .bind(query.start_date)
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(query.end_date)
        .bind(limit)
        .bind(query.offset.max(0))
        .fetch_all(&self.pool)
        .await?;

        let mut invoices = Vec::with_capacity(rows.len());
        for row in rows {
            invoices.push(self.hydrate(row).await?);
        }
        Ok(invoices)
    }

    async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice> {
        let mut tx = self.pool.begin().await?;

        let current: Option<String> = sqlx::query_scalar("SELECT status FROM invoices WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let current = current.ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))?;
        let current: InvoiceStatus = current.parse().map_err(AppError::Internal)?;

        if !current.can_transition_to(status) {
            return Err(AppError::business_rule(format!(
                "Invalid status transition from {} to {}",
                current, status
            )));
        }

        sqlx::query("UPDATE invoices SET status = ? WHERE id = ? AND status = ?")
            .bind(status.to_string())
            .bind(id)
            .bind(current.to_string())
            .execute(&mut *tx)
            .await?;

        if status == InvoiceStatus::Cancelled {
            let returns: Vec<(i64, i64)> = sqlx::query_as(
                r#"
                SELECT product_id, SUM(quantity)
                FROM invoice_items
                WHERE invoice_id = ?
                GROUP BY product_id
                "#,
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

            for (product_id, quantity) in returns {
                let restored = sqlx::query(
                    "UPDATE products SET stock = stock + ?, updated_at = ? WHERE id = ?",
                )
                .bind(quantity)
                .bind(Utc::now())
                .bind(product_id)
                .execute(&mut *tx)
                .await?;

                if restored.rows_affected() == 0 {
                    tracing::warn!(
                        invoice_id = id,
                        product_id,
                        "Cancelled invoice references a product no longer in the catalog"
                    );
                }
            }
        }

        tx.commit().await?;
        tracing::info!(invoice_id = id, from = %current, to = %status, "Invoice status changed");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))
    }
}

// Helper structs for database mapping

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: i64,
    invoice_no: String,
    date: NaiveDate,
    party_id: i64,
    party_name: String,
    party_gstin: String,
    party_address: String,
    party_state_code: Option<String>,
    supply_type: String,
    total_taxable: String,
    total_cgst: String,
    total_sgst: String,
    total_igst: String,
    grand_total: String,
    round_off: String,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl InvoiceRow {
    fn into_invoice(self, lines: Vec<ComputedLine>) -> Result<Invoice> {
        let invoice_no: InvoiceNumber = self.invoice_no.parse().map_err(AppError::Internal)?;
        let supply_type: SupplyType = self.supply_type.parse().map_err(AppError::Internal)?;
        let status: InvoiceStatus = self.status.parse().map_err(AppError::Internal)?;

        let totals = InvoiceTotals {
            total_taxable: money::parse_stored("total_taxable", &self.total_taxable)?,
            total_cgst: money::parse_stored("total_cgst", &self.total_cgst)?,
            total_sgst: money::parse_stored("total_sgst", &self.total_sgst)?,
            total_igst: money::parse_stored("total_igst", &self.total_igst)?,
            grand_total: money::parse_stored("grand_total", &self.grand_total)?,
        };

        Ok(Invoice {
            id: Some(self.id),
            invoice_no,
            date: self.date,
            party: PartySnapshot {
                party_id: self.party_id,
                name: self.party_name,
                gstin: self.party_gstin,
                address: self.party_address,
                state_code: self.party_state_code,
            },
            supply_type,
            lines,
            totals,
            round_off: money::parse_stored("round_off", &self.round_off)?,
            status,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InvoiceItemRow {
    product_id: i64,
    name: String,
    batch: String,
    expiry: Option<NaiveDate>,
    hsn: String,
    unit_price: String,
    quantity: i32,
    discount_percent: String,
    tax_rate: i64,
    supply_type: String,
    base_amount: String,
    discount_amount: String,
    taxable_value: String,
    cgst_amount: String,
    sgst_amount: String,
    igst_amount: String,
    line_total: String,
}

impl InvoiceItemRow {
    fn into_computed_line(self) -> Result<ComputedLine> {
        let tax_rate = u8::try_from(self.tax_rate)
            .ok()
            .and_then(|rate| GstRate::try_from(rate).ok())
            .ok_or_else(|| {
                AppError::internal(format!("Invalid GST rate {} stored on invoice item", self.tax_rate))
            })?;
        let supply_type: SupplyType = self.supply_type.parse().map_err(AppError::Internal)?;

        Ok(ComputedLine {
            line: CatalogLine {
                product_id: self.product_id,
                name: self.name,
                batch: self.batch,
                expiry: self.expiry,
                hsn: self.hsn,
                unit_price: money::parse_stored("unit_price", &self.unit_price)?,
                quantity: self.quantity,
                discount_percent: money::parse_stored("discount_percent", &self.discount_percent)?,
                tax_rate_percent: Decimal::from(tax_rate.percent()),
            },
            tax_rate,
            supply_type,
            base_amount: money::parse_stored("base_amount", &self.base_amount)?,
            discount_amount: money::parse_stored("discount_amount", &self.discount_amount)?,
            taxable_value: money::parse_stored("taxable_value", &self.taxable_value)?,
            cgst_amount: money::parse_stored("cgst_amount", &self.cgst_amount)?,
            sgst_amount: money::parse_stored("sgst_amount", &self.sgst_amount)?,
            igst_amount: money::parse_stored("igst_amount", &self.igst_amount)?,
            line_total: money::parse_stored("line_total", &self.line_total)?,
        })
    }
}
