// SQLite storage for the product catalog
//
// Prices are kept as exact decimal text. Stock only changes here through
// explicit edits; sales move stock inside the invoice gateway transaction.

use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::core::{money, search, AppError, Result};
use crate::modules::products::models::{Product, ProductInput, ProductQuery};
use crate::modules::taxes::GstRate;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

/// Repository for catalog database operations
#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &ProductInput) -> Result<Product> {
        let gst_rate = input.validate()?;

        let mut tx = self.pool.begin().await?;
        let id = Self::insert_with_tx(&mut tx, input, gst_rate).await?;
        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Product {} vanished after insert", id)))
    }

    /// Insert many products atomically; returns how many were written
    pub async fn bulk_create(&self, inputs: &[ProductInput]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        for input in inputs {
            let gst_rate = input.validate()?;
            Self::insert_with_tx(&mut tx, input, gst_rate).await?;
        }
        tx.commit().await?;

        Ok(inputs.len())
    }

    async fn insert_with_tx(
        tx: &mut Transaction<'_, Sqlite>,
        input: &ProductInput,
        gst_rate: GstRate,
    ) -> Result<i64> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, batch, expiry, hsn, gst_rate, mrp, purchase_rate, sale_rate,
                stock, manufacturer, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(input.name.trim())
        .bind(input.batch.trim())
        .bind(input.expiry)
        .bind(input.hsn.trim())
        .bind(i64::from(gst_rate.percent()))
        .bind(input.mrp.to_string())
        .bind(input.purchase_rate.to_string())
        .bind(input.sale_rate.to_string())
        .bind(input.stock)
        .bind(input.manufacturer.as_deref().map(str::trim).filter(|m| !m.is_empty()))
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, batch, expiry, hsn, gst_rate, mrp, purchase_rate, sale_rate,
                   stock, manufacturer
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    pub async fn update(&self, id: i64, input: &ProductInput) -> Result<Product> {
        let gst_rate = input.validate()?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, batch = ?, expiry = ?, hsn = ?, gst_rate = ?, mrp = ?,
                purchase_rate = ?, sale_rate = ?, stock = ?, manufacturer = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(input.name.trim())
        .bind(input.batch.trim())
        .bind(input.expiry)
        .bind(input.hsn.trim())
        .bind(i64::from(gst_rate.percent()))
        .bind(input.mrp.to_string())
        .bind(input.purchase_rate.to_string())
        .bind(input.sale_rate.to_string())
        .bind(input.stock)
        .bind(input.manufacturer.as_deref().map(str::trim).filter(|m| !m.is_empty()))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Product {} not found", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Product {} not found", id)));
        }

        Ok(())
    }

    /// Search by name or batch, alphabetical
    pub async fn search(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let pattern = search::contains_pattern(query.q.as_deref());

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, batch, expiry, hsn, gst_rate, mrp, purchase_rate, sale_rate,
                   stock, manufacturer
            FROM products
            WHERE (lower(name) LIKE ? ESCAPE '\' OR lower(batch) LIKE ? ESCAPE '\')
              AND (? = 0 OR stock > 0)
            ORDER BY name ASC, id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(query.in_stock)
        .bind(limit)
        .bind(query.offset.max(0))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    pub async fn list_all(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, batch, expiry, hsn, gst_rate, mrp, purchase_rate, sale_rate,
                   stock, manufacturer
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    id: i64,
    name: String,
    batch: String,
    expiry: NaiveDate,
    hsn: String,
    gst_rate: i64,
    mrp: String,
    purchase_rate: String,
    sale_rate: String,
    stock: i32,
    manufacturer: Option<String>,
}

impl ProductRow {
    pub(crate) fn into_product(self) -> Result<Product> {
        let gst_rate = u8::try_from(self.gst_rate)
            .ok()
            .and_then(|rate| GstRate::try_from(rate).ok())
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Invalid GST rate {} stored for product {}",
                    self.gst_rate, self.id
                ))
            })?;

        Ok(Product {
            id: self.id,
            name: self.name,
            batch: self.batch,
            expiry: self.expiry,
            hsn: self.hsn,
            gst_rate,
            mrp: money::parse_stored("mrp", &self.mrp)?,
            purchase_rate: money::parse_stored("purchase_rate", &self.purchase_rate)?,
            sale_rate: money::parse_stored("sale_rate", &self.sale_rate)?,
            stock: self.stock,
            manufacturer: self.manufacturer,
        })
    }
}
