use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::core::{search, AppError, Result};
use crate::modules::parties::models::{Party, PartyInput, PartyQuery};

/// Repository for party (customer) records
#[derive(Clone)]
pub struct PartyRepository {
    pool: SqlitePool,
}

impl PartyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &PartyInput) -> Result<Party> {
        let input = input.normalized()?;

        let mut tx = self.pool.begin().await?;
        let id = Self::insert_with_tx(&mut tx, &input).await?;
        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Party {} vanished after insert", id)))
    }

    /// Insert many parties atomically
    pub async fn bulk_create(&self, inputs: &[PartyInput]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        for input in inputs {
            let input = input.normalized()?;
            Self::insert_with_tx(&mut tx, &input).await?;
        }
        tx.commit().await?;

        Ok(inputs.len())
    }

    async fn insert_with_tx(tx: &mut Transaction<'_, Sqlite>, input: &PartyInput) -> Result<i64> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO parties (
                name, gstin, address, phone, email, dl_no, state_code, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.name)
        .bind(&input.gstin)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.dl_no)
        .bind(&input.state_code)
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Party>> {
        let party = sqlx::query_as::<_, PartyRow>(
            r#"
            SELECT id, name, gstin, address, phone, email, dl_no, state_code
            FROM parties
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Party::from);

        Ok(party)
    }

    pub async fn update(&self, id: i64, input: &PartyInput) -> Result<Party> {
        let input = input.normalized()?;

        let result = sqlx::query(
            r#"
            UPDATE parties
            SET name = ?, gstin = ?, address = ?, phone = ?, email = ?, dl_no = ?,
                state_code = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(&input.gstin)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.dl_no)
        .bind(&input.state_code)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Party {} not found", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Party {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM parties WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Party {} not found", id)));
        }

        Ok(())
    }

    /// Case-insensitive name search
    pub async fn search(&self, query: &PartyQuery) -> Result<Vec<Party>> {
        let limit = query.limit.unwrap_or(50).clamp(1, 500);
        let pattern = search::contains_pattern(query.q.as_deref());

        let rows = sqlx::query_as::<_, PartyRow>(
            r#"
            SELECT id, name, gstin, address, phone, email, dl_no, state_code
            FROM parties
            WHERE lower(name) LIKE ? ESCAPE '\'
            ORDER BY name ASC, id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .bind(query.offset.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Party::from).collect())
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parties")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PartyRow {
    id: i64,
    name: String,
    gstin: String,
    address: String,
    phone: String,
    email: Option<String>,
    dl_no: Option<String>,
    state_code: Option<String>,
}

impl From<PartyRow> for Party {
    fn from(row: PartyRow) -> Self {
        Party {
            id: row.id,
            name: row.name,
            gstin: row.gstin,
            address: row.address,
            phone: row.phone,
            email: row.email,
            dl_no: row.dl_no,
            state_code: row.state_code,
        }
    }
}
