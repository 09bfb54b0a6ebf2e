use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::Result;
use crate::modules::settings::models::CompanyProfile;

/// Storage for the singleton company profile row
#[derive(Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_profile(&self) -> Result<Option<CompanyProfile>> {
        let row = sqlx::query_as::<_, CompanyProfileRow>(
            r#"
            SELECT company_name, address_line1, address_line2, gstin, state_code,
                   dl_no1, dl_no2, phone, email, terms
            FROM company_profile
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CompanyProfile::from))
    }

    /// Insert or replace the profile row
    pub async fn save_profile(&self, profile: &CompanyProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO company_profile (
                id, company_name, address_line1, address_line2, gstin, state_code,
                dl_no1, dl_no2, phone, email, terms, updated_at
            ) VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                company_name = excluded.company_name,
                address_line1 = excluded.address_line1,
                address_line2 = excluded.address_line2,
                gstin = excluded.gstin,
                state_code = excluded.state_code,
                dl_no1 = excluded.dl_no1,
                dl_no2 = excluded.dl_no2,
                phone = excluded.phone,
                email = excluded.email,
                terms = excluded.terms,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&profile.company_name)
        .bind(&profile.address_line1)
        .bind(&profile.address_line2)
        .bind(&profile.gstin)
        .bind(&profile.state_code)
        .bind(&profile.dl_no1)
        .bind(&profile.dl_no2)
        .bind(&profile.phone)
        .bind(&profile.email)
        .bind(&profile.terms)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CompanyProfileRow {
    company_name: String,
    address_line1: String,
    address_line2: String,
    gstin: String,
    state_code: Option<String>,
    dl_no1: String,
    dl_no2: String,
    phone: String,
    email: String,
    terms: String,
}

impl From<CompanyProfileRow> for CompanyProfile {
    fn from(row: CompanyProfileRow) -> Self {
        CompanyProfile {
            company_name: row.company_name,
            address_line1: row.address_line1,
            address_line2: row.address_line2,
            gstin: row.gstin,
            state_code: row.state_code,
            dl_no1: row.dl_no1,
            dl_no2: row.dl_no2,
            phone: row.phone,
            email: row.email,
            terms: row.terms,
        }
    }
}
