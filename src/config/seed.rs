// Demo data for a fresh database
//
// Each table is seeded only while it is empty, so restarting never
// duplicates rows and user data is never touched.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use crate::core::{AppError, Result};
use crate::modules::parties::{PartyInput, PartyRepository};
use crate::modules::products::{ProductInput, ProductRepository};
use crate::modules::settings::{CompanyProfile, SettingsRepository};

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::internal(format!("Invalid seed date {}-{}-{}", year, month, day)))
}

fn product(
    name: &str,
    batch: &str,
    expiry: NaiveDate,
    gst_rate: i64,
    (mrp, purchase_rate, sale_rate): (i64, i64, i64),
    stock: i32,
    manufacturer: &str,
) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        batch: batch.to_string(),
        expiry,
        hsn: "3004".to_string(),
        gst_rate: Decimal::from(gst_rate),
        mrp: Decimal::from(mrp),
        purchase_rate: Decimal::from(purchase_rate),
        sale_rate: Decimal::from(sale_rate),
        stock,
        manufacturer: Some(manufacturer.to_string()),
    }
}

fn demo_products() -> Result<Vec<ProductInput>> {
    Ok(vec![
        product("Paracetamol 500mg", "B123", date(2026, 12, 31)?, 12, (20, 10, 15), 1000, "Cipla"),
        product("Azithromycin 500mg", "AZ09", date(2025, 10, 20)?, 12, (120, 80, 100), 500, "Sun Pharma"),
        product("Vitamin C Chewable", "VC99", date(2026, 5, 15)?, 5, (50, 25, 35), 200, "Abbott"),
    ])
}

fn demo_parties() -> Vec<PartyInput> {
    vec![
        PartyInput {
            name: "City Medical Store".to_string(),
            gstin: "27ABCDE1234F1Z5".to_string(),
            address: "123 Main St, Mumbai".to_string(),
            phone: "9876543210".to_string(),
            email: None,
            dl_no: Some("MH-MZ1-123456".to_string()),
            state_code: None,
        },
        PartyInput {
            name: "Wellness Pharmacy".to_string(),
            gstin: "27FGHIJ5678K1Z9".to_string(),
            address: "456 High St, Pune".to_string(),
            phone: "9123456789".to_string(),
            email: None,
            dl_no: Some("MH-PZ1-654321".to_string()),
            state_code: None,
        },
    ]
}

/// Fill empty tables with the demo catalog, parties and company profile
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<()> {
    let products = ProductRepository::new(pool.clone());
    if products.count().await? == 0 {
        let inserted = products.bulk_create(&demo_products()?).await?;
        tracing::info!(count = inserted, "Seeded demo products");
    }

    let parties = PartyRepository::new(pool.clone());
    if parties.count().await? == 0 {
        let inserted = parties.bulk_create(&demo_parties()).await?;
        tracing::info!(count = inserted, "Seeded demo parties");
    }

    let settings = SettingsRepository::new(pool.clone());
    if settings.find_profile().await?.is_none() {
        settings.save_profile(&CompanyProfile::demo()).await?;
        tracing::info!("Seeded demo company profile");
    }

    Ok(())
}
