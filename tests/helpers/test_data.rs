// Test data factory
//
// Builders for catalog items, parties and the company profile. Expiry
// dates sit far in the future so stock checks are not affected by the
// date the suite runs on.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use pharmabill::modules::parties::{Party, PartyInput, PartyRepository};
use pharmabill::modules::products::{Product, ProductInput, ProductRepository};
use pharmabill::modules::settings::{CompanyProfile, SettingsRepository};

pub struct TestDataFactory;

impl TestDataFactory {
    pub fn far_expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 12, 31).expect("valid date")
    }

    /// Catalog item with the given sale rate, GST percent and stock
    pub fn product_input(name: &str, sale_rate: i64, gst_rate: u8, stock: i32) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            batch: format!("B-{}", name.len()),
            expiry: Self::far_expiry(),
            hsn: "3004".to_string(),
            gst_rate: Decimal::from(gst_rate),
            mrp: Decimal::from(sale_rate + sale_rate / 5),
            purchase_rate: Decimal::from(sale_rate * 4 / 5),
            sale_rate: Decimal::from(sale_rate),
            stock,
            manufacturer: Some("Test Labs".to_string()),
        }
    }

    /// Buyer registered in `state_code`
    pub fn party_input(name: &str, state_code: &str) -> PartyInput {
        PartyInput {
            name: name.to_string(),
            gstin: format!("{}ABCDE1234F1Z5", state_code),
            address: "Shop 4, Station Road".to_string(),
            phone: "9876543210".to_string(),
            email: None,
            dl_no: None,
            state_code: None,
        }
    }

    /// Seller profile registered in Maharashtra (state code 27)
    pub fn company_profile() -> CompanyProfile {
        CompanyProfile::demo()
    }
}

pub async fn insert_product(pool: &SqlitePool, input: &ProductInput) -> Product {
    ProductRepository::new(pool.clone())
        .create(input)
        .await
        .expect("Failed to insert test product")
}

pub async fn insert_party(pool: &SqlitePool, input: &PartyInput) -> Party {
    PartyRepository::new(pool.clone())
        .create(input)
        .await
        .expect("Failed to insert test party")
}

pub async fn save_company_profile(pool: &SqlitePool, profile: &CompanyProfile) {
    SettingsRepository::new(pool.clone())
        .save_profile(profile)
        .await
        .expect("Failed to save company profile");
}

pub async fn product_stock(pool: &SqlitePool, id: i64) -> i32 {
    ProductRepository::new(pool.clone())
        .find_by_id(id)
        .await
        .expect("Failed to read product")
        .expect("Product should exist")
        .stock
}
