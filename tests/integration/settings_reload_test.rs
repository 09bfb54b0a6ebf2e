// Company profile updates and reloads
//
// The seller's state code decides the place of supply, so a profile
// change must be visible to the next invoice without a restart.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use helpers::*;
use pharmabill::core::AppError;
use pharmabill::invoices::models::{CreateInvoiceRequest, CreateLineItemRequest};
use pharmabill::modules::settings::CompanyProfile;
use pharmabill::taxes::SupplyType;

fn preview_request(party_id: i64, product_id: i64) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        party_id: Some(party_id),
        date: NaiveDate::from_ymd_opt(2026, 4, 1),
        supply_type: None,
        invoice_no: None,
        lines: vec![CreateLineItemRequest {
            product_id,
            quantity: 1,
            discount_percent: Decimal::ZERO,
        }],
        status: None,
        notes: None,
    }
}

#[actix_web::test]
async fn test_profile_update_changes_place_of_supply() {
    let pool = create_test_pool().await;
    save_company_profile(&pool, &TestDataFactory::company_profile()).await;
    let product =
        insert_product(&pool, &TestDataFactory::product_input("Paracetamol 500mg", 20, 12, 100)).await;
    let party = insert_party(&pool, &TestDataFactory::party_input("Apollo Pharmacy", "29")).await;

    let state = create_test_state(pool.clone()).await;

    let before = state
        .invoices
        .preview_invoice(&preview_request(party.id, product.id))
        .await
        .unwrap();
    assert_eq!(before.supply_type, SupplyType::Inter);

    let moved = CompanyProfile {
        gstin: "29AAAAA0000A1Z5".to_string(),
        state_code: None,
        ..TestDataFactory::company_profile()
    };
    let saved = state.profile_store.update(&moved).await.unwrap();
    assert_eq!(saved.state_code.as_deref(), Some("29"));

    let after = state
        .invoices
        .preview_invoice(&preview_request(party.id, product.id))
        .await
        .unwrap();
    assert_eq!(after.supply_type, SupplyType::Intra);
}

#[actix_web::test]
async fn test_reload_picks_up_external_changes() {
    let pool = create_test_pool().await;
    save_company_profile(&pool, &TestDataFactory::company_profile()).await;
    let state = create_test_state(pool.clone()).await;

    let held = state.profile_store.snapshot().await;
    assert_eq!(held.company_name, "Gopi Distributors");

    let renamed = CompanyProfile {
        company_name: "Gopi Pharma Distributors".to_string(),
        ..TestDataFactory::company_profile()
    };
    save_company_profile(&pool, &renamed).await;

    // Not visible until reloaded
    assert_eq!(state.profile_store.snapshot().await.company_name, "Gopi Distributors");

    state.profile_store.reload().await.unwrap();
    assert_eq!(
        state.profile_store.snapshot().await.company_name,
        "Gopi Pharma Distributors"
    );

    // An earlier snapshot stays as it was
    assert_eq!(held.company_name, "Gopi Distributors");
}

#[actix_web::test]
async fn test_missing_state_codes_need_explicit_supply_type() {
    let pool = create_test_pool().await;
    let product =
        insert_product(&pool, &TestDataFactory::product_input("Paracetamol 500mg", 20, 12, 100)).await;
    let party = insert_party(&pool, &TestDataFactory::party_input("City Medicals", "27")).await;

    // No company profile saved
    let state = create_test_state(pool.clone()).await;

    let err = state
        .invoices
        .preview_invoice(&preview_request(party.id, product.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    let mut explicit = preview_request(party.id, product.id);
    explicit.supply_type = Some(SupplyType::Intra);
    let invoice = state.invoices.preview_invoice(&explicit).await.unwrap();
    assert_eq!(invoice.supply_type, SupplyType::Intra);
}

#[actix_web::test]
async fn test_settings_api() {
    let pool = create_test_pool().await;
    let state = create_test_state(pool.clone()).await;
    let app = test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await;

    let req = test::TestRequest::put()
        .uri("/settings/company")
        .set_json(json!({
            "company_name": "Gopi Distributors",
            "gstin": "27AAAAA0000A1Z5",
            "phone": "+91 98765 43210"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let saved: Value = test::read_body_json(resp).await;
    assert_eq!(saved["state_code"], "27");

    let req = test::TestRequest::get().uri("/settings/company").to_request();
    let current: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(current["company_name"], "Gopi Distributors");

    let req = test::TestRequest::put()
        .uri("/settings/company")
        .set_json(json!({ "company_name": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri("/settings/company/reload")
        .to_request();
    let reloaded: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reloaded["gstin"], "27AAAAA0000A1Z5");
}
