// Integration tests for recording invoices
//
// Runs the invoice service and gateway against a real SQLite database:
// numbering, atomic commit with stock decrements, rollback on failure,
// duplicate numbers, cancellation and the HTTP surface.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::collections::BTreeMap;

use actix_web::{test, App};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use helpers::*;
use pharmabill::core::AppError;
use pharmabill::invoices::models::{CreateInvoiceRequest, CreateLineItemRequest, InvoiceQuery};
use pharmabill::invoices::{InvoiceGateway, InvoiceNumber, InvoiceStatus, SqliteInvoiceGateway};
use pharmabill::taxes::SupplyType;
use pharmabill::AppState;

struct Fixture {
    pool: SqlitePool,
    state: AppState,
    paracetamol_id: i64,
    vitamin_id: i64,
    local_party_id: i64,
    outstation_party_id: i64,
}

async fn setup() -> Fixture {
    let pool = create_test_pool().await;
    save_company_profile(&pool, &TestDataFactory::company_profile()).await;

    let paracetamol =
        insert_product(&pool, &TestDataFactory::product_input("Paracetamol 500mg", 100, 12, 10)).await;
    let vitamin =
        insert_product(&pool, &TestDataFactory::product_input("Vitamin C", 50, 5, 5)).await;
    let local = insert_party(&pool, &TestDataFactory::party_input("City Medicals", "27")).await;
    let outstation =
        insert_party(&pool, &TestDataFactory::party_input("Apollo Pharmacy", "29")).await;

    let state = create_test_state(pool.clone()).await;

    Fixture {
        pool,
        state,
        paracetamol_id: paracetamol.id,
        vitamin_id: vitamin.id,
        local_party_id: local.id,
        outstation_party_id: outstation.id,
    }
}

fn invoice_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
}

fn request(party_id: i64, lines: &[(i64, i32, Decimal)]) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        party_id: Some(party_id),
        date: Some(invoice_date()),
        supply_type: None,
        invoice_no: None,
        lines: lines
            .iter()
            .map(|&(product_id, quantity, discount_percent)| CreateLineItemRequest {
                product_id,
                quantity,
                discount_percent,
            })
            .collect(),
        status: None,
        notes: None,
    }
}

#[actix_web::test]
async fn test_commit_records_invoice_and_decrements_stock() {
    let fx = setup().await;

    let invoice = fx
        .state
        .invoices
        .create_invoice(&request(
            fx.local_party_id,
            &[(fx.paracetamol_id, 2, dec!(0)), (fx.vitamin_id, 3, dec!(10))],
        ))
        .await
        .unwrap();

    assert!(invoice.id.is_some());
    assert_eq!(invoice.invoice_no.to_string(), "GD/2026/001");
    assert_eq!(invoice.supply_type, SupplyType::Intra);
    assert_eq!(invoice.totals.total_taxable, dec!(335));
    assert_eq!(invoice.totals.total_cgst, dec!(15.375));
    assert_eq!(invoice.totals.grand_total, dec!(365.75));
    assert_eq!(invoice.status, InvoiceStatus::Paid);

    assert_eq!(product_stock(&fx.pool, fx.paracetamol_id).await, 8);
    assert_eq!(product_stock(&fx.pool, fx.vitamin_id).await, 2);

    let stored = fx
        .state
        .invoices
        .get_invoice(invoice.id.unwrap())
        .await
        .unwrap();
    assert_eq!(stored.lines.len(), 2);
    assert_eq!(stored.lines[0].product_id(), fx.paracetamol_id);
    assert_eq!(stored.lines[1].cgst_amount, dec!(3.375));
    assert_eq!(stored.totals, invoice.totals);
    assert_eq!(stored.party.name, "City Medicals");
}

#[actix_web::test]
async fn test_outstation_party_is_billed_igst() {
    let fx = setup().await;

    let invoice = fx
        .state
        .invoices
        .create_invoice(&request(fx.outstation_party_id, &[(fx.paracetamol_id, 2, dec!(0))]))
        .await
        .unwrap();

    assert_eq!(invoice.supply_type, SupplyType::Inter);
    assert_eq!(invoice.totals.total_igst, dec!(24));
    assert_eq!(invoice.totals.total_cgst, Decimal::ZERO);
}

#[actix_web::test]
async fn test_numbers_are_sequential_within_a_year() {
    let fx = setup().await;
    let service = &fx.state.invoices;

    let first = service
        .create_invoice(&request(fx.local_party_id, &[(fx.paracetamol_id, 1, dec!(0))]))
        .await
        .unwrap();
    let second = service
        .create_invoice(&request(fx.local_party_id, &[(fx.paracetamol_id, 1, dec!(0))]))
        .await
        .unwrap();

    assert_eq!(first.invoice_no.to_string(), "GD/2026/001");
    assert_eq!(second.invoice_no.to_string(), "GD/2026/002");

    let next = service.next_invoice_number(Some(invoice_date())).await.unwrap();
    assert_eq!(next.to_string(), "GD/2026/003");

    let next_year = service
        .next_invoice_number(NaiveDate::from_ymd_opt(2027, 1, 2))
        .await
        .unwrap();
    assert_eq!(next_year.to_string(), "GD/2027/001");
}

#[actix_web::test]
async fn test_insufficient_stock_rolls_back_whole_invoice() {
    let fx = setup().await;
    let service = &fx.state.invoices;

    let draft = service
        .preview_invoice(&request(
            fx.local_party_id,
            &[(fx.paracetamol_id, 2, dec!(0)), (fx.vitamin_id, 1, dec!(0))],
        ))
        .await
        .unwrap();

    // First product passes its guard, second product does not
    let gateway = SqliteInvoiceGateway::new(fx.pool.clone(), 3);
    let mut decrements = BTreeMap::new();
    decrements.insert(fx.paracetamol_id, 2);
    decrements.insert(fx.vitamin_id, 99);

    let err = gateway.commit_invoice(&draft, &decrements).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    assert_eq!(product_stock(&fx.pool, fx.paracetamol_id).await, 10);
    assert_eq!(product_stock(&fx.pool, fx.vitamin_id).await, 5);
    assert!(gateway.find_by_number(&draft.invoice_no).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_quantity_above_stock_rejected_before_commit() {
    let fx = setup().await;

    let err = fx
        .state
        .invoices
        .create_invoice(&request(fx.local_party_id, &[(fx.vitamin_id, 6, dec!(0))]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BusinessRule(_)));
    assert_eq!(product_stock(&fx.pool, fx.vitamin_id).await, 5);
}

#[actix_web::test]
async fn test_retried_number_is_a_conflict() {
    let fx = setup().await;
    let service = &fx.state.invoices;

    let mut req = request(fx.local_party_id, &[(fx.paracetamol_id, 1, dec!(0))]);
    req.invoice_no = Some("GD/2026/001".to_string());

    service.create_invoice(&req).await.unwrap();
    let err = service.create_invoice(&req).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(product_stock(&fx.pool, fx.paracetamol_id).await, 9);
}

#[actix_web::test]
async fn test_client_number_must_follow_prefix_and_period() {
    let fx = setup().await;
    let service = &fx.state.invoices;
    let lines = [(fx.paracetamol_id, 1, dec!(0))];

    // foreign prefix, another year, and a jump past the next free sequence
    for number in ["ZZ/2026/001", "GD/1999/001", "GD/2026/900"] {
        let mut req = request(fx.local_party_id, &lines);
        req.invoice_no = Some(number.to_string());

        let err = service.create_invoice(&req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{} was accepted", number);
        let err = service.preview_invoice(&req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
    assert_eq!(product_stock(&fx.pool, fx.paracetamol_id).await, 10);

    let mut req = request(fx.local_party_id, &lines);
    req.invoice_no = Some("GD/2026/1".to_string());
    let invoice = service.create_invoice(&req).await.unwrap();
    assert_eq!(invoice.invoice_no.to_string(), "GD/2026/001");

    let next = service.next_invoice_number(Some(invoice_date())).await.unwrap();
    assert_eq!(next.to_string(), "GD/2026/002");
}

#[actix_web::test]
async fn test_invoice_too_large_to_total_is_rejected() {
    let fx = setup().await;

    let mut huge_input = TestDataFactory::product_input("Bulk Order A", 1, 0, 10);
    huge_input.sale_rate = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
    let first = insert_product(&fx.pool, &huge_input).await;
    huge_input.name = "Bulk Order B".to_string();
    let second = insert_product(&fx.pool, &huge_input).await;

    let req = request(
        fx.local_party_id,
        &[(first.id, 1, dec!(0)), (second.id, 1, dec!(0))],
    );

    let err = fx.state.invoices.preview_invoice(&req).await.unwrap_err();
    assert_eq!(err.code(), "AMOUNT_OVERFLOW");

    let err = fx.state.invoices.create_invoice(&req).await.unwrap_err();
    assert_eq!(err.code(), "AMOUNT_OVERFLOW");
    assert_eq!(product_stock(&fx.pool, first.id).await, 10);
}

#[actix_web::test]
async fn test_missing_party_and_empty_lines_rejected() {
    let fx = setup().await;
    let service = &fx.state.invoices;

    let mut no_party = request(fx.local_party_id, &[(fx.paracetamol_id, 1, dec!(0))]);
    no_party.party_id = None;
    assert!(matches!(
        service.create_invoice(&no_party).await.unwrap_err(),
        AppError::BusinessRule(_)
    ));

    let no_lines = request(fx.local_party_id, &[]);
    assert!(matches!(
        service.create_invoice(&no_lines).await.unwrap_err(),
        AppError::BusinessRule(_)
    ));

    let unknown_party = request(9_999, &[(fx.paracetamol_id, 1, dec!(0))]);
    assert!(matches!(
        service.create_invoice(&unknown_party).await.unwrap_err(),
        AppError::NotFound(_)
    ));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
        .fetch_one(&fx.pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[actix_web::test]
async fn test_preview_does_not_persist_or_reserve_number() {
    let fx = setup().await;
    let service = &fx.state.invoices;

    let preview = service
        .preview_invoice(&request(fx.local_party_id, &[(fx.paracetamol_id, 2, dec!(0))]))
        .await
        .unwrap();
    assert!(preview.id.is_none());
    assert_eq!(preview.invoice_no.to_string(), "GD/2026/001");

    assert_eq!(product_stock(&fx.pool, fx.paracetamol_id).await, 10);

    let committed = service
        .create_invoice(&request(fx.local_party_id, &[(fx.paracetamol_id, 2, dec!(0))]))
        .await
        .unwrap();
    assert_eq!(committed.invoice_no, preview.invoice_no);
}

#[actix_web::test]
async fn test_cancelling_returns_stock() {
    let fx = setup().await;
    let service = &fx.state.invoices;

    let mut req = request(fx.local_party_id, &[(fx.paracetamol_id, 4, dec!(0))]);
    req.status = Some(InvoiceStatus::Pending);
    let invoice = service.create_invoice(&req).await.unwrap();
    assert_eq!(product_stock(&fx.pool, fx.paracetamol_id).await, 6);

    let id = invoice.id.unwrap();
    let cancelled = service.update_status(id, InvoiceStatus::Cancelled).await.unwrap();
    assert_eq!(cancelled.status, InvoiceStatus::Cancelled);
    assert_eq!(product_stock(&fx.pool, fx.paracetamol_id).await, 10);

    // Cancelled is terminal
    let err = service.update_status(id, InvoiceStatus::Paid).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
    assert_eq!(product_stock(&fx.pool, fx.paracetamol_id).await, 10);
}

#[actix_web::test]
async fn test_cannot_create_cancelled_invoice() {
    let fx = setup().await;

    let mut req = request(fx.local_party_id, &[(fx.paracetamol_id, 1, dec!(0))]);
    req.status = Some(InvoiceStatus::Cancelled);

    let err = fx.state.invoices.create_invoice(&req).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[actix_web::test]
async fn test_list_filters_by_status_and_party() {
    let fx = setup().await;
    let service = &fx.state.invoices;

    service
        .create_invoice(&request(fx.local_party_id, &[(fx.paracetamol_id, 1, dec!(0))]))
        .await
        .unwrap();
    let mut pending = request(fx.outstation_party_id, &[(fx.vitamin_id, 1, dec!(0))]);
    pending.status = Some(InvoiceStatus::Pending);
    service.create_invoice(&pending).await.unwrap();

    let all = service.list_invoices(&InvoiceQuery::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_pending = service
        .list_invoices(&InvoiceQuery {
            status: Some(InvoiceStatus::Pending),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(only_pending.len(), 1);
    assert_eq!(only_pending[0].party.party_id, fx.outstation_party_id);

    let local = service
        .list_invoices(&InvoiceQuery {
            party_id: Some(fx.local_party_id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(local.len(), 1);
    assert_eq!(local[0].lines.len(), 1);
}

#[actix_web::test]
async fn test_invoice_api_round_trip() {
    let fx = setup().await;
    let state = fx.state.clone();
    let app = test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await;

    let body = json!({
        "party_id": fx.local_party_id,
        "date": "2026-03-15",
        "lines": [
            { "product_id": fx.paracetamol_id, "quantity": 2 },
            { "product_id": fx.vitamin_id, "quantity": 3, "discount_percent": "10" }
        ]
    });

    let req = test::TestRequest::post()
        .uri("/invoices/preview")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let preview: Value = test::read_body_json(resp).await;
    assert_eq!(preview["totals"]["grand_total"], "365.75");
    assert_eq!(preview["totals"]["total_cgst"], "15.38");
    assert_eq!(preview["supply_type"], "intra");

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["invoice_no"], "GD/2026/001");
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/invoices/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched["lines"].as_array().unwrap().len(), 2);
    assert_eq!(fetched["status"], "PAID");

    let req = test::TestRequest::get()
        .uri("/invoices/next-number?date=2026-03-16")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let next: Value = test::read_body_json(resp).await;
    assert_eq!(next["invoice_no"], "GD/2026/002");

    let req = test::TestRequest::put()
        .uri(&format!("/invoices/{}/status", id))
        .set_json(json!({ "status": "CANCELLED" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(product_stock(&fx.pool, fx.paracetamol_id).await, 10);
}

#[actix_web::test]
async fn test_invoice_api_error_bodies() {
    let fx = setup().await;
    let state = fx.state.clone();
    let app = test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(json!({ "party_id": fx.local_party_id, "lines": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "BUSINESS_RULE_VIOLATION");

    let req = test::TestRequest::post()
        .uri("/invoices/preview")
        .set_json(json!({
            "party_id": fx.local_party_id,
            "lines": [{ "product_id": fx.paracetamol_id, "quantity": 0 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get().uri("/invoices/424242").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_gateway_lookup_and_number_parsing() {
    let fx = setup().await;
    let gateway = SqliteInvoiceGateway::new(fx.pool.clone(), 3);

    let item = gateway.lookup_catalog_item(fx.paracetamol_id).await.unwrap().unwrap();
    assert_eq!(item.name, "Paracetamol 500mg");
    assert!(gateway.lookup_catalog_item(777).await.unwrap().is_none());

    let first = gateway.next_invoice_number("GD", 2026).await.unwrap();
    assert_eq!(first, InvoiceNumber::new("GD", 2026, 1, 3));
}
