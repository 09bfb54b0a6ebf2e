// API tests for the catalog, parties, tax and report endpoints
//
// All routes are mounted exactly as the binary mounts them, over a fresh
// in-memory database per test.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use serde_json::{json, Value};

use helpers::*;

#[actix_web::test]
async fn test_product_crud_and_search() {
    let pool = create_test_pool().await;
    let state = create_test_state(pool.clone()).await;
    let app = test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({
            "name": "Azithromycin 500mg",
            "batch": "AZ09",
            "expiry": "2099-10-20",
            "hsn": "3004",
            "gst_rate": 12,
            "mrp": "120",
            "purchase_rate": "80",
            "sale_rate": "100",
            "stock": 500,
            "manufacturer": "Sun Pharma"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["sale_rate"], "100.00");
    assert_eq!(created["gst_rate"], 12);
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri("/products?q=azithro")
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri("/products?q=ibuprofen").to_request();
    let none: Value = test::call_and_read_body_json(&app, req).await;
    assert!(none.as_array().unwrap().is_empty());

    let req = test::TestRequest::put()
        .uri(&format!("/products/{}", id))
        .set_json(json!({
            "name": "Azithromycin 500mg",
            "batch": "AZ10",
            "expiry": "2099-12-31",
            "hsn": "3004",
            "gst_rate": 12,
            "sale_rate": "105.50",
            "stock": 450
        }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["batch"], "AZ10");
    assert_eq!(updated["sale_rate"], "105.50");
    assert_eq!(updated["stock"], 450);

    let req = test::TestRequest::delete()
        .uri(&format!("/products/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/products/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_search_treats_wildcards_literally() {
    let pool = create_test_pool().await;
    insert_product(&pool, &TestDataFactory::product_input("Glycerin 100% Pure", 40, 18, 30)).await;
    insert_product(&pool, &TestDataFactory::product_input("Vitamin C", 35, 5, 200)).await;
    insert_party(&pool, &TestDataFactory::party_input("Shah_Medicos", "27")).await;
    insert_party(&pool, &TestDataFactory::party_input("ShahXMedicos", "27")).await;

    let state = create_test_state(pool.clone()).await;
    let app = test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/products?q=%25").to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Glycerin 100% Pure"]);

    let req = test::TestRequest::get().uri("/products?q=_").to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert!(found.as_array().unwrap().is_empty());

    let req = test::TestRequest::get().uri("/parties?q=shah_").to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Shah_Medicos");
}

#[actix_web::test]
async fn test_product_with_unsupported_rate_rejected() {
    let pool = create_test_pool().await;
    let state = create_test_state(pool.clone()).await;
    let app = test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/products")
        .set_json(json!({
            "name": "Cough Syrup",
            "batch": "CS1",
            "expiry": "2099-01-01",
            "hsn": "3004",
            "gst_rate": 15,
            "sale_rate": "60"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_party_state_code_follows_gstin() {
    let pool = create_test_pool().await;
    let state = create_test_state(pool.clone()).await;
    let app = test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/parties")
        .set_json(json!({
            "name": "Apollo Pharmacy",
            "gstin": "29abcde1234f1z5",
            "address": "MG Road, Bengaluru",
            "phone": "9876543210"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let party: Value = test::read_body_json(resp).await;
    assert_eq!(party["gstin"], "29ABCDE1234F1Z5");
    assert_eq!(party["state_code"], "29");

    let req = test::TestRequest::get().uri("/parties?q=apollo").to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri("/parties")
        .set_json(json!({ "name": "  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_tax_endpoints() {
    let pool = create_test_pool().await;
    let state = create_test_state(pool.clone()).await;
    let app = test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/taxes/rates").to_request();
    let rates: Value = test::call_and_read_body_json(&app, req).await;
    let percents: Vec<i64> = rates["rates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["percent"].as_i64().unwrap())
        .collect();
    assert_eq!(percents, vec![0, 5, 12, 18, 28]);

    let req = test::TestRequest::post()
        .uri("/taxes/compute-line")
        .set_json(json!({
            "supply_type": "intra",
            "line": {
                "product_id": 1,
                "name": "Vitamin C",
                "unit_price": "50",
                "quantity": 3,
                "discount_percent": "10",
                "tax_rate_percent": "5"
            }
        }))
        .to_request();
    let line: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(line["taxable_value"], "135.00");
    assert_eq!(line["cgst_amount"], "3.38");
    assert_eq!(line["line_total"], "141.75");
}

#[actix_web::test]
async fn test_health_and_dashboard() {
    let pool = create_test_pool().await;
    insert_product(&pool, &TestDataFactory::product_input("Paracetamol 500mg", 20, 12, 10)).await;
    insert_product(&pool, &TestDataFactory::product_input("Vitamin C", 35, 5, 200)).await;

    let state = create_test_state(pool.clone()).await;
    let app = test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get().uri("/ready").to_request();
    let ready: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ready["ready"], true);

    let req = test::TestRequest::get().uri("/reports/dashboard").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let dashboard: Value = test::read_body_json(resp).await;
    assert_eq!(dashboard["total_invoices"], 0);
    assert_eq!(dashboard["total_sales"], "0.00");
    assert_eq!(dashboard["low_stock_items"], 1);
    assert_eq!(dashboard["expired_items"], 0);
}
