//! Drives the router end to end with `oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use inkline_core::{Money, NewCategory, NewParty, NewProduct, Product};
use inkline_db::{Database, DbConfig};
use inkline_server::auth::JwtManager;
use inkline_server::{build_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

struct TestApp {
    router: Router,
    db: Database,
    token: String,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let jwt = JwtManager::new(SECRET, 3600);
        let token = jwt.issue_token("cashier-1").unwrap();
        let router = build_router(AppState::new(db.clone(), jwt));
        TestApp { router, db, token }
    }

    async fn product(&self, name: &str, barcode: &str, quantity: i64, retail_cents: i64) -> Product {
        let category = match self.db.categories().list(None).await.unwrap().pop() {
            Some(c) => c,
            None => self
                .db
                .categories()
                .create(NewCategory {
                    name: "Stationery".into(),
                    code: None,
                })
                .await
                .unwrap(),
        };

        self.db
            .products()
            .insert(NewProduct {
                name: name.into(),
                barcode: barcode.into(),
                cost_price: Money::from_cents(retail_cents / 2),
                retail_price: Money::from_cents(retail_cents),
                quantity,
                grn_number: None,
                category_id: category.id,
                supplier_id: None,
                image_url: None,
                image_public_id: None,
            })
            .await
            .unwrap()
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_sales_require_token() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/api/sales/next").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let forged = JwtManager::new("other-secret", 3600).issue_token("x").unwrap();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/api/sales/next")
                .header(header::AUTHORIZATION, format!("Bearer {forged}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_sale_returns_invoice() {
    let app = TestApp::new().await;
    let pen = app.product("Ball Pen", "4790000000001", 10, 10000).await;

    let (status, next) = app.send(Method::GET, "/api/sales/next", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(next["next"], 1);

    let (status, sale) = app
        .send(
            Method::POST,
            "/api/sales",
            Some(json!({
                "items": [{ "productId": pen.id, "qty": 3 }],
                "paidAmount": 250
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["invoiceNo"], 1);
    assert_eq!(sale["subtotalCents"], 30000);
    assert_eq!(sale["grandTotalCents"], 30000);
    assert_eq!(sale["balanceCents"], -5000);
    assert_eq!(sale["cashierId"], "cashier-1");
    assert_eq!(sale["items"][0]["nameSnapshot"], "Ball Pen");

    let id = sale["id"].as_str().unwrap();
    let (status, fetched) = app.send(Method::GET, &format!("/api/sales/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["invoiceNo"], 1);

    let (_, page) = app.send(Method::GET, "/api/sales?page=1&limit=5", None).await;
    assert_eq!(page["pagination"]["total"], 1);
    assert_eq!(page["data"][0]["id"], id);

    let (_, product) = app
        .send(Method::GET, "/api/products/barcode/4790000000001", None)
        .await;
    assert_eq!(product["quantity"], 7);
}

#[tokio::test]
async fn test_checkout_errors_carry_codes() {
    let app = TestApp::new().await;
    let pen = app.product("Ball Pen", "4790000000001", 2, 10000).await;

    let (status, err) = app
        .send(Method::POST, "/api/sales", Some(json!({ "items": [] })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
    assert_eq!(err["message"], "Cart is empty");

    let (status, err) = app
        .send(
            Method::POST,
            "/api/sales",
            Some(json!({ "items": [{ "productId": pen.id, "qty": 5 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "INSUFFICIENT_STOCK");
    assert_eq!(err["message"], "Insufficient stock for Ball Pen (in stock: 2)");

    let (status, err) = app
        .send(
            Method::POST,
            "/api/sales",
            Some(json!({ "items": [{ "productId": "missing", "qty": 1 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "NOT_FOUND");

    let (status, _) = app.send(Method::GET, "/api/sales/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_sale_bodies_get_json_errors() {
    let app = TestApp::new().await;
    let pen = app.product("Ball Pen", "4790000000001", 100_000, 10000).await;

    let (status, err) = app
        .send(
            Method::POST,
            "/api/sales",
            Some(json!({ "items": [{ "productId": pen.id }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
    assert_eq!(err["message"], "Invalid qty for Ball Pen");

    let (status, err) = app
        .send(
            Method::POST,
            "/api/sales",
            Some(json!({ "items": [{ "productId": pen.id, "qty": 1.5 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
    assert!(err["message"].as_str().unwrap().contains("qty"));

    let (status, err) = app
        .send(
            Method::POST,
            "/api/sales",
            Some(json!({
                "items": [{ "productId": pen.id, "qty": 100_000, "unitPrice": 999_999_999_999.0 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
    assert!(err["message"].as_str().unwrap().starts_with("line total must be between"));

    let (status, err) = app
        .send(
            Method::POST,
            &format!("/api/products/{}/quantity", pen.id),
            Some(json!({ "amount": "lots" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");

    let (_, product) = app
        .send(Method::GET, "/api/products/barcode/4790000000001", None)
        .await;
    assert_eq!(product["quantity"], 100_000);
}

#[tokio::test]
async fn test_customer_overpayment_rejected() {
    let app = TestApp::new().await;
    let customer = app
        .db
        .customers()
        .create(NewParty {
            name: "Sunrise Academy".into(),
            code: None,
            phone: None,
            address: None,
        })
        .await
        .unwrap();
    app.db
        .customers()
        .apply_sale_rollup(&customer.id, Money::from_cents(50000), Money::from_cents(50000))
        .await
        .unwrap();

    let (status, err) = app
        .send(
            Method::POST,
            &format!("/api/customers/{}/payments", customer.id),
            Some(json!({ "amount": 50 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "PAYMENT_EXCEEDS_PURCHASED");
}

#[tokio::test]
async fn test_restock_and_reports() {
    let app = TestApp::new().await;
    let pen = app.product("Ball Pen", "4790000000001", 0, 10000).await;

    let (status, product) = app
        .send(
            Method::POST,
            &format!("/api/products/{}/quantity", pen.id),
            Some(json!({ "amount": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["quantity"], 5);

    let (status, err) = app
        .send(
            Method::POST,
            &format!("/api/products/{}/quantity", pen.id),
            Some(json!({ "amount": -6 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["message"], "Quantity cannot be negative");

    app.send(
        Method::POST,
        "/api/sales",
        Some(json!({ "items": [{ "productId": pen.id, "qty": 2 }], "paidAmount": 200 })),
    )
    .await;

    let (status, stats) = app.send(Method::GET, "/api/sales/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalInvoices"], 1);
    assert_eq!(stats["totalRevenueCents"], 20000);

    let (status, dashboard) = app.send(Method::GET, "/api/analytics/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["overall"]["profitCents"], 10000);

    let (status, yearly) = app.send(Method::GET, "/api/sales/yearly", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(yearly["yearlyStats"]["totalInvoices"], 1);

    let (status, _) = app
        .send(Method::GET, "/api/sales/monthly?year=2025&month=13", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
