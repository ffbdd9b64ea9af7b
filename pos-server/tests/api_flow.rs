//! End-to-end HTTP tests: the full axum app (middleware included) over an
//! in-memory SQLite database, driven with `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use pos_server::api::build_app;
use pos_server::db::DbService;
use pos_server::{Config, ServerState};
use serde_json::{Value, json};
use shared::message::NotificationType;
use tower::ServiceExt;

struct TestApp {
    state: ServerState,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let config = Config::for_tests();
        let db = DbService::in_memory().await.unwrap();
        let state = ServerState::new(config, db.pool);
        let router = build_app(&state).with_state(state.clone());
        Self { state, router }
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, None).await
    }

    async fn credit_client(&self, limit: f64) -> i64 {
        let (status, client) = self
            .post(
                "/api/clientes",
                json!({
                    "name": "Colmado Pérez",
                    "rnc": "131000001",
                    "credit_enabled": true,
                    "credit_limit": limit,
                    "credit_days": 30
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        client["id"].as_i64().unwrap()
    }

    async fn conduce(&self, client_id: i64, amount: f64) -> (StatusCode, Value) {
        self.post(
            "/api/conduces",
            json!({
                "client_id": client_id,
                "items": [{ "description": "Mercancía", "quantity": 1, "unit_price": amount }]
            }),
        )
        .await
    }

    async fn balance(&self, client_id: i64) -> f64 {
        let (_, client) = self.get(&format!("/api/clientes/{client_id}")).await;
        client["outstanding_balance"].as_f64().unwrap()
    }
}

#[tokio::test]
async fn health_reports_database() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "ok");
}

#[tokio::test]
async fn missing_resource_returns_error_body() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/clientes/123").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1001);
    assert!(body["message"].as_str().unwrap().contains("123"));
}

#[tokio::test]
async fn conduce_over_credit_limit_is_rejected() {
    let app = TestApp::new().await;
    let client_id = app.credit_client(1000.0).await;

    let (status, first) = app.conduce(client_id, 800.0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["number"], "CON-000001");

    let (status, body) = app.conduce(client_id, 300.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1004);
    assert_eq!(app.balance(client_id).await, 800.0);

    let (status, account) = app.get(&format!("/api/clientes/{client_id}/cuenta")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(account["available_credit"], 200.0);
    assert_eq!(account["pending_conduces"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn conduce_void_restores_balance() {
    let app = TestApp::new().await;
    let client_id = app.credit_client(1000.0).await;
    let (_, conduce) = app.conduce(client_id, 400.0).await;
    let id = conduce["id"].as_i64().unwrap();

    let (status, _) = app.delete(&format!("/api/conduces/{id}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, voided) = app
        .put(&format!("/api/conduces/{id}/anular"), json!({ "reason": "devolución" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voided["status"], "voided");
    assert_eq!(voided["void_reason"], "devolución");
    assert_eq!(app.balance(client_id).await, 0.0);

    let (status, body) = app.put(&format!("/api/conduces/{id}/anular"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5002);

    let (status, _) = app.delete(&format!("/api/conduces/{id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn settlement_invoice_round_trip() {
    let app = TestApp::new().await;
    let client_id = app.credit_client(2000.0).await;
    let other_id = app.credit_client(2000.0).await;
    let (_, a) = app.conduce(client_id, 300.0).await;
    let (_, b) = app.conduce(client_id, 450.0).await;
    let (_, foreign) = app.conduce(other_id, 100.0).await;
    let (a, b, foreign) = (a["id"].clone(), b["id"].clone(), foreign["id"].clone());

    // Mixed clients: rejected, nothing changes
    let (status, body) = app
        .post("/api/facturas", json!({ "conduce_ids": [a, foreign] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4005);
    assert_eq!(app.balance(client_id).await, 750.0);

    let (status, invoice) = app
        .post(
            "/api/facturas",
            json!({ "conduce_ids": [a, b], "payment_method": "transfer", "requires_rnc": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoice["total"], 750.0);
    assert_eq!(invoice["customer_rnc"], "131000001");
    assert_eq!(app.balance(client_id).await, 0.0);

    let (_, paid) = app.get(&format!("/api/conduces/{a}")).await;
    assert_eq!(paid["status"], "paid");
    assert_eq!(paid["invoice_id"], invoice["id"]);

    // Settled conduces cannot be settled twice
    let (status, _) = app.post("/api/facturas", json!({ "conduce_ids": [b] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let invoice_id = invoice["id"].as_i64().unwrap();
    let (status, _) = app.delete(&format!("/api/facturas/{invoice_id}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(&format!("/api/facturas/{invoice_id}/anular"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.balance(client_id).await, 750.0);
    let (_, pending) = app.get(&format!("/api/conduces?estado=pending&cliente={client_id}")).await;
    assert_eq!(pending.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delivered_order_is_immutable() {
    let app = TestApp::new().await;
    let client_id = app.credit_client(1000.0).await;
    let (status, order) = app
        .post(
            "/api/ordenes",
            json!({
                "customer_name": "María",
                "client_id": client_id,
                "description": "2 pizzas",
                "amount": 600.0,
                "delivery_fee": 100.0,
                "payment_method": "credit"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["total"], 700.0);
    let id = order["id"].as_i64().unwrap();

    let (status, delivered) = app
        .put(&format!("/api/ordenes/{id}/estado"), json!({ "status": "delivered" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(delivered["status"], "delivered");
    assert!(delivered["conduce_id"].is_i64());
    assert_eq!(app.balance(client_id).await, 700.0);

    let (status, body) = app
        .put(&format!("/api/ordenes/{id}/estado"), json!({ "status": "en_route" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2002);

    let (status, _) = app
        .put(&format!("/api/ordenes/{id}/metodoPago"), json!({ "payment_method": "cash" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.put(&format!("/api/ordenes/{id}/anular"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fiscal_sale_applies_itbis() {
    let app = TestApp::new().await;
    let (status, sale) = app
        .post(
            "/api/ventas",
            json!({
                "items": [
                    { "description": "Combo", "quantity": 2, "unit_price": 425.0 },
                    { "description": "Refresco", "quantity": 3, "unit_price": 50.0 }
                ],
                "is_fiscal": true,
                "payment_method": "card"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sale["number"], "VEN-000001");
    assert_eq!(sale["subtotal"], 1000.0);
    assert_eq!(sale["tax"], 180.0);
    assert_eq!(sale["total"], 1180.0);

    let (status, body) = app
        .post(
            "/api/ventas",
            json!({
                "items": [{ "description": "Combo", "quantity": 1, "unit_price": 425.0 }],
                "payment_method": "credit"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3003);
}

#[tokio::test]
async fn daily_reconciliation_and_cash_closing() {
    let app = TestApp::new().await;
    let (status, _) = app.post("/api/monto-inicial", json!({ "amount": 2000.0 })).await;
    assert_eq!(status, StatusCode::OK);

    for (amount, method) in [(500.0, "cash"), (300.0, "card"), (250.0, "cash")] {
        let (status, _) = app
            .post(
                "/api/ventas",
                json!({
                    "items": [{ "description": "Plato del día", "quantity": 1, "unit_price": amount }],
                    "payment_method": method
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, voided) = app
        .post(
            "/api/ventas",
            json!({ "items": [{ "description": "Error", "quantity": 1, "unit_price": 999.0 }] }),
        )
        .await;
    app.put(&format!("/api/ventas/{}/anular", voided["id"]), json!({})).await;

    let (status, _) = app
        .post("/api/gastos", json!({ "description": "Gas", "amount": 150.0, "category": "cocina" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, report) = app.get("/api/reporte/cuadre").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["opening_balance"], 2000.0);
    assert_eq!(report["sales"]["count"], 3);
    assert_eq!(report["sales"]["voided_count"], 1);
    assert_eq!(report["cash_income"], 750.0);
    assert_eq!(report["total_income"], 1050.0);
    assert_eq!(report["expenses"]["by_category"]["cocina"], 150.0);
    assert_eq!(report["expected_cash"], 2600.0);

    let (status, closing) = app
        .post("/api/reporte/cierre", json!({ "counted_cash": 2590.0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closing["expected_cash"], 2600.0);
    assert_eq!(closing["variance"], -10.0);

    let (_, closings) = app.get("/api/reporte/cierres").await;
    assert_eq!(closings.as_array().unwrap().len(), 1);

    let (status, body) = app.get("/api/reporte/cuadre?fecha=01-03-2024").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6);
}

#[tokio::test]
async fn request_id_is_generated_or_echoed() {
    let app = TestApp::new().await;

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());

    let request = Request::get("/api/clientes/123")
        .header("x-request-id", "caja-1")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-request-id"], "caja-1");
}

#[tokio::test]
async fn mutations_are_broadcast() {
    let app = TestApp::new().await;
    let mut rx = app.state.bus.subscribe();

    let client_id = app.credit_client(500.0).await;
    let msg = rx.recv().await.unwrap();
    assert_eq!(msg.kind, NotificationType::NuevoCliente);
    assert_eq!(msg.data["id"], client_id);

    let (status, _) = app.delete(&format!("/api/clientes/{client_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let msg = rx.recv().await.unwrap();
    assert_eq!(msg.kind, NotificationType::ClienteEliminado);
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({ "type": "cliente_eliminado", "data": { "id": client_id } })
    );
}
