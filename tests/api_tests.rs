//! Rotas HTTP de ponta a ponta (router + handlers + banco em memória).

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use common::TestApp;
use minitienda::routes::build_router;
use serde_json::{json, Value};
use tokio_stream::StreamExt;
use tower::util::ServiceExt;

async fn router() -> (TestApp, Router) {
    let app = TestApp::spawn().await;
    let router = build_router(app.state.clone());
    (app, router)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let (_app, router) = router().await;
    let response = router.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_crud_round() {
    let (_app, router) = router().await;

    let (status, created) = send(
        &router,
        json_request(
            "POST",
            "/api/products",
            json!({ "name": "Arroz", "code": "arz-001", "price": 4.5, "stock": 10 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["code"], "ARZ-001");
    assert_eq!(created["price"], 4.5);
    let id = created["id"].as_i64().unwrap();

    let (status, found) = send(&router, get("/api/products/by-code/arz-001")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], id);

    let (status, updated) = send(
        &router,
        json_request(
            "PUT",
            &format!("/api/products/{id}"),
            json!({ "name": "Arroz Extra", "code": "ARZ-001", "price": 5.2, "stock": 8, "description": "1kg" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Arroz Extra");

    let (status, listed) = send(&router, get("/api/products/search?q=extra")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/products/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, get(&format!("/api/products/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_payload_returns_translated_details() {
    let (_app, router) = router().await;

    let (status, body) = send(
        &router,
        json_request("POST", "/api/products", json!({ "name": "", "code": "X", "price": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Uno o más campos son inválidos.");
    assert_eq!(body["details"]["name"][0], "Este campo es obligatorio");
    assert_eq!(body["details"]["price"][0], "Monto inválido (entre 0 y 1.000.000.000)");
}

#[tokio::test]
async fn insufficient_stock_message_follows_accept_language() {
    let (app, router) = router().await;
    let bread = app.product("PAN", 50, 1).await;

    let body = json!({ "items": [{ "productId": bread.id, "quantity": 5 }] });

    let (status, spanish) = send(&router, json_request("POST", "/api/sales", body.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(spanish["error"], "Stock insuficiente para Produto PAN");

    let mut request = json_request("POST", "/api/sales", body);
    request
        .headers_mut()
        .insert(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9".parse().unwrap());
    let (_, english) = send(&router, request).await;
    assert_eq!(english["error"], "Insufficient stock for Produto PAN");
}

#[tokio::test]
async fn sale_and_purchase_flow_over_http() {
    let (app, router) = router().await;
    let supplier = app.supplier("20100055237", "Alicorp").await;

    let (status, purchase) = send(
        &router,
        json_request(
            "POST",
            "/api/purchases",
            json!({
                "supplierId": supplier.id,
                "items": [
                    { "product": { "type": "NEW", "code": "ace-01", "name": "Aceite" }, "quantity": 6, "unitCost": 8.9 }
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(purchase["supplierName"], "Alicorp");
    assert_eq!(purchase["total"], 53.4);
    let product_id = purchase["items"][0]["productId"].as_i64().unwrap();

    let (status, sale) = send(
        &router,
        json_request(
            "POST",
            "/api/sales",
            json!({ "items": [{ "productId": product_id, "quantity": 2 }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["total"], 17.8);
    assert_eq!(app.stock_of(product_id).await, 4);

    let (status, summary) = send(&router, get("/api/dashboard/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["todaySalesCount"], 1);
    assert_eq!(summary["todayUnitsSold"], 2);

    let (status, closure) = send(&router, get("/api/cash-closure")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closure["expectedCash"], 17.8);
    assert_eq!(closure["purchasesTotal"], 53.4);

    let (status, closed) = send(
        &router,
        json_request("POST", "/api/cash-closure", json!({ "countedCash": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(closed["difference"], 2.2);

    let (status, history) = send(&router, get("/api/cash-closure/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn oversized_lines_leave_the_catalog_readable() {
    let (app, router) = router().await;
    let supplier = app.supplier("20100055237", "Alicorp").await;
    let rice = app.product("ARZ", 450, 5).await;

    let purchase = |quantity: Value, unit_cost: Value| {
        json_request(
            "POST",
            "/api/purchases",
            json!({
                "supplierId": supplier.id,
                "items": [{ "product": { "type": "EXISTING", "productId": rice.id }, "quantity": quantity, "unitCost": unit_cost }]
            }),
        )
    };

    let (status, body) = send(&router, purchase(json!(i64::MAX), json!(1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cantidad inválida (usa un número entre 1 y 1.000.000)");

    let (status, body) = send(&router, purchase(json!(1000), json!(1e20))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Monto inválido (entre 0 y 1.000.000.000)");

    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/api/sales",
            json!({ "items": [{ "productId": rice.id, "quantity": i64::MAX }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &router,
        json_request("POST", "/api/cash-closure", json!({ "countedCash": 1e20 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["countedCash"].is_array());

    let (status, products) = send(&router, get("/api/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products[0]["stock"], 5);
}

#[tokio::test]
async fn sub_cent_costs_are_rounded_before_totals() {
    let (app, router) = router().await;
    let supplier = app.supplier("20100055237", "Alicorp").await;

    let (status, purchase) = send(
        &router,
        json_request(
            "POST",
            "/api/purchases",
            json!({
                "supplierId": supplier.id,
                "items": [
                    { "product": { "type": "NEW", "code": "azu", "name": "Azúcar" }, "quantity": 3, "unitCost": 0.333 }
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(purchase["items"][0]["unitCost"], 0.33);
    assert_eq!(purchase["items"][0]["subtotal"], 0.99);
    assert_eq!(purchase["total"], 0.99);

    let id = purchase["id"].as_i64().unwrap();
    let (status, stored) = send(&router, get(&format!("/api/purchases/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["items"][0]["unitCost"], 0.33);
    assert_eq!(stored["items"][0]["subtotal"], 0.99);
    assert_eq!(stored["total"], 0.99);

    // 1.001 e 1.002 viram o mesmo custo, então as linhas se juntam
    let (status, merged) = send(
        &router,
        json_request(
            "POST",
            "/api/purchases",
            json!({
                "supplierId": supplier.id,
                "items": [
                    { "product": { "type": "NEW", "code": "sal", "name": "Sal" }, "quantity": 1, "unitCost": 1.001 },
                    { "product": { "type": "NEW", "code": "sal", "name": "Sal" }, "quantity": 2, "unitCost": 1.002 }
                ]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(merged["items"].as_array().unwrap().len(), 1);
    assert_eq!(merged["items"][0]["quantity"], 3);
    assert_eq!(merged["total"], 3.0);
}

#[tokio::test]
async fn cash_closure_outside_the_calendar_is_a_bad_request() {
    let (_app, router) = router().await;

    let day = NaiveDate::MAX.to_string().replace('+', "%2B");
    let (status, _) = send(&router, get(&format!("/api/cash-closure?day={day}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&router, get("/api/cash-closure")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_supplier_is_a_conflict() {
    let (_app, router) = router().await;
    let body = json!({ "ruc": "20100055237", "name": "Alicorp" });

    let (status, _) = send(&router, json_request("POST", "/api/suppliers", body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = send(&router, json_request("POST", "/api/suppliers", body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"], "El proveedor ya existe (RUC o nombre)");
}

#[tokio::test]
async fn committed_sale_reaches_the_event_stream() {
    let (app, router) = router().await;
    let rice = app.product("ARZ", 450, 3).await;

    let response = router.clone().oneshot(get("/api/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    let mut frames = response.into_body().into_data_stream();

    let (status, sale) = send(
        &router,
        json_request("POST", "/api/sales", json!({ "items": [{ "productId": rice.id, "quantity": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let frame = tokio::time::timeout(std::time::Duration::from_secs(5), frames.next())
        .await
        .expect("nenhum evento recebido")
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("event: sales"));
    let data: Value = serde_json::from_str(lines.next().unwrap().trim_start_matches("data: ")).unwrap();
    assert_eq!(data, json!({ "type": "SALE_RECORDED", "saleId": sale["id"] }));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (_app, router) = router().await;
    let (status, doc) = send(&router, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/sales"].is_object());
}
