//! Shared helpers for integration tests: an in-memory engine instance and
//! thin request wrappers over `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use valegate::{AppState, Kv, router};

pub const ADMIN_SECRET: &str = "test-admin-secret";
pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
pub const BASE_URL: &str = "https://store.test";

pub fn test_state() -> AppState {
    AppState {
        kv: Kv::open_in_memory().expect("in-memory kv"),
        base_url: BASE_URL.to_string(),
        admin_secret: Some(ADMIN_SECRET.to_string()),
        webhook_secret: Some(WEBHOOK_SECRET.to_string()),
        license_key_prefix: "VG".to_string(),
    }
}

/// Router plus the state behind it, for tests that need to poke the store
/// directly (e.g. forcing a token past its expiry).
pub fn app() -> (Router, AppState) {
    let state = test_state();
    (router(state.clone()), state)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    secret: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((name, value)) = secret {
        builder = builder.header(name, value);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response should be JSON")
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, None, Some(body)).await
}

pub async fn admin_get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, Some(("x-admin-secret", ADMIN_SECRET)), None).await
}

pub async fn admin_post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        uri,
        Some(("x-admin-secret", ADMIN_SECRET)),
        Some(body),
    )
    .await
}

/// Create an order through the public endpoint and return its id.
pub async fn create_order(app: &Router, total: f64) -> String {
    let (status, body) = post(
        app,
        "/api/order/create",
        json!({
            "productId": "prod_astro",
            "slug": "astro-blaster",
            "productName": "Astro Blaster",
            "subtotal": total,
            "total": total,
            "payLink": "https://pay.example/astro",
            "android_url": "https://dl.example/astro.apk",
            "ios_link": "https://apps.example/astro",
            "web_link": "https://play.example/astro",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body["orderId"].as_str().expect("orderId").to_string()
}

/// Mark an order paid through the admin endpoint and return the response
/// body (`token`, `licenseKey`, `activationsMax`).
pub async fn mark_paid(app: &Router, order_id: &str) -> Value {
    let (status, body) = admin_post(
        app,
        "/api/admin/mark-paid",
        json!({ "orderId": order_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "mark-paid failed: {body}");
    body
}

pub async fn activate(app: &Router, license_key: &str, device_id: &str) -> (StatusCode, Value) {
    post(
        app,
        "/api/license/activate",
        json!({ "licenseKey": license_key, "deviceId": device_id }),
    )
    .await
}

pub async fn validate(app: &Router, license_key: &str, device_id: &str) -> (StatusCode, Value) {
    post(
        app,
        "/api/license/validate",
        json!({ "licenseKey": license_key, "deviceId": device_id }),
    )
    .await
}
