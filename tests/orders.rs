//! Order lifecycle: creation, status polling, payment confirmation and the
//! admin listing.

mod common;

use axum::http::StatusCode;
use chrono::DateTime;
use common::*;
use serde_json::json;

#[tokio::test]
async fn create_order_returns_order_url_and_pay_link() {
    let (app, _) = app();

    let (status, body) = post(
        &app,
        "/api/order/create",
        json!({
            "productName": "Astro Blaster",
            "total": 49.90,
            "payLink": "https://pay.example/astro",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let order_id = body["orderId"].as_str().unwrap();
    assert!(order_id.starts_with("ORD-"));
    assert_eq!(
        body["orderUrl"],
        format!("{BASE_URL}/order.html?id={order_id}")
    );
    assert_eq!(body["payLink"], "https://pay.example/astro");
}

#[tokio::test]
async fn unpaid_order_has_no_credentials() {
    let (app, _) = app();
    let order_id = create_order(&app, 49.90).await;

    let (status, body) = get(&app, &format!("/api/order/{order_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "created");
    assert_eq!(body["total"], 49.90);
    assert_eq!(body["deliverUrl"], "");
    assert_eq!(body["licenseKey"], "");
    assert!(body["expiresAt"].is_null());
    assert_eq!(body["activationsMax"], 2);
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let (app, _) = app();
    let (status, body) = get(&app, "/api/order/ORD-MISSING").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn mark_paid_issues_token_and_license_together() {
    let (app, _) = app();
    let order_id = create_order(&app, 49.90).await;

    let paid = mark_paid(&app, &order_id).await;
    assert_eq!(paid["ok"], true);
    assert!(paid["token"].as_str().unwrap().starts_with("TOK-"));
    assert!(paid["licenseKey"].as_str().unwrap().starts_with("VG-"));
    assert_eq!(paid["activationsMax"], 2);

    // Paid iff both credentials are non-empty
    let (_, body) = get(&app, &format!("/api/order/{order_id}")).await;
    assert_eq!(body["status"], "paid");
    assert_eq!(body["licenseKey"], paid["licenseKey"]);
    let deliver_url = body["deliverUrl"].as_str().unwrap();
    assert!(deliver_url.starts_with(&format!("{BASE_URL}/deliver.html?token=TOK-")));
    assert!(!body["expiresAt"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn mark_paid_requires_order_id() {
    let (app, _) = app();
    let (status, body) = admin_post(&app, "/api/admin/mark-paid", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn mark_paid_unknown_order_is_not_found() {
    let (app, _) = app();
    let (status, _) = admin_post(
        &app,
        "/api/admin/mark-paid",
        json!({ "orderId": "ORD-MISSING" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_confirms_payment_like_the_admin_path() {
    let (app, _) = app();
    let order_id = create_order(&app, 19.90).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/webhook/payment",
        Some(("x-webhook-secret", WEBHOOK_SECRET)),
        Some(json!({ "orderId": order_id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["orderId"], order_id);
    assert!(body["token"].as_str().unwrap().starts_with("TOK-"));
    assert!(body["licenseKey"].as_str().unwrap().starts_with("VG-"));
}

#[tokio::test]
async fn marking_paid_twice_reuses_license_but_mints_new_token() {
    let (app, state) = app();
    let order_id = create_order(&app, 49.90).await;

    let first = mark_paid(&app, &order_id).await;
    let second = mark_paid(&app, &order_id).await;

    assert_eq!(first["licenseKey"], second["licenseKey"]);
    assert_ne!(first["token"], second["token"]);

    // Both tokens are still live and denormalize the same order and license
    for paid in [&first, &second] {
        let token = paid["token"].as_str().unwrap();
        let raw = state.kv.get("tokens", token).unwrap().expect("token record");
        let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(record["orderId"], order_id.as_str());
        assert_eq!(record["licenseKey"], first["licenseKey"]);
    }
}

#[tokio::test]
async fn admin_create_order_starts_created() {
    let (app, _) = app();

    let (status, body) = admin_post(
        &app,
        "/api/admin/create-order",
        json!({ "productName": "Manual Sale", "total": 9.90 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    let order_id = body["orderId"].as_str().unwrap();

    let (_, order) = get(&app, &format!("/api/order/{order_id}")).await;
    assert_eq!(order["status"], "created");
    assert_eq!(order["licenseKey"], "");
}

#[tokio::test]
async fn admin_listing_is_newest_first_within_a_page() {
    let (app, _) = app();
    for _ in 0..3 {
        create_order(&app, 10.0).await;
    }

    let (status, body) = admin_get(&app, "/api/admin/orders").await;
    assert_eq!(status, StatusCode::OK);

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(body["hasMore"], false);

    let stamps: Vec<_> = items
        .iter()
        .map(|i| DateTime::parse_from_rfc3339(i["createdAt"].as_str().unwrap()).unwrap())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn admin_listing_paginates_with_cursor() {
    let (app, _) = app();
    let mut created = std::collections::HashSet::new();
    for _ in 0..5 {
        created.insert(create_order(&app, 10.0).await);
    }

    let mut seen = std::collections::HashSet::new();
    let mut cursor: Option<String> = None;
    loop {
        let uri = match &cursor {
            Some(c) => format!("/api/admin/orders?limit=2&cursor={c}"),
            None => "/api/admin/orders?limit=2".to_string(),
        };
        let (status, body) = admin_get(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);

        let items = body["items"].as_array().unwrap();
        assert!(items.len() <= 2);
        for item in items {
            assert!(seen.insert(item["orderId"].as_str().unwrap().to_string()));
        }

        if body["hasMore"] == true {
            cursor = Some(body["cursor"].as_str().unwrap().to_string());
        } else {
            break;
        }
    }

    assert_eq!(seen, created);
}

#[tokio::test]
async fn regenerate_token_requires_a_paid_order() {
    let (app, _) = app();
    let order_id = create_order(&app, 29.90).await;

    let (status, body) = admin_post(
        &app,
        "/api/admin/regenerate-token",
        json!({ "orderId": order_id }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not paid") || body["error"].as_str().unwrap().contains("created"));
}
