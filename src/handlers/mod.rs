pub mod admin;
pub mod deliver;
pub mod licenses;
pub mod orders;
pub mod webhook;

use axum::Router;
use axum::http::{HeaderName, Method, header};
use axum::routing::{get, post};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::extractors::Json;
use crate::middleware::{ADMIN_SECRET_HEADER, WEBHOOK_SECRET_HEADER, admin_auth, webhook_auth};
use crate::store::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found" })),
    )
}

/// The static storefront calls the engine cross-origin, so CORS stays open
/// apart from the two secret headers it must be allowed to send.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(ADMIN_SECRET_HEADER),
            HeaderName::from_static(WEBHOOK_SECRET_HEADER),
        ])
        .max_age(std::time::Duration::from_secs(86400))
}

/// Create the application router.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/order/create", post(orders::create_order))
        .route("/order/{id}", get(orders::get_order))
        .route("/license/activate", post(licenses::activate_license))
        .route("/license/validate", post(licenses::validate_license))
        .route("/deliver/{token}", get(deliver::redeem_token));

    let admin = Router::new()
        .route("/admin/mark-paid", post(admin::mark_paid))
        .route("/admin/orders", get(admin::list_orders))
        .route("/admin/regenerate-token", post(admin::regenerate_token))
        .route("/admin/create-order", post(admin::create_order))
        .route("/admin/licenses", get(admin::list_licenses))
        .route("/admin/revoke-license", post(admin::revoke_license))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            admin_auth,
        ));

    let webhooks = Router::new()
        .route("/webhook/payment", post(webhook::payment_webhook))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            webhook_auth,
        ));

    Router::new()
        .nest("/api", public.merge(admin).merge(webhooks))
        .fallback(not_found)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
