//! Payment confirmation webhook. The charge itself happens off-system;
//! this endpoint only reacts to the provider's claim that it succeeded,
//! gated by the webhook shared secret.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::store::{AppState, lifecycle, orders};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidRequest {
    #[serde(default)]
    pub order_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidResponse {
    pub ok: bool,
    pub order_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub license_key: String,
    pub activations_max: u32,
}

/// Shared by the webhook and the manual admin path. Idempotent: re-applying
/// a payment to an already-paid order reuses its license key and mints a
/// fresh delivery token.
pub(super) fn apply_payment(state: &AppState, order_id: &str) -> Result<MarkPaidResponse> {
    if order_id.trim().is_empty() {
        return Err(AppError::Validation("orderId is required".into()));
    }

    let order = orders::get(&state.kv, order_id)?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let paid = lifecycle::mark_paid_and_tokenize(&state.kv, order, &state.license_key_prefix)?;

    Ok(MarkPaidResponse {
        ok: true,
        order_id: order_id.to_string(),
        token: paid.token,
        expires_at: paid.expires_at,
        license_key: paid.license_key,
        activations_max: paid.activations_max,
    })
}

pub async fn payment_webhook(
    State(state): State<AppState>,
    Json(body): Json<MarkPaidRequest>,
) -> Result<Json<MarkPaidResponse>> {
    Ok(Json(apply_payment(&state, &body.order_id)?))
}
