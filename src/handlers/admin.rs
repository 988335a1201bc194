//! Admin surface: manual payment confirmation, order/license enumeration,
//! token regeneration and license revocation. Every route here sits behind
//! the admin shared-secret middleware.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::webhook::{MarkPaidRequest, MarkPaidResponse, apply_payment};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Query};
use crate::models::{CreateOrder, LicenseSummary, OrderSummary};
use crate::store::{AppState, licenses, lifecycle, orders};
use crate::util::normalize_license_key;

const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub cursor: Option<String>,
}

impl ListQuery {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// Manual equivalent of the payment webhook, for operating without a
/// gateway and for re-sending lost credentials.
pub async fn mark_paid(
    State(state): State<AppState>,
    Json(body): Json<MarkPaidRequest>,
) -> Result<Json<MarkPaidResponse>> {
    Ok(Json(apply_payment(&state, &body.order_id)?))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<OrderSummary>>> {
    let (items, cursor, has_more) =
        orders::list(&state.kv, query.limit(), query.cursor.as_deref())?;
    Ok(Json(ListResponse {
        items,
        cursor,
        has_more,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateTokenRequest {
    #[serde(default)]
    pub order_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateTokenResponse {
    pub ok: bool,
    pub order_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn regenerate_token(
    State(state): State<AppState>,
    Json(body): Json<RegenerateTokenRequest>,
) -> Result<Json<RegenerateTokenResponse>> {
    if body.order_id.trim().is_empty() {
        return Err(AppError::Validation("orderId is required".into()));
    }

    let order = orders::get(&state.kv, &body.order_id)?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let paid = lifecycle::regenerate_token(&state.kv, order)?;

    Ok(Json(RegenerateTokenResponse {
        ok: true,
        order_id: body.order_id,
        token: paid.token,
        expires_at: paid.expires_at,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateOrderResponse {
    pub ok: bool,
    pub order_id: String,
}

/// Admin-initiated order creation for manual operations without a
/// checkout. Always starts at `created`; payment confirmation is its own
/// step so the paid-iff-credentialed invariant can't be sidestepped.
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrder>,
) -> Result<Json<AdminCreateOrderResponse>> {
    let order = orders::create(&state.kv, body)?;
    Ok(Json(AdminCreateOrderResponse {
        ok: true,
        order_id: order.order_id,
    }))
}

pub async fn list_licenses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<LicenseSummary>>> {
    let (items, cursor, has_more) =
        licenses::list(&state.kv, query.limit(), query.cursor.as_deref())?;
    Ok(Json(ListResponse {
        items,
        cursor,
        has_more,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeLicenseRequest {
    #[serde(default)]
    pub license_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeLicenseResponse {
    pub ok: bool,
    pub license_key: String,
}

pub async fn revoke_license(
    State(state): State<AppState>,
    Json(body): Json<RevokeLicenseRequest>,
) -> Result<Json<RevokeLicenseResponse>> {
    let license_key = normalize_license_key(&body.license_key);
    if license_key.is_empty() {
        return Err(AppError::Validation("licenseKey is required".into()));
    }

    let license = licenses::revoke(&state.kv, &license_key)?;

    Ok(Json(RevokeLicenseResponse {
        ok: true,
        license_key: license.license_key,
    }))
}
