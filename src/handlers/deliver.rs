//! Delivery endpoint: redeem a token for download links and the license key.

use axum::extract::{Path, State};

use crate::error::Result;
use crate::extractors::Json;
use crate::models::DeliveryPayload;
use crate::store::{AppState, tokens};

pub async fn redeem_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<DeliveryPayload>> {
    Ok(Json(tokens::redeem(&state.kv, &token)?))
}
