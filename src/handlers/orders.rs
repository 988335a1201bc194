//! Public order endpoints: storefront order creation and status polling.

use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::{CreateOrder, OrderStatus};
use crate::store::{AppState, orders};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub order_url: String,
    pub pay_link: String,
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrder>,
) -> Result<Json<CreateOrderResponse>> {
    let order = orders::create(&state.kv, body)?;

    let order_url = format!(
        "{}/order.html?id={}",
        state.base_url,
        urlencoding::encode(&order.order_id)
    );

    Ok(Json(CreateOrderResponse {
        order_id: order.order_id,
        order_url,
        pay_link: order.pay_link,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusResponse {
    pub order_id: String,
    pub status: OrderStatus,
    pub product_name: String,
    pub total: f64,
    /// Empty until the order is paid.
    pub deliver_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub license_key: String,
    pub activations_max: u32,
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderStatusResponse>> {
    let order = orders::get(&state.kv, &order_id)?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let deliver_url = if order.status == OrderStatus::Paid && !order.deliver_token.is_empty() {
        format!(
            "{}/deliver.html?token={}",
            state.base_url,
            urlencoding::encode(&order.deliver_token)
        )
    } else {
        String::new()
    };

    Ok(Json(OrderStatusResponse {
        order_id: order.order_id,
        status: order.status,
        product_name: order.product_name,
        total: order.total,
        deliver_url,
        expires_at: order.expires_at,
        license_key: order.license_key,
        activations_max: order.activations_max,
    }))
}
