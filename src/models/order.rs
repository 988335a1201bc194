use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::DEFAULT_ACTIVATIONS_MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Paid,
}

/// One purchase attempt. The authoritative record for payment status.
///
/// `deliver_token` and `license_key` are empty exactly until the order is
/// marked paid; the delivery-link fields are copied verbatim into the token
/// record at payment time because the store cannot join.
///
/// Wire names are the storefront's: camelCase identifiers, snake_case
/// delivery links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub product_id: String,
    pub slug: String,
    pub product_name: String,
    pub subtotal: f64,
    pub total: f64,
    /// Opaque coupon descriptor from checkout; the engine never interprets it.
    #[serde(default)]
    pub coupon: Option<serde_json::Value>,
    /// External payment URL; the charge itself happens off-system.
    pub pay_link: String,
    #[serde(rename = "android_url")]
    pub android_url: String,
    #[serde(rename = "ios_link")]
    pub ios_link: String,
    #[serde(rename = "web_link")]
    pub web_link: String,
    pub deliver_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub license_key: String,
    pub activations_max: u32,
}

/// Storefront/admin request body for order creation. Every field is
/// optional on the wire; the storefront is trusted for links and pricing
/// (catalog integrity is out of scope here).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub coupon: Option<serde_json::Value>,
    #[serde(default)]
    pub pay_link: String,
    #[serde(default, rename = "android_url")]
    pub android_url: String,
    #[serde(default, rename = "ios_link")]
    pub ios_link: String,
    #[serde(default, rename = "web_link")]
    pub web_link: String,
    #[serde(default)]
    pub activations_max: Option<u32>,
}

impl CreateOrder {
    pub fn into_order(self, order_id: String, now: DateTime<Utc>) -> Order {
        Order {
            order_id,
            status: OrderStatus::Created,
            created_at: now,
            product_id: self.product_id,
            slug: self.slug,
            product_name: self.product_name,
            subtotal: self.subtotal,
            total: self.total,
            coupon: self.coupon,
            pay_link: self.pay_link,
            android_url: self.android_url,
            ios_link: self.ios_link,
            web_link: self.web_link,
            deliver_token: String::new(),
            expires_at: None,
            license_key: String::new(),
            activations_max: self.activations_max.unwrap_or(DEFAULT_ACTIVATIONS_MAX),
        }
    }
}

/// Admin listing row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub total: f64,
    pub deliver_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub license_key: String,
    pub activations_max: u32,
}

impl From<Order> for OrderSummary {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            status: order.status,
            created_at: order.created_at,
            product_name: order.product_name,
            total: order.total,
            deliver_token: order.deliver_token,
            expires_at: order.expires_at,
            license_key: order.license_key,
            activations_max: order.activations_max,
        }
    }
}
