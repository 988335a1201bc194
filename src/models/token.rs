use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Order;

/// Ephemeral delivery credential. A denormalized snapshot of the order at
/// payment time: the store cannot join, so everything the delivery page
/// needs travels with the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub token: String,
    /// Informational only. Redemption stays repeatable until expiry so a
    /// page reload doesn't strand the customer.
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub order_id: String,
    pub product_id: String,
    pub slug: String,
    pub product_name: String,
    pub license_key: String,
    pub activations_max: u32,
    #[serde(rename = "android_url")]
    pub android_url: String,
    #[serde(rename = "ios_link")]
    pub ios_link: String,
    #[serde(rename = "web_link")]
    pub web_link: String,
}

impl TokenRecord {
    /// Snapshot an order into a fresh token record. The order must already
    /// carry the license key chosen for it.
    pub fn from_order(token: String, expires_at: DateTime<Utc>, order: &Order) -> Self {
        Self {
            token,
            used: false,
            expires_at,
            order_id: order.order_id.clone(),
            product_id: order.product_id.clone(),
            slug: order.slug.clone(),
            product_name: order.product_name.clone(),
            license_key: order.license_key.clone(),
            activations_max: order.activations_max,
            android_url: order.android_url.clone(),
            ios_link: order.ios_link.clone(),
            web_link: order.web_link.clone(),
        }
    }
}

/// What a successful redemption hands to the delivery page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPayload {
    pub product_id: String,
    pub product_slug: String,
    pub product_name: String,
    pub note: String,
    pub license_key: String,
    pub activations_max: u32,
    #[serde(rename = "android_url")]
    pub android_url: String,
    #[serde(rename = "ios_link")]
    pub ios_link: String,
    #[serde(rename = "web_link")]
    pub web_link: String,
}

impl From<TokenRecord> for DeliveryPayload {
    fn from(record: TokenRecord) -> Self {
        Self {
            product_id: record.product_id,
            product_slug: record.slug,
            product_name: record.product_name,
            note: "Access granted. Keep this app in your library.".to_string(),
            license_key: record.license_key,
            activations_max: record.activations_max,
            android_url: record.android_url,
            ios_link: record.ios_link,
            web_link: record.web_link,
        }
    }
}
