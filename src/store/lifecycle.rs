//! Order lifecycle transitions. `created -> paid` is the only state change,
//! and it is one-way.
//!
//! The three writes below (license, token, order) are not atomic; the store
//! offers no transactions. Every transition is therefore idempotent and
//! re-triggerable: re-running mark-paid or regenerate-token is the recovery
//! path after a partial failure, not an error.

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::kv::Kv;
use crate::models::{Order, OrderStatus};
use crate::store::{licenses, orders, tokens};

/// What a payment transition hands back to the webhook/admin caller.
#[derive(Debug, Clone)]
pub struct PaidOrder {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub license_key: String,
    pub activations_max: u32,
}

/// Transition an order to paid: ensure its license, mint a delivery token,
/// persist the updated order.
///
/// Calling this on an already-paid order reuses the existing license key and
/// mints a fresh token; that is the "resend the link" path.
pub fn mark_paid_and_tokenize(kv: &Kv, mut order: Order, key_prefix: &str) -> Result<PaidOrder> {
    let (license_key, activations_max) = licenses::ensure(kv, &order, key_prefix)?;

    order.status = OrderStatus::Paid;
    order.license_key = license_key.clone();
    order.activations_max = activations_max;

    let record = tokens::mint(kv, &order)?;
    order.deliver_token = record.token.clone();
    order.expires_at = Some(record.expires_at);

    orders::save(kv, &order)?;

    tracing::info!(
        order_id = %order.order_id,
        license_key = %license_key,
        token = %record.token,
        "order marked paid"
    );

    Ok(PaidOrder {
        token: record.token,
        expires_at: record.expires_at,
        license_key,
        activations_max,
    })
}

/// Replace a paid order's delivery token after the customer lost the link
/// or let it lapse. The old token is deleted best-effort before the new one
/// is minted; a crash in between is healed by running this again.
pub fn regenerate_token(kv: &Kv, mut order: Order) -> Result<PaidOrder> {
    if order.status != OrderStatus::Paid {
        return Err(AppError::Validation(format!(
            "Order is {}; mark it paid first",
            order.status
        )));
    }

    if !order.deliver_token.is_empty() {
        tokens::delete(kv, &order.deliver_token)?;
    }

    let record = tokens::mint(kv, &order)?;
    order.deliver_token = record.token.clone();
    order.expires_at = Some(record.expires_at);

    orders::save(kv, &order)?;

    tracing::info!(
        order_id = %order.order_id,
        token = %record.token,
        "delivery token regenerated"
    );

    Ok(PaidOrder {
        token: record.token,
        expires_at: record.expires_at,
        license_key: order.license_key,
        activations_max: order.activations_max,
    })
}
