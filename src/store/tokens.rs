//! Delivery token repository. One ephemeral record per issued token.

use chrono::{Duration, Utc};

use crate::error::{AppError, Result};
use crate::kv::Kv;
use crate::models::{DeliveryPayload, Order, TokenRecord};
use crate::util::generate_id;

pub const NS: &str = "tokens";

/// How long a freshly minted link is redeemable.
pub const LINK_VALIDITY_SECS: i64 = 60 * 30;

/// Store-level TTL. Longer than the link validity so an expired token is
/// still present to be reported as expired (and cleaned up) rather than
/// silently vanishing.
pub const RECORD_TTL_SECS: i64 = 60 * 60;

/// Mint a fresh token from a paid order snapshot. The order must already
/// carry its license key.
pub fn mint(kv: &Kv, order: &Order) -> Result<TokenRecord> {
    let expires_at = Utc::now() + Duration::seconds(LINK_VALIDITY_SECS);
    let record = TokenRecord::from_order(generate_id("TOK"), expires_at, order);
    kv.put(
        NS,
        &record.token,
        &serde_json::to_string(&record)?,
        RECORD_TTL_SECS,
    )?;
    Ok(record)
}

/// Redeem a token for its delivery payload.
///
/// A token past its `expiresAt` is deleted and reported as expired, so the
/// next attempt on the same token is a plain not-found. A live token is
/// marked used and re-persisted with a refreshed store TTL; redemption is
/// deliberately not single-use, so a page reload returns the same payload.
pub fn redeem(kv: &Kv, token: &str) -> Result<DeliveryPayload> {
    let raw = kv
        .get(NS, token)?
        .ok_or_else(|| AppError::NotFound("Invalid or expired token".into()))?;
    let mut record: TokenRecord = serde_json::from_str(&raw)?;

    if Utc::now() > record.expires_at {
        kv.delete(NS, token)?;
        return Err(AppError::TokenExpired);
    }

    record.used = true;
    kv.put(NS, token, &serde_json::to_string(&record)?, RECORD_TTL_SECS)?;

    Ok(DeliveryPayload::from(record))
}

/// Explicit invalidation, used when a replacement token is minted.
pub fn delete(kv: &Kv, token: &str) -> Result<()> {
    kv.delete(NS, token)
}
