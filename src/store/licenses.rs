//! License repository and activation logic.

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::kv::Kv;
use crate::models::{License, LicenseSummary, Order};
use crate::util::generate_license_key;

pub const NS: &str = "licenses";

/// Licenses are the long-term artifact; they outlive orders and tokens.
pub const LICENSE_TTL_SECS: i64 = 60 * 60 * 24 * 365;

/// Outcome of a successful activation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Activated { activations_left: u32 },
    /// The device already holds a slot; nothing changed.
    AlreadyActivated { activations_left: u32 },
}

/// Outcome of a validation call. Validation never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    UnknownKey,
    Revoked,
    Known {
        activated: bool,
        activations_max: u32,
        activations_used: u32,
    },
}

pub fn get(kv: &Kv, license_key: &str) -> Result<Option<License>> {
    match kv.get(NS, license_key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

fn save(kv: &Kv, license: &License) -> Result<()> {
    kv.put(
        NS,
        &license.license_key,
        &serde_json::to_string(license)?,
        LICENSE_TTL_SECS,
    )
}

/// Idempotent creation: reuse the order's key if it has one, otherwise mint
/// a fresh formatted key; write a record only if none exists for that key.
/// Called on every (re-)payment of an order, so an existing device list must
/// never be truncated.
pub fn ensure(kv: &Kv, order: &Order, key_prefix: &str) -> Result<(String, u32)> {
    let activations_max = order.activations_max;
    let license_key = if order.license_key.trim().is_empty() {
        generate_license_key(key_prefix)
    } else {
        crate::util::normalize_license_key(&order.license_key)
    };

    if get(kv, &license_key)?.is_none() {
        let now = Utc::now();
        let license = License {
            license_key: license_key.clone(),
            order_id: order.order_id.clone(),
            product_id: order.product_id.clone(),
            product_name: order.product_name.clone(),
            activations_max,
            devices: Vec::new(),
            revoked: false,
            created_at: now,
            updated_at: now,
        };
        save(kv, &license)?;
        tracing::info!(license_key = %license_key, order_id = %order.order_id, "license created");
    }

    Ok((license_key, activations_max))
}

/// Bind a device to a license, consuming one slot.
///
/// Device identity is an opaque client-supplied string; once recorded it
/// occupies a slot until the license is revoked. Re-activating a recorded
/// device is a no-op that reports the remaining slots.
pub fn activate(kv: &Kv, license_key: &str, device_id: &str) -> Result<Activation> {
    let mut license =
        get(kv, license_key)?.ok_or_else(|| AppError::NotFound("Invalid license".into()))?;

    if license.revoked {
        return Err(AppError::LicenseRevoked);
    }

    if license.devices.iter().any(|d| d == device_id) {
        return Ok(Activation::AlreadyActivated {
            activations_left: license.activations_left(),
        });
    }

    if license.activations_used() >= license.activations_max {
        return Err(AppError::LimitReached);
    }

    license.devices.push(device_id.to_string());
    license.updated_at = Utc::now();
    save(kv, &license)?;

    tracing::info!(
        license_key = %license_key,
        activations_used = license.activations_used(),
        activations_max = license.activations_max,
        "device activated"
    );

    Ok(Activation::Activated {
        activations_left: license.activations_left(),
    })
}

pub fn validate(kv: &Kv, license_key: &str, device_id: &str) -> Result<Validation> {
    let Some(license) = get(kv, license_key)? else {
        return Ok(Validation::UnknownKey);
    };

    if license.revoked {
        return Ok(Validation::Revoked);
    }

    Ok(Validation::Known {
        activated: license.devices.iter().any(|d| d == device_id),
        activations_max: license.activations_max,
        activations_used: license.activations_used(),
    })
}

/// One-way and idempotent. A revoked license never activates or validates
/// positively again.
pub fn revoke(kv: &Kv, license_key: &str) -> Result<License> {
    let mut license =
        get(kv, license_key)?.ok_or_else(|| AppError::NotFound("License not found".into()))?;

    license.revoked = true;
    license.updated_at = Utc::now();
    save(kv, &license)?;

    tracing::info!(license_key = %license_key, "license revoked");
    Ok(license)
}

/// Paginated admin enumeration, same contract as the order listing.
pub fn list(
    kv: &Kv,
    limit: usize,
    cursor: Option<&str>,
) -> Result<(Vec<LicenseSummary>, Option<String>, bool)> {
    let page = kv.list(NS, limit, cursor)?;

    let mut items = Vec::with_capacity(page.keys.len());
    for key in &page.keys {
        if let Some(license) = get(kv, key)? {
            items.push(LicenseSummary::from(license));
        }
    }
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok((items, page.cursor, page.has_more))
}
