use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Long-lived license record, the artifact a customer keeps after order and
/// token have expired. Devices are opaque client-supplied identifiers in
/// activation order; a recorded device holds its slot until revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub license_key: String,
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub activations_max: u32,
    pub devices: Vec<String>,
    /// One-way. There is no un-revoke.
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl License {
    pub fn activations_used(&self) -> u32 {
        self.devices.len() as u32
    }

    pub fn activations_left(&self) -> u32 {
        self.activations_max.saturating_sub(self.activations_used())
    }
}

/// Admin listing row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSummary {
    pub license_key: String,
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub activations_max: u32,
    pub activations_used: u32,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<License> for LicenseSummary {
    fn from(license: License) -> Self {
        Self {
            license_key: license.license_key.clone(),
            order_id: license.order_id.clone(),
            product_id: license.product_id.clone(),
            product_name: license.product_name.clone(),
            activations_max: license.activations_max,
            activations_used: license.activations_used(),
            revoked: license.revoked,
            created_at: license.created_at,
            updated_at: license.updated_at,
        }
    }
}
