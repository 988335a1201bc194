//! Valegate licensing SDK.
//!
//! A typed client for the Valegate engine's public surface: license
//! activation and validation per device, and delivery-token redemption.
//! The SDK keeps a stable anonymous device id and the entered license key
//! in a pluggable storage adapter, so an app can call [`ValeClient::bootstrap`]
//! at startup and branch on the outcome.
//!
//! ```no_run
//! use valegate_sdk::{BootstrapOutcome, ValeClient};
//!
//! # async fn run() -> Result<(), valegate_sdk::ValeError> {
//! let client = ValeClient::new("https://api.valegames.example");
//! match client.bootstrap().await? {
//!     BootstrapOutcome::Valid { .. } => { /* unlock premium */ }
//!     BootstrapOutcome::NeedsActivation { .. } => {
//!         // prompt for a serial, then:
//!         client.activate("VG-ABCD-EFGH-JKLM").await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod storage;

pub use error::{ValeError, ValeErrorCode};
pub use storage::{MemoryStorage, StorageAdapter, keys};

#[cfg(feature = "native-storage")]
pub use storage::FileStorage;

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};

/// Result of a validation call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub valid: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub activations_max: Option<u32>,
    #[serde(default)]
    pub activations_used: Option<u32>,
}

/// Result of an activation call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
    /// `"activated"` or `"already_activated"`
    pub status: String,
    pub activations_left: u32,
}

/// Delivery payload unlocked by a redemption.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
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

/// What [`ValeClient::bootstrap`] decided at startup.
#[derive(Debug, Clone)]
pub enum BootstrapOutcome {
    /// A stored license key validated for this device.
    Valid {
        license_key: String,
        validation: Validation,
    },
    /// No stored key, or the stored key didn't validate here; prompt the
    /// user and call [`ValeClient::activate`].
    NeedsActivation { validation: Option<Validation> },
}

pub struct ValeClient {
    api_base: String,
    http: reqwest::Client,
    storage: Arc<dyn StorageAdapter>,
}

impl ValeClient {
    /// Client with in-memory storage. Use [`ValeClient::with_storage`] (or
    /// [`ValeClient::with_app_name`]) for persistence across runs.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::with_storage(api_base, Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(api_base: impl Into<String>, storage: Arc<dyn StorageAdapter>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            api_base,
            http: reqwest::Client::new(),
            storage,
        }
    }

    /// Client persisting under the platform's per-app data directory.
    #[cfg(feature = "native-storage")]
    pub fn with_app_name(api_base: impl Into<String>, app_name: &str) -> Option<Self> {
        let storage = FileStorage::new(app_name)?;
        Some(Self::with_storage(api_base, Arc::new(storage)))
    }

    /// Stable anonymous device identifier, generated once and persisted.
    /// No hardware fingerprinting; the engine treats it as opaque.
    pub fn device_id(&self) -> String {
        if let Some(id) = self.storage.get(keys::DEVICE_ID) {
            return id;
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.storage.set(keys::DEVICE_ID, &id);
        id
    }

    /// License key remembered from a previous successful activation.
    pub fn stored_license_key(&self) -> Option<String> {
        self.storage
            .get(keys::LICENSE_KEY)
            .filter(|key| !key.trim().is_empty())
    }

    /// Forget the stored license key (the device keeps its slot server-side).
    pub fn clear_license_key(&self) {
        self.storage.remove(keys::LICENSE_KEY);
    }

    /// Validate a license key for this device. Never mutates server state.
    pub async fn validate(&self, license_key: &str) -> Result<Validation, ValeError> {
        let (status, body) = self
            .post(
                "/api/license/validate",
                json!({
                    "licenseKey": normalize_key(license_key),
                    "deviceId": self.device_id(),
                }),
            )
            .await?;

        if !status.is_success() {
            return Err(api_error(status, &body, ValeErrorCode::ValidationError));
        }
        parse(body)
    }

    /// Activate this device on a license key, consuming one slot. The key
    /// is stored for later [`ValeClient::bootstrap`] calls on success.
    pub async fn activate(&self, license_key: &str) -> Result<Activation, ValeError> {
        let key = normalize_key(license_key);
        if key.is_empty() {
            return Err(ValeError::new(
                ValeErrorCode::ValidationError,
                "license key is empty",
            ));
        }

        let (status, body) = self
            .post(
                "/api/license/activate",
                json!({ "licenseKey": key, "deviceId": self.device_id() }),
            )
            .await?;

        if !status.is_success() {
            let code = match status.as_u16() {
                404 => ValeErrorCode::InvalidLicenseKey,
                403 => ValeErrorCode::LicenseRevoked,
                409 => ValeErrorCode::ActivationLimitReached,
                400 => ValeErrorCode::ValidationError,
                _ => ValeErrorCode::ServerError,
            };
            return Err(api_error(status, &body, code));
        }

        self.storage.set(keys::LICENSE_KEY, &key);
        parse(body)
    }

    /// Redeem a delivery token for download links and the license key.
    pub async fn deliver(&self, token: &str) -> Result<Delivery, ValeError> {
        let url = format!(
            "{}/api/deliver/{}",
            self.api_base,
            urlencoding::encode(token.trim())
        );
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let code = match status.as_u16() {
                410 => ValeErrorCode::TokenExpired,
                404 => ValeErrorCode::InvalidToken,
                _ => ValeErrorCode::ServerError,
            };
            return Err(api_error(status, &body, code));
        }
        parse(body)
    }

    /// Startup flow: validate the stored key if there is one.
    pub async fn bootstrap(&self) -> Result<BootstrapOutcome, ValeError> {
        let Some(license_key) = self.stored_license_key() else {
            return Ok(BootstrapOutcome::NeedsActivation { validation: None });
        };

        let validation = self.validate(&license_key).await?;
        if validation.valid {
            Ok(BootstrapOutcome::Valid {
                license_key,
                validation,
            })
        } else {
            Ok(BootstrapOutcome::NeedsActivation {
                validation: Some(validation),
            })
        }
    }

    async fn post(
        &self,
        path: &str,
        body: Value,
    ) -> Result<(reqwest::StatusCode, Value), ValeError> {
        let response = self
            .http
            .post(format!("{}{}", self.api_base, path))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok((status, body))
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn parse<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ValeError> {
    serde_json::from_value(body).map_err(|err| {
        ValeError::new(
            ValeErrorCode::ServerError,
            format!("unexpected response shape: {err}"),
        )
    })
}

fn api_error(status: reqwest::StatusCode, body: &Value, code: ValeErrorCode) -> ValeError {
    let message = body["error"]
        .as_str()
        .unwrap_or("request failed")
        .to_string();
    ValeError::new(code, message).with_status(status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_is_stable_per_storage() {
        let client = ValeClient::new("https://api.example/");
        let first = client.device_id();
        let second = client.device_id();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn base_url_is_trimmed() {
        let client = ValeClient::new("https://api.example///");
        assert_eq!(client.api_base, "https://api.example");
    }

    #[test]
    fn stored_key_set_only_by_activation() {
        let client = ValeClient::new("https://api.example");
        assert!(client.stored_license_key().is_none());
        client.storage.set(keys::LICENSE_KEY, "  ");
        assert!(client.stored_license_key().is_none());
    }
}
