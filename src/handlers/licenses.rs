//! Public license endpoints, called by the licensed application itself.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::store::{AppState, licenses};
use crate::store::licenses::{Activation, Validation};
use crate::util::normalize_license_key;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRequest {
    #[serde(default)]
    pub license_key: String,
    #[serde(default)]
    pub device_id: String,
}

impl LicenseRequest {
    /// Normalized `(license_key, device_id)`, rejecting empty fields.
    fn parts(&self) -> Result<(String, String)> {
        let license_key = normalize_license_key(&self.license_key);
        let device_id = self.device_id.trim().to_string();
        if license_key.is_empty() || device_id.is_empty() {
            return Err(AppError::Validation(
                "licenseKey and deviceId are required".into(),
            ));
        }
        Ok((license_key, device_id))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateResponse {
    pub ok: bool,
    pub status: &'static str,
    pub activations_left: u32,
}

pub async fn activate_license(
    State(state): State<AppState>,
    Json(body): Json<LicenseRequest>,
) -> Result<Json<ActivateResponse>> {
    let (license_key, device_id) = body.parts()?;

    let response = match licenses::activate(&state.kv, &license_key, &device_id)? {
        Activation::Activated { activations_left } => ActivateResponse {
            ok: true,
            status: "activated",
            activations_left,
        },
        Activation::AlreadyActivated { activations_left } => ActivateResponse {
            ok: true,
            status: "already_activated",
            activations_left,
        },
    };

    Ok(Json(response))
}

/// Validation always answers 200; "not valid" is a result, not a failure,
/// so client SDKs can branch without error handling.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub ok: bool,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activations_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activations_used: Option<u32>,
}

pub async fn validate_license(
    State(state): State<AppState>,
    Json(body): Json<LicenseRequest>,
) -> Result<Json<ValidateResponse>> {
    let (license_key, device_id) = body.parts()?;

    let response = match licenses::validate(&state.kv, &license_key, &device_id)? {
        Validation::UnknownKey => ValidateResponse {
            ok: false,
            valid: false,
            reason: Some("invalid"),
            activations_max: None,
            activations_used: None,
        },
        Validation::Revoked => ValidateResponse {
            ok: false,
            valid: false,
            reason: Some("revoked"),
            activations_max: None,
            activations_used: None,
        },
        Validation::Known {
            activated,
            activations_max,
            activations_used,
        } => ValidateResponse {
            ok: true,
            valid: activated,
            reason: None,
            activations_max: Some(activations_max),
            activations_used: Some(activations_used),
        },
    };

    Ok(Json(response))
}
