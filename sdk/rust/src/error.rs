//! Error types for the Valegate SDK

use thiserror::Error;

/// Error codes for Valegate errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValeErrorCode {
    /// License key not found
    InvalidLicenseKey,
    /// License has been revoked
    LicenseRevoked,
    /// Cannot activate more devices
    ActivationLimitReached,
    /// Delivery token unknown (possibly already expired and cleaned up)
    InvalidToken,
    /// Delivery token past its expiry; ask for regeneration
    TokenExpired,
    /// Invalid request parameters
    ValidationError,
    /// Network request failed
    NetworkError,
    /// Unexpected server-side failure
    ServerError,
}

impl std::fmt::Display for ValeErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLicenseKey => write!(f, "INVALID_LICENSE_KEY"),
            Self::LicenseRevoked => write!(f, "LICENSE_REVOKED"),
            Self::ActivationLimitReached => write!(f, "ACTIVATION_LIMIT_REACHED"),
            Self::InvalidToken => write!(f, "INVALID_TOKEN"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::ValidationError => write!(f, "VALIDATION_ERROR"),
            Self::NetworkError => write!(f, "NETWORK_ERROR"),
            Self::ServerError => write!(f, "SERVER_ERROR"),
        }
    }
}

/// Valegate SDK error
#[derive(Debug, Error)]
#[error("{message} (code: {code})")]
pub struct ValeError {
    /// Error code
    pub code: ValeErrorCode,
    /// Human-readable message
    pub message: String,
    /// HTTP status code (for API errors)
    pub status_code: Option<u16>,
}

impl ValeError {
    pub fn new(code: ValeErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }
}

impl From<reqwest::Error> for ValeError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(ValeErrorCode::NetworkError, err.to_string())
    }
}
