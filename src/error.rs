//! Application error type and its JSON wire shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed request field. No state change.
    #[error("{0}")]
    Validation(String),

    /// Missing or incorrect shared secret. Rejected before any store access.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    /// The license is revoked; terminal for activation and validation.
    #[error("License revoked")]
    LicenseRevoked,

    /// All activation slots are taken and the device is new.
    #[error("Activation limit reached")]
    LimitReached,

    /// The delivery token is past its expiry. The record has already been
    /// deleted as a side effect, so the caller should prompt for
    /// regeneration rather than retry.
    #[error("Token expired")]
    TokenExpired,

    #[error("internal error: {0}")]
    Internal(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("store pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::LicenseRevoked => StatusCode::FORBIDDEN,
            Self::LimitReached => StatusCode::CONFLICT,
            Self::TokenExpired => StatusCode::GONE,
            Self::Internal(_) | Self::Store(_) | Self::Pool(_) | Self::Encoding(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            // Don't leak internals to the caller
            let body = json!({ "error": "Internal server error" });
            return (status, axum::Json(body)).into_response();
        }

        let body = match &self {
            // Clients branch on this one to show "deactivate a device first"
            Self::LimitReached => json!({ "error": self.to_string(), "activationsLeft": 0 }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, axum::Json(body)).into_response()
    }
}
