//! Shared-secret authentication for the admin surface and the payment
//! webhook. Swapping in a stronger scheme (per-user tokens, signed
//! webhooks) only means replacing these layers; handlers never see secrets.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::store::AppState;

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Gate for `/api/admin/*`.
pub async fn admin_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_secret(
        request.headers(),
        ADMIN_SECRET_HEADER,
        state.admin_secret.as_deref(),
    )?;
    Ok(next.run(request).await)
}

/// Gate for `/api/webhook/payment`.
pub async fn webhook_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_secret(
        request.headers(),
        WEBHOOK_SECRET_HEADER,
        state.webhook_secret.as_deref(),
    )?;
    Ok(next.run(request).await)
}

/// An unconfigured secret closes the route entirely; a configured one is
/// compared in constant time.
fn check_secret(
    headers: &HeaderMap,
    header: &str,
    configured: Option<&str>,
) -> Result<(), AppError> {
    let Some(expected) = configured else {
        return Err(AppError::Unauthorized);
    };

    let provided = headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn matching_secret_passes() {
        let headers = headers_with(ADMIN_SECRET_HEADER, "s3cret");
        assert!(check_secret(&headers, ADMIN_SECRET_HEADER, Some("s3cret")).is_ok());
    }

    #[test]
    fn wrong_or_missing_secret_fails() {
        let headers = headers_with(ADMIN_SECRET_HEADER, "nope");
        assert!(check_secret(&headers, ADMIN_SECRET_HEADER, Some("s3cret")).is_err());
        assert!(check_secret(&HeaderMap::new(), ADMIN_SECRET_HEADER, Some("s3cret")).is_err());
    }

    #[test]
    fn unconfigured_secret_closes_the_route() {
        let headers = headers_with(ADMIN_SECRET_HEADER, "anything");
        assert!(check_secret(&headers, ADMIN_SECRET_HEADER, None).is_err());
    }
}
