//! Identity extractors.
//!
//! Authentication itself lives upstream: the edge proxy terminates the
//! customer session and forwards the verified identity as `x-user-id` and
//! `x-user-email` headers. Admin endpoints are gated by a static API key in
//! `x-admin-key`.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

use giftly_core::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated customer, as asserted by the upstream proxy.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Option<String>,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_str(&parts.headers, "x-user-id")
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| AppError::Unauthorized("Sign in to continue".to_string()))?;
        let email = header_str(&parts.headers, "x-user-email").map(String::from);

        Ok(Self { id, email })
    }
}

/// Extractor that requires the admin API key.
///
/// Rejects with 403 when the `x-admin-key` header is missing or does not
/// match the configured key.
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = header_str(&parts.headers, "x-admin-key")
            .ok_or_else(|| AppError::Forbidden("Admin key required".to_string()))?;
        if presented != state.config().admin_api_key() {
            return Err(AppError::Forbidden("Admin key required".to_string()));
        }
        Ok(Self)
    }
}
