//! Admin gating for catalog management and uploads

use super::identity::{bearer_token, IdentityError};
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use notehub_core::models::UserIdentity;
use notehub_core::AppError;
use std::sync::Arc;

pub const MISSING_AUTH_MESSAGE: &str = "Missing Authorization header";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";
pub const FORBIDDEN_MESSAGE: &str = "Forbidden";

/// Bearer token from the `Authorization` header, `None` when absent or empty
pub fn authorization_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = bearer_token(raw);
    (!token.is_empty()).then_some(token)
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidToken(_) => {
                AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
            }
            IdentityError::Unavailable(msg) => AppError::Identity(msg),
        }
    }
}

/// Verified administrator making the request
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub user: UserIdentity,
}

impl FromRequestParts<Arc<AppState>> for AdminContext {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = authorization_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized(MISSING_AUTH_MESSAGE.to_string()))?;

        let user = state
            .identity
            .resolve_user(token)
            .await
            .map_err(AppError::from)?;

        if !state.admins.contains(&user.email) {
            tracing::warn!(email = %user.email, "Non-admin attempted an admin operation");
            return Err(AppError::Forbidden(FORBIDDEN_MESSAGE.to_string()).into());
        }

        Ok(AdminContext { user })
    }
}
