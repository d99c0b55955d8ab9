//! Bearer token resolution
//!
//! The portal never stores sessions. Every privileged request carries the auth
//! provider's access token, which an [`IdentityProvider`] turns into a
//! [`UserIdentity`].

use async_trait::async_trait;
use notehub_core::models::UserIdentity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider rejected the token (bad signature, expired, revoked)
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The provider could not be reached
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve_user(&self, token: &str) -> Result<UserIdentity, IdentityError>;
}

/// Strip a leading `Bearer` scheme (any case, optional whitespace) from an
/// `Authorization` header value.
///
/// The result may be empty, which callers treat as a missing header.
pub fn bearer_token(header_value: &str) -> &str {
    match header_value.get(..6) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => header_value[6..].trim_start(),
        _ => header_value,
    }
}
