use async_trait::async_trait;
use notehub_api::auth::{IdentityError, IdentityProvider};
use notehub_core::models::UserIdentity;
use std::collections::HashMap;

pub const ADMIN_EMAIL: &str = "admin@college.edu";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const STUDENT_TOKEN: &str = "student-token";
pub const NO_EMAIL_TOKEN: &str = "no-email-token";
/// Resolving this token simulates an unreachable auth service
pub const OUTAGE_TOKEN: &str = "outage-token";

/// Identity provider with a fixed token table; unknown tokens are invalid.
pub struct StaticIdentity {
    users: HashMap<String, String>,
}

impl StaticIdentity {
    pub fn standard() -> Self {
        let users = [
            (ADMIN_TOKEN, ADMIN_EMAIL),
            (STUDENT_TOKEN, "student@college.edu"),
            (NO_EMAIL_TOKEN, ""),
        ]
        .into_iter()
        .map(|(t, e)| (t.to_string(), e.to_string()))
        .collect();
        Self { users }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn resolve_user(&self, token: &str) -> Result<UserIdentity, IdentityError> {
        if token == OUTAGE_TOKEN {
            return Err(IdentityError::Unavailable("connection timed out".to_string()));
        }
        self.users
            .get(token)
            .map(|email| UserIdentity {
                id: Some(format!("user-{}", token)),
                email: email.clone(),
            })
            .ok_or_else(|| IdentityError::InvalidToken("invalid JWT".to_string()))
    }
}
