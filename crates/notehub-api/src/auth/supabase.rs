//! Identity lookup against the hosted auth service (`/auth/v1/user`)

use super::identity::{IdentityError, IdentityProvider};
use async_trait::async_trait;
use notehub_core::models::UserIdentity;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct AuthUserResponse {
    id: Option<String>,
    email: Option<String>,
}

#[derive(Clone)]
pub struct SupabaseIdentityProvider {
    client: reqwest::Client,
    user_url: String,
    service_key: String,
}

impl SupabaseIdentityProvider {
    pub fn new(project_url: &str, service_key: &str) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;
        Ok(Self::with_client(client, project_url, service_key))
    }

    pub fn with_client(client: reqwest::Client, project_url: &str, service_key: &str) -> Self {
        Self {
            client,
            user_url: format!("{}/auth/v1/user", project_url.trim_end_matches('/')),
            service_key: service_key.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    #[tracing::instrument(skip(self, token))]
    async fn resolve_user(&self, token: &str) -> Result<UserIdentity, IdentityError> {
        let response = self
            .client
            .get(&self.user_url)
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %body, "Auth service rejected token");
            return Err(IdentityError::InvalidToken(format!("status {}", status)));
        }

        let user: AuthUserResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::InvalidToken(format!("Malformed user response: {}", e)))?;

        Ok(UserIdentity {
            id: user.id,
            email: user.email.unwrap_or_default(),
        })
    }
}
