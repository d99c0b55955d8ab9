use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Caller identity resolved from a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Provider user id (`sub`), when the provider returns one
    #[serde(default)]
    pub id: Option<String>,
    /// Empty when the account has no email; such users never match the allow-list
    #[serde(default)]
    pub email: String,
}

/// Set of email addresses allowed to perform destructive operations.
///
/// Built once from configuration and passed explicitly to whoever needs it.
/// Matching is exact on the trimmed address.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: Arc<BTreeSet<String>>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            emails: Arc::new(emails),
        }
    }

    /// Parse a comma-separated list (the `ADMIN_EMAILS` format)
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn contains(&self, email: &str) -> bool {
        !email.is_empty() && self.emails.contains(email)
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }
}
