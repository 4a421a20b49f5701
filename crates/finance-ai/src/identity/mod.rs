//! Bearer-token identity. The service never issues or verifies credentials
//! itself; it asks an [`IdentityProvider`] who a token belongs to.

mod remote;

pub use remote::RemoteIdentity;

use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use crate::ledger::UserId;

/// The owner of a request, as resolved from its bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Resolves opaque bearer tokens to users.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` means the token is unknown or rejected.
    async fn resolve(&self, token: &str) -> Result<Option<AuthenticatedUser>, IdentityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider unreachable: {0}")]
    Transport(String),
    #[error("identity provider returned an unreadable profile: {0}")]
    MalformedProfile(String),
}

/// Extracts the token from `Authorization: Bearer <token>`. The scheme is
/// matched case-insensitively and must be followed by whitespace.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let scheme = raw.get(..6)?;
    let rest = raw.get(6..)?;
    if !scheme.eq_ignore_ascii_case("bearer") || !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Fixed token table, used for local development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    tokens: HashMap<String, AuthenticatedUser>,
}

impl StaticIdentity {
    pub fn new(tokens: HashMap<String, AuthenticatedUser>) -> Self {
        Self { tokens }
    }

    pub fn with_user(mut self, token: &str, user_id: &str, email: &str) -> Self {
        self.tokens.insert(
            token.to_string(),
            AuthenticatedUser {
                user_id: UserId(user_id.to_string()),
                email: email.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn resolve(&self, token: &str) -> Result<Option<AuthenticatedUser>, IdentityError> {
        Ok(self.tokens.get(token).cloned())
    }
}
