use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::warn;

use super::{AuthenticatedUser, IdentityError, IdentityProvider};
use crate::ledger::UserId;

/// Hosted identity service: the token is forwarded to a "current user"
/// endpoint that answers with the user's profile.
#[derive(Debug, Clone)]
pub struct RemoteIdentity {
    client: reqwest::Client,
    user_url: String,
}

#[derive(Debug, Deserialize)]
struct RemoteProfile {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl RemoteIdentity {
    pub fn new(user_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), user_url)
    }

    pub fn with_client(client: reqwest::Client, user_url: impl Into<String>) -> Self {
        Self {
            client,
            user_url: user_url.into(),
        }
    }

    async fn fetch_profile(&self, token: &str) -> Result<Option<RemoteProfile>, IdentityError> {
        let response = self
            .client
            .get(&self.user_url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(|err| IdentityError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Ok(None);
        }

        response
            .json::<RemoteProfile>()
            .await
            .map(Some)
            .map_err(|err| IdentityError::MalformedProfile(err.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentity {
    async fn resolve(&self, token: &str) -> Result<Option<AuthenticatedUser>, IdentityError> {
        let profile = match self.fetch_profile(token).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(error = %err, "identity lookup failed");
                return Err(err);
            }
        };

        Ok(profile.and_then(|profile| {
            let id = profile
                .sub
                .or(profile.id)
                .filter(|id| !id.is_empty())?;
            Some(AuthenticatedUser {
                user_id: UserId(id),
                email: profile.email.unwrap_or_default(),
            })
        }))
    }
}
