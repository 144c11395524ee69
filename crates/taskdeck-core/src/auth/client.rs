//! Client for the external identity service.
//!
//! Login and signup exchange credentials for a bearer token, store it, and
//! then reconcile the identity with the task backend once.

use reqwest::Client;
use serde::Deserialize;

use super::{AuthToken, TokenStore};
use crate::api::{parse_error_message, ApiClient};
use crate::config::normalize_base_url;
use crate::error::{Error, Result};
use crate::models::User;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone)]
pub struct IdentityClient<S> {
    auth_url: String,
    client: Client,
    api: ApiClient<S>,
}

impl<S: TokenStore> IdentityClient<S> {
    pub fn new(auth_url: impl AsRef<str>, api: ApiClient<S>) -> Result<Self> {
        Ok(Self {
            auth_url: normalize_base_url(auth_url.as_ref(), "auth base URL")?,
            client: Client::builder().build()?,
            api,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(AuthToken, User)> {
        self.exchange("login", "Login failed", email, password)
            .await
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<(AuthToken, User)> {
        self.exchange("signup", "Signup failed", email, password)
            .await
    }

    /// Clears the stored token. Requests already in flight keep the old one.
    pub fn logout(&self) -> Result<()> {
        self.api.tokens().clear()
    }

    async fn exchange(
        &self,
        action: &str,
        fallback_message: &str,
        email: &str,
        password: &str,
    ) -> Result<(AuthToken, User)> {
        validate_credentials(email, password)?;

        let payload = serde_json::json!({
            "email": email.trim(),
            "password": password,
        });
        let response = self
            .client
            .post(format!("{}/{action}", self.auth_url))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let message =
                parse_error_message(&bytes).unwrap_or_else(|| fallback_message.to_string());
            tracing::warn!(action, status = status.as_u16(), "Identity request failed");
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let TokenResponse { access_token } = serde_json::from_slice(&bytes)?;
        let token = AuthToken::new(access_token).ok_or_else(|| Error::Api {
            status: status.as_u16(),
            message: format!("{fallback_message}: empty access token"),
        })?;

        self.api.tokens().save(&token)?;
        let user = self.api.sync_user(&token).await?;
        tracing::info!(user_id = user.id, "Signed in and synced user");
        Ok((token, user))
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::InvalidInput("Email is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(Error::InvalidInput("Password is required".to_string()));
    }
    Ok(())
}
