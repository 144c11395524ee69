//! REST client for the task backend.
//!
//! Every call goes through [`ApiClient::request`], which attaches the bearer
//! token read from the injected [`TokenStore`], serializes the JSON body, and
//! normalizes error responses into [`Error::Api`].

mod tasks;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::{AuthToken, TokenStore};
use crate::config::{normalize_base_url, ClientConfig};
use crate::error::{Error, Result};
use crate::models::User;
use crate::util::{compact_text, join_url};

pub use tasks::TaskApi;

pub const USERS_SYNC_ENDPOINT: &str = "users/sync";

/// Whether a request must carry the stored bearer token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Required,
    Anonymous,
}

/// HTTP client for the task backend.
#[derive(Debug, Clone)]
pub struct ApiClient<S> {
    base_url: String,
    client: reqwest::Client,
    tokens: S,
}

impl<S: TokenStore> ApiClient<S> {
    /// Builds a client for an explicit API base URL.
    pub fn new(base_url: impl AsRef<str>, tokens: S) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_ref(), "api base URL")?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url,
            client,
            tokens,
        })
    }

    pub fn from_config(config: &ClientConfig, tokens: S) -> Result<Self> {
        Self::new(&config.api_base_url, tokens)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn tokens(&self) -> &S {
        &self.tokens
    }

    /// Sends a JSON request and decodes the JSON response.
    ///
    /// Returns `Ok(None)` for `204 No Content` and for empty success bodies.
    /// With [`AuthMode::Required`] and no stored token this fails with
    /// [`Error::AuthMissing`] before anything is sent.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        auth: AuthMode,
    ) -> Result<Option<R>> {
        let token = match auth {
            AuthMode::Required => Some(self.tokens.load()?.ok_or(Error::AuthMissing)?),
            AuthMode::Anonymous => None,
        };
        self.send(method, endpoint, body, token.as_ref()).await
    }

    /// Reconciles the identity behind `token` with the backend user records.
    pub async fn sync_user(&self, token: &AuthToken) -> Result<User> {
        self.send(Method::POST, USERS_SYNC_ENDPOINT, None, Some(token))
            .await?
            .ok_or_else(|| Error::EmptyResponse(format!("POST {USERS_SYNC_ENDPOINT}")))
    }

    async fn send<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        token: Option<&AuthToken>,
    ) -> Result<Option<R>> {
        let url = join_url(&self.base_url, endpoint);
        tracing::debug!(%method, endpoint, "Sending API request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        if !status.is_success() {
            let message = parse_error_message(&bytes)
                .unwrap_or_else(|| generic_error_message(status.as_u16()));
            tracing::warn!(%method, endpoint, status = status.as_u16(), "API request failed: {}", message);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

/// Fallback message when an error body carries no usable detail.
pub fn generic_error_message(status: u16) -> String {
    format!("Request failed with HTTP {status}")
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
    message: Option<String>,
}

/// Extracts the human-readable message from a JSON error body.
///
/// Accepts `{"detail": "..."}`, validation lists of the form
/// `{"detail": [{"msg": "..."}]}`, and `{"message": "..."}`. Messages longer
/// than 180 characters are cut and end with `...`.
pub fn parse_error_message(body: &[u8]) -> Option<String> {
    let payload = serde_json::from_slice::<ErrorBody>(body).ok()?;

    let detail = payload.detail.and_then(|detail| match detail {
        Value::String(text) => Some(text),
        Value::Array(entries) => {
            let messages = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    });

    detail
        .or(payload.message)
        .map(|message| compact_text(&message))
        .filter(|message| !message.is_empty())
}
