//! Client endpoint configuration.
//!
//! Development builds talk to a local backend; production deployments put the
//! API behind the same origin as the app under an `/api` prefix.

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

pub const ENV_VAR: &str = "TASKDECK_ENV";
pub const API_URL_VAR: &str = "TASKDECK_API_URL";
pub const PUBLIC_ORIGIN_VAR: &str = "TASKDECK_PUBLIC_ORIGIN";
pub const AUTH_URL_VAR: &str = "TASKDECK_AUTH_URL";

pub const DEVELOPMENT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_AUTH_URL: &str = "http://localhost:8080/auth";
const PRODUCTION_API_PREFIX: &str = "/api";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(value: Option<String>) -> Self {
        match normalize_text_option(value).as_deref() {
            Some(value) if value.eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Resolved backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub environment: Environment,
    /// Base URL the task and user endpoints are joined onto
    pub api_base_url: String,
    /// Identity service handling login and signup
    pub auth_base_url: String,
}

impl ClientConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = Environment::parse(lookup(ENV_VAR));

        let api_base_url = match normalize_text_option(lookup(API_URL_VAR)) {
            Some(explicit) => normalize_base_url(&explicit, API_URL_VAR)?,
            None => match environment {
                Environment::Development => DEVELOPMENT_API_URL.to_string(),
                Environment::Production => {
                    let origin = normalize_text_option(lookup(PUBLIC_ORIGIN_VAR)).ok_or_else(
                        || {
                            Error::InvalidConfiguration(format!(
                                "{PUBLIC_ORIGIN_VAR} must be set when {ENV_VAR}=production"
                            ))
                        },
                    )?;
                    let origin = normalize_base_url(&origin, PUBLIC_ORIGIN_VAR)?;
                    format!("{origin}{PRODUCTION_API_PREFIX}")
                }
            },
        };

        let auth_base_url = match normalize_text_option(lookup(AUTH_URL_VAR)) {
            Some(explicit) => normalize_base_url(&explicit, AUTH_URL_VAR)?,
            None => DEFAULT_AUTH_URL.to_string(),
        };

        Ok(Self {
            environment,
            api_base_url,
            auth_base_url,
        })
    }

    /// Replaces endpoints with explicit overrides, e.g. from command-line flags.
    pub fn with_overrides(
        mut self,
        api_base_url: Option<String>,
        auth_base_url: Option<String>,
    ) -> Result<Self> {
        if let Some(url) = normalize_text_option(api_base_url) {
            self.api_base_url = normalize_base_url(&url, "api base URL")?;
        }
        if let Some(url) = normalize_text_option(auth_base_url) {
            self.auth_base_url = normalize_base_url(&url, "auth base URL")?;
        }
        Ok(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            api_base_url: DEVELOPMENT_API_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_URL.to_string(),
        }
    }
}

/// Trims whitespace and trailing slashes; requires an http(s) scheme.
pub fn normalize_base_url(value: &str, label: &str) -> Result<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidConfiguration(format!(
            "{label} must not be empty"
        )));
    }
    if !is_http_url(trimmed) {
        return Err(Error::InvalidConfiguration(format!(
            "{label} must include http:// or https://"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn development_is_default() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn production_uses_same_origin_api_prefix() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_VAR, "production"),
            (PUBLIC_ORIGIN_VAR, "https://tasks.example.com/"),
        ]))
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_base_url, "https://tasks.example.com/api");
    }

    #[test]
    fn production_without_origin_is_rejected() {
        let error = ClientConfig::from_lookup(lookup_from(&[(ENV_VAR, "Production")]))
            .unwrap_err();
        assert!(matches!(error, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn explicit_api_url_wins_over_environment() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_VAR, "production"),
            (API_URL_VAR, " http://10.0.0.2:9000/ "),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.2:9000");
    }

    #[test]
    fn overrides_require_http_scheme() {
        let result = ClientConfig::default().with_overrides(Some("localhost:8000".to_string()), None);
        assert!(result.is_err());

        let config = ClientConfig::default()
            .with_overrides(None, Some("https://id.example.com/auth/".to_string()))
            .unwrap();
        assert_eq!(config.auth_base_url, "https://id.example.com/auth");
        assert_eq!(config.api_base_url, DEVELOPMENT_API_URL);
    }
}
