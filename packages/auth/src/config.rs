//! Token acquisition settings

use crate::error::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default OAuth2 token endpoint
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// IAM plus full-control object storage
pub const DEFAULT_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/iam",
    "https://www.googleapis.com/auth/devstorage.full_control",
];

/// Validity window of an assertion in seconds
pub const DEFAULT_ASSERTION_LIFETIME_SECS: i64 = 3660;

const ENV_TOKEN_ENDPOINT: &str = "SVCAUTH_TOKEN_ENDPOINT";
const ENV_SCOPES: &str = "SVCAUTH_SCOPES";
const ENV_ASSERTION_LIFETIME: &str = "SVCAUTH_ASSERTION_LIFETIME";
const ENV_USER_AGENT: &str = "SVCAUTH_USER_AGENT";
const ENV_REQUEST_TIMEOUT: &str = "SVCAUTH_REQUEST_TIMEOUT";

/// Settings for building assertions and exchanging them for tokens
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Where assertions are POSTed
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    /// Scopes requested in the `scope` claim, joined with spaces
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Seconds between `iat` and `exp`
    #[serde(default = "default_assertion_lifetime")]
    pub assertion_lifetime_secs: i64,
    /// `User-Agent` sent to the token endpoint
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds; `None` keeps the transport default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_token_endpoint() -> String {
    DEFAULT_TOKEN_ENDPOINT.to_string()
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect()
}

fn default_assertion_lifetime() -> i64 {
    DEFAULT_ASSERTION_LIFETIME_SECS
}

fn default_user_agent() -> String {
    format!("svcauth/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_endpoint: default_token_endpoint(),
            scopes: default_scopes(),
            assertion_lifetime_secs: default_assertion_lifetime(),
            user_agent: default_user_agent(),
            request_timeout_secs: None,
        }
    }
}

impl AuthConfig {
    /// Load from a JSON file; absent fields take their defaults
    ///
    /// # Errors
    /// `AuthError::Io` if the file cannot be read, `AuthError::Config` if it
    /// is not valid JSON for this structure or fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> AuthResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            AuthError::Config(format!("Invalid config file {}: {e}", path.display()))
        })?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded auth config");
        Ok(config)
    }

    /// Apply `SVCAUTH_*` environment overrides
    ///
    /// # Errors
    /// `AuthError::Config` if a numeric override does not parse or the
    /// result fails validation.
    pub fn with_env_overrides(self) -> AuthResult<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// # Errors
    /// See [`AuthConfig::with_env_overrides`].
    pub fn with_overrides<F>(mut self, lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_TOKEN_ENDPOINT) {
            self.token_endpoint = endpoint;
        }
        if let Some(scopes) = lookup(ENV_SCOPES) {
            self.scopes = scopes.split_whitespace().map(str::to_string).collect();
        }
        if let Some(lifetime) = lookup(ENV_ASSERTION_LIFETIME) {
            self.assertion_lifetime_secs = parse_number(ENV_ASSERTION_LIFETIME, &lifetime)?;
        }
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            self.user_agent = agent;
        }
        if let Some(timeout) = lookup(ENV_REQUEST_TIMEOUT) {
            self.request_timeout_secs = Some(parse_number(ENV_REQUEST_TIMEOUT, &timeout)?);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the settings can produce a usable assertion
    ///
    /// # Errors
    /// `AuthError::Config` naming the offending field.
    pub fn validate(&self) -> AuthResult<()> {
        if self.token_endpoint.trim().is_empty() {
            return Err(AuthError::config("token_endpoint must not be empty"));
        }
        if self.scopes.iter().all(|s| s.trim().is_empty()) {
            return Err(AuthError::config("at least one scope is required"));
        }
        if self.assertion_lifetime_secs <= 0 {
            return Err(AuthError::config(
                "assertion_lifetime_secs must be positive",
            ));
        }
        Ok(())
    }

    /// Space-separated `scope` claim value
    #[must_use]
    pub fn scope_claim(&self) -> String {
        self.scopes.join(" ")
    }

    /// Request timeout, when configured
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> AuthResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AuthError::Config(format!("{name}={value:?} is not a valid number: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.token_endpoint, "https://oauth2.googleapis.com/token");
        assert_eq!(
            config.scope_claim(),
            "https://www.googleapis.com/auth/iam https://www.googleapis.com/auth/devstorage.full_control"
        );
        assert_eq!(config.assertion_lifetime_secs, 3660);
        assert_eq!(config.request_timeout(), None);
        assert!(config.user_agent.starts_with("svcauth/"));
    }

    #[test]
    fn test_empty_json_takes_defaults() {
        let config: AuthConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AuthConfig::default());
    }

    #[test]
    fn test_overrides_apply() {
        let config = AuthConfig::default()
            .with_overrides(lookup(&[
                ("SVCAUTH_TOKEN_ENDPOINT", "http://127.0.0.1:9/token"),
                ("SVCAUTH_SCOPES", "scope-a   scope-b"),
                ("SVCAUTH_ASSERTION_LIFETIME", "600"),
                ("SVCAUTH_REQUEST_TIMEOUT", " 5 "),
            ]))
            .unwrap();
        assert_eq!(config.token_endpoint, "http://127.0.0.1:9/token");
        assert_eq!(config.scope_claim(), "scope-a scope-b");
        assert_eq!(config.assertion_lifetime_secs, 600);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_bad_numeric_override_is_config_error() {
        let err = AuthConfig::default()
            .with_overrides(lookup(&[("SVCAUTH_ASSERTION_LIFETIME", "an hour")]))
            .unwrap_err();
        assert!(matches!(&err, AuthError::Config(msg) if msg.contains("SVCAUTH_ASSERTION_LIFETIME")));

        assert!(matches!(
            AuthConfig::default().with_overrides(lookup(&[("SVCAUTH_REQUEST_TIMEOUT", "-1")])),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = AuthConfig::default();
        config.assertion_lifetime_secs = 0;
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));

        let mut config = AuthConfig::default();
        config.scopes = vec![" ".to_string()];
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }
}
