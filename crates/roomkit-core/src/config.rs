//! Configuration for Roomkit clients.
//!
//! [`ApiClientConfig`] can be built in code, loaded from a JSON document, or read
//! from `ROOMKIT_*` environment variables. The API token is held as a
//! [`SecretString`] and is never serialized.

use crate::client::{DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT};
use crate::id::AccountId;
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Environment variable holding the platform base URL.
pub const ENV_BASE_URL: &str = "ROOMKIT_BASE_URL";
/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "ROOMKIT_API_TOKEN";
/// Environment variable holding the account id.
pub const ENV_ACCOUNT_ID: &str = "ROOMKIT_ACCOUNT_ID";
/// Environment variable overriding the request timeout (seconds).
pub const ENV_TIMEOUT_SECS: &str = "ROOMKIT_TIMEOUT_SECS";
/// Environment variable overriding the retry count.
pub const ENV_MAX_RETRIES: &str = "ROOMKIT_MAX_RETRIES";
/// Environment variable toggling TLS verification.
pub const ENV_TLS_VERIFY: &str = "ROOMKIT_TLS_VERIFY";

/// Configuration for a Roomkit client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiClientConfig {
    /// Platform API base URL, e.g. `https://api.example.com/v1/`
    #[validate(url)]
    pub base_url: String,

    /// Bearer token sent as `Authorization`
    #[serde(default, skip_serializing)]
    pub api_token: Option<SecretString>,

    /// Account the calls act on, sent as `X-Account-Id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of retry attempts for retry-safe calls
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

const fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl ApiClientConfig {
    /// Create a new client configuration with required parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: base_url.into(),
            api_token: None,
            account_id: None,
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        };

        config.check()?;
        Ok(config)
    }

    /// Parse a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid configuration document: {e}")))?;
        config.check()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_json_str(&contents)
    }

    /// Read the configuration from `ROOMKIT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `ROOMKIT_BASE_URL` is missing or a value is malformed.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .ok_or_else(|| Error::Config(format!("{ENV_BASE_URL} is not set")))?;
        let mut config = Self::new(base_url)?;

        if let Some(token) = lookup(ENV_API_TOKEN) {
            config = config.with_api_token(token);
        }
        if let Some(account) = lookup(ENV_ACCOUNT_ID) {
            let id = AccountId::parse_str(&account)
                .map_err(|e| Error::Config(format!("{ENV_ACCOUNT_ID}: {e}")))?;
            config = config.with_account_id(id);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout_secs = parse_var(ENV_TIMEOUT_SECS, &timeout)?;
        }
        if let Some(retries) = lookup(ENV_MAX_RETRIES) {
            config.max_retries = parse_var(ENV_MAX_RETRIES, &retries)?;
        }
        if let Some(verify) = lookup(ENV_TLS_VERIFY) {
            config.tls_verify = parse_var(ENV_TLS_VERIFY, &verify)?;
        }

        config.check()?;
        Ok(config)
    }

    /// Set the API token.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the account the calls act on.
    #[must_use]
    pub const fn with_account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Borrow the token, if configured.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.api_token.as_ref().map(|token| token.expose_secret())
    }

    /// Parse the base URL, normalising it to end with `/` so action paths join beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        let mut raw = self.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| Error::Config(format!("Invalid base URL: {e}")))
    }

    fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::Config(format!("Invalid configuration: {e}")))
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{name}: {e}")))
}
