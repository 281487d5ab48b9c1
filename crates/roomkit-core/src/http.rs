//! reqwest-backed [`ApiClient`] implementation.

use crate::client::{
    ApiClient, ApiRequest, AuthErrorEvent, AuthErrorHandler, ClientConfig, RequestOptions,
    RetryPolicy,
};
use crate::config::ApiClientConfig;
use crate::response::RawResponse;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, RwLock};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

const USER_AGENT: &str = concat!("roomkit/", env!("CARGO_PKG_VERSION"));

/// Header carrying the account the call acts on.
pub const ACCOUNT_HEADER: &str = "x-account-id";

/// Builder for [`HttpApiClient`].
#[derive(Clone)]
pub struct HttpApiClientBuilder {
    config: ApiClientConfig,
    http_config: ClientConfig,
    user_agent: String,
    auth_error_handler: Option<AuthErrorHandler>,
}

impl HttpApiClientBuilder {
    /// Create a new builder from an [`ApiClientConfig`].
    #[must_use]
    pub fn new(config: ApiClientConfig) -> Self {
        let http_config = ClientConfig::new()
            .with_timeout(config.timeout())
            .with_retry_policy(RetryPolicy::new().with_max_retries(config.max_retries));

        Self {
            config,
            http_config,
            user_agent: USER_AGENT.to_string(),
            auth_error_handler: None,
        }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.http_config = self.http_config.with_retry_policy(retry);
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Install the authentication failure callback up front.
    #[must_use]
    pub fn with_auth_error_handler(mut self, handler: AuthErrorHandler) -> Self {
        self.auth_error_handler = Some(handler);
        self
    }

    /// Finalise the builder and create the [`HttpApiClient`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the base URL or credentials cannot be encoded,
    /// or the underlying HTTP client cannot be built.
    pub fn build(self) -> Result<HttpApiClient> {
        let base_url = self.config.parse_base_url()?;
        let http_config = self.http_config;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = self.config.token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| Error::Config(format!("Invalid API token: {err}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        if let Some(account_id) = self.config.account_id {
            let value = HeaderValue::from_str(&account_id.to_string())
                .map_err(|err| Error::Config(format!("Invalid account id: {err}")))?;
            headers.insert(HeaderName::from_static(ACCOUNT_HEADER), value);
        }

        let mut builder = ClientBuilder::new()
            .user_agent(self.user_agent)
            .default_headers(headers)
            .timeout(http_config.timeout)
            .connect_timeout(http_config.connect_timeout)
            .pool_idle_timeout(http_config.pool.idle_timeout)
            .pool_max_idle_per_host(http_config.pool.max_idle_per_host)
            .gzip(http_config.gzip)
            .redirect(Policy::none());

        if !self.config.tls_verify {
            warn!("TLS verification disabled for Roomkit client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|err| Error::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpApiClient {
            http,
            base_url,
            retry_policy: http_config.retry_policy,
            auth_error_handler: Arc::new(RwLock::new(self.auth_error_handler)),
        })
    }
}

impl fmt::Debug for HttpApiClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApiClientBuilder")
            .field("config", &self.config)
            .field("http_config", &self.http_config)
            .field("user_agent", &self.user_agent)
            .field("auth_error_handler", &self.auth_error_handler.is_some())
            .finish()
    }
}

/// Asynchronous [`ApiClient`] speaking JSON over HTTP.
///
/// Clones share the connection pool and the authentication failure callback.
#[derive(Clone)]
pub struct HttpApiClient {
    http: Client,
    base_url: Url,
    retry_policy: RetryPolicy,
    auth_error_handler: Arc<RwLock<Option<AuthErrorHandler>>>,
}

impl HttpApiClient {
    /// Construct a client directly from the configuration.
    ///
    /// # Errors
    ///
    /// See [`HttpApiClientBuilder::build`].
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        HttpApiClientBuilder::new(config).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: ApiClientConfig) -> HttpApiClientBuilder {
        HttpApiClientBuilder::new(config)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the retry policy applied to retry-safe calls.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Wrap the client for sharing between resource clients.
    #[must_use]
    pub fn into_shared(self) -> Arc<dyn ApiClient> {
        Arc::new(self)
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        let trimmed = path.trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(Error::InvalidEndpoint("empty action path".to_string()));
        }
        self.base_url
            .join(trimmed)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid action path `{path}`: {err}")))
    }

    fn notify_auth_error(&self, event: &AuthErrorEvent) {
        // Clone out of the lock so the handler may replace itself.
        let handler = self
            .auth_error_handler
            .read()
            .ok()
            .and_then(|slot| slot.clone());

        if let Some(handler) = handler {
            handler(event);
        }
    }

    async fn send_once(
        &self,
        path: &str,
        url: &Url,
        params: &Value,
        options: &RequestOptions,
    ) -> Result<RawResponse> {
        let mut request = self.http.post(url.clone()).json(params);

        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        if status.is_success() {
            let bytes = response.bytes().await?;
            let body = if bytes.iter().all(u8::is_ascii_whitespace) {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).map_err(|err| {
                    Error::Decode(format!("Failed to parse response for `{path}`: {err}"))
                })?
            };

            return Ok(RawResponse {
                status: status.as_u16(),
                headers,
                body,
            });
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            warn!(path, status = status.as_u16(), "Authentication rejected");
            self.notify_auth_error(&AuthErrorEvent {
                path: path.to_string(),
                status: status.as_u16(),
                message: message.clone(),
            });
        }

        Err(Error::from_status(status, message))
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn request(&self, path: &str, request: ApiRequest) -> Result<RawResponse> {
        let url = self.build_url(path)?;
        let ApiRequest { params, options } = request;
        let max_retries = if options.retry_safe {
            self.retry_policy.max_retries
        } else {
            0
        };

        let mut attempt = 0;
        loop {
            info!(path, attempt, "Sending request");

            let error = match self.send_once(path, &url, &params, &options).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if !error.is_retryable() || attempt >= max_retries {
                if error.should_log() {
                    warn!(path, %error, "Request failed");
                }
                return Err(error);
            }

            attempt += 1;
            let delay = self.retry_policy.backoff(attempt);
            if !delay.is_zero() {
                debug!(path, attempt, ?delay, %error, "Retrying request");
                sleep(delay).await;
            }
        }
    }

    fn set_on_auth_error_handler(&self, handler: Option<AuthErrorHandler>) {
        if let Ok(mut slot) = self.auth_error_handler.write() {
            *slot = handler;
        }
    }
}

impl fmt::Debug for HttpApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}
