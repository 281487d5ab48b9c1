//! The shared `ApiClient` abstraction and transport settings.
//!
//! Every resource client delegates to an [`ApiClient`]: one `request` operation that
//! sends `"<resource>/<action>"` with a JSON body, plus an injectable callback for
//! authentication failures. [`RetryPolicy`] and [`ClientConfig`] configure the
//! reqwest implementation in [`crate::http`].

use crate::response::RawResponse;
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Request timeout applied when neither the configuration nor the call sets one.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// TCP connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Retries of a retry-safe call after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);

/// Backoff between attempts of a retry-safe call.
///
/// The wait before retry `n` is `base_delay * 2^(n-1)`, capped at `max_delay`.
/// Only calls flagged [`RequestOptions::retry_safe`] are retried, and only for
/// errors where [`Error::is_retryable`](crate::Error::is_retryable) holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; zero disables retrying
    pub max_retries: u32,
    /// Wait before the first retry
    pub base_delay: Duration,
    /// Upper bound for any single wait
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Three retries starting at 500 ms, capped at 5 s.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Set the retry count.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the first wait.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the cap on a single wait.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Wait before retry number `retry` (1-based); zero for the first attempt.
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = 1_u32.checked_shl(retry - 1).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Connection pool tuning of the reqwest client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// How long an idle connection is kept
    pub idle_timeout: Duration,
    /// Idle connections kept per host
    pub max_idle_per_host: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(90),
            max_idle_per_host: 10,
        }
    }
}

/// Transport settings of [`HttpApiClient`](crate::http::HttpApiClient).
///
/// [`ApiClientConfig`](crate::config::ApiClientConfig) covers what deployments
/// usually change; this struct holds the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Backoff for retry-safe calls
    pub retry_policy: RetryPolicy,
    /// Connection pool
    pub pool: PoolConfig,
    /// Ask for gzip-compressed responses
    pub gzip: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            retry_policy: RetryPolicy::default(),
            pool: PoolConfig::default(),
            gzip: true,
        }
    }
}

impl ClientConfig {
    /// Default transport settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the whole-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Replace the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Replace the pool settings.
    #[must_use]
    pub const fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Toggle gzip.
    #[must_use]
    pub const fn with_gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }
}

/// Per-call options forwarded alongside the params.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Overrides the client-wide request timeout for this call
    pub timeout: Option<Duration>,

    /// Extra headers sent with this call only
    pub headers: Vec<(String, String)>,

    /// Whether the call may be repeated on transient failures.
    ///
    /// Set by the resource template for `query` and `fetch`; mutating actions
    /// stay unset unless the caller knows the action is idempotent.
    pub retry_safe: bool,
}

impl RequestOptions {
    /// Options with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a per-call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header for this call.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Mark the call as safe to retry.
    #[must_use]
    pub const fn retry_safe(mut self, safe: bool) -> Self {
        self.retry_safe = safe;
        self
    }
}

/// A single call: JSON params plus transport options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRequest {
    /// JSON body sent to the action endpoint
    pub params: Value,
    /// Transport options
    pub options: RequestOptions,
}

impl ApiRequest {
    /// Create a request from already-encoded params.
    #[must_use]
    pub fn new(params: Value) -> Self {
        Self {
            params,
            options: RequestOptions::default(),
        }
    }

    /// Encode `params` into a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::Error::Decode) if `params` cannot be represented as JSON.
    pub fn from_params<P>(params: &P) -> Result<Self>
    where
        P: Serialize + ?Sized,
    {
        Ok(Self::new(serde_json::to_value(params)?))
    }

    /// Replace the transport options.
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Details passed to the [`AuthErrorHandler`] when the platform rejects credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthErrorEvent {
    /// Action path of the rejected call, e.g. `booking/query`
    pub path: String,
    /// HTTP status (401 or 403)
    pub status: u16,
    /// Response body, if any
    pub message: String,
}

/// Callback invoked on authentication failures.
///
/// Typical handlers refresh a token or route the user back to sign-in.
pub type AuthErrorHandler = Arc<dyn Fn(&AuthErrorEvent) + Send + Sync>;

/// Transport shared by every resource client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Send one action call to `path` (`"<resource>/<action>"`).
    ///
    /// # Errors
    ///
    /// Returns the classified transport or status error. Authentication failures
    /// invoke the installed [`AuthErrorHandler`] before returning
    /// [`Error::Unauthorized`](crate::Error::Unauthorized).
    async fn request(&self, path: &str, request: ApiRequest) -> Result<RawResponse>;

    /// Install or clear the authentication failure callback.
    fn set_on_auth_error_handler(&self, handler: Option<AuthErrorHandler>);
}

impl fmt::Debug for dyn ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn ApiClient")
    }
}
