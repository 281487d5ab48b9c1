//! Stripe Connect onboarding flow.
//!
//! The host completes Stripe onboarding in a separate window (a browser popup,
//! a system browser tab, a webview). The flow opens that window at the connect
//! URL, waits for it to close, then checks once whether the platform now holds
//! a Stripe payment method:
//!
//! 1. [`StripeConnectConfig::connect_url`] builds the URL.
//! 2. The caller's opener turns it into a [`ConnectionWindow`].
//! 3. [`StripeConnector::connect`] polls [`ConnectionWindow::is_closed`] every
//!    [`POLL_INTERVAL`] and then issues a single `payment-method/query`.
//!
//! Dropping the future returned by `connect` abandons the flow without closing
//! the window.

use crate::client::PaymentMethodsClient;
use crate::models::{PaymentMethod, PaymentMethodQuery, PaymentProvider};
use crate::Result;
use roomkit_core::id::PropertyId;
use roomkit_core::Error;
use std::time::Duration;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use url::Url;

/// Interval between two checks of the connection window.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Platform endpoint that redirects to Stripe's OAuth consent screen.
pub const STRIPE_CONNECT_URL: &str = "https://app.roomkit.io/integrations/stripe/connect";

/// A window the host completes Stripe onboarding in.
pub trait ConnectionWindow {
    /// Whether the host has closed the window (or it closed itself after the redirect).
    fn is_closed(&self) -> bool;

    /// Close the window.
    fn close(&mut self);
}

/// Result of a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// A Stripe payment method exists after the window closed.
    Connected(PaymentMethod),
    /// The window closed without a Stripe payment method being created.
    NotConnected,
    /// The window stayed open past the configured timeout and was closed.
    TimedOut,
}

impl ConnectionOutcome {
    /// Whether Stripe is connected.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

/// Parameters of the connect URL and of the wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeConnectConfig {
    redirect_url: String,
    state: String,
    return_to: Option<String>,
    property_id: Option<PropertyId>,
    timeout: Option<Duration>,
}

impl StripeConnectConfig {
    /// Flow against the platform's connect endpoint.
    ///
    /// `state` is echoed back by the platform after the OAuth redirect and should be
    /// an unguessable per-attempt value.
    #[must_use]
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            redirect_url: STRIPE_CONNECT_URL.to_string(),
            state: state.into(),
            return_to: None,
            property_id: None,
            timeout: None,
        }
    }

    /// Use a different connect endpoint, e.g. a staging deployment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] when `url` does not parse.
    pub fn with_redirect_url(mut self, url: &str) -> Result<Self> {
        Url::parse(url)?;
        self.redirect_url = url.to_string();
        Ok(self)
    }

    /// Page the platform sends the window to once onboarding completes.
    #[must_use]
    pub fn with_return_to(mut self, return_to: impl Into<String>) -> Self {
        self.return_to = Some(return_to.into());
        self
    }

    /// Connect Stripe for one property instead of the whole account.
    #[must_use]
    pub const fn for_property(mut self, property_id: PropertyId) -> Self {
        self.property_id = Some(property_id);
        self
    }

    /// Give up and close the window after `limit`.
    #[must_use]
    pub const fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Property the flow is scoped to.
    #[must_use]
    pub const fn property_id(&self) -> Option<PropertyId> {
        self.property_id
    }

    /// The URL to open in the connection window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the redirect URL does not parse.
    pub fn connect_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.redirect_url)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("state", &self.state);
            if let Some(return_to) = &self.return_to {
                pairs.append_pair("return_to", return_to);
            }
            if let Some(property_id) = self.property_id {
                pairs.append_pair("property_id", &property_id.to_string());
            }
        }
        Ok(url)
    }
}

/// Runs the Stripe connection flow against the payment method resource.
#[derive(Debug, Clone)]
pub struct StripeConnector {
    methods: PaymentMethodsClient,
    config: StripeConnectConfig,
}

impl StripeConnector {
    /// Create a connector.
    #[must_use]
    pub const fn new(methods: PaymentMethodsClient, config: StripeConnectConfig) -> Self {
        Self { methods, config }
    }

    /// The flow configuration.
    #[must_use]
    pub const fn config(&self) -> &StripeConnectConfig {
        &self.config
    }

    /// Open the connection window with `open` and wait for the outcome.
    ///
    /// # Errors
    ///
    /// Returns the opener's error, or the error of the `payment-method/query`
    /// issued after the window closes. The query is not retried beyond the
    /// transport's read retries.
    pub async fn connect<W, F>(&self, open: F) -> Result<ConnectionOutcome>
    where
        W: ConnectionWindow,
        F: FnOnce(&Url) -> Result<W>,
    {
        let url = self.config.connect_url()?;
        info!(property_id = ?self.config.property_id, "Opening Stripe connection window");
        let mut window = open(&url)?;

        if let Some(limit) = self.config.timeout {
            let closed = timeout(limit, wait_until_closed(&window)).await.is_ok();
            if !closed {
                warn!(timeout = ?limit, "Stripe connection window timed out");
                window.close();
                return Ok(ConnectionOutcome::TimedOut);
            }
        } else {
            wait_until_closed(&window).await;
        }

        self.check_connection().await
    }

    /// Look up the Stripe payment method for the configured scope.
    ///
    /// # Errors
    ///
    /// Returns the query error after logging it.
    pub async fn check_connection(&self) -> Result<ConnectionOutcome> {
        let query = PaymentMethodQuery {
            provider: Some(PaymentProvider::Stripe),
            property_id: self.config.property_id,
            ..PaymentMethodQuery::default()
        };

        let page = self.methods.query(&query).await.map_err(|err: Error| {
            warn!(error = %err, "Failed to check Stripe connection");
            err
        })?;

        match page.into_data().into_iter().next() {
            Some(method) => {
                info!(payment_method_id = %method.id, "Stripe connected");
                Ok(ConnectionOutcome::Connected(method))
            }
            None => {
                info!("Stripe connection window closed without a payment method");
                Ok(ConnectionOutcome::NotConnected)
            }
        }
    }
}

async fn wait_until_closed<W: ConnectionWindow>(window: &W) {
    let mut ticker = interval_at(Instant::now() + POLL_INTERVAL, POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut polls: u64 = 0;

    loop {
        ticker.tick().await;
        polls += 1;
        if window.is_closed() {
            debug!(polls, "Connection window closed");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use roomkit_core::client::{ApiClient, ApiRequest, AuthErrorHandler};
    use roomkit_core::id::PaymentMethodId;
    use roomkit_core::response::RawResponse;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<(String, Value)>>,
        reply: Mutex<Option<Result<RawResponse>>>,
    }

    impl RecordingApi {
        fn replying(reply: Result<RawResponse>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                reply: Mutex::new(Some(reply)),
            })
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiClient for RecordingApi {
        async fn request(&self, path: &str, request: ApiRequest) -> Result<RawResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((path.to_string(), request.params));
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(Error::Http("unexpected extra call".into())))
        }

        fn set_on_auth_error_handler(&self, _handler: Option<AuthErrorHandler>) {}
    }

    struct TimedWindow {
        closes_at: Option<Instant>,
        checks: Arc<AtomicUsize>,
        closed_by_flow: Arc<AtomicUsize>,
    }

    impl TimedWindow {
        fn closing_after(delay: Option<Duration>) -> Self {
            Self {
                closes_at: delay.map(|delay| Instant::now() + delay),
                checks: Arc::new(AtomicUsize::new(0)),
                closed_by_flow: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl ConnectionWindow for TimedWindow {
        fn is_closed(&self) -> bool {
            self.checks.fetch_add(1, Ordering::SeqCst);
            self.closes_at
                .is_some_and(|closes_at| Instant::now() >= closes_at)
        }

        fn close(&mut self) {
            self.closed_by_flow.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn page(data: Vec<Value>) -> RawResponse {
        let total = data.len();
        RawResponse::from_body(
            200,
            json!({
                "data": data,
                "meta": {"current_page": 1, "per_page": 50, "total": total, "last_page": 1}
            }),
        )
    }

    fn connector(api: Arc<RecordingApi>, config: StripeConnectConfig) -> StripeConnector {
        StripeConnector::new(PaymentMethodsClient::new(api), config)
    }

    #[test]
    fn connect_url_carries_state_and_return_path() {
        let property_id = PropertyId::new_v4();
        let url = StripeConnectConfig::new("st-42")
            .with_return_to("/settings/payments")
            .for_property(property_id)
            .connect_url()
            .unwrap();

        assert!(url.as_str().starts_with(STRIPE_CONNECT_URL));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("state".to_string(), "st-42".to_string()),
                ("return_to".to_string(), "/settings/payments".to_string()),
                ("property_id".to_string(), property_id.to_string()),
            ]
        );
    }

    #[test]
    fn invalid_redirect_url() {
        let err = StripeConnectConfig::new("s")
            .with_redirect_url("not a url")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn polls_every_interval_then_queries_once() {
        let method_id = PaymentMethodId::new_v4();
        let api = RecordingApi::replying(Ok(page(vec![json!({
            "id": method_id,
            "provider": "stripe",
            "status": "active",
            "account_reference": "acct_123"
        })])));
        let window = TimedWindow::closing_after(Some(Duration::from_secs(1)));
        let checks = Arc::clone(&window.checks);
        let closed_by_flow = Arc::clone(&window.closed_by_flow);

        let outcome = connector(Arc::clone(&api), StripeConnectConfig::new("state"))
            .connect(|url| {
                assert!(url.query().unwrap_or_default().contains("state=state"));
                Ok(window)
            })
            .await
            .unwrap();

        match outcome {
            ConnectionOutcome::Connected(method) => assert_eq!(method.id, method_id),
            other => panic!("expected Connected, got {other:?}"),
        }
        // checks at 200, 400, 600, 800 and 1000 ms
        assert_eq!(checks.load(Ordering::SeqCst), 5);
        assert_eq!(closed_by_flow.load(Ordering::SeqCst), 0);

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "payment-method/query");
        assert_eq!(calls[0].1, json!({"filters": {"provider": "stripe"}}));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_is_not_connected() {
        let property_id = PropertyId::new_v4();
        let api = RecordingApi::replying(Ok(page(Vec::new())));

        let outcome = connector(
            Arc::clone(&api),
            StripeConnectConfig::new("state").for_property(property_id),
        )
        .connect(|_| Ok(TimedWindow::closing_after(Some(Duration::ZERO))))
        .await
        .unwrap();

        assert_eq!(outcome, ConnectionOutcome::NotConnected);
        assert_eq!(
            api.calls()[0].1,
            json!({"filters": {"provider": "stripe", "property_id": property_id}})
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_closes_window_without_querying() {
        let api = RecordingApi::replying(Ok(page(Vec::new())));
        let window = TimedWindow::closing_after(None);
        let closed_by_flow = Arc::clone(&window.closed_by_flow);

        let outcome = connector(
            Arc::clone(&api),
            StripeConnectConfig::new("state").with_timeout(Duration::from_secs(30)),
        )
        .connect(|_| Ok(window))
        .await
        .unwrap();

        assert_eq!(outcome, ConnectionOutcome::TimedOut);
        assert_eq!(closed_by_flow.load(Ordering::SeqCst), 1);
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn query_failure_is_returned() {
        let api = RecordingApi::replying(Err(Error::ServiceUnavailable {
            status: Some(503),
            message: "down".into(),
        }));

        let err = connector(Arc::clone(&api), StripeConnectConfig::new("state"))
            .connect(|_| Ok(TimedWindow::closing_after(Some(Duration::ZERO))))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert!(err.is_retryable());
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn opener_failure_skips_polling() {
        let api = RecordingApi::replying(Ok(page(Vec::new())));

        let err = connector(Arc::clone(&api), StripeConnectConfig::new("state"))
            .connect(|_| -> Result<TimedWindow> { Err(Error::Config("popup blocked".into())) })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_flow_leaves_window_open() {
        let api = RecordingApi::replying(Ok(page(Vec::new())));
        let window = TimedWindow::closing_after(None);
        let checks = Arc::clone(&window.checks);
        let closed_by_flow = Arc::clone(&window.closed_by_flow);
        let connector = connector(Arc::clone(&api), StripeConnectConfig::new("state"));

        let abandoned =
            timeout(Duration::from_millis(1100), connector.connect(|_| Ok(window))).await;

        assert!(abandoned.is_err());
        assert_eq!(checks.load(Ordering::SeqCst), 5);
        assert_eq!(closed_by_flow.load(Ordering::SeqCst), 0);
        assert!(api.calls().is_empty());
    }
}
