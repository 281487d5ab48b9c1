//! Asynchronous payment method client.

use crate::models::{PaymentMethod, PaymentMethodQuery};
use crate::Result;
use roomkit_core::config::ApiClientConfig;
use roomkit_core::id::PaymentMethodId;
use roomkit_core::resource::ResourceClient;
use roomkit_core::{ApiClient, HttpApiClient, PaginatedResponse, RequestOptions, Response};
use std::sync::Arc;
use tracing::info;

/// Resource path of payment methods.
pub const RESOURCE: &str = "payment-method";

/// Client for the `payment-method` resource.
///
/// Payment methods are created by provider onboarding flows such as
/// [`StripeConnector`](crate::stripe::StripeConnector), never directly.
#[derive(Debug, Clone)]
pub struct PaymentMethodsClient {
    inner: ResourceClient<PaymentMethod, PaymentMethodId>,
}

impl PaymentMethodsClient {
    /// Wrap a shared transport.
    #[must_use]
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            inner: ResourceClient::new(api, RESOURCE),
        }
    }

    /// Build a client with its own HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`roomkit_core::Error::Config`] when the configuration is invalid.
    pub fn from_config(config: ApiClientConfig) -> Result<Self> {
        Ok(Self::new(HttpApiClient::new(config)?.into_shared()))
    }

    /// Apply `options` to every call.
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.inner = self.inner.with_options(options);
        self
    }

    /// List payment methods.
    pub async fn query(
        &self,
        query: &PaymentMethodQuery,
    ) -> Result<PaginatedResponse<PaymentMethod>> {
        self.inner.query(&query.to_query()).await
    }

    /// Fetch one payment method.
    pub async fn fetch(&self, id: PaymentMethodId) -> Result<Response<PaymentMethod>> {
        self.inner.fetch(id).await
    }

    /// Disconnect a payment method.
    pub async fn delete(&self, id: PaymentMethodId) -> Result<Response<()>> {
        info!(payment_method_id = %id, "Disconnecting payment method");
        self.inner.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentProvider;
    use roomkit_core::Error;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> PaymentMethodsClient {
        let config = ApiClientConfig::new(server.uri())
            .unwrap()
            .with_max_retries(0);
        PaymentMethodsClient::from_config(config).unwrap()
    }

    #[tokio::test]
    async fn fetch_payment_method() {
        let server = MockServer::start().await;
        let id = PaymentMethodId::new_v4();
        Mock::given(method("POST"))
            .and(path("/payment-method/fetch"))
            .and(body_json(json!({"id": id})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": id, "provider": "paypal", "status": "pending"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let method = client(&server).fetch(id).await.unwrap().into_data();
        assert_eq!(method.provider, PaymentProvider::Paypal);
        assert!(!method.is_usable());
    }

    #[tokio::test]
    async fn delete_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment-method/delete"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client(&server)
            .delete(PaymentMethodId::new_v4())
            .await
            .unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn malformed_page_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment-method/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let err = client(&server)
            .query(&PaymentMethodQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
