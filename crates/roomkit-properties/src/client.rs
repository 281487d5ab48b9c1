//! Asynchronous property client.

use crate::models::{CreatePropertyRequest, Property, PropertyQuery, UpdatePropertyRequest};
use crate::Result;
use roomkit_core::config::ApiClientConfig;
use roomkit_core::id::PropertyId;
use roomkit_core::resource::ResourceClient;
use roomkit_core::types::SyncJob;
use roomkit_core::{ApiClient, HttpApiClient, PaginatedResponse, RequestOptions, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Resource path of properties.
pub const RESOURCE: &str = "property";

#[derive(Serialize)]
struct SyncParams {
    id: PropertyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    force: Option<bool>,
}

/// Client for the `property` resource.
#[derive(Debug, Clone)]
pub struct PropertiesClient {
    inner: ResourceClient<Property, PropertyId>,
}

impl PropertiesClient {
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

    /// List properties.
    pub async fn query(&self, query: &PropertyQuery) -> Result<PaginatedResponse<Property>> {
        self.inner.query(&query.to_query()).await
    }

    /// List every property matching `query`, following pagination.
    pub async fn query_all(&self, query: &PropertyQuery) -> Result<Vec<Property>> {
        self.inner.query_all(&query.to_query()).await
    }

    /// Fetch one property.
    pub async fn fetch(&self, id: PropertyId) -> Result<Response<Property>> {
        self.inner.fetch(id).await
    }

    /// Create a property.
    pub async fn create(&self, request: &CreatePropertyRequest) -> Result<Response<Property>> {
        info!(name = %request.name, "Creating property");
        self.inner.create(request).await
    }

    /// Update a property.
    pub async fn update(
        &self,
        id: PropertyId,
        request: &UpdatePropertyRequest,
    ) -> Result<Response<Property>> {
        self.inner.update(id, request).await
    }

    /// Delete a property.
    pub async fn delete(&self, id: PropertyId) -> Result<Response<()>> {
        info!(property_id = %id, "Deleting property");
        self.inner.delete(id).await
    }

    /// Push the property to every connected channel.
    ///
    /// `force` re-sends content the platform considers unchanged.
    pub async fn sync(&self, id: PropertyId, force: bool) -> Result<Response<SyncJob>> {
        info!(property_id = %id, force, "Queueing property sync");
        let params = SyncParams {
            id,
            force: force.then_some(true),
        };
        self.inner.action("sync", &params).await
    }
}
