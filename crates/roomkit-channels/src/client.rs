//! Asynchronous channel client.

use crate::models::{
    AttachPropertyRequest, Channel, ChannelQuery, CreateChannelRequest, UpdateChannelRequest,
};
use crate::Result;
use roomkit_core::config::ApiClientConfig;
use roomkit_core::id::{ChannelId, PropertyId};
use roomkit_core::resource::ResourceClient;
use roomkit_core::types::SyncJob;
use roomkit_core::{ApiClient, HttpApiClient, PaginatedResponse, RequestOptions, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Resource path of channels.
pub const RESOURCE: &str = "channel";

#[derive(Serialize)]
struct ChannelScope {
    id: ChannelId,
    #[serde(skip_serializing_if = "Option::is_none")]
    property_id: Option<PropertyId>,
}

/// Client for the `channel` resource.
#[derive(Debug, Clone)]
pub struct ChannelsClient {
    inner: ResourceClient<Channel, ChannelId>,
}

impl ChannelsClient {
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

    /// List channels.
    pub async fn query(&self, query: &ChannelQuery) -> Result<PaginatedResponse<Channel>> {
        self.inner.query(&query.to_query()).await
    }

    /// Fetch one channel.
    pub async fn fetch(&self, id: ChannelId) -> Result<Response<Channel>> {
        self.inner.fetch(id).await
    }

    /// Connect a channel.
    pub async fn create(&self, request: &CreateChannelRequest) -> Result<Response<Channel>> {
        self.inner.create(request).await
    }

    /// Rename a channel.
    pub async fn update(
        &self,
        id: ChannelId,
        request: &UpdateChannelRequest,
    ) -> Result<Response<Channel>> {
        self.inner.update(id, request).await
    }

    /// Disconnect and delete a channel.
    pub async fn delete(&self, id: ChannelId) -> Result<Response<()>> {
        info!(channel_id = %id, "Deleting channel");
        self.inner.delete(id).await
    }

    /// Sync the channel, or only one of its listings when `property_id` is given.
    pub async fn sync(
        &self,
        id: ChannelId,
        property_id: Option<PropertyId>,
    ) -> Result<Response<SyncJob>> {
        info!(channel_id = %id, ?property_id, "Queueing channel sync");
        self.inner
            .action("sync", &ChannelScope { id, property_id })
            .await
    }

    /// List a property on a channel.
    pub async fn attach(&self, request: &AttachPropertyRequest) -> Result<Response<Channel>> {
        info!(
            channel_id = %request.channel_id,
            property_id = %request.property_id,
            "Attaching property to channel"
        );
        self.inner.action("attach", request).await
    }

    /// Remove one property from a channel, or every listing when `property_id` is `None`.
    pub async fn unlink(
        &self,
        id: ChannelId,
        property_id: Option<PropertyId>,
    ) -> Result<Response<Channel>> {
        info!(channel_id = %id, ?property_id, "Unlinking channel");
        self.inner
            .action("unlink", &ChannelScope { id, property_id })
            .await
    }
}
