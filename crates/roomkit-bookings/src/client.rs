//! Asynchronous booking client.

use crate::models::{
    Booking, BookingQuery, CancelBookingRequest, CreateBookingRequest, UpdateBookingRequest,
};
use crate::Result;
use roomkit_core::config::ApiClientConfig;
use roomkit_core::id::BookingId;
use roomkit_core::resource::ResourceClient;
use roomkit_core::{ApiClient, HttpApiClient, PaginatedResponse, RequestOptions, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Resource path of bookings.
pub const RESOURCE: &str = "booking";

#[derive(Serialize)]
struct CancelParams<'a> {
    id: BookingId,
    #[serde(flatten)]
    request: &'a CancelBookingRequest,
}

/// Client for the `booking` resource.
#[derive(Debug, Clone)]
pub struct BookingsClient {
    inner: ResourceClient<Booking, BookingId>,
}

impl BookingsClient {
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

    /// List bookings.
    pub async fn query(&self, query: &BookingQuery) -> Result<PaginatedResponse<Booking>> {
        self.inner.query(&query.to_query()).await
    }

    /// List every booking matching `query`.
    pub async fn query_all(&self, query: &BookingQuery) -> Result<Vec<Booking>> {
        self.inner.query_all(&query.to_query()).await
    }

    /// Fetch one booking.
    pub async fn fetch(&self, id: BookingId) -> Result<Response<Booking>> {
        self.inner.fetch(id).await
    }

    /// Create a booking.
    ///
    /// The request is validated locally first; an invalid stay or guest never
    /// reaches the platform.
    pub async fn create(&self, request: &CreateBookingRequest) -> Result<Response<Booking>> {
        request.validate()?;
        info!(
            property_id = %request.property_id,
            check_in = %request.check_in,
            check_out = %request.check_out,
            "Creating booking"
        );
        self.inner.create(request).await
    }

    /// Update a booking.
    pub async fn update(
        &self,
        id: BookingId,
        request: &UpdateBookingRequest,
    ) -> Result<Response<Booking>> {
        self.inner.update(id, request).await
    }

    /// Delete a booking record. Use [`cancel`](Self::cancel) for guest-facing cancellations.
    pub async fn delete(&self, id: BookingId) -> Result<Response<()>> {
        self.inner.delete(id).await
    }

    /// Cancel a booking and return it in its cancelled state.
    pub async fn cancel(
        &self,
        id: BookingId,
        request: &CancelBookingRequest,
    ) -> Result<Response<Booking>> {
        info!(booking_id = %id, notify_guest = request.notify_guest, "Cancelling booking");
        self.inner
            .action("cancel", &CancelParams { id, request })
            .await
    }
}
