//! Generic resource client.
//!
//! Every platform resource exposes the same action family under its path:
//! `<resource>/query`, `fetch`, `create`, `update`, `delete`, plus resource-specific
//! actions. [`ResourceClient`] implements that family once; the resource crates wrap
//! it with their record type, id type, and extra actions.

use crate::client::{ApiClient, ApiRequest, RequestOptions};
use crate::id::ResourceId;
use crate::query::QueryRequest;
use crate::response::{PaginatedResponse, RawResponse, Response};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Upper bound on pages walked by [`ResourceClient::query_all`].
pub const MAX_QUERY_ALL_PAGES: u32 = 1000;

/// A named backend operation under a resource path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Filtered, paginated list
    Query,
    /// Single record by id
    Fetch,
    /// Create a record
    Create,
    /// Update a record by id
    Update,
    /// Delete a record by id
    Delete,
    /// Resource-specific action, e.g. `sync` or `attach`
    Custom(&'static str),
}

impl Action {
    /// Path segment of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Custom(name) => *name,
        }
    }

    /// Whether the action only reads; read-only actions are retried on transient failures.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        matches!(self, Self::Query | Self::Fetch)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct IdParams<I> {
    id: I,
}

#[derive(Serialize)]
struct WithId<'a, I, B: ?Sized> {
    id: I,
    #[serde(flatten)]
    payload: &'a B,
}

/// Client for one resource path, typed by its record `T` and id `I`.
pub struct ResourceClient<T, I> {
    api: Arc<dyn ApiClient>,
    resource: &'static str,
    options: RequestOptions,
    _marker: PhantomData<fn() -> (T, I)>,
}

impl<T, I> Clone for ResourceClient<T, I> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            resource: self.resource,
            options: self.options.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, I> fmt::Debug for ResourceClient<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("resource", &self.resource)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T, I> ResourceClient<T, I>
where
    T: DeserializeOwned,
    I: ResourceId,
{
    /// Create a client for `resource` (e.g. `"property"`).
    #[must_use]
    pub fn new(api: Arc<dyn ApiClient>, resource: &'static str) -> Self {
        Self {
            api,
            resource,
            options: RequestOptions::default(),
            _marker: PhantomData,
        }
    }

    /// Apply `options` to every call made through this client.
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Resource path segment.
    #[must_use]
    pub const fn resource(&self) -> &'static str {
        self.resource
    }

    /// The shared transport.
    #[must_use]
    pub fn api(&self) -> &Arc<dyn ApiClient> {
        &self.api
    }

    /// Full action path, e.g. `property/query`.
    #[must_use]
    pub fn path(&self, action: Action) -> String {
        format!("{}/{}", self.resource, action.as_str())
    }

    /// List records matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for out-of-range paging before anything is sent,
    /// otherwise the transport or decode error.
    pub async fn query(&self, query: &QueryRequest) -> Result<PaginatedResponse<T>> {
        query.validated()?;
        self.send(Action::Query, serde_json::to_value(query)?)
            .await?
            .into_paginated()
    }

    /// Walk every page of `query` starting at its `page` (default 1).
    ///
    /// # Errors
    ///
    /// Fails on the first failing page, or with [`Error::Validation`] when the result
    /// spans more than [`MAX_QUERY_ALL_PAGES`] pages.
    pub async fn query_all(&self, query: &QueryRequest) -> Result<Vec<T>> {
        let mut current = query.clone().page(query.page.unwrap_or(1));
        let mut records = Vec::new();

        for _ in 0..MAX_QUERY_ALL_PAGES {
            let page = self.query(&current).await?;
            let next = page.meta.next_page();
            debug!(
                resource = self.resource,
                page = page.meta.current_page,
                last_page = page.meta.last_page,
                "Fetched page"
            );
            records.extend(page.data);

            match next {
                Some(next) => current = current.page(next),
                None => return Ok(records),
            }
        }

        Err(Error::validation(format!(
            "{} query spans more than {MAX_QUERY_ALL_PAGES} pages; narrow the filters",
            self.resource
        )))
    }

    /// Fetch a single record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the record does not exist.
    pub async fn fetch(&self, id: I) -> Result<Response<T>> {
        self.send(Action::Fetch, serde_json::to_value(IdParams { id })?)
            .await?
            .into_response()
    }

    /// Create a record from `payload`.
    ///
    /// # Errors
    ///
    /// Returns the transport or decode error.
    pub async fn create<B>(&self, payload: &B) -> Result<Response<T>>
    where
        B: Serialize + ?Sized,
    {
        self.send(Action::Create, serde_json::to_value(payload)?)
            .await?
            .into_response()
    }

    /// Update a record; the payload fields are sent alongside `id`.
    ///
    /// # Errors
    ///
    /// Returns the transport or decode error.
    pub async fn update<B>(&self, id: I, payload: &B) -> Result<Response<T>>
    where
        B: Serialize + ?Sized,
    {
        let params = serde_json::to_value(WithId { id, payload })?;
        self.send(Action::Update, params).await?.into_response()
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn delete(&self, id: I) -> Result<Response<()>> {
        let raw = self
            .send(Action::Delete, serde_json::to_value(IdParams { id })?)
            .await?;
        Ok(raw.into_empty())
    }

    /// Run a resource-specific action returning a record envelope.
    ///
    /// # Errors
    ///
    /// Returns the transport or decode error.
    pub async fn action<B, R>(&self, name: &'static str, payload: &B) -> Result<Response<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Action::Custom(name), serde_json::to_value(payload)?)
            .await?
            .into_response()
    }

    /// Run a resource-specific action on one record, returning the updated record.
    ///
    /// # Errors
    ///
    /// Returns the transport or decode error.
    pub async fn record_action(&self, name: &'static str, id: I) -> Result<Response<T>> {
        self.send(Action::Custom(name), serde_json::to_value(IdParams { id })?)
            .await?
            .into_response()
    }

    /// Run a resource-specific action whose response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn action_empty<B>(&self, name: &'static str, payload: &B) -> Result<Response<()>>
    where
        B: Serialize + ?Sized,
    {
        let raw = self
            .send(Action::Custom(name), serde_json::to_value(payload)?)
            .await?;
        Ok(raw.into_empty())
    }

    /// Send raw params to an action.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn send(&self, action: Action, params: Value) -> Result<RawResponse> {
        let mut options = self.options.clone();
        if action.is_read_only() {
            options.retry_safe = true;
        }

        let request = ApiRequest::new(params).with_options(options);
        self.api.request(&self.path(action), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockApiClient;
    use crate::id::PropertyId;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Listing {
        id: PropertyId,
        name: String,
    }

    fn listing_json(id: PropertyId, name: &str) -> Value {
        json!({"id": id, "name": name})
    }

    fn page(data: Vec<Value>, current: u32, last: u32) -> RawResponse {
        RawResponse::from_body(
            200,
            json!({
                "data": data,
                "meta": {"current_page": current, "per_page": 1, "total": last, "last_page": last}
            }),
        )
    }

    fn client(mock: MockApiClient) -> ResourceClient<Listing, PropertyId> {
        ResourceClient::new(Arc::new(mock), "listing")
    }

    #[test]
    fn action_paths() {
        assert_eq!(Action::Query.as_str(), "query");
        assert_eq!(Action::Delete.to_string(), "delete");
        assert_eq!(Action::Custom("upload-image").as_str(), "upload-image");
        assert!(Action::Fetch.is_read_only());
        assert!(!Action::Custom("sync").is_read_only());
        assert!(!Action::Update.is_read_only());
    }

    #[tokio::test]
    async fn query_posts_body_and_marks_retry_safe() {
        let id = PropertyId::new_v4();
        let mut mock = MockApiClient::new();
        mock.expect_request()
            .withf(|path, request| {
                path.to_string() == "listing/query"
                    && request.params == json!({"search": "loft", "page": 1})
                    && request.options.retry_safe
            })
            .times(1)
            .returning(move |_, _| Ok(page(vec![listing_json(id, "Loft")], 1, 1)));

        let result = client(mock)
            .query(&QueryRequest::new().search("loft").page(1))
            .await
            .unwrap();
        assert_eq!(result.data, vec![Listing { id, name: "Loft".into() }]);
        assert!(!result.has_next_page());
    }

    #[tokio::test]
    async fn query_rejects_bad_paging_without_sending() {
        let mut mock = MockApiClient::new();
        mock.expect_request().times(0);

        let err = client(mock)
            .query(&QueryRequest::new().per_page(10_000))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[tokio::test]
    async fn query_all_walks_pages() {
        let first = PropertyId::new_v4();
        let second = PropertyId::new_v4();
        let mut mock = MockApiClient::new();
        let mut sequence = mockall::Sequence::new();

        mock.expect_request()
            .withf(|_, request| request.params["page"] == json!(1))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(move |_, _| Ok(page(vec![listing_json(first, "A")], 1, 2)));
        mock.expect_request()
            .withf(|_, request| request.params["page"] == json!(2))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(move |_, _| Ok(page(vec![listing_json(second, "B")], 2, 2)));

        let all = client(mock).query_all(&QueryRequest::new()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first);
        assert_eq!(all[1].id, second);
    }

    #[tokio::test]
    async fn query_all_stops_at_page_cap() {
        let mut mock = MockApiClient::new();
        mock.expect_request()
            .times(MAX_QUERY_ALL_PAGES as usize)
            .returning(|_, request| {
                let current = request.params["page"].as_u64().unwrap() as u32;
                Ok(page(Vec::new(), current, current + 1))
            });

        let err = client(mock)
            .query_all(&QueryRequest::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { status: None, ref message } if message.contains("listing query")
        ));
    }

    #[tokio::test]
    async fn fetch_sends_id() {
        let id = PropertyId::new_v4();
        let mut mock = MockApiClient::new();
        mock.expect_request()
            .withf(move |path, request| {
                path.to_string() == "listing/fetch"
                    && request.params == json!({"id": id})
                    && request.options.retry_safe
            })
            .times(1)
            .returning(move |_, _| {
                Ok(RawResponse::from_body(
                    200,
                    json!({"data": listing_json(id, "Loft")}),
                ))
            });

        let listing = client(mock).fetch(id).await.unwrap().into_data();
        assert_eq!(listing.name, "Loft");
    }

    #[tokio::test]
    async fn update_flattens_payload_next_to_id() {
        #[derive(Serialize)]
        struct Rename<'a> {
            name: &'a str,
        }

        let id = PropertyId::new_v4();
        let mut mock = MockApiClient::new();
        mock.expect_request()
            .withf(move |path, request| {
                path.to_string() == "listing/update"
                    && request.params == json!({"id": id, "name": "Cabin"})
                    && !request.options.retry_safe
            })
            .times(1)
            .returning(move |_, _| {
                Ok(RawResponse::from_body(
                    200,
                    json!({"data": listing_json(id, "Cabin")}),
                ))
            });

        let updated = client(mock)
            .update(id, &Rename { name: "Cabin" })
            .await
            .unwrap();
        assert_eq!(updated.data.name, "Cabin");
    }

    #[tokio::test]
    async fn delete_ignores_body() {
        let id = PropertyId::new_v4();
        let mut mock = MockApiClient::new();
        mock.expect_request()
            .withf(move |path, request| {
                path.to_string() == "listing/delete" && request.params == json!({"id": id})
            })
            .times(1)
            .returning(|_, _| Ok(RawResponse::from_body(204, Value::Null)));

        let response = client(mock).delete(id).await.unwrap();
        assert_eq!(response.status, 204);
    }

    #[tokio::test]
    async fn custom_action_forwards_payload_unchanged() {
        let mut mock = MockApiClient::new();
        mock.expect_request()
            .withf(|path, request| {
                path.to_string() == "listing/sync" && request.params == json!({"force": true})
            })
            .times(1)
            .returning(|_, _| Ok(RawResponse::from_body(200, json!({"data": {"queued": 3}}))));

        let response: Response<Value> = client(mock)
            .action("sync", &json!({"force": true}))
            .await
            .unwrap();
        assert_eq!(response.data["queued"], json!(3));
    }

    #[tokio::test]
    async fn default_options_apply_to_every_call() {
        let mut mock = MockApiClient::new();
        mock.expect_request()
            .withf(|_, request| {
                request.options.headers == vec![("x-source".to_string(), "test".to_string())]
            })
            .times(1)
            .returning(|_, _| Ok(RawResponse::from_body(200, json!({}))));

        client(mock)
            .with_options(RequestOptions::new().with_header("x-source", "test"))
            .action_empty("ping", &json!({}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let mut mock = MockApiClient::new();
        mock.expect_request()
            .returning(|_, _| Err(Error::NotFound("gone".into())));

        let err = client(mock).fetch(PropertyId::new_v4()).await.unwrap_err();
        assert_eq!(err, Error::NotFound("gone".into()));
    }
}
