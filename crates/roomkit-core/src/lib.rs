//! # roomkit-core
//!
//! Shared building blocks for the Roomkit property-management SDK.
//!
//! Every resource client in the workspace forwards `"<resource>/<action>"`
//! calls through a single [`ApiClient`](client::ApiClient). This crate owns that
//! abstraction, its reqwest implementation, the response envelopes, and the
//! generic resource template the resource crates are built from.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and HTTP status code mapping
//! - [`id`] - Strongly-typed identifiers for platform resources
//! - [`config`] - Client configuration (JSON file, environment)
//! - [`client`] - The `ApiClient` abstraction, request options and retry policy
//! - [`http`] - reqwest-backed `ApiClient` implementation
//! - [`response`] - `Response<T>` and `PaginatedResponse<T>` envelopes
//! - [`query`] - Body of the `query` action family
//! - [`resource`] - Generic resource client (`query`, `fetch`, `create`, ...)
//! - [`types`] - Value types shared by several resources

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod id;
pub mod query;
pub mod resource;
pub mod response;
pub mod types;

// Re-export commonly used types
pub use client::{ApiClient, ApiRequest, AuthErrorEvent, AuthErrorHandler, RequestOptions};
pub use error::{Error, Result};
pub use http::{HttpApiClient, HttpApiClientBuilder};
pub use query::QueryRequest;
pub use resource::{Action, ResourceClient};
pub use response::{PaginatedResponse, PaginationMeta, Response};
