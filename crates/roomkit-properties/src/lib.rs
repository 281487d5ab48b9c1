//! Property resource client for the Roomkit SDK.
//!
//! Properties are the rentable units every other resource hangs off:
//! bookings, channel listings and workflows all reference a [`PropertyId`].

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::PropertiesClient;
pub use models::{
    Address, CreatePropertyRequest, Property, PropertyQuery, PropertyStatus, UpdatePropertyRequest,
};
pub use roomkit_core::id::PropertyId;

/// Result alias reusing the shared Roomkit error type.
pub type Result<T> = roomkit_core::Result<T>;
