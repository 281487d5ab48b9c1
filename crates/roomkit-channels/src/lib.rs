//! Distribution channel client for the Roomkit SDK.
//!
//! A channel is a connection to a listing site (Airbnb, Booking.com, ...).
//! Properties are attached to channels to be listed there and unlinked to
//! stop distribution.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::ChannelsClient;
pub use models::{
    AttachPropertyRequest, Channel, ChannelProvider, ChannelQuery, ChannelStatus,
    CreateChannelRequest, UpdateChannelRequest,
};
pub use roomkit_core::id::ChannelId;

/// Result alias reusing the shared Roomkit error type.
pub type Result<T> = roomkit_core::Result<T>;
