//! Booking resource client for the Roomkit SDK.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::BookingsClient;
pub use models::{
    Booking, BookingQuery, BookingStatus, CancelBookingRequest, CreateBookingRequest, Guest,
    UpdateBookingRequest,
};
pub use roomkit_core::id::BookingId;

/// Result alias reusing the shared Roomkit error type.
pub type Result<T> = roomkit_core::Result<T>;
