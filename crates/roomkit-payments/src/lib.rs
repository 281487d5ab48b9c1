//! Payment method client and Stripe Connect flow for the Roomkit SDK.
//!
//! - [`client`] - the `payment-method` resource
//! - [`stripe`] - UI-agnostic Stripe onboarding: open a window, wait for it to
//!   close, check whether a Stripe payment method now exists

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod stripe;

pub use client::PaymentMethodsClient;
pub use models::{PaymentMethod, PaymentMethodQuery, PaymentMethodStatus, PaymentProvider};
pub use roomkit_core::id::PaymentMethodId;
pub use stripe::{
    ConnectionOutcome, ConnectionWindow, StripeConnectConfig, StripeConnector, POLL_INTERVAL,
};

/// Result alias reusing the shared Roomkit error type.
pub type Result<T> = roomkit_core::Result<T>;
