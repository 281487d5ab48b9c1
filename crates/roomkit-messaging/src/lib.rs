//! Guest messaging client for the Roomkit SDK.
//!
//! Conversations live under two resources: `thread` for the conversation
//! itself and `thread-message` for its messages. [`MessagingClient`] bundles
//! both over one transport.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{MessagingClient, ThreadMessagesClient, ThreadsClient};
pub use models::{SendMessageRequest, SenderKind, Thread, ThreadMessage, ThreadQuery};
pub use roomkit_core::id::{MessageId, ThreadId};

/// Result alias reusing the shared Roomkit error type.
pub type Result<T> = roomkit_core::Result<T>;
