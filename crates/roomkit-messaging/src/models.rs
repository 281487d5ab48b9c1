//! Guest messaging models.

use chrono::{DateTime, Utc};
use roomkit_core::id::{BookingId, ChannelId, MessageId, PropertyId, ThreadId};
use roomkit_core::query::{Filters, QueryRequest, SortDirection};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Longest message body the platform accepts, in characters.
pub const MAX_MESSAGE_LENGTH: u64 = 5000;

/// A conversation with a guest, usually tied to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    /// Thread id.
    pub id: ThreadId,
    /// Property the conversation is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<PropertyId>,
    /// Related booking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<BookingId>,
    /// Channel the conversation is relayed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
    /// Subject line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Guest display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    /// Messages the host has not read.
    #[serde(default)]
    pub unread_count: u32,
    /// Archived threads are hidden from the inbox.
    #[serde(default)]
    pub archived: bool,
    /// Time of the newest message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<DateTime<Utc>>,
}

impl Thread {
    /// Whether the thread has unread messages.
    #[must_use]
    pub const fn is_unread(&self) -> bool {
        self.unread_count > 0
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderKind {
    /// The guest
    Guest,
    /// The host or a team member
    Host,
    /// An automation workflow
    Automation,
    /// Platform notice
    System,
    /// Sender not known to this SDK version
    #[serde(other)]
    Unknown,
}

/// One message in a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    /// Message id.
    pub id: MessageId,
    /// Owning thread.
    pub thread_id: ThreadId,
    /// Author.
    pub sender: SenderKind,
    /// Message text.
    pub body: String,
    /// When the host read it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    /// When the message was sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

/// Payload of `thread-message/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Thread to post to.
    pub thread_id: ThreadId,
    /// Message text.
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
    /// Relay the message to the guest's channel inbox as well.
    #[serde(default)]
    pub relay_to_channel: bool,
}

impl SendMessageRequest {
    /// A message relayed to the guest's channel.
    #[must_use]
    pub fn new(thread_id: ThreadId, body: impl Into<String>) -> Self {
        Self {
            thread_id,
            body: body.into(),
            relay_to_channel: true,
        }
    }
}

/// Filters for `thread/query`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ThreadQuery {
    /// Only threads about this property.
    pub property_id: Option<PropertyId>,
    /// Only the thread of this booking.
    pub booking_id: Option<BookingId>,
    /// Only threads with unread messages.
    pub unread: Option<bool>,
    /// Include archived threads.
    pub archived: Option<bool>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl ThreadQuery {
    /// Convert to the generic query body, most recent activity first.
    #[must_use]
    pub fn to_query(&self) -> QueryRequest {
        let mut filters = Filters::new();
        filters.push_opt("property_id", self.property_id);
        filters.push_opt("booking_id", self.booking_id);
        filters.push_opt("unread", self.unread);
        filters.push_opt("archived", self.archived);

        QueryRequest {
            page: self.page,
            per_page: self.per_page,
            ..QueryRequest::from_filters(filters)
        }
        .sort_by("last_message_at", SortDirection::Desc)
    }
}

/// Query over the messages of one thread, oldest first.
#[must_use]
pub fn thread_messages_query(thread_id: ThreadId) -> QueryRequest {
    QueryRequest::new()
        .filter("thread_id", thread_id)
        .sort_by("sent_at", SortDirection::Asc)
}
