//! Distribution channel models.

use chrono::{DateTime, Utc};
use roomkit_core::id::{ChannelId, PropertyId};
use roomkit_core::query::{Filters, QueryRequest};
use serde::{Deserialize, Serialize};

/// Listing site or channel manager a channel connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelProvider {
    /// Airbnb
    Airbnb,
    /// Booking.com
    BookingCom,
    /// Vrbo
    Vrbo,
    /// Expedia
    Expedia,
    /// Google Vacation Rentals
    Google,
    /// iCal feed
    Ical,
    /// Provider not known to this SDK version
    #[serde(other)]
    Other,
}

/// Connection state of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    /// Connected and syncing
    Connected,
    /// Connection in progress
    Pending,
    /// Credentials expired or revoked
    Disconnected,
    /// Last sync failed
    Error,
    /// Status not known to this SDK version
    #[serde(other)]
    Unknown,
}

/// A connected distribution channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel id.
    pub id: ChannelId,
    /// Provider.
    pub provider: ChannelProvider,
    /// Connection state.
    pub status: ChannelStatus,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Account identifier on the provider side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_account_id: Option<String>,
    /// Properties listed on the channel.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_ids: Vec<PropertyId>,
    /// Completion time of the last successful sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Error reported by the last failed sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl Channel {
    /// Whether `property` is listed on this channel.
    #[must_use]
    pub fn lists(&self, property: PropertyId) -> bool {
        self.property_ids.contains(&property)
    }

    /// Whether the channel needs the host's attention.
    #[must_use]
    pub const fn needs_attention(&self) -> bool {
        matches!(
            self.status,
            ChannelStatus::Disconnected | ChannelStatus::Error
        )
    }
}

/// Request payload for connecting a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateChannelRequest {
    /// Provider.
    pub provider: ChannelProvider,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Provider account to connect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_account_id: Option<String>,
}

/// Request payload for updating a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateChannelRequest {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Payload of the `attach` action: list a property on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachPropertyRequest {
    /// Channel to list on.
    pub channel_id: ChannelId,
    /// Property to list.
    pub property_id: PropertyId,
    /// Existing listing on the provider to map to, when importing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_listing_id: Option<String>,
}

/// Filters for `channel/query`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChannelQuery {
    /// Filter by provider.
    pub provider: Option<ChannelProvider>,
    /// Filter by connection state.
    pub status: Option<ChannelStatus>,
    /// Only channels listing this property.
    pub property_id: Option<PropertyId>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl ChannelQuery {
    /// Convert to the generic query body.
    #[must_use]
    pub fn to_query(&self) -> QueryRequest {
        let mut filters = Filters::new();
        filters.push_opt("provider", self.provider);
        filters.push_opt("status", self.status);
        filters.push_opt("property_id", self.property_id);

        QueryRequest {
            page: self.page,
            per_page: self.per_page,
            ..QueryRequest::from_filters(filters)
        }
    }
}
