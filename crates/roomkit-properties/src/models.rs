//! Property models shared by the client and fixtures.

use chrono::{DateTime, Utc};
use roomkit_core::id::ChannelId;
use roomkit_core::id::PropertyId;
use roomkit_core::query::{Filters, QueryRequest};
use serde::{Deserialize, Serialize};

/// Listing state of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    /// Bookable
    Active,
    /// Temporarily not bookable
    Inactive,
    /// Being set up
    Draft,
    /// Retired
    Archived,
    /// Status not known to this SDK version
    #[serde(other)]
    Unknown,
}

/// Postal address and coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Street line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    /// Second street line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    /// City
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State or region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Postal code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2 country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Latitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// A rentable property as returned by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property id.
    pub id: PropertyId,
    /// Display name.
    pub name: String,
    /// Listing state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
    /// Free-form type, e.g. `apartment` or `villa`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Marketing description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// IANA time zone used for check-in times.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// ISO 4217 currency used for pricing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Guest capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    /// Bedroom count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    /// Bathroom count (half baths allowed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f32>,
    /// Local check-in time, `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<String>,
    /// Local check-out time, `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<String>,
    /// Nightly base price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    /// Channels the property is listed on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channel_ids: Vec<ChannelId>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Property {
    /// Whether guests can book the property.
    #[must_use]
    pub fn is_bookable(&self) -> bool {
        self.status == Some(PropertyStatus::Active)
    }
}

/// Request payload for creating a property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePropertyRequest {
    /// Display name.
    pub name: String,
    /// Free-form type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Time zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Guest capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    /// Nightly base price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
}

impl CreatePropertyRequest {
    /// Minimal payload with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_type: None,
            description: None,
            address: None,
            timezone: None,
            currency: None,
            max_guests: None,
            base_price: None,
        }
    }
}

/// Request payload for updating a property; absent fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UpdatePropertyRequest {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Listing state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Guest capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    /// Nightly base price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    /// Check-in time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<String>,
    /// Check-out time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<String>,
}

/// Filters for `property/query`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PropertyQuery {
    /// Filter by listing state.
    pub status: Option<PropertyStatus>,
    /// Filter by city.
    pub city: Option<String>,
    /// Filter by country.
    pub country: Option<String>,
    /// Only properties listed on this channel.
    pub channel_id: Option<ChannelId>,
    /// Free-text search on name and address.
    pub search: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl PropertyQuery {
    /// Convert to the generic query body.
    #[must_use]
    pub fn to_query(&self) -> QueryRequest {
        let mut filters = Filters::new();
        filters.push_opt("status", self.status);
        filters.push_opt("city", self.city.as_deref());
        filters.push_opt("country", self.country.as_deref());
        filters.push_opt("channel_id", self.channel_id);

        QueryRequest {
            search: self.search.clone(),
            page: self.page,
            per_page: self.per_page,
            ..QueryRequest::from_filters(filters)
        }
    }
}
