//! Booking models.

use chrono::{DateTime, NaiveDate, Utc};
use roomkit_core::id::{BookingId, ChannelId, GuestId, PropertyId};
use roomkit_core::query::{Filters, QueryRequest, SortDirection};
use roomkit_core::types::Money;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Guest asked about availability
    Inquiry,
    /// Awaiting host or payment confirmation
    Pending,
    /// Confirmed stay
    Confirmed,
    /// Cancelled by host or guest
    Cancelled,
    /// Guest has arrived
    CheckedIn,
    /// Stay is over
    CheckedOut,
    /// Status not known to this SDK version
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    /// Whether the booking still blocks the calendar.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::CheckedIn)
    }
}

/// Guest attached to a booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Guest {
    /// Guest id, absent for a guest created inline with the booking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<GuestId>,
    /// First name
    #[validate(length(min = 1))]
    pub first_name: String,
    /// Last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Email address
    #[validate(email)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number in E.164 form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A reservation of a property for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking id.
    pub id: BookingId,
    /// Booked property.
    pub property_id: PropertyId,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Arrival date (property local).
    pub check_in: NaiveDate,
    /// Departure date (property local).
    pub check_out: NaiveDate,
    /// Lead guest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest: Option<Guest>,
    /// Adult count.
    #[serde(default)]
    pub adults: u32,
    /// Child count.
    #[serde(default)]
    pub children: u32,
    /// Total price charged to the guest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,
    /// Channel the booking came from, absent for direct bookings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
    /// Booking source label, e.g. `airbnb` or `direct`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Channel-side confirmation code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_code: Option<String>,
    /// Internal notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Cancellation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Number of nights between check-in and check-out, zero for inverted ranges.
    #[must_use]
    pub fn nights(&self) -> u32 {
        let days = (self.check_out - self.check_in).num_days();
        u32::try_from(days).unwrap_or(0)
    }

    /// Total guest count.
    #[must_use]
    pub const fn guest_count(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }
}

/// Request payload for creating a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_stay"))]
pub struct CreateBookingRequest {
    /// Property to book.
    pub property_id: PropertyId,
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date, after `check_in`.
    pub check_out: NaiveDate,
    /// Lead guest.
    #[validate(nested)]
    pub guest: Guest,
    /// Adult count.
    #[validate(range(min = 1))]
    pub adults: u32,
    /// Child count.
    #[serde(default)]
    pub children: u32,
    /// Initial state, `confirmed` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    /// Agreed total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,
    /// Internal notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn validate_stay(request: &CreateBookingRequest) -> Result<(), ValidationError> {
    if request.check_out <= request.check_in {
        return Err(ValidationError::new("check_out_before_check_in"));
    }
    Ok(())
}

/// Request payload for updating a booking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    /// New state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    /// New arrival date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<NaiveDate>,
    /// New departure date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<NaiveDate>,
    /// New adult count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adults: Option<u32>,
    /// New child count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<u32>,
    /// Notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload of the `cancel` action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    /// Reason shown to the guest and in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Email the guest about the cancellation.
    #[serde(default)]
    pub notify_guest: bool,
}

/// Filters for `booking/query`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookingQuery {
    /// Only bookings of this property.
    pub property_id: Option<PropertyId>,
    /// Filter by state.
    pub status: Option<BookingStatus>,
    /// Only bookings from this channel.
    pub channel_id: Option<ChannelId>,
    /// Stays arriving on or after this date.
    pub check_in_from: Option<NaiveDate>,
    /// Stays arriving on or before this date.
    pub check_in_to: Option<NaiveDate>,
    /// Free-text search on guest name and confirmation code.
    pub search: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl BookingQuery {
    /// Convert to the generic query body, newest arrivals first.
    #[must_use]
    pub fn to_query(&self) -> QueryRequest {
        let mut filters = Filters::new();
        filters.push_opt("property_id", self.property_id);
        filters.push_opt("status", self.status);
        filters.push_opt("channel_id", self.channel_id);
        filters.push_opt("check_in_from", self.check_in_from);
        filters.push_opt("check_in_to", self.check_in_to);

        QueryRequest {
            search: self.search.clone(),
            page: self.page,
            per_page: self.per_page,
            ..QueryRequest::from_filters(filters)
        }
        .sort_by("check_in", SortDirection::Desc)
    }
}
