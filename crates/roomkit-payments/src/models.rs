//! Payment method models.

use chrono::{DateTime, Utc};
use roomkit_core::id::{PaymentMethodId, PropertyId};
use roomkit_core::query::{Filters, QueryRequest};
use serde::{Deserialize, Serialize};

/// Payment processor behind a payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProvider {
    /// Stripe Connect
    Stripe,
    /// PayPal
    Paypal,
    /// Offline payment (bank transfer, cash)
    Manual,
    /// Provider not known to this SDK version
    #[serde(other)]
    Other,
}

/// Connection state of a payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodStatus {
    /// Ready to take payments
    Active,
    /// Provider onboarding not finished
    Pending,
    /// Access revoked on the provider side
    Revoked,
    /// Status not known to this SDK version
    #[serde(other)]
    Unknown,
}

/// A payment account connected to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Payment method id.
    pub id: PaymentMethodId,
    /// Processor.
    pub provider: PaymentProvider,
    /// Connection state.
    pub status: PaymentMethodStatus,
    /// Account reference on the provider side, e.g. a Stripe `acct_` id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_reference: Option<String>,
    /// Property the method is restricted to; account-wide when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<PropertyId>,
    /// Label shown to the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Whether new bookings charge through this method.
    #[serde(default)]
    pub is_default: bool,
    /// When the provider connection completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,
}

impl PaymentMethod {
    /// Whether the method can take payments.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.status == PaymentMethodStatus::Active
    }
}

/// Filters for `payment-method/query`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PaymentMethodQuery {
    /// Filter by processor.
    pub provider: Option<PaymentProvider>,
    /// Filter by connection state.
    pub status: Option<PaymentMethodStatus>,
    /// Only methods of this property.
    pub property_id: Option<PropertyId>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl PaymentMethodQuery {
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
