//! Value types shared by several resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a background synchronisation job on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Accepted, not started
    Queued,
    /// Running
    Running,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed,
    /// Status not known to this SDK version
    #[serde(other)]
    Unknown,
}

impl SyncStatus {
    /// Whether the job has finished, successfully or not.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Handle for a sync pushed to distribution channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncJob {
    /// Job identifier assigned by the platform
    pub id: String,
    /// Current state
    pub status: SyncStatus,
    /// When the job was accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued_at: Option<DateTime<Utc>>,
    /// When the job finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An amount in a currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in major units
    pub amount: f64,
    /// ISO 4217 currency code
    pub currency: String,
}

impl Money {
    /// Create an amount.
    #[must_use]
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}
