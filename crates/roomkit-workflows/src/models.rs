//! Automation workflow models.

use chrono::{DateTime, Utc};
use roomkit_core::id::{PropertyId, WorkflowId};
use roomkit_core::query::{Filters, QueryRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event that starts a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowTrigger {
    /// A booking was confirmed
    BookingConfirmed,
    /// A booking was cancelled
    BookingCancelled,
    /// Relative to the check-in date
    CheckIn,
    /// Relative to the check-out date
    CheckOut,
    /// A guest sent a message
    MessageReceived,
    /// Trigger not known to this SDK version
    #[serde(other)]
    Unknown,
}

/// What a step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Send a templated guest message
    SendMessage,
    /// Email the host team
    NotifyTeam,
    /// Create a cleaning or maintenance task
    CreateTask,
    /// Call an external URL
    Webhook,
    /// Step not known to this SDK version
    #[serde(other)]
    Unknown,
}

/// One step of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Step type.
    pub kind: StepKind,
    /// Step-specific settings, e.g. a template id or a URL.
    #[serde(default)]
    pub config: Value,
    /// Wait after the previous step, in minutes.
    #[serde(default)]
    pub delay_minutes: u32,
}

/// An automation attached to one or more properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow id.
    pub id: WorkflowId,
    /// Display name.
    pub name: String,
    /// Start event.
    pub trigger: WorkflowTrigger,
    /// Offset from the trigger in minutes; negative runs before it.
    #[serde(default)]
    pub offset_minutes: i32,
    /// Whether runs are scheduled.
    #[serde(default)]
    pub enabled: bool,
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    /// Scoped properties; empty means every property.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_ids: Vec<PropertyId>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Workflow {
    /// Whether the workflow runs for `property`.
    #[must_use]
    pub fn applies_to(&self, property: PropertyId) -> bool {
        self.property_ids.is_empty() || self.property_ids.contains(&property)
    }
}

/// Request payload for creating a workflow. New workflows start disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWorkflowRequest {
    /// Display name.
    pub name: String,
    /// Start event.
    pub trigger: WorkflowTrigger,
    /// Offset from the trigger in minutes.
    #[serde(default)]
    pub offset_minutes: i32,
    /// Steps.
    pub steps: Vec<WorkflowStep>,
    /// Scoped properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_ids: Vec<PropertyId>,
}

/// Request payload for updating a workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWorkflowRequest {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Offset from the trigger in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_minutes: Option<i32>,
    /// Replacement step list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<WorkflowStep>>,
    /// Replacement property scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_ids: Option<Vec<PropertyId>>,
}

/// Filters for `workflow/query`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkflowQuery {
    /// Filter by trigger.
    pub trigger: Option<WorkflowTrigger>,
    /// Filter by enabled flag.
    pub enabled: Option<bool>,
    /// Only workflows scoped to this property.
    pub property_id: Option<PropertyId>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl WorkflowQuery {
    /// Convert to the generic query body.
    #[must_use]
    pub fn to_query(&self) -> QueryRequest {
        let mut filters = Filters::new();
        filters.push_opt("trigger", self.trigger);
        filters.push_opt("enabled", self.enabled);
        filters.push_opt("property_id", self.property_id);

        QueryRequest {
            page: self.page,
            per_page: self.per_page,
            ..QueryRequest::from_filters(filters)
        }
    }
}
