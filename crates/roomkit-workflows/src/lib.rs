//! Automation workflow client for the Roomkit SDK.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::WorkflowsClient;
pub use models::{
    CreateWorkflowRequest, StepKind, UpdateWorkflowRequest, Workflow, WorkflowQuery, WorkflowStep,
    WorkflowTrigger,
};
pub use roomkit_core::id::WorkflowId;

/// Result alias reusing the shared Roomkit error type.
pub type Result<T> = roomkit_core::Result<T>;
