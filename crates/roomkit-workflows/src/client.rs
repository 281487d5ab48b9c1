//! Asynchronous workflow client.

use crate::models::{CreateWorkflowRequest, UpdateWorkflowRequest, Workflow, WorkflowQuery};
use crate::Result;
use roomkit_core::config::ApiClientConfig;
use roomkit_core::id::WorkflowId;
use roomkit_core::resource::ResourceClient;
use roomkit_core::{ApiClient, HttpApiClient, PaginatedResponse, RequestOptions, Response};
use std::sync::Arc;
use tracing::info;

/// Resource path of workflows.
pub const RESOURCE: &str = "workflow";

/// Client for the `workflow` resource.
#[derive(Debug, Clone)]
pub struct WorkflowsClient {
    inner: ResourceClient<Workflow, WorkflowId>,
}

impl WorkflowsClient {
    /// Wrap a shared transport.
    #[must_use]
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            inner: ResourceClient::new(api, RESOURCE),
        }
    }

    /// Build a client with its own HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`roomkit_core::Error::Config`] when the configuration is invalid.
    pub fn from_config(config: ApiClientConfig) -> Result<Self> {
        Ok(Self::new(HttpApiClient::new(config)?.into_shared()))
    }

    /// Apply `options` to every call.
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.inner = self.inner.with_options(options);
        self
    }

    /// List workflows.
    pub async fn query(&self, query: &WorkflowQuery) -> Result<PaginatedResponse<Workflow>> {
        self.inner.query(&query.to_query()).await
    }

    /// Fetch one workflow.
    pub async fn fetch(&self, id: WorkflowId) -> Result<Response<Workflow>> {
        self.inner.fetch(id).await
    }

    /// Create a workflow.
    pub async fn create(&self, request: &CreateWorkflowRequest) -> Result<Response<Workflow>> {
        self.inner.create(request).await
    }

    /// Update a workflow.
    pub async fn update(
        &self,
        id: WorkflowId,
        request: &UpdateWorkflowRequest,
    ) -> Result<Response<Workflow>> {
        self.inner.update(id, request).await
    }

    /// Delete a workflow.
    pub async fn delete(&self, id: WorkflowId) -> Result<Response<()>> {
        self.inner.delete(id).await
    }

    /// Start scheduling runs.
    pub async fn enable(&self, id: WorkflowId) -> Result<Response<Workflow>> {
        info!(workflow_id = %id, "Enabling workflow");
        self.inner.record_action("enable", id).await
    }

    /// Stop scheduling runs; runs already queued still execute.
    pub async fn disable(&self, id: WorkflowId) -> Result<Response<Workflow>> {
        info!(workflow_id = %id, "Disabling workflow");
        self.inner.record_action("disable", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StepKind, WorkflowStep, WorkflowTrigger};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> WorkflowsClient {
        let config = ApiClientConfig::new(server.uri())
            .unwrap()
            .with_max_retries(0);
        WorkflowsClient::from_config(config).unwrap()
    }

    fn workflow_json(id: WorkflowId, enabled: bool) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Cleaning task",
            "trigger": "check_out",
            "enabled": enabled,
            "steps": [{"kind": "create_task", "config": {"task": "cleaning"}}]
        })
    }

    #[tokio::test]
    async fn enable_and_disable() {
        let server = MockServer::start().await;
        let id = WorkflowId::new_v4();
        Mock::given(method("POST"))
            .and(path("/workflow/enable"))
            .and(body_json(json!({"id": id})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": workflow_json(id, true)})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/workflow/disable"))
            .and(body_json(json!({"id": id})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": workflow_json(id, false)})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        assert!(client.enable(id).await.unwrap().data.enabled);
        assert!(!client.disable(id).await.unwrap().data.enabled);
    }

    #[tokio::test]
    async fn create_sends_steps() {
        let server = MockServer::start().await;
        let id = WorkflowId::new_v4();
        Mock::given(method("POST"))
            .and(path("/workflow/create"))
            .and(body_json(json!({
                "name": "Cleaning task",
                "trigger": "check_out",
                "offset_minutes": 60,
                "steps": [{"kind": "create_task", "config": {"task": "cleaning"}, "delay_minutes": 0}]
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"data": workflow_json(id, false)})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let workflow = client(&server)
            .create(&CreateWorkflowRequest {
                name: "Cleaning task".into(),
                trigger: WorkflowTrigger::CheckOut,
                offset_minutes: 60,
                steps: vec![WorkflowStep {
                    kind: StepKind::CreateTask,
                    config: json!({"task": "cleaning"}),
                    delay_minutes: 0,
                }],
                property_ids: Vec::new(),
            })
            .await
            .unwrap()
            .into_data();

        assert_eq!(workflow.id, id);
        assert_eq!(workflow.trigger, WorkflowTrigger::CheckOut);
    }

    #[tokio::test]
    async fn query_enabled_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workflow/query"))
            .and(body_json(json!({"filters": {"enabled": true}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [workflow_json(WorkflowId::new_v4(), true)],
                "meta": {"current_page": 1, "per_page": 50, "total": 1, "last_page": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server)
            .query(&WorkflowQuery {
                enabled: Some(true),
                ..WorkflowQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }
}
