//! Asynchronous thread and message clients.

use crate::models::{
    thread_messages_query, SendMessageRequest, Thread, ThreadMessage, ThreadQuery,
};
use crate::Result;
use roomkit_core::config::ApiClientConfig;
use roomkit_core::id::{MessageId, ThreadId};
use roomkit_core::query::QueryRequest;
use roomkit_core::resource::ResourceClient;
use roomkit_core::{ApiClient, HttpApiClient, PaginatedResponse, Response};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Resource path of threads.
pub const THREAD_RESOURCE: &str = "thread";

/// Resource path of thread messages.
pub const MESSAGE_RESOURCE: &str = "thread-message";

/// Client for the `thread` resource.
#[derive(Debug, Clone)]
pub struct ThreadsClient {
    inner: ResourceClient<Thread, ThreadId>,
}

impl ThreadsClient {
    /// Wrap a shared transport.
    #[must_use]
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            inner: ResourceClient::new(api, THREAD_RESOURCE),
        }
    }

    /// List threads.
    pub async fn query(&self, query: &ThreadQuery) -> Result<PaginatedResponse<Thread>> {
        self.inner.query(&query.to_query()).await
    }

    /// Fetch one thread.
    pub async fn fetch(&self, id: ThreadId) -> Result<Response<Thread>> {
        self.inner.fetch(id).await
    }

    /// Mark every message in the thread as read.
    pub async fn mark_read(&self, id: ThreadId) -> Result<Response<Thread>> {
        debug!(thread_id = %id, "Marking thread read");
        self.inner.record_action("mark-read", id).await
    }
}

/// Client for the `thread-message` resource.
#[derive(Debug, Clone)]
pub struct ThreadMessagesClient {
    inner: ResourceClient<ThreadMessage, MessageId>,
}

impl ThreadMessagesClient {
    /// Wrap a shared transport.
    #[must_use]
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            inner: ResourceClient::new(api, MESSAGE_RESOURCE),
        }
    }

    /// List messages with an arbitrary query.
    pub async fn query(&self, query: &QueryRequest) -> Result<PaginatedResponse<ThreadMessage>> {
        self.inner.query(query).await
    }

    /// Every message of a thread, oldest first.
    pub async fn for_thread(&self, thread_id: ThreadId) -> Result<Vec<ThreadMessage>> {
        self.inner.query_all(&thread_messages_query(thread_id)).await
    }

    /// Fetch one message.
    pub async fn fetch(&self, id: MessageId) -> Result<Response<ThreadMessage>> {
        self.inner.fetch(id).await
    }

    /// Post a message to a thread.
    pub async fn send(&self, request: &SendMessageRequest) -> Result<Response<ThreadMessage>> {
        request.validate()?;
        info!(
            thread_id = %request.thread_id,
            relay = request.relay_to_channel,
            "Sending message"
        );
        self.inner.action("send", request).await
    }
}

/// Threads and messages sharing one transport.
#[derive(Debug, Clone)]
pub struct MessagingClient {
    /// Thread operations.
    pub threads: ThreadsClient,
    /// Message operations.
    pub messages: ThreadMessagesClient,
}

impl MessagingClient {
    /// Wrap a shared transport.
    #[must_use]
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            threads: ThreadsClient::new(Arc::clone(&api)),
            messages: ThreadMessagesClient::new(api),
        }
    }

    /// Build both clients over one HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`roomkit_core::Error::Config`] when the configuration is invalid.
    pub fn from_config(config: ApiClientConfig) -> Result<Self> {
        Ok(Self::new(HttpApiClient::new(config)?.into_shared()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SenderKind;
    use roomkit_core::Error;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> MessagingClient {
        let config = ApiClientConfig::new(server.uri())
            .unwrap()
            .with_max_retries(0);
        MessagingClient::from_config(config).unwrap()
    }

    #[tokio::test]
    async fn mark_read_posts_thread_id() {
        let server = MockServer::start().await;
        let id = ThreadId::new_v4();
        Mock::given(method("POST"))
            .and(path("/thread/mark-read"))
            .and(body_json(json!({"id": id})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": id, "unread_count": 0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let thread = client(&server)
            .threads
            .mark_read(id)
            .await
            .unwrap()
            .into_data();
        assert!(!thread.is_unread());
    }

    #[tokio::test]
    async fn send_posts_to_message_resource() {
        let server = MockServer::start().await;
        let thread_id = ThreadId::new_v4();
        let message_id = MessageId::new_v4();
        Mock::given(method("POST"))
            .and(path("/thread-message/send"))
            .and(body_json(json!({
                "thread_id": thread_id,
                "body": "The door code is 4471.",
                "relay_to_channel": true
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {
                    "id": message_id,
                    "thread_id": thread_id,
                    "sender": "host",
                    "body": "The door code is 4471.",
                    "sent_at": "2024-08-10T14:02:00Z"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let message = client(&server)
            .messages
            .send(&SendMessageRequest::new(thread_id, "The door code is 4471."))
            .await
            .unwrap()
            .into_data();

        assert_eq!(message.id, message_id);
        assert_eq!(message.sender, SenderKind::Host);
    }

    #[tokio::test]
    async fn empty_message_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .messages
            .send(&SendMessageRequest::new(ThreadId::new_v4(), ""))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { status: None, .. }));
    }

    #[tokio::test]
    async fn unread_thread_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/thread/query"))
            .and(body_json(json!({
                "filters": {"unread": true},
                "sort": [{"field": "last_message_at", "direction": "desc"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": ThreadId::new_v4(), "unread_count": 2, "guest_name": "Tom"}],
                "meta": {"current_page": 1, "per_page": 50, "total": 1, "last_page": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server)
            .threads
            .query(&ThreadQuery {
                unread: Some(true),
                ..ThreadQuery::default()
            })
            .await
            .unwrap();
        assert!(page.data[0].is_unread());
    }

    #[tokio::test]
    async fn thread_history_walks_pages() {
        let server = MockServer::start().await;
        let thread_id = ThreadId::new_v4();
        let message = |body: &str| {
            json!({
                "id": MessageId::new_v4(),
                "thread_id": thread_id,
                "sender": "guest",
                "body": body
            })
        };
        Mock::given(method("POST"))
            .and(path("/thread-message/query"))
            .and(body_json(json!({
                "filters": {"thread_id": thread_id},
                "sort": [{"field": "sent_at", "direction": "asc"}],
                "page": 1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [message("Hi!")],
                "meta": {"current_page": 1, "per_page": 1, "total": 2, "last_page": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/thread-message/query"))
            .and(body_json(json!({
                "filters": {"thread_id": thread_id},
                "sort": [{"field": "sent_at", "direction": "asc"}],
                "page": 2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [message("Is parking included?")],
                "meta": {"current_page": 2, "per_page": 1, "total": 2, "last_page": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let history = client(&server)
            .messages
            .for_thread(thread_id)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].body, "Is parking included?");
    }
}
