// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assistant service adapter: question answering and context preload.

use async_trait::async_trait;
use fixdesk_config::model::AssistantConfig;
use fixdesk_core::FixdeskError;
use fixdesk_core::traits::{AssistantService, ServiceAdapter};
use fixdesk_core::types::{ContextMessage, ConversationId, HealthStatus};

use crate::client::{ApiClient, Service, Target};
use crate::wire::{PreloadRequest, QueryRequest, QueryResponse};

/// Client for the assistant service.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    api: ApiClient,
}

impl AssistantClient {
    pub fn new(config: &AssistantConfig) -> Result<Self, FixdeskError> {
        Ok(Self {
            api: ApiClient::new(&config.base_url, config.timeout_secs, Service::Assistant)?,
        })
    }
}

#[async_trait]
impl ServiceAdapter for AssistantClient {
    fn name(&self) -> &str {
        "assistant"
    }

    async fn health_check(&self) -> Result<HealthStatus, FixdeskError> {
        Ok(
            match self
                .api
                .send(self.api.get("/"), Target::collection("health"))
                .await
            {
                Ok(_) => HealthStatus::Healthy,
                Err(e) => HealthStatus::Unhealthy(e.to_string()),
            },
        )
    }
}

#[async_trait]
impl AssistantService for AssistantClient {
    async fn query(
        &self,
        conversation_id: ConversationId,
        text: &str,
    ) -> Result<String, FixdeskError> {
        let body = QueryRequest {
            conversation_id: conversation_id.to_string(),
            query: text,
        };
        let response: QueryResponse = self
            .api
            .send_json(self.api.post("/query").json(&body), Target::collection("query"))
            .await?;
        Ok(response.answer)
    }

    async fn preload_history(
        &self,
        conversation_id: ConversationId,
        messages: &[ContextMessage],
    ) -> Result<(), FixdeskError> {
        let body = PreloadRequest {
            conversation_id: conversation_id.to_string(),
            messages,
        };
        self.api
            .send(
                self.api.post("/preload-history").json(&body),
                Target::collection("preload"),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixdesk_core::types::{Role, wire_time};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> AssistantClient {
        AssistantClient::new(&AssistantConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn query_returns_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_json(serde_json::json!({"conversation_id": "4", "query": "why?"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"answer": "because"})),
            )
            .mount(&server)
            .await;

        let answer = test_client(&server)
            .query(ConversationId(4), "why?")
            .await
            .unwrap();
        assert_eq!(answer, "because");
    }

    #[tokio::test]
    async fn query_failure_is_an_assistant_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .query(ConversationId(4), "why?")
            .await
            .unwrap_err();
        assert!(matches!(err, FixdeskError::Assistant { .. }), "got {err:?}");
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn preload_sends_context_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/preload-history"))
            .and(body_json(serde_json::json!({
                "conversation_id": "4",
                "messages": [
                    {"SentDate": "2025-01-10T08:30:00.000Z", "Role": 1, "Content": "q"},
                    {"SentDate": "2025-01-10T08:30:01.000Z", "Role": 0, "Content": "a"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success", "conversation_id": "4"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let messages = [
            ContextMessage {
                sent_at: wire_time::parse("2025-01-10T08:30:00").unwrap(),
                role: Role::User,
                content: "q".into(),
            },
            ContextMessage {
                sent_at: wire_time::parse("2025-01-10T08:30:01").unwrap(),
                role: Role::Assistant,
                content: "a".into(),
            },
        ];
        test_client(&server)
            .preload_history(ConversationId(4), &messages)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn health_check_hits_root() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "hello"
            })))
            .mount(&server)
            .await;

        assert_eq!(
            test_client(&server).health_check().await.unwrap(),
            HealthStatus::Healthy
        );
    }
}
