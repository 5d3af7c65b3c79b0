// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend REST adapter for conversations, logs, and the knowledge base.

use async_trait::async_trait;
use fixdesk_config::model::BackendConfig;
use fixdesk_core::FixdeskError;
use fixdesk_core::traits::{ConversationStore, KnowledgeStore, ServiceAdapter};
use fixdesk_core::types::{
    ContextMessage, ConversationId, ConversationRef, HealthStatus, KnowledgeEntry, KnowledgeId,
    KnowledgeLookup, Log, LogFilter, LogId, LogSummary, Machine, Message, NewKnowledgeEntry,
    SuggestedSolution,
};
use tracing::debug;

use crate::client::{ApiClient, Service, Target};
use crate::wire::{
    ConversationCreated, CreateConversationRequest, DbCheck, ResolvedBody, SolutionRequest,
    SolutionResponse, SolutionUpdate,
};

/// Client for the backend service.
#[derive(Debug, Clone)]
pub struct BackendClient {
    api: ApiClient,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, FixdeskError> {
        Ok(Self {
            api: ApiClient::new(&config.base_url, config.timeout_secs, Service::Backend)?,
        })
    }
}

#[async_trait]
impl ServiceAdapter for BackendClient {
    fn name(&self) -> &str {
        "backend"
    }

    async fn health_check(&self) -> Result<HealthStatus, FixdeskError> {
        let check: Result<DbCheck, _> = self
            .api
            .send_json(self.api.get("/test-db"), Target::collection("health"))
            .await;
        Ok(match check {
            Ok(DbCheck { success: true, .. }) => HealthStatus::Healthy,
            Ok(DbCheck { error, .. }) => HealthStatus::Degraded(
                error.unwrap_or_else(|| "database check failed".to_string()),
            ),
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }
}

#[async_trait]
impl ConversationStore for BackendClient {
    async fn get_log(&self, conversation_id: ConversationId) -> Result<Log, FixdeskError> {
        let path = format!("/api/chat/conversation/{conversation_id}/log");
        self.api
            .send_json(
                self.api.get(&path),
                Target::record("conversation", conversation_id),
            )
            .await
    }

    async fn get_resolved(&self, log_id: LogId) -> Result<bool, FixdeskError> {
        let path = format!("/api/chat/log/{log_id}/resolved");
        let body: ResolvedBody = self
            .api
            .send_json(self.api.get(&path), Target::record("log", log_id))
            .await?;
        Ok(body.resolved)
    }

    async fn set_resolved(&self, log_id: LogId, resolved: bool) -> Result<(), FixdeskError> {
        let path = format!("/api/chat/log/{log_id}/resolved");
        self.api
            .send(
                self.api.patch(&path).json(&ResolvedBody { resolved }),
                Target::record("log", log_id),
            )
            .await?;
        debug!(log_id = log_id.0, resolved, "resolved flag saved");
        Ok(())
    }

    async fn get_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, FixdeskError> {
        let path = format!("/api/chat/conversation/{conversation_id}/messages");
        self.api
            .send_json(
                self.api.get(&path),
                Target::record("conversation", conversation_id),
            )
            .await
    }

    async fn append_messages(
        &self,
        conversation_id: ConversationId,
        messages: &[Message],
    ) -> Result<(), FixdeskError> {
        let path = format!("/api/chat/conversation/{conversation_id}/messages");
        self.api
            .send(
                self.api.put(&path).json(messages),
                Target::record("conversation", conversation_id),
            )
            .await?;
        Ok(())
    }

    async fn list_logs(&self, filter: &LogFilter) -> Result<Vec<LogSummary>, FixdeskError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(machine) = &filter.machine_name {
            query.push(("machine_name", machine.clone()));
        }
        if let Some(resolved) = filter.resolved {
            query.push(("resolved", resolved.to_string()));
        }
        self.api
            .send_json(
                self.api.get("/api/errors/").query(&query),
                Target::collection("errors"),
            )
            .await
    }

    async fn find_conversation_by_log(
        &self,
        log_id: LogId,
    ) -> Result<Option<ConversationRef>, FixdeskError> {
        let path = format!("/api/chat/conversation/log/{log_id}");
        self.api
            .send_json(self.api.get(&path), Target::collection("conversation"))
            .await
    }

    async fn create_conversation(
        &self,
        log_id: LogId,
        seed: &[ContextMessage],
    ) -> Result<ConversationId, FixdeskError> {
        let body = CreateConversationRequest {
            log_id,
            messages: seed,
        };
        let created: ConversationCreated = self
            .api
            .send_json(
                self.api.post("/api/chat/conversation").json(&body),
                Target::record("log", log_id),
            )
            .await?;
        Ok(created.conversation_id)
    }

    async fn suggest_solution(
        &self,
        conversation_id: ConversationId,
        log_content: &str,
    ) -> Result<SuggestedSolution, FixdeskError> {
        let body = SolutionRequest {
            conversation_id: conversation_id.to_string(),
            log_content,
        };
        let response: SolutionResponse = self
            .api
            .send_json(
                self.api.post("/api/chat/solution").json(&body),
                Target::collection("solution"),
            )
            .await?;
        let suggestion = if response.known_error {
            response.solution.map(SuggestedSolution::Known)
        } else {
            response.generated_solution.map(SuggestedSolution::Generated)
        };
        suggestion.ok_or_else(|| FixdeskError::backend("solution response carried no solution text"))
    }
}

#[async_trait]
impl KnowledgeStore for BackendClient {
    async fn list_machines(&self) -> Result<Vec<Machine>, FixdeskError> {
        self.api
            .send_json(
                self.api.get("/api/knowledgebase/machines"),
                Target::collection("machines"),
            )
            .await
    }

    async fn exists(&self, content: &str) -> Result<KnowledgeLookup, FixdeskError> {
        self.api
            .send_json(
                self.api
                    .get("/api/knowledgebase/exists")
                    .query(&[("content", content)]),
                Target::collection("knowledge entry"),
            )
            .await
    }

    async fn create(&self, entry: &NewKnowledgeEntry) -> Result<KnowledgeEntry, FixdeskError> {
        self.api
            .send_json(
                self.api.post("/api/knowledgebase/").json(entry),
                Target::collection("knowledge entry"),
            )
            .await
    }

    async fn update_solution(
        &self,
        knowledge_id: KnowledgeId,
        solution: &str,
    ) -> Result<(), FixdeskError> {
        let path = format!("/api/knowledgebase/{knowledge_id}");
        self.api
            .send(
                self.api.patch(&path).json(&SolutionUpdate { solution }),
                Target::record("knowledge entry", knowledge_id),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixdesk_core::types::{MachineId, Role};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> BackendClient {
        BackendClient::new(&BackendConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn get_log_decodes_backend_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chat/conversation/7/log"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"LogId": 3, "LogContent": "E42"})),
            )
            .mount(&server)
            .await;

        let log = test_client(&server)
            .get_log(ConversationId(7))
            .await
            .unwrap();
        assert_eq!(log.log_id, LogId(3));
        assert_eq!(log.content, "E42");
        assert!(log.machine_name.is_none());
    }

    #[tokio::test]
    async fn missing_conversation_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chat/conversation/9/log"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"detail": "Conversation not found"})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server)
            .get_log(ConversationId(9))
            .await
            .unwrap_err();
        assert!(
            matches!(err, FixdeskError::NotFound { ref resource, ref id } if resource == "conversation" && id == "9"),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn server_error_is_a_backend_error_with_detail() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/chat/log/3/resolved"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(serde_json::json!({"detail": "db down"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .set_resolved(LogId(3), true)
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("db down"), "got: {err}");
    }

    #[tokio::test]
    async fn set_resolved_sends_flag() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/chat/log/3/resolved"))
            .and(body_json(serde_json::json!({"resolved": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "message": "ok", "resolved": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server)
            .set_resolved(LogId(3), true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn messages_round_trip_through_put_and_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chat/conversation/7/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"SentDate": "2025-01-10T08:30:00", "Role": 1, "Content": "hi",
                 "MessageId": 1, "ConversationId": 7},
                {"SentDate": "2025-01-10T08:30:05", "Role": 0, "Content": "hello",
                 "MessageId": 2, "ConversationId": 7}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/chat/conversation/7/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let messages = client.get_messages(ConversationId(7)).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::Assistant);

        client
            .append_messages(ConversationId(7), &[Message::user(ConversationId(7), "again")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn list_logs_passes_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/errors/"))
            .and(query_param("machine_name", "press-07"))
            .and(query_param("resolved", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "ProcessId": 1, "LogId": 3, "Sentiment": null, "Resolved": false,
                "DateCreated": "2025-01-10T08:30:00", "LogContent": "E42",
                "MachineName": "press-07"
            }])))
            .mount(&server)
            .await;

        let rows = test_client(&server)
            .list_logs(&LogFilter {
                machine_name: Some("press-07".into()),
                resolved: Some(false),
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].to_log().machine_name.as_deref(), Some("press-07"));
    }

    #[tokio::test]
    async fn find_conversation_handles_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chat/conversation/log/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Null))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/chat/conversation/log/4"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ConversationId": 12, "LogId": 4})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert!(client.find_conversation_by_log(LogId(3)).await.unwrap().is_none());
        let found = client.find_conversation_by_log(LogId(4)).await.unwrap().unwrap();
        assert_eq!(found.conversation_id, ConversationId(12));
    }

    #[tokio::test]
    async fn create_conversation_sends_seed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/conversation"))
            .and(body_json(serde_json::json!({
                "logId": 3,
                "messages": [{"SentDate": "2025-01-10T08:30:00.000Z", "Role": 1, "Content": "seed"}]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ConversationId": 21})),
            )
            .mount(&server)
            .await;

        let seed = ContextMessage {
            sent_at: fixdesk_core::types::wire_time::parse("2025-01-10T08:30:00").unwrap(),
            role: Role::User,
            content: "seed".into(),
        };
        let id = test_client(&server)
            .create_conversation(LogId(3), &[seed])
            .await
            .unwrap();
        assert_eq!(id, ConversationId(21));
    }

    #[tokio::test]
    async fn suggest_solution_picks_known_or_generated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/solution"))
            .and(body_json(serde_json::json!({"conversation_id": "21", "log_content": "E42"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "knownError": true, "solution": "reseat cable"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/chat/solution"))
            .and(body_json(serde_json::json!({"conversation_id": "22", "log_content": "E43"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "knownError": false, "generatedSolution": "check fan"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert_eq!(
            client.suggest_solution(ConversationId(21), "E42").await.unwrap(),
            SuggestedSolution::Known("reseat cable".into())
        );
        assert_eq!(
            client.suggest_solution(ConversationId(22), "E43").await.unwrap(),
            SuggestedSolution::Generated("check fan".into())
        );
    }

    #[tokio::test]
    async fn knowledge_exists_create_and_update() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/knowledgebase/exists"))
            .and(query_param("content", "Disk full on /var"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "exists": true, "knowledge_id": 5
            })))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/knowledgebase/5"))
            .and(body_json(serde_json::json!({"solution": "clean logs"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "KnowledgeId": 5, "Content": "Disk full on /var", "ContentType": "Guide",
                "MachineId": 1, "Solution": "clean logs"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/knowledgebase/"))
            .and(body_json(serde_json::json!({
                "Content": "E42", "ContentType": "Guide", "MachineId": 7, "Solution": "fix"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "KnowledgeId": 6, "Content": "E42", "ContentType": "Guide",
                "MachineId": 7, "Solution": "fix", "MachineName": "press-07"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let lookup = client.exists("Disk full on /var").await.unwrap();
        assert!(lookup.exists);
        assert_eq!(lookup.knowledge_id, Some(KnowledgeId(5)));
        client
            .update_solution(KnowledgeId(5), "clean logs")
            .await
            .unwrap();

        let created = client
            .create(&NewKnowledgeEntry {
                content: "E42".into(),
                content_type: "Guide".into(),
                machine_id: MachineId(7),
                solution: "fix".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.knowledge_id, KnowledgeId(6));
    }

    #[tokio::test]
    async fn health_reports_database_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/test-db"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false, "error": "connection refused"
            })))
            .mount(&server)
            .await;

        let status = test_client(&server).health_check().await.unwrap();
        assert_eq!(
            status,
            HealthStatus::Degraded("connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_unhealthy() {
        let client = BackendClient::new(&BackendConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
        })
        .unwrap();
        assert!(matches!(
            client.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }
}
