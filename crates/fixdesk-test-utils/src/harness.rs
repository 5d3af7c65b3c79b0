// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end conversation tests.
//!
//! `TestHarness` wires a [`MockBackend`] and a [`MockAssistant`] into
//! [`ConversationServices`] so tests can open conversations and drive them
//! exactly as the CLI does.

use std::sync::Arc;

use fixdesk_config::model::KnowledgeConfig;
use fixdesk_conversation::{
    ConversationOrchestrator, ConversationServices, StartedConversation, open_for_log,
};
use fixdesk_core::FixdeskError;
use fixdesk_core::types::{ConversationId, LogId, Message};

use crate::mock_assistant::MockAssistant;
use crate::mock_backend::MockBackend;

struct LogSeed {
    log_id: i64,
    content: String,
    machine_name: String,
}

struct ConversationSeed {
    conversation_id: i64,
    log_id: i64,
    history: Vec<Message>,
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    logs: Vec<LogSeed>,
    conversations: Vec<ConversationSeed>,
    machines: Vec<(i64, String)>,
    responses: Vec<String>,
    knowledge: KnowledgeConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            logs: Vec::new(),
            conversations: Vec::new(),
            machines: Vec::new(),
            responses: Vec::new(),
            knowledge: KnowledgeConfig::default(),
        }
    }

    /// Add an error log reported by `machine_name`.
    pub fn with_log(mut self, log_id: i64, content: &str, machine_name: &str) -> Self {
        self.logs.push(LogSeed {
            log_id,
            content: content.to_string(),
            machine_name: machine_name.to_string(),
        });
        self
    }

    /// Add an existing conversation on a log.
    pub fn with_conversation(
        mut self,
        conversation_id: i64,
        log_id: i64,
        history: Vec<Message>,
    ) -> Self {
        self.conversations.push(ConversationSeed {
            conversation_id,
            log_id,
            history,
        });
        self
    }

    pub fn with_machine(mut self, machine_id: i64, machine_name: &str) -> Self {
        self.machines.push((machine_id, machine_name.to_string()));
        self
    }

    /// Set the assistant's queued answers.
    pub fn with_assistant_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    pub fn with_knowledge_config(mut self, config: KnowledgeConfig) -> Self {
        self.knowledge = config;
        self
    }

    /// Build the harness. Must run inside a tokio runtime.
    pub async fn build(self) -> TestHarness {
        let backend = Arc::new(MockBackend::new());
        for log in &self.logs {
            backend
                .add_log(log.log_id, &log.content, &log.machine_name)
                .await;
        }
        for conversation in self.conversations {
            backend
                .add_conversation(
                    conversation.conversation_id,
                    conversation.log_id,
                    conversation.history,
                )
                .await;
        }
        for (id, name) in &self.machines {
            backend.add_machine(*id, name).await;
        }

        let assistant = Arc::new(MockAssistant::with_responses(self.responses));
        let services = ConversationServices::new(
            backend.clone(),
            assistant.clone(),
            backend.clone(),
            &self.knowledge,
        );

        TestHarness {
            backend,
            assistant,
            services,
        }
    }
}

/// A complete conversation stack over mock collaborators.
pub struct TestHarness {
    pub backend: Arc<MockBackend>,
    pub assistant: Arc<MockAssistant>,
    pub services: ConversationServices,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Open an existing conversation.
    pub async fn open(
        &self,
        conversation_id: i64,
    ) -> Result<ConversationOrchestrator, FixdeskError> {
        ConversationOrchestrator::open(self.services.clone(), ConversationId(conversation_id)).await
    }

    /// Find or create the conversation for a log.
    pub async fn start(&self, log_id: i64) -> Result<StartedConversation, FixdeskError> {
        open_for_log(&self.services, LogId(log_id)).await
    }

    /// Wait until all queued context mirrors have been attempted.
    pub async fn flush(&self) {
        self.services.sync.flush().await;
    }
}
