// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock assistant for deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use fixdesk_core::FixdeskError;
use fixdesk_core::traits::{AssistantService, ServiceAdapter};
use fixdesk_core::types::{ContextMessage, ConversationId, HealthStatus};

/// A mock assistant that answers from a FIFO queue.
///
/// When the queue is empty, a default "mock answer" text is returned.
/// Every query and context preload is recorded.
pub struct MockAssistant {
    responses: Arc<Mutex<VecDeque<String>>>,
    queries: Arc<Mutex<Vec<(ConversationId, String)>>>,
    preloads: Arc<Mutex<Vec<(ConversationId, Vec<ContextMessage>)>>>,
    fail_query: AtomicBool,
    fail_preload: AtomicBool,
}

impl MockAssistant {
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock assistant pre-loaded with the given answers.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            queries: Arc::new(Mutex::new(Vec::new())),
            preloads: Arc::new(Mutex::new(Vec::new())),
            fail_query: AtomicBool::new(false),
            fail_preload: AtomicBool::new(false),
        }
    }

    /// Add an answer to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    /// Make every query fail until reset.
    pub fn fail_query(&self, fail: bool) {
        self.fail_query.store(fail, Ordering::SeqCst);
    }

    /// Make every context preload fail until reset.
    pub fn fail_preload(&self, fail: bool) {
        self.fail_preload.store(fail, Ordering::SeqCst);
    }

    /// All queries received, in order.
    pub async fn queries(&self) -> Vec<(ConversationId, String)> {
        self.queries.lock().await.clone()
    }

    pub async fn query_count(&self) -> usize {
        self.queries.lock().await.len()
    }

    /// Every message successfully preloaded for a conversation, flattened in order.
    pub async fn preloaded(&self, conversation_id: ConversationId) -> Vec<ContextMessage> {
        self.preloads
            .lock()
            .await
            .iter()
            .filter(|(id, _)| *id == conversation_id)
            .flat_map(|(_, batch)| batch.iter().cloned())
            .collect()
    }

    /// Number of successful preload calls across all conversations.
    pub async fn preload_calls(&self) -> usize {
        self.preloads.lock().await.len()
    }
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockAssistant {
    fn name(&self) -> &str {
        "mock-assistant"
    }

    async fn health_check(&self) -> Result<HealthStatus, FixdeskError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl AssistantService for MockAssistant {
    async fn query(
        &self,
        conversation_id: ConversationId,
        text: &str,
    ) -> Result<String, FixdeskError> {
        self.queries
            .lock()
            .await
            .push((conversation_id, text.to_string()));
        if self.fail_query.load(Ordering::SeqCst) {
            return Err(FixdeskError::assistant("mock query failure"));
        }
        Ok(self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock answer".to_string()))
    }

    async fn preload_history(
        &self,
        conversation_id: ConversationId,
        messages: &[ContextMessage],
    ) -> Result<(), FixdeskError> {
        if self.fail_preload.load(Ordering::SeqCst) {
            return Err(FixdeskError::assistant("mock preload failure"));
        }
        self.preloads
            .lock()
            .await
            .push((conversation_id, messages.to_vec()));
        Ok(())
    }
}
