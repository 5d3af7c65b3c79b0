// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory backend for deterministic testing.
//!
//! `MockBackend` implements both [`ConversationStore`] and
//! [`KnowledgeStore`] over plain collections, with switches to make
//! individual operations fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use fixdesk_core::FixdeskError;
use fixdesk_core::traits::{ConversationStore, KnowledgeStore, ServiceAdapter};
use fixdesk_core::types::{
    ContextMessage, ConversationId, ConversationRef, HealthStatus, KnowledgeEntry, KnowledgeId,
    KnowledgeLookup, Log, LogFilter, LogId, LogSummary, Machine, MachineId, Message, MessageId,
    NewKnowledgeEntry, SuggestedSolution,
};

const UNLIMITED: usize = usize::MAX;

#[derive(Default)]
struct BackendData {
    logs: Vec<LogSummary>,
    conversations: HashMap<ConversationId, LogId>,
    messages: HashMap<ConversationId, Vec<Message>>,
    resolved: HashMap<LogId, bool>,
    machines: Vec<Machine>,
    knowledge: Vec<KnowledgeEntry>,
    generated_solution: Option<String>,
    next_conversation_id: i64,
    next_knowledge_id: i64,
}

/// An in-memory conversation, log, and knowledge-base store.
pub struct MockBackend {
    data: Mutex<BackendData>,
    /// Appends that may still succeed; `UNLIMITED` disables the limit.
    append_budget: AtomicUsize,
    fail_reads: AtomicBool,
    fail_set_resolved: AtomicBool,
    fail_knowledge: AtomicBool,
    hide_log_machine_names: AtomicBool,
    machine_list_calls: AtomicUsize,
    knowledge_writes: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(BackendData {
                next_conversation_id: 100,
                next_knowledge_id: 1,
                ..BackendData::default()
            }),
            append_budget: AtomicUsize::new(UNLIMITED),
            fail_reads: AtomicBool::new(false),
            fail_set_resolved: AtomicBool::new(false),
            fail_knowledge: AtomicBool::new(false),
            hide_log_machine_names: AtomicBool::new(false),
            machine_list_calls: AtomicUsize::new(0),
            knowledge_writes: AtomicUsize::new(0),
        }
    }

    /// Register an error log.
    pub async fn add_log(&self, log_id: i64, content: &str, machine_name: &str) {
        self.data.lock().await.logs.push(LogSummary {
            process_id: log_id,
            log_id: LogId(log_id),
            sentiment: None,
            resolved: false,
            date_created: "2025-01-01T00:00:00".to_string(),
            content: content.to_string(),
            machine_name: machine_name.to_string(),
        });
    }

    /// Register a conversation on a log with existing history.
    pub async fn add_conversation(&self, conversation_id: i64, log_id: i64, history: Vec<Message>) {
        let mut data = self.data.lock().await;
        data.conversations
            .insert(ConversationId(conversation_id), LogId(log_id));
        data.messages.insert(ConversationId(conversation_id), history);
    }

    pub async fn add_machine(&self, machine_id: i64, machine_name: &str) {
        self.data.lock().await.machines.push(Machine {
            machine_id: MachineId(machine_id),
            machine_name: machine_name.to_string(),
        });
    }

    /// Insert a knowledge entry directly, bypassing write counters.
    pub async fn add_knowledge(&self, content: &str, solution: &str) -> KnowledgeId {
        let mut data = self.data.lock().await;
        let knowledge_id = KnowledgeId(data.next_knowledge_id);
        data.next_knowledge_id += 1;
        data.knowledge.push(KnowledgeEntry {
            knowledge_id,
            content: content.to_string(),
            content_type: "Guide".to_string(),
            machine_id: MachineId(1),
            solution: Some(solution.to_string()),
        });
        knowledge_id
    }

    /// Text returned by `suggest_solution` for errors not in the knowledge base.
    pub async fn set_generated_solution(&self, text: &str) {
        self.data.lock().await.generated_solution = Some(text.to_string());
    }

    pub async fn set_resolved_flag(&self, log_id: i64, resolved: bool) {
        self.data.lock().await.resolved.insert(LogId(log_id), resolved);
    }

    /// Make every message append fail (`true`) or succeed (`false`).
    pub fn fail_append(&self, fail: bool) {
        self.append_budget
            .store(if fail { 0 } else { UNLIMITED }, Ordering::SeqCst);
    }

    /// Let the next `successes` appends succeed, then fail the rest.
    pub fn fail_append_after(&self, successes: usize) {
        self.append_budget.store(successes, Ordering::SeqCst);
    }

    /// Make log, resolved-flag, and message reads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_set_resolved(&self, fail: bool) {
        self.fail_set_resolved.store(fail, Ordering::SeqCst);
    }

    /// Make every knowledge-base call fail, including the machine list.
    pub fn fail_knowledge(&self, fail: bool) {
        self.fail_knowledge.store(fail, Ordering::SeqCst);
    }

    /// Make `get_log` omit the machine name, as the HTTP backend does.
    pub fn hide_log_machine_names(&self, hide: bool) {
        self.hide_log_machine_names.store(hide, Ordering::SeqCst);
    }

    pub fn machine_list_calls(&self) -> usize {
        self.machine_list_calls.load(Ordering::SeqCst)
    }

    /// Number of successful knowledge-base creates and updates.
    pub fn knowledge_writes(&self) -> usize {
        self.knowledge_writes.load(Ordering::SeqCst)
    }

    pub async fn knowledge_entries(&self) -> Vec<KnowledgeEntry> {
        self.data.lock().await.knowledge.clone()
    }

    /// Durable messages of a conversation, in append order.
    pub async fn messages(&self, conversation_id: ConversationId) -> Vec<Message> {
        self.data
            .lock()
            .await
            .messages
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn resolved(&self, log_id: LogId) -> bool {
        self.data
            .lock()
            .await
            .resolved
            .get(&log_id)
            .copied()
            .unwrap_or(false)
    }

    fn check_reads(&self) -> Result<(), FixdeskError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(FixdeskError::backend("mock read failure"));
        }
        Ok(())
    }

    fn check_knowledge(&self) -> Result<(), FixdeskError> {
        if self.fail_knowledge.load(Ordering::SeqCst) {
            return Err(FixdeskError::backend("mock knowledge failure"));
        }
        Ok(())
    }

    fn take_append_budget(&self) -> Result<(), FixdeskError> {
        let result = self
            .append_budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                UNLIMITED => Some(UNLIMITED),
                n => Some(n - 1),
            });
        result
            .map(|_| ())
            .map_err(|_| FixdeskError::backend("mock append failure"))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(resource: &str, id: impl ToString) -> FixdeskError {
    FixdeskError::NotFound {
        resource: resource.to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl ServiceAdapter for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    async fn health_check(&self) -> Result<HealthStatus, FixdeskError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("reads failing".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ConversationStore for MockBackend {
    async fn get_log(&self, conversation_id: ConversationId) -> Result<Log, FixdeskError> {
        self.check_reads()?;
        let data = self.data.lock().await;
        let log_id = data
            .conversations
            .get(&conversation_id)
            .ok_or_else(|| not_found("conversation", conversation_id))?;
        let mut log = data
            .logs
            .iter()
            .find(|row| row.log_id == *log_id)
            .map(LogSummary::to_log)
            .ok_or_else(|| not_found("log", log_id))?;
        if self.hide_log_machine_names.load(Ordering::SeqCst) {
            log.machine_name = None;
        }
        Ok(log)
    }

    async fn get_resolved(&self, log_id: LogId) -> Result<bool, FixdeskError> {
        self.check_reads()?;
        Ok(self.resolved(log_id).await)
    }

    async fn set_resolved(&self, log_id: LogId, resolved: bool) -> Result<(), FixdeskError> {
        if self.fail_set_resolved.load(Ordering::SeqCst) {
            return Err(FixdeskError::backend("mock resolved failure"));
        }
        self.data.lock().await.resolved.insert(log_id, resolved);
        Ok(())
    }

    async fn get_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, FixdeskError> {
        self.check_reads()?;
        Ok(self.messages(conversation_id).await)
    }

    async fn append_messages(
        &self,
        conversation_id: ConversationId,
        messages: &[Message],
    ) -> Result<(), FixdeskError> {
        self.take_append_budget()?;
        let mut data = self.data.lock().await;
        if !data.conversations.contains_key(&conversation_id) {
            return Err(not_found("conversation", conversation_id));
        }
        data.messages
            .entry(conversation_id)
            .or_default()
            .extend_from_slice(messages);
        Ok(())
    }

    async fn list_logs(&self, filter: &LogFilter) -> Result<Vec<LogSummary>, FixdeskError> {
        self.check_reads()?;
        let data = self.data.lock().await;
        Ok(data
            .logs
            .iter()
            .map(|row| LogSummary {
                resolved: data.resolved.get(&row.log_id).copied().unwrap_or(row.resolved),
                ..row.clone()
            })
            .filter(|row| {
                filter
                    .machine_name
                    .as_ref()
                    .is_none_or(|name| &row.machine_name == name)
                    && filter.resolved.is_none_or(|r| row.resolved == r)
            })
            .collect())
    }

    async fn find_conversation_by_log(
        &self,
        log_id: LogId,
    ) -> Result<Option<ConversationRef>, FixdeskError> {
        self.check_reads()?;
        let data = self.data.lock().await;
        Ok(data
            .conversations
            .iter()
            .find(|(_, l)| **l == log_id)
            .map(|(c, l)| ConversationRef {
                conversation_id: *c,
                log_id: Some(*l),
            }))
    }

    async fn create_conversation(
        &self,
        log_id: LogId,
        seed: &[ContextMessage],
    ) -> Result<ConversationId, FixdeskError> {
        let mut data = self.data.lock().await;
        if !data.logs.iter().any(|row| row.log_id == log_id) {
            return Err(not_found("log", log_id));
        }
        let conversation_id = ConversationId(data.next_conversation_id);
        data.next_conversation_id += 1;
        data.conversations.insert(conversation_id, log_id);
        let messages = seed
            .iter()
            .map(|m| Message {
                sent_at: m.sent_at,
                role: m.role,
                content: m.content.clone(),
                id: MessageId::generate(),
                conversation_id,
            })
            .collect();
        data.messages.insert(conversation_id, messages);
        Ok(conversation_id)
    }

    async fn suggest_solution(
        &self,
        _conversation_id: ConversationId,
        log_content: &str,
    ) -> Result<SuggestedSolution, FixdeskError> {
        let data = self.data.lock().await;
        if let Some(solution) = data
            .knowledge
            .iter()
            .find(|e| e.content == log_content)
            .and_then(|e| e.solution.clone())
        {
            return Ok(SuggestedSolution::Known(solution));
        }
        Ok(SuggestedSolution::Generated(
            data.generated_solution
                .clone()
                .unwrap_or_else(|| "restart the service".to_string()),
        ))
    }
}

#[async_trait]
impl KnowledgeStore for MockBackend {
    async fn list_machines(&self) -> Result<Vec<Machine>, FixdeskError> {
        self.machine_list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_knowledge()?;
        Ok(self.data.lock().await.machines.clone())
    }

    async fn exists(&self, content: &str) -> Result<KnowledgeLookup, FixdeskError> {
        self.check_knowledge()?;
        let data = self.data.lock().await;
        let found = data.knowledge.iter().find(|e| e.content == content);
        Ok(KnowledgeLookup {
            exists: found.is_some(),
            knowledge_id: found.map(|e| e.knowledge_id),
        })
    }

    async fn create(&self, entry: &NewKnowledgeEntry) -> Result<KnowledgeEntry, FixdeskError> {
        self.check_knowledge()?;
        let mut data = self.data.lock().await;
        let created = KnowledgeEntry {
            knowledge_id: KnowledgeId(data.next_knowledge_id),
            content: entry.content.clone(),
            content_type: entry.content_type.clone(),
            machine_id: entry.machine_id,
            solution: Some(entry.solution.clone()),
        };
        data.next_knowledge_id += 1;
        data.knowledge.push(created.clone());
        self.knowledge_writes.fetch_add(1, Ordering::SeqCst);
        Ok(created)
    }

    async fn update_solution(
        &self,
        knowledge_id: KnowledgeId,
        solution: &str,
    ) -> Result<(), FixdeskError> {
        self.check_knowledge()?;
        let mut data = self.data.lock().await;
        let entry = data
            .knowledge
            .iter_mut()
            .find(|e| e.knowledge_id == knowledge_id)
            .ok_or_else(|| not_found("knowledge entry", knowledge_id))?;
        entry.solution = Some(solution.to_string());
        self.knowledge_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
