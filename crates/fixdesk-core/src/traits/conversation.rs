// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation and log store trait.

use async_trait::async_trait;

use crate::error::FixdeskError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{
    ContextMessage, ConversationId, ConversationRef, Log, LogFilter, LogId, LogSummary,
    Message, SuggestedSolution,
};

/// Durable store for conversations, their messages, and the log resolved flag.
///
/// The resolved flag is keyed by log, so every conversation opened on the
/// same log observes the same value.
#[async_trait]
pub trait ConversationStore: ServiceAdapter {
    /// Fetches the log a conversation belongs to.
    async fn get_log(&self, conversation_id: ConversationId) -> Result<Log, FixdeskError>;

    /// Reads the resolved flag of a log.
    async fn get_resolved(&self, log_id: LogId) -> Result<bool, FixdeskError>;

    /// Writes the resolved flag of a log.
    async fn set_resolved(&self, log_id: LogId, resolved: bool) -> Result<(), FixdeskError>;

    /// Returns the durable message history of a conversation, oldest first.
    async fn get_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, FixdeskError>;

    /// Appends messages to a conversation, in order.
    async fn append_messages(
        &self,
        conversation_id: ConversationId,
        messages: &[Message],
    ) -> Result<(), FixdeskError>;

    /// Lists processed error logs matching the filter.
    async fn list_logs(&self, filter: &LogFilter) -> Result<Vec<LogSummary>, FixdeskError>;

    /// Finds the conversation already opened for a log, if any.
    async fn find_conversation_by_log(
        &self,
        log_id: LogId,
    ) -> Result<Option<ConversationRef>, FixdeskError>;

    /// Creates the conversation for a log, seeded with the given messages.
    async fn create_conversation(
        &self,
        log_id: LogId,
        seed: &[ContextMessage],
    ) -> Result<ConversationId, FixdeskError>;

    /// Asks the backend for a solution to an error: a known knowledge-base
    /// solution if one matches, otherwise an assistant-generated one.
    async fn suggest_solution(
        &self,
        conversation_id: ConversationId,
        log_content: &str,
    ) -> Result<SuggestedSolution, FixdeskError>;
}
