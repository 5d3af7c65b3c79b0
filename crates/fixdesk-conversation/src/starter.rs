// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Find-or-create the conversation for an error log.

use fixdesk_core::error::FixdeskError;
use fixdesk_core::types::{ContextMessage, ConversationId, LogFilter, LogId, Message, Role};
use tracing::info;

use crate::orchestrator::ConversationServices;
use crate::prompts;

/// The conversation a log was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartedConversation {
    pub conversation_id: ConversationId,
    /// False if the log already had a conversation.
    pub created: bool,
}

/// Returns the conversation for `log_id`, creating and seeding it if needed.
///
/// A new conversation opens with the error as a user message followed by
/// an assistant message carrying the suggested solution after
/// [`prompts::SOLUTION_MARKER`]. Both are mirrored to the assistant.
pub async fn open_for_log(
    services: &ConversationServices,
    log_id: LogId,
) -> Result<StartedConversation, FixdeskError> {
    if let Some(existing) = services.store.find_conversation_by_log(log_id).await? {
        return Ok(StartedConversation {
            conversation_id: existing.conversation_id,
            created: false,
        });
    }

    let log = services
        .store
        .list_logs(&LogFilter::default())
        .await?
        .into_iter()
        .find(|row| row.log_id == log_id)
        .ok_or_else(|| FixdeskError::NotFound {
            resource: "log".into(),
            id: log_id.to_string(),
        })?;

    let seed = ContextMessage {
        sent_at: chrono::Utc::now().naive_utc(),
        role: Role::User,
        content: prompts::seed_message(&log.content),
    };
    let conversation_id = services
        .store
        .create_conversation(log_id, std::slice::from_ref(&seed))
        .await?;

    // Periods are stripped from the error text before asking for a suggestion.
    let suggestion = services
        .store
        .suggest_solution(conversation_id, &log.content.replace('.', ""))
        .await?;

    let proposal = Message::assistant(
        conversation_id,
        prompts::proposed_solution(&log.content, suggestion.text()),
    );
    services
        .store
        .append_messages(conversation_id, std::slice::from_ref(&proposal))
        .await?;

    services
        .sync
        .mirror_entries(conversation_id, vec![seed, proposal.context_entry()]);

    info!(
        conversation_id = conversation_id.0,
        log_id = log_id.0,
        "conversation created"
    );
    Ok(StartedConversation {
        conversation_id,
        created: true,
    })
}
