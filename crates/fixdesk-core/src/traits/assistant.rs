// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assistant query service trait.

use async_trait::async_trait;

use crate::error::FixdeskError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{ContextMessage, ConversationId};

/// The assistant that answers operator questions and keeps per-conversation memory.
#[async_trait]
pub trait AssistantService: ServiceAdapter {
    /// Asks the assistant a question within a conversation and returns its answer.
    async fn query(&self, conversation_id: ConversationId, text: &str)
        -> Result<String, FixdeskError>;

    /// Pushes messages into the assistant's context store for a conversation.
    async fn preload_history(
        &self,
        conversation_id: ConversationId,
        messages: &[ContextMessage],
    ) -> Result<(), FixdeskError>;
}
