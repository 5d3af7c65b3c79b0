// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort mirroring of durable messages into the assistant context store.
//!
//! Mirror requests are queued to a single background task so they reach the
//! assistant in the order they were issued and never block the caller.
//! Failures are logged and dropped.

use std::sync::Arc;

use fixdesk_core::traits::AssistantService;
use fixdesk_core::types::{ContextMessage, ConversationId, Message};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum SyncCommand {
    Mirror {
        conversation_id: ConversationId,
        messages: Vec<ContextMessage>,
    },
    Flush(oneshot::Sender<()>),
}

/// Handle to the mirroring worker.
///
/// Dropping the handle lets the worker finish the queued requests and exit;
/// nothing in flight is aborted.
pub struct ContextSynchronizer {
    tx: mpsc::UnboundedSender<SyncCommand>,
}

impl ContextSynchronizer {
    /// Spawns the worker on the current tokio runtime.
    pub fn spawn(assistant: Arc<dyn AssistantService>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<SyncCommand>();

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    SyncCommand::Mirror {
                        conversation_id,
                        messages,
                    } => {
                        let count = messages.len();
                        match assistant.preload_history(conversation_id, &messages).await {
                            Ok(()) => debug!(
                                conversation_id = conversation_id.0,
                                count, "mirrored messages to assistant context"
                            ),
                            Err(e) => warn!(
                                conversation_id = conversation_id.0,
                                count,
                                error = %e,
                                "context mirror failed"
                            ),
                        }
                    }
                    SyncCommand::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            debug!("context synchronizer stopped");
        });

        Self { tx }
    }

    /// Queues durable messages for mirroring.
    pub fn mirror(&self, conversation_id: ConversationId, messages: &[Message]) {
        self.mirror_entries(
            conversation_id,
            messages.iter().map(Message::context_entry).collect(),
        );
    }

    /// Queues already-projected context entries for mirroring.
    pub fn mirror_entries(&self, conversation_id: ConversationId, messages: Vec<ContextMessage>) {
        if messages.is_empty() {
            return;
        }
        if self
            .tx
            .send(SyncCommand::Mirror {
                conversation_id,
                messages,
            })
            .is_err()
        {
            warn!(
                conversation_id = conversation_id.0,
                "context synchronizer is gone, dropping mirror request"
            );
        }
    }

    /// Waits until every request queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(SyncCommand::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixdesk_test_utils::MockAssistant;
    use tracing_test::traced_test;

    const CID: ConversationId = ConversationId(3);

    #[tokio::test]
    async fn mirrors_in_issue_order() {
        let assistant = Arc::new(MockAssistant::new());
        let sync = ContextSynchronizer::spawn(assistant.clone());

        sync.mirror(CID, &[Message::user(CID, "one")]);
        sync.mirror(CID, &[Message::assistant(CID, "two"), Message::user(CID, "three")]);
        sync.flush().await;

        let contents: Vec<String> = assistant
            .preloaded(CID)
            .await
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, ["one", "two", "three"]);
    }

    #[tokio::test]
    async fn empty_batches_are_skipped() {
        let assistant = Arc::new(MockAssistant::new());
        let sync = ContextSynchronizer::spawn(assistant.clone());
        sync.mirror(CID, &[]);
        sync.flush().await;
        assert_eq!(assistant.preload_calls().await, 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn failures_are_logged_not_raised() {
        let assistant = Arc::new(MockAssistant::new());
        assistant.fail_preload(true);
        let sync = ContextSynchronizer::spawn(assistant.clone());

        sync.mirror(CID, &[Message::user(CID, "lost")]);
        sync.flush().await;

        assert!(assistant.preloaded(CID).await.is_empty());
        assert!(logs_contain("context mirror failed"));
    }
}
