// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation resolution workflow for fixdesk.
//!
//! An operator chats with the assistant about an error log, marks the log
//! resolved, and is asked which solution worked. The answer is written to
//! the knowledge base. This crate holds the pieces of that workflow:
//!
//! - [`timeline`]: the ordered, optimistic message list
//! - [`resolution`]: the state machine deciding chat vs. solution capture
//! - [`reconciler`]: find-or-create of knowledge-base entries
//! - [`sync`]: best-effort mirroring into the assistant context store
//! - [`orchestrator`]: the per-conversation coordinator
//! - [`starter`]: find-or-create of a conversation for a log

pub mod orchestrator;
pub mod prompts;
pub mod reconciler;
pub mod resolution;
pub mod starter;
pub mod sync;
pub mod timeline;

pub use orchestrator::{
    ConversationEvent, ConversationOrchestrator, ConversationServices, ConversationState,
    SendOutcome, ToggleOutcome,
};
pub use reconciler::{KnowledgeReconciler, ReconcileOutcome};
pub use resolution::ResolutionState;
pub use starter::{StartedConversation, open_for_log};
pub use sync::ContextSynchronizer;
pub use timeline::Timeline;
