// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the conversation core depends on.
//!
//! All traits extend [`ServiceAdapter`] and use `#[async_trait]` so they
//! can be held as `Arc<dyn Trait>`.

pub mod adapter;
pub mod assistant;
pub mod conversation;
pub mod knowledge;

pub use adapter::ServiceAdapter;
pub use assistant::AssistantService;
pub use conversation::ConversationStore;
pub use knowledge::KnowledgeStore;
