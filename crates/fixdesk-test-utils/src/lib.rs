// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for fixdesk.
//!
//! Provides in-memory collaborators and a harness so the conversation
//! workflow can be exercised without the backend or assistant services.
//!
//! # Components
//!
//! - [`MockBackend`] - Conversation, log, and knowledge-base store with failure injection
//! - [`MockAssistant`] - Assistant with queued answers and recorded context preloads
//! - [`TestHarness`] - Wires both into [`fixdesk_conversation::ConversationServices`]

pub mod harness;
pub mod mock_assistant;
pub mod mock_backend;

pub use harness::TestHarness;
pub use mock_assistant::MockAssistant;
pub use mock_backend::MockBackend;
