// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP adapters for the fixdesk collaborator services.
//!
//! - [`BackendClient`] implements the conversation/log store and the
//!   knowledge-base store against the backend REST API.
//! - [`AssistantClient`] implements the assistant query and context
//!   preload endpoints.
//!
//! Requests are sent once with the configured timeout; nothing is retried.

pub mod assistant;
pub mod backend;
mod client;
pub mod wire;

pub use assistant::AssistantClient;
pub use backend::BackendClient;
