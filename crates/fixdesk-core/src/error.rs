// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for fixdesk.

use thiserror::Error;

/// The primary error type used across all collaborator traits and the conversation core.
#[derive(Debug, Error)]
pub enum FixdeskError {
    /// Configuration errors (invalid TOML, bad URLs, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Conversation, log, or knowledge-base service failures (transport, status, decoding).
    #[error("backend error: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Assistant query or context preload failures.
    #[error("assistant error: {message}")]
    Assistant {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A record the caller asked for does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// The caller supplied input that cannot be acted on (e.g. an empty message).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Another action on the same conversation is still running.
    #[error("conversation {conversation_id} is busy with another action")]
    Busy { conversation_id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FixdeskError {
    /// Shorthand for a backend error without an underlying cause.
    pub fn backend(message: impl Into<String>) -> Self {
        FixdeskError::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for an assistant error without an underlying cause.
    pub fn assistant(message: impl Into<String>) -> Self {
        FixdeskError::Assistant {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for I/O failures against a collaborator service.
    ///
    /// These are the failures the orchestrator recovers from locally by
    /// reverting optimistic state. They are never retried automatically.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FixdeskError::Backend { .. } | FixdeskError::Assistant { .. }
        )
    }
}
