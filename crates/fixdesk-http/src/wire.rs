// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies that exist only on the wire.
//!
//! Domain records (messages, logs, knowledge entries) serialize directly
//! from `fixdesk_core::types`; these are the envelopes around them.

use fixdesk_core::types::{ContextMessage, ConversationId, LogId};
use serde::{Deserialize, Serialize};

/// FastAPI-style error body: `{"detail": "..."}` or a list of validation errors.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub detail: serde_json::Value,
}

impl ApiErrorBody {
    pub fn into_message(self) -> String {
        match self.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolvedBody {
    pub resolved: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateConversationRequest<'a> {
    #[serde(rename = "logId")]
    pub log_id: LogId,
    pub messages: &'a [ContextMessage],
}

#[derive(Debug, Deserialize)]
pub struct ConversationCreated {
    #[serde(rename = "ConversationId")]
    pub conversation_id: ConversationId,
}

/// Conversation ids travel as strings to the solution and assistant endpoints.
#[derive(Debug, Serialize)]
pub struct SolutionRequest<'a> {
    pub conversation_id: String,
    pub log_content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SolutionResponse {
    #[serde(rename = "knownError")]
    pub known_error: bool,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(rename = "generatedSolution", default)]
    pub generated_solution: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SolutionUpdate<'a> {
    pub solution: &'a str,
}

/// Response of `GET /test-db`.
#[derive(Debug, Deserialize)]
pub struct DbCheck {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub conversation_id: String,
    pub query: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct PreloadRequest<'a> {
    pub conversation_id: String,
    pub messages: &'a [ContextMessage],
}
