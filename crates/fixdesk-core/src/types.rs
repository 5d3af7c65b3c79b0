// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the conversation core and its collaborators.
//!
//! Field names on the wire follow the backend's PascalCase JSON
//! (`SentDate`, `Role`, `LogContent`, ...). Roles travel as integers:
//! `0` is the assistant, `1` is the user.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use strum::Display;

/// Identifier of a conversation (one per log).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an error log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(pub i64);

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a knowledge-base entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeId(pub i64);

impl fmt::Display for KnowledgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(pub i64);

/// Identifier of a message.
///
/// Optimistic entries carry a client UUID; persisted entries may come back
/// with a server-assigned integer. Both deserialize into the same string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generates a fresh client-side identifier.
    pub fn generate() -> Self {
        MessageId(uuid::Uuid::new_v4().to_string())
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => MessageId(n.to_string()),
            Raw::Str(s) => MessageId(s),
        })
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Author of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(into = "u8", try_from = "u8")]
pub enum Role {
    Assistant,
    User,
}

impl From<Role> for u8 {
    fn from(role: Role) -> u8 {
        match role {
            Role::Assistant => 0,
            Role::User => 1,
        }
    }
}

impl TryFrom<u8> for Role {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Assistant),
            1 => Ok(Role::User),
            other => Err(format!("unknown role code {other}")),
        }
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "SentDate", with = "wire_time")]
    pub sent_at: NaiveDateTime,
    #[serde(rename = "Role")]
    pub role: Role,
    /// Markdown-flavored text.
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "MessageId")]
    pub id: MessageId,
    #[serde(rename = "ConversationId")]
    pub conversation_id: ConversationId,
}

impl Message {
    /// Builds a new message stamped with the current UTC time and a fresh id.
    pub fn new(conversation_id: ConversationId, role: Role, content: impl Into<String>) -> Self {
        Self {
            sent_at: chrono::Utc::now().naive_utc(),
            role,
            content: content.into(),
            id: MessageId::generate(),
            conversation_id,
        }
    }

    /// Builds an assistant message.
    pub fn assistant(conversation_id: ConversationId, content: impl Into<String>) -> Self {
        Self::new(conversation_id, Role::Assistant, content)
    }

    /// Builds a user message.
    pub fn user(conversation_id: ConversationId, content: impl Into<String>) -> Self {
        Self::new(conversation_id, Role::User, content)
    }

    /// The subset of the message pushed into the assistant's context store.
    pub fn context_entry(&self) -> ContextMessage {
        ContextMessage {
            sent_at: self.sent_at,
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// A message as mirrored into the assistant context store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    #[serde(rename = "SentDate", with = "wire_time")]
    pub sent_at: NaiveDateTime,
    #[serde(rename = "Role")]
    pub role: Role,
    #[serde(rename = "Content")]
    pub content: String,
}

/// The error log a conversation is about.
///
/// The resolved flag is not part of this record; it is fetched separately
/// and is shared by every conversation opened on the same log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    #[serde(rename = "LogId")]
    pub log_id: LogId,
    /// Error text; also the knowledge-base dedup key.
    #[serde(rename = "LogContent")]
    pub content: String,
    #[serde(rename = "MachineName", default)]
    pub machine_name: Option<String>,
}

/// A row of the processed error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSummary {
    #[serde(rename = "ProcessId")]
    pub process_id: i64,
    #[serde(rename = "LogId")]
    pub log_id: LogId,
    #[serde(rename = "Sentiment", default)]
    pub sentiment: Option<i64>,
    #[serde(rename = "Resolved")]
    pub resolved: bool,
    #[serde(rename = "DateCreated")]
    pub date_created: String,
    #[serde(rename = "LogContent")]
    pub content: String,
    #[serde(rename = "MachineName")]
    pub machine_name: String,
}

impl LogSummary {
    /// The log record this row describes.
    pub fn to_log(&self) -> Log {
        Log {
            log_id: self.log_id,
            content: self.content.clone(),
            machine_name: Some(self.machine_name.clone()),
        }
    }
}

/// Filters accepted by the error list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub machine_name: Option<String>,
    pub resolved: Option<bool>,
}

/// Link between a conversation and its log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRef {
    #[serde(rename = "ConversationId")]
    pub conversation_id: ConversationId,
    #[serde(rename = "LogId", default)]
    pub log_id: Option<LogId>,
}

/// A reusable error -> solution record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(rename = "KnowledgeId")]
    pub knowledge_id: KnowledgeId,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "ContentType")]
    pub content_type: String,
    #[serde(rename = "MachineId")]
    pub machine_id: MachineId,
    #[serde(rename = "Solution", default)]
    pub solution: Option<String>,
}

/// Payload for creating a knowledge-base entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewKnowledgeEntry {
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "ContentType")]
    pub content_type: String,
    #[serde(rename = "MachineId")]
    pub machine_id: MachineId,
    #[serde(rename = "Solution")]
    pub solution: String,
}

/// Result of a knowledge-base existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeLookup {
    pub exists: bool,
    #[serde(default)]
    pub knowledge_id: Option<KnowledgeId>,
}

/// Static reference entry used to turn a machine name into an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    #[serde(rename = "MachineId")]
    pub machine_id: MachineId,
    #[serde(rename = "MachineName")]
    pub machine_name: String,
}

/// A solution proposed for a freshly opened conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestedSolution {
    /// Taken from an existing knowledge-base entry.
    Known(String),
    /// Produced by the assistant because the error is not in the knowledge base.
    Generated(String),
}

impl SuggestedSolution {
    pub fn text(&self) -> &str {
        match self {
            SuggestedSolution::Known(s) | SuggestedSolution::Generated(s) => s,
        }
    }
}

/// Health status reported by collaborator health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Service is fully operational.
    Healthy,
    /// Service answers but reports a problem.
    Degraded(String),
    /// Service is not reachable or failing.
    Unhealthy(String),
}

/// Serde helpers for the backend's ISO-8601 timestamps.
///
/// Outgoing values are written as UTC with a `Z` suffix. Incoming values
/// may carry an offset (converted to UTC) or be naive (taken as UTC).
pub mod wire_time {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const OUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(OUT_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parses an RFC 3339 timestamp or a naive ISO-8601 one.
    pub fn parse(raw: &str) -> Result<NaiveDateTime, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| format!("invalid timestamp `{raw}`: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_numeric_codes() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "1");
        let parsed: Role = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, Role::User);
        assert!(serde_json::from_str::<Role>("7").is_err());
    }

    #[test]
    fn role_display() {
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn message_accepts_server_shape() {
        let json = r#"{
            "SentDate": "2025-01-10T08:30:00",
            "Role": 0,
            "Content": "hello",
            "MessageId": 42,
            "ConversationId": 7
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, MessageId("42".into()));
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.conversation_id, ConversationId(7));
        assert_eq!(msg.sent_at.to_string(), "2025-01-10 08:30:00");
    }

    #[test]
    fn message_accepts_offset_timestamps_and_uuid_ids() {
        let json = r#"{
            "SentDate": "2025-01-10T10:30:00+02:00",
            "Role": 1,
            "Content": "hi",
            "MessageId": "c0ffee",
            "ConversationId": 7
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id.0, "c0ffee");
        assert_eq!(msg.sent_at.to_string(), "2025-01-10 08:30:00");
    }

    #[test]
    fn outgoing_timestamps_are_utc_with_suffix() {
        let msg = Message {
            sent_at: wire_time::parse("2025-01-10T08:30:00.250").unwrap(),
            role: Role::User,
            content: "x".into(),
            id: MessageId("m1".into()),
            conversation_id: ConversationId(1),
        };
        let value = serde_json::to_value(msg.context_entry()).unwrap();
        assert_eq!(value["SentDate"], "2025-01-10T08:30:00.250Z");
        assert_eq!(value["Role"], 1);
        assert_eq!(value["Content"], "x");
        assert!(value.get("MessageId").is_none());
    }

    #[test]
    fn generated_message_ids_are_unique() {
        let a = Message::user(ConversationId(1), "a");
        let b = Message::user(ConversationId(1), "a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn log_machine_name_is_optional() {
        let log: Log = serde_json::from_str(r#"{"LogId": 3, "LogContent": "E42"}"#).unwrap();
        assert_eq!(log.log_id, LogId(3));
        assert!(log.machine_name.is_none());
    }

    #[test]
    fn suggested_solution_text() {
        assert_eq!(SuggestedSolution::Known("a".into()).text(), "a");
        assert_eq!(SuggestedSolution::Generated("b".into()).text(), "b");
    }
}
