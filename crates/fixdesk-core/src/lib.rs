// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for fixdesk.
//!
//! Defines the domain types (messages, logs, knowledge entries), the shared
//! error type, and the collaborator traits implemented by the HTTP adapters
//! and the test mocks.

pub mod error;
pub mod traits;
pub mod types;

pub use error::FixdeskError;
pub use traits::{AssistantService, ConversationStore, KnowledgeStore, ServiceAdapter};
pub use types::{
    ContextMessage, ConversationId, HealthStatus, KnowledgeId, LogId, MachineId, Message,
    MessageId, Role,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_render() {
        let busy = FixdeskError::Busy {
            conversation_id: "7".into(),
        };
        assert_eq!(
            busy.to_string(),
            "conversation 7 is busy with another action"
        );
        let missing = FixdeskError::NotFound {
            resource: "conversation".into(),
            id: "9".into(),
        };
        assert_eq!(missing.to_string(), "conversation not found: 9");
        assert_eq!(
            FixdeskError::backend("down").to_string(),
            "backend error: down"
        );
    }

    #[test]
    fn only_service_failures_are_transient() {
        assert!(FixdeskError::backend("x").is_transient());
        assert!(FixdeskError::assistant("x").is_transient());
        assert!(!FixdeskError::InvalidInput("x".into()).is_transient());
        assert!(!FixdeskError::Internal("x".into()).is_transient());
    }

    #[test]
    fn all_traits_are_object_safe() {
        fn _store(_: &dyn ConversationStore) {}
        fn _knowledge(_: &dyn KnowledgeStore) {}
        fn _assistant(_: &dyn AssistantService) {}
    }
}
