// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge-base store trait.

use async_trait::async_trait;

use crate::error::FixdeskError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{KnowledgeEntry, KnowledgeId, KnowledgeLookup, Machine, NewKnowledgeEntry};

/// Store of error -> solution entries and the machine reference list.
#[async_trait]
pub trait KnowledgeStore: ServiceAdapter {
    /// Returns the static machine reference list.
    async fn list_machines(&self) -> Result<Vec<Machine>, FixdeskError>;

    /// Checks whether an entry exists for the given error content.
    async fn exists(&self, content: &str) -> Result<KnowledgeLookup, FixdeskError>;

    /// Creates a new entry.
    async fn create(&self, entry: &NewKnowledgeEntry) -> Result<KnowledgeEntry, FixdeskError>;

    /// Replaces the solution of an existing entry.
    async fn update_solution(
        &self,
        knowledge_id: KnowledgeId,
        solution: &str,
    ) -> Result<(), FixdeskError>;
}
