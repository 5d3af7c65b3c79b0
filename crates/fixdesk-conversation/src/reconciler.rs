// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge-base reconciliation of captured solutions.
//!
//! An entry is looked up by exact error content and either has its
//! solution overwritten or is created. The steps are not transactional:
//! two concurrent captures for the same content may both create an entry,
//! or one update may be lost. Callers treat the result as best-effort.
//!
//! Deduplication is by content alone; the machine id is written on create
//! but two machines reporting the same error text share one entry.

use std::sync::Arc;

use fixdesk_config::model::KnowledgeConfig;
use fixdesk_core::error::FixdeskError;
use fixdesk_core::traits::KnowledgeStore;
use fixdesk_core::types::{KnowledgeId, Machine, MachineId, NewKnowledgeEntry};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Which branch a reconciliation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Created(KnowledgeId),
    Updated(KnowledgeId),
}

impl ReconcileOutcome {
    pub fn knowledge_id(&self) -> KnowledgeId {
        match self {
            ReconcileOutcome::Created(id) | ReconcileOutcome::Updated(id) => *id,
        }
    }
}

/// Finds-or-creates knowledge entries for captured solutions.
pub struct KnowledgeReconciler {
    store: Arc<dyn KnowledgeStore>,
    /// Machine list, fetched once on first use.
    machines: OnceCell<Vec<Machine>>,
    content_type: String,
    default_machine_id: MachineId,
}

impl KnowledgeReconciler {
    pub fn new(store: Arc<dyn KnowledgeStore>, config: &KnowledgeConfig) -> Self {
        Self {
            store,
            machines: OnceCell::new(),
            content_type: config.content_type.clone(),
            default_machine_id: MachineId(config.default_machine_id),
        }
    }

    /// Maps a machine display name to its id, or the configured default.
    ///
    /// A missing or unknown name never fails. A failure to fetch the
    /// machine list does, and is not cached.
    pub async fn resolve_machine_id(
        &self,
        machine_name: Option<&str>,
    ) -> Result<MachineId, FixdeskError> {
        let Some(name) = machine_name else {
            return Ok(self.default_machine_id);
        };
        let machines = self
            .machines
            .get_or_try_init(|| self.store.list_machines())
            .await?;
        Ok(machines
            .iter()
            .find(|m| m.machine_name == name)
            .map(|m| m.machine_id)
            .unwrap_or(self.default_machine_id))
    }

    /// Writes `solution` for the error `content`.
    pub async fn reconcile(
        &self,
        content: &str,
        machine_name: Option<&str>,
        solution: &str,
    ) -> Result<ReconcileOutcome, FixdeskError> {
        let machine_id = self.resolve_machine_id(machine_name).await?;
        let lookup = self.store.exists(content).await?;

        if lookup.exists {
            let knowledge_id = lookup.knowledge_id.ok_or_else(|| {
                FixdeskError::backend("knowledge lookup reported a match without an id")
            })?;
            self.store.update_solution(knowledge_id, solution).await?;
            info!(knowledge_id = knowledge_id.0, "knowledge entry updated");
            return Ok(ReconcileOutcome::Updated(knowledge_id));
        }

        let entry = NewKnowledgeEntry {
            content: content.to_string(),
            content_type: self.content_type.clone(),
            machine_id,
            solution: solution.to_string(),
        };
        debug!(machine_id = machine_id.0, "creating knowledge entry");
        let created = self.store.create(&entry).await?;
        info!(knowledge_id = created.knowledge_id.0, "knowledge entry created");
        Ok(ReconcileOutcome::Created(created.knowledge_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixdesk_test_utils::MockBackend;

    fn reconciler(backend: &Arc<MockBackend>) -> KnowledgeReconciler {
        KnowledgeReconciler::new(backend.clone(), &KnowledgeConfig::default())
    }

    #[tokio::test]
    async fn creates_then_updates_single_entry() {
        let backend = Arc::new(MockBackend::new());
        let r = reconciler(&backend);

        let first = r.reconcile("E42 overheat", None, "S1").await.unwrap();
        let second = r.reconcile("E42 overheat", None, "S2").await.unwrap();

        assert!(matches!(first, ReconcileOutcome::Created(_)));
        assert_eq!(second, ReconcileOutcome::Updated(first.knowledge_id()));
        let entries = backend.knowledge_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].solution.as_deref(), Some("S2"));
        assert_eq!(entries[0].content_type, "Guide");
    }

    #[tokio::test]
    async fn content_match_is_case_sensitive() {
        let backend = Arc::new(MockBackend::new());
        let r = reconciler(&backend);
        r.reconcile("Disk full", None, "a").await.unwrap();
        r.reconcile("disk full", None, "b").await.unwrap();
        assert_eq!(backend.knowledge_entries().await.len(), 2);
    }

    #[tokio::test]
    async fn machine_name_resolves_to_id() {
        let backend = Arc::new(MockBackend::new());
        backend.add_machine(7, "press-07").await;
        let r = reconciler(&backend);

        assert_eq!(r.resolve_machine_id(Some("press-07")).await.unwrap(), MachineId(7));
        assert_eq!(r.resolve_machine_id(Some("unknown")).await.unwrap(), MachineId(1));
        assert_eq!(r.resolve_machine_id(None).await.unwrap(), MachineId(1));
        r.reconcile("E1", Some("press-07"), "fix").await.unwrap();
        assert_eq!(backend.knowledge_entries().await[0].machine_id, MachineId(7));
    }

    #[tokio::test]
    async fn machine_list_is_fetched_once() {
        let backend = Arc::new(MockBackend::new());
        backend.add_machine(2, "lathe").await;
        let r = reconciler(&backend);
        r.resolve_machine_id(Some("lathe")).await.unwrap();
        r.resolve_machine_id(Some("lathe")).await.unwrap();
        assert_eq!(backend.machine_list_calls(), 1);
    }

    #[tokio::test]
    async fn store_failure_propagates_without_write() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_knowledge(true);
        let r = reconciler(&backend);
        let err = r.reconcile("E1", None, "fix").await.unwrap_err();
        assert!(err.is_transient());
        backend.fail_knowledge(false);
        assert!(backend.knowledge_entries().await.is_empty());
    }
}
