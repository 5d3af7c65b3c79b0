// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation coordinator of the resolution workflow.
//!
//! One [`ConversationOrchestrator`] exists per open conversation. It owns
//! the timeline and the resolution state, and runs each user action as a
//! sequence of awaited steps:
//!
//! - **send**: append the user message, persist it, then either ask the
//!   assistant (idle) or capture the reply as a solution (awaiting).
//! - **toggle resolved**: flip the flag optimistically, persist it, and on
//!   success ask the capture question when the log became resolved.
//!
//! Every generated message is appended, persisted, then mirrored. A message
//! whose persistence fails is rolled back out of the timeline and never
//! mirrored. Only one action runs at a time; a second one gets
//! [`FixdeskError::Busy`].

use std::sync::Arc;

use fixdesk_config::model::KnowledgeConfig;
use fixdesk_core::error::FixdeskError;
use fixdesk_core::traits::{AssistantService, ConversationStore, KnowledgeStore};
use fixdesk_core::types::{ConversationId, Log, LogFilter, LogId, Message, MessageId};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::prompts;
use crate::reconciler::{KnowledgeReconciler, ReconcileOutcome};
use crate::resolution::{ReplyPlan, ResolutionState, ToggleEffect};
use crate::sync::ContextSynchronizer;
use crate::timeline::Timeline;

const EVENT_CAPACITY: usize = 256;

/// Collaborators shared by every open conversation.
#[derive(Clone)]
pub struct ConversationServices {
    pub store: Arc<dyn ConversationStore>,
    pub assistant: Arc<dyn AssistantService>,
    pub reconciler: Arc<KnowledgeReconciler>,
    pub sync: Arc<ContextSynchronizer>,
}

impl ConversationServices {
    /// Wires the collaborators and spawns the context synchronizer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        store: Arc<dyn ConversationStore>,
        assistant: Arc<dyn AssistantService>,
        knowledge: Arc<dyn KnowledgeStore>,
        config: &KnowledgeConfig,
    ) -> Self {
        Self {
            sync: Arc::new(ContextSynchronizer::spawn(assistant.clone())),
            reconciler: Arc::new(KnowledgeReconciler::new(knowledge, config)),
            store,
            assistant,
        }
    }
}

/// Everything the orchestrator knows about one open conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub conversation_id: ConversationId,
    pub log: Log,
    /// Locally observed resolved flag of the log.
    pub resolved: bool,
    pub resolution: ResolutionState,
    pub timeline: Timeline,
}

/// Notifications emitted on every observable change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    MessageAppended(Message),
    MessagesRolledBack(Vec<MessageId>),
    TimelineReplaced(Vec<Message>),
    Loading(bool),
    ResolvedChanged(bool),
    ResolutionChanged(ResolutionState),
}

/// Result of a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The assistant answered; the answer is persisted.
    Answered(Message),
    /// The reply was recorded in the knowledge base. `confirmation` is
    /// `None` if the confirmation message could not be persisted.
    SolutionCaptured {
        outcome: ReconcileOutcome,
        confirmation: Option<Message>,
    },
    /// "same" was answered without a proposed solution to confirm.
    NoPreviousSolution(Message),
}

/// Result of a successful resolved-flag change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub resolved: bool,
    /// The capture question, if one was asked and persisted.
    pub question: Option<Message>,
}

pub struct ConversationOrchestrator {
    conversation_id: ConversationId,
    services: ConversationServices,
    state: Mutex<ConversationState>,
    events: broadcast::Sender<ConversationEvent>,
}

impl ConversationOrchestrator {
    /// Loads a conversation: its log, the log's resolved flag, and the
    /// message history. Existing history is mirrored to the assistant
    /// before the orchestrator is returned.
    ///
    /// Any load failure is returned to the caller; there is no partial
    /// conversation.
    pub async fn open(
        services: ConversationServices,
        conversation_id: ConversationId,
    ) -> Result<Self, FixdeskError> {
        let mut log = services.store.get_log(conversation_id).await?;
        if log.machine_name.is_none() {
            log.machine_name = lookup_machine_name(&services, log.log_id).await;
        }
        let resolved = services.store.get_resolved(log.log_id).await?;
        let history = services.store.get_messages(conversation_id).await?;
        let mut timeline = Timeline::new();
        timeline.replace_all(history);

        if !timeline.is_empty() {
            services.sync.mirror(conversation_id, timeline.messages());
        }

        info!(
            conversation_id = conversation_id.0,
            log_id = log.log_id.0,
            resolved,
            messages = timeline.len(),
            "conversation opened"
        );

        Ok(Self::from_state(
            services,
            ConversationState {
                conversation_id,
                log,
                resolved,
                resolution: ResolutionState::Idle,
                timeline,
            },
        ))
    }

    /// Resumes from a previously captured state without touching the backend.
    pub fn from_state(services: ConversationServices, state: ConversationState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            conversation_id: state.conversation_id,
            services,
            state: Mutex::new(state),
            events,
        }
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    /// Returns a copy of the current state, waiting for a running action.
    pub async fn snapshot(&self) -> ConversationState {
        self.state.lock().await.clone()
    }

    /// True while an action is running.
    pub fn is_busy(&self) -> bool {
        self.state.try_lock().is_err()
    }

    /// Re-reads the durable history and replaces the timeline with it.
    ///
    /// Messages picked up this way are not mirrored again. On failure the
    /// timeline is left as it was.
    pub async fn reload(&self) -> Result<usize, FixdeskError> {
        let mut state = self.begin()?;
        let history = self
            .services
            .store
            .get_messages(state.conversation_id)
            .await?;
        state.timeline.replace_all(history);
        let count = state.timeline.len();
        debug!(
            conversation_id = state.conversation_id.0,
            messages = count,
            "timeline reloaded"
        );
        self.emit(ConversationEvent::TimelineReplaced(
            state.timeline.messages().to_vec(),
        ));
        Ok(count)
    }

    /// Sends a user message.
    ///
    /// In the idle state the text is forwarded to the assistant and the
    /// answer appended. While awaiting a solution the text is never sent to
    /// the assistant; it is reconciled into the knowledge base instead.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome, FixdeskError> {
        if text.trim().is_empty() {
            return Err(FixdeskError::InvalidInput("message is empty".into()));
        }
        let mut state = self.begin()?;
        let conversation_id = state.conversation_id;

        let user = Message::user(conversation_id, text);
        self.append_durable(&mut state, vec![user]).await?;

        let plan = state.resolution.plan_reply(text, &state.timeline);
        match plan {
            ReplyPlan::AskAssistant => {
                self.set_loading(&mut state, true);
                let answer = self.services.assistant.query(conversation_id, text).await;
                self.set_loading(&mut state, false);
                let answer = answer.inspect_err(|e| {
                    warn!(conversation_id = conversation_id.0, error = %e, "assistant query failed");
                })?;

                let reply = Message::assistant(conversation_id, answer);
                self.append_durable(&mut state, vec![reply.clone()]).await?;
                Ok(SendOutcome::Answered(reply))
            }
            ReplyPlan::Capture(solution) => {
                self.set_loading(&mut state, true);
                let outcome = self
                    .services
                    .reconciler
                    .reconcile(
                        &state.log.content,
                        state.log.machine_name.as_deref(),
                        &solution,
                    )
                    .await;
                self.set_loading(&mut state, false);
                let outcome = outcome.inspect_err(|e| {
                    warn!(
                        conversation_id = conversation_id.0,
                        error = %e,
                        "solution capture failed, still awaiting a solution"
                    );
                })?;

                self.set_resolution(&mut state, ResolutionState::Idle);
                let text = match outcome {
                    ReconcileOutcome::Created(_) => prompts::KNOWLEDGE_CREATED,
                    ReconcileOutcome::Updated(_) => prompts::KNOWLEDGE_UPDATED,
                };
                let confirmation = Message::assistant(conversation_id, text);
                let confirmation = match self
                    .append_durable(&mut state, vec![confirmation.clone()])
                    .await
                {
                    Ok(()) => Some(confirmation),
                    Err(_) => None,
                };
                Ok(SendOutcome::SolutionCaptured {
                    outcome,
                    confirmation,
                })
            }
            ReplyPlan::NoPreviousSolution => {
                let notice = Message::assistant(conversation_id, prompts::NO_PREVIOUS_SOLUTION);
                self.append_durable(&mut state, vec![notice.clone()]).await?;
                self.set_resolution(&mut state, ResolutionState::Idle);
                Ok(SendOutcome::NoPreviousSolution(notice))
            }
        }
    }

    /// Sets the log's resolved flag.
    ///
    /// The flag is updated locally first and reverted if the backend
    /// rejects it; the resolution state does not change in that case.
    /// Marking the log resolved from idle asks the capture question.
    pub async fn toggle_resolved(&self, resolved: bool) -> Result<ToggleOutcome, FixdeskError> {
        let mut state = self.begin()?;
        let conversation_id = state.conversation_id;
        let log_id = state.log.log_id;

        let previous = state.resolved;
        self.set_resolved_flag(&mut state, resolved);
        if let Err(e) = self.services.store.set_resolved(log_id, resolved).await {
            warn!(
                conversation_id = conversation_id.0,
                log_id = log_id.0,
                error = %e,
                "resolved flag not saved, reverting"
            );
            self.set_resolved_flag(&mut state, previous);
            return Err(e);
        }

        let transition = state.resolution.on_resolved_changed(resolved);
        let question = match transition.effect {
            ToggleEffect::AskForSolution => {
                let question = Message::assistant(conversation_id, prompts::SOLUTION_QUESTION);
                match self.append_durable(&mut state, vec![question.clone()]).await {
                    Ok(()) => {
                        self.set_resolution(&mut state, transition.next);
                        Some(question)
                    }
                    Err(_) => None,
                }
            }
            ToggleEffect::AbandonCapture => {
                self.set_resolution(&mut state, transition.next);
                None
            }
            ToggleEffect::None => None,
        };

        Ok(ToggleOutcome { resolved, question })
    }

    fn begin(&self) -> Result<MutexGuard<'_, ConversationState>, FixdeskError> {
        self.state.try_lock().map_err(|_| FixdeskError::Busy {
            conversation_id: self.conversation_id.to_string(),
        })
    }

    /// Appends messages, persists them, and mirrors them once persisted.
    /// On persistence failure they are removed from the timeline again.
    async fn append_durable(
        &self,
        state: &mut ConversationState,
        messages: Vec<Message>,
    ) -> Result<(), FixdeskError> {
        let conversation_id = state.conversation_id;
        for message in &messages {
            state.timeline.append(message.clone());
            self.emit(ConversationEvent::MessageAppended(message.clone()));
        }

        match self
            .services
            .store
            .append_messages(conversation_id, &messages)
            .await
        {
            Ok(()) => {
                debug!(
                    conversation_id = conversation_id.0,
                    count = messages.len(),
                    "messages persisted"
                );
                self.services.sync.mirror(conversation_id, &messages);
                Ok(())
            }
            Err(e) => {
                let removed = state.timeline.rollback_last(messages.len());
                warn!(
                    conversation_id = conversation_id.0,
                    count = removed.len(),
                    error = %e,
                    "messages not persisted, rolled back"
                );
                self.emit(ConversationEvent::MessagesRolledBack(
                    removed.into_iter().map(|m| m.id).collect(),
                ));
                Err(e)
            }
        }
    }

    fn set_loading(&self, state: &mut ConversationState, loading: bool) {
        state.timeline.set_loading(loading);
        self.emit(ConversationEvent::Loading(loading));
    }

    fn set_resolved_flag(&self, state: &mut ConversationState, resolved: bool) {
        state.resolved = resolved;
        self.emit(ConversationEvent::ResolvedChanged(resolved));
    }

    fn set_resolution(&self, state: &mut ConversationState, next: ResolutionState) {
        if state.resolution != next {
            info!(
                conversation_id = state.conversation_id.0,
                from = %state.resolution,
                to = %next,
                "resolution state changed"
            );
            state.resolution = next;
            self.emit(ConversationEvent::ResolutionChanged(next));
        }
    }

    fn emit(&self, event: ConversationEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Machine name of a log as listed in the error list.
///
/// The conversation log endpoint does not carry it. A failed lookup is
/// logged and leaves the name unknown.
async fn lookup_machine_name(services: &ConversationServices, log_id: LogId) -> Option<String> {
    match services.store.list_logs(&LogFilter::default()).await {
        Ok(rows) => rows
            .into_iter()
            .find(|row| row.log_id == log_id)
            .map(|row| row.machine_name),
        Err(e) => {
            warn!(log_id = log_id.0, error = %e, "machine name lookup failed");
            None
        }
    }
}
