// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolution state machine.
//!
//! Decides whether a user reply is ordinary chat or the answer to the
//! solution-capture question asked after the log was marked resolved.
//! Everything here is pure; the orchestrator performs the side effects.
//!
//! ```text
//! Idle --resolved(true)--> AwaitingSolutionConfirmation
//! Idle --resolved(false)--> Idle
//! AwaitingSolutionConfirmation --reply--> Idle   (after a successful capture)
//! AwaitingSolutionConfirmation --resolved(false)--> Idle
//! ```

use serde::{Deserialize, Serialize};

use crate::prompts::{SAME_TOKEN, SOLUTION_MARKER};
use crate::timeline::Timeline;
use fixdesk_core::types::Role;

/// States of the resolution FSM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionState {
    /// Normal chat: replies go to the assistant.
    #[default]
    Idle,
    /// The capture question was asked; the next reply is the solution.
    AwaitingSolutionConfirmation,
}

impl std::fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionState::Idle => write!(f, "idle"),
            ResolutionState::AwaitingSolutionConfirmation => {
                write!(f, "awaiting-solution-confirmation")
            }
        }
    }
}

/// Side effect requested by a resolved-flag change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleEffect {
    /// Append and persist the capture question, then move to awaiting.
    AskForSolution,
    /// Drop a pending capture.
    AbandonCapture,
    None,
}

/// Outcome of applying a resolved-flag change to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: ResolutionState,
    pub effect: ToggleEffect,
}

impl ResolutionState {
    /// Applies a successfully persisted resolved-flag change.
    ///
    /// `next` is the state to adopt once `effect` has been carried out. For
    /// [`ToggleEffect::AskForSolution`] the caller only adopts it after the
    /// question message has persisted.
    pub fn on_resolved_changed(self, resolved: bool) -> Transition {
        match (self, resolved) {
            (ResolutionState::Idle, true) => Transition {
                next: ResolutionState::AwaitingSolutionConfirmation,
                effect: ToggleEffect::AskForSolution,
            },
            (ResolutionState::AwaitingSolutionConfirmation, false) => Transition {
                next: ResolutionState::Idle,
                effect: ToggleEffect::AbandonCapture,
            },
            // Re-asserting `true` while awaiting keeps the question already asked.
            (state, _) => Transition {
                next: state,
                effect: ToggleEffect::None,
            },
        }
    }

    /// Decides what to do with a user reply in this state.
    pub fn plan_reply(self, reply: &str, timeline: &Timeline) -> ReplyPlan {
        match self {
            ResolutionState::Idle => ReplyPlan::AskAssistant,
            ResolutionState::AwaitingSolutionConfirmation => {
                if is_same_reply(reply) {
                    match extract_proposed_solution(timeline) {
                        Some(solution) => ReplyPlan::Capture(solution),
                        None => ReplyPlan::NoPreviousSolution,
                    }
                } else {
                    ReplyPlan::Capture(reply.to_string())
                }
            }
        }
    }
}

/// What a user reply should trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPlan {
    /// Forward to the assistant query service.
    AskAssistant,
    /// Reconcile this solution text into the knowledge base.
    Capture(String),
    /// "same" was answered but no proposed solution can be found.
    NoPreviousSolution,
}

/// True if the reply confirms the proposed solution.
pub fn is_same_reply(reply: &str) -> bool {
    reply.trim().eq_ignore_ascii_case(SAME_TOKEN)
}

/// Reads the proposed solution back out of the opening assistant message.
///
/// Only the second message of the timeline is considered, and only if it
/// was written by the assistant and contains [`SOLUTION_MARKER`]. Returns
/// the trimmed text after the marker, or `None` when that text is empty.
pub fn extract_proposed_solution(timeline: &Timeline) -> Option<String> {
    let message = timeline.get(1)?;
    if message.role != Role::Assistant {
        return None;
    }
    let (_, after) = message.content.split_once(SOLUTION_MARKER)?;
    let solution = after.trim();
    (!solution.is_empty()).then(|| solution.to_string())
}
