// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed texts the workflow writes into conversations.

/// Marker that precedes a proposed solution in the opening assistant message.
pub const SOLUTION_MARKER: &str = "**Solution we found:**";

/// Asked when the log is marked resolved.
pub const SOLUTION_QUESTION: &str = "I saw that you have triggered the solved switch. **Which solution did you use**, answer **'same'** if you used the provided solution, or **else tell me the solution that you used**.";

/// Reply token meaning "the proposed solution worked".
pub const SAME_TOKEN: &str = "same";

pub const KNOWLEDGE_UPDATED: &str = "Update to knowledge base completed successfully.";

pub const KNOWLEDGE_CREATED: &str = "New knowledge base entry created successfully.";

pub const NO_PREVIOUS_SOLUTION: &str = "No previous solution found to confirm with 'same'.";

/// Opening user message of a new conversation.
pub fn seed_message(log_content: &str) -> String {
    format!("**I encountered an error**: {log_content}")
}

/// Opening assistant message carrying the proposed solution.
pub fn proposed_solution(log_content: &str, solution: &str) -> String {
    format!("**For the problem:** {log_content}  \n{SOLUTION_MARKER} {solution}")
}
