// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation creation for error logs.

use fixdesk_conversation::prompts::{proposed_solution, seed_message};
use fixdesk_conversation::SendOutcome;
use fixdesk_core::FixdeskError;
use fixdesk_core::types::{ConversationId, Role};
use fixdesk_test_utils::TestHarness;

#[tokio::test]
async fn new_log_gets_seeded_conversation() {
    let h = TestHarness::builder()
        .with_log(5, "Fan failure on unit 3", "press-07")
        .build()
        .await;
    h.backend.set_generated_solution("replace the fan").await;

    let started = h.start(5).await.unwrap();
    h.flush().await;

    assert!(started.created);
    let messages = h.backend.messages(started.conversation_id).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, seed_message("Fan failure on unit 3"));
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(
        messages[1].content,
        proposed_solution("Fan failure on unit 3", "replace the fan")
    );

    let mirrored: Vec<String> = h
        .assistant
        .preloaded(started.conversation_id)
        .await
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(
        mirrored,
        [messages[0].content.clone(), messages[1].content.clone()]
    );
}

#[tokio::test]
async fn existing_conversation_is_reused() {
    let h = TestHarness::builder()
        .with_log(5, "E5", "m")
        .with_conversation(42, 5, Vec::new())
        .build()
        .await;

    let started = h.start(5).await.unwrap();

    assert!(!started.created);
    assert_eq!(started.conversation_id, ConversationId(42));
    assert!(h.backend.messages(ConversationId(42)).await.is_empty());
}

#[tokio::test]
async fn starting_twice_creates_once() {
    let h = TestHarness::builder().with_log(5, "E5", "m").build().await;
    let first = h.start(5).await.unwrap();
    let second = h.start(5).await.unwrap();
    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.conversation_id, second.conversation_id);
}

#[tokio::test]
async fn known_solution_is_proposed_and_confirmed_with_same() {
    let h = TestHarness::builder()
        .with_log(8, "Disk full.", "db-01")
        .build()
        .await;
    h.backend.add_knowledge("Disk full", "clean /tmp").await;

    let started = h.start(8).await.unwrap();
    let conversation = h.open(started.conversation_id.0).await.unwrap();
    let state = conversation.snapshot().await;
    assert_eq!(
        state.timeline.get(1).unwrap().content,
        proposed_solution("Disk full.", "clean /tmp")
    );

    conversation.toggle_resolved(true).await.unwrap();
    let outcome = conversation.send_message("same").await.unwrap();

    assert!(matches!(outcome, SendOutcome::SolutionCaptured { .. }));
    let entries = h.backend.knowledge_entries().await;
    let captured = entries
        .iter()
        .find(|e| e.content == "Disk full.")
        .expect("entry keyed by the full log text");
    assert_eq!(captured.solution.as_deref(), Some("clean /tmp"));
}

#[tokio::test]
async fn unknown_log_is_not_found() {
    let h = TestHarness::builder().build().await;
    let err = h.start(77).await.unwrap_err();
    assert!(matches!(err, FixdeskError::NotFound { ref resource, .. } if resource == "log"));
}
