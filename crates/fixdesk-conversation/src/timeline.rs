// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory, append-only message timeline for one open conversation.
//!
//! The timeline is mutated optimistically: messages are appended before the
//! backend has accepted them and removed again with [`Timeline::rollback_last`]
//! if persistence fails. A transient loading placeholder can be shown at the
//! tail; it is never a message and is never persisted or mirrored.

use fixdesk_core::types::Message;
use serde::{Deserialize, Serialize};

/// Text rendered for the loading placeholder.
pub const LOADING_TEXT: &str = "Loading...";

/// An item as rendered by a view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineItem<'a> {
    Message(&'a Message),
    Loading,
}

/// Ordered sequence of conversation turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    messages: Vec<Message>,
    #[serde(default)]
    loading: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message at the end.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Removes the last `count` messages and returns them in append order.
    pub fn rollback_last(&mut self, count: usize) -> Vec<Message> {
        let keep = self.messages.len().saturating_sub(count);
        self.messages.split_off(keep)
    }

    /// Replaces the whole sequence with durable history, ordered by `sent_at`.
    ///
    /// The sort is stable so messages sharing a timestamp keep the order the
    /// store returned them in.
    pub fn replace_all(&mut self, mut messages: Vec<Message>) {
        messages.sort_by_key(|m| m.sent_at);
        self.messages = messages;
        self.loading = false;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Items to render, with the loading placeholder last when active.
    pub fn view(&self) -> Vec<TimelineItem<'_>> {
        let mut items: Vec<TimelineItem<'_>> =
            self.messages.iter().map(TimelineItem::Message).collect();
        if self.loading {
            items.push(TimelineItem::Loading);
        }
        items
    }
}
