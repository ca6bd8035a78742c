//! Role-tagged chat messages and the bounded turn history.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of user/assistant exchanges kept in a [`TurnHistory`] by default.
pub const MAX_HISTORY_EXCHANGES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message, serialized the way chat completion APIs expect it:
/// `{"role": "user", "content": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered log of past exchanges, bounded to the most recent `max_exchanges`.
///
/// Messages are only ever added in user/assistant pairs, and eviction removes
/// whole pairs from the front, so an exchange is never split.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnHistory {
    messages: VecDeque<ChatMessage>,
    max_exchanges: usize,
}

impl Default for TurnHistory {
    fn default() -> Self {
        Self::new(MAX_HISTORY_EXCHANGES)
    }
}

impl TurnHistory {
    pub fn new(max_exchanges: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(max_exchanges * 2),
            max_exchanges,
        }
    }

    /// Appends one exchange, evicting the oldest ones beyond the bound.
    pub fn push_exchange(&mut self, user: ChatMessage, assistant: ChatMessage) {
        self.messages.push_back(user);
        self.messages.push_back(assistant);
        while self.messages.len() > self.max_exchanges * 2 {
            self.messages.pop_front();
            self.messages.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of messages (not exchanges).
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn max_exchanges(&self) -> usize {
        self.max_exchanges
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }
}
