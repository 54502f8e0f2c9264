//! Process-wide session state.
//!
//! The interactive loop and the deep-queue worker share one [`SessionState`].
//! Every accessor takes its lock, finishes the read or write and releases it
//! before returning, so no caller can hold the history or the clock across an
//! `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use super::message::{ConversationHistory, ConversationMessage, MessageRole};

/// Conversation history plus the clock mark of the last rendered answer.
#[derive(Debug)]
pub struct SessionState {
    history: Mutex<ConversationHistory>,
    last_output: Mutex<Instant>,
}

impl SessionState {
    /// Creates a session whose history opens with the assistant persona message.
    ///
    /// The last-output mark starts at creation time.
    pub fn new(persona: impl Into<String>) -> Self {
        let mut history = ConversationHistory::new();
        history.push(ConversationMessage::assistant(persona));
        Self {
            history: Mutex::new(history),
            last_output: Mutex::new(Instant::now()),
        }
    }

    fn history(&self) -> MutexGuard<'_, ConversationHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clock(&self) -> MutexGuard<'_, Instant> {
        self.last_output.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_message(&self, role: MessageRole, content: impl Into<String>) {
        self.history().push(ConversationMessage::new(role, content));
    }

    /// Appends a message and returns the outbound snapshot that ends with it.
    ///
    /// Both happen under one lock, so a concurrent writer cannot slip a
    /// message in between.
    pub fn push_and_snapshot(
        &self,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Vec<ConversationMessage> {
        let mut history = self.history();
        history.push(ConversationMessage::new(role, content));
        history.outbound()
    }

    /// Snapshot of the full history.
    pub fn history_snapshot(&self) -> ConversationHistory {
        self.history().clone()
    }

    pub fn history_len(&self) -> usize {
        self.history().len()
    }

    /// Records that an answer was just rendered to the terminal.
    pub fn mark_output(&self) {
        *self.clock() = Instant::now();
    }

    pub fn last_output(&self) -> Instant {
        *self.clock()
    }

    /// True when strictly more than `idle_wait` has passed since the last render.
    pub fn is_idle(&self, idle_wait: Duration) -> bool {
        self.last_output().elapsed() > idle_wait
    }
}
