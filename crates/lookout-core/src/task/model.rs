//! Task domain model.

use serde::{Deserialize, Serialize};

/// What the assistant does with a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// The task describes a software error.
    Error,
    /// Search the web, then answer from the merged results.
    Search,
    /// Answer from the model's own knowledge.
    Answer,
}

/// Result of classifying a raw task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutedTask {
    pub action: Action,
    /// Text handed to the next stage (the search query for `Search`).
    pub payload: String,
}

impl RoutedTask {
    pub fn new(action: Action, payload: impl Into<String>) -> Self {
        Self {
            action,
            payload: payload.into(),
        }
    }
}

/// Which queue a task came from, and so how its answer is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Interactive input or the immediate queue: stream to the terminal.
    Foreground,
    /// Deep queue: generate silently, clean up, then deliver through the idle policy.
    Background,
}

impl ExecutionMode {
    pub fn is_background(self) -> bool {
        matches!(self, Self::Background)
    }
}

/// Lifecycle of a queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Waiting in its queue.
    Pending,
    /// Popped and being processed.
    InFlight,
    /// Processing finished (answered, skipped or failed).
    Done,
}
