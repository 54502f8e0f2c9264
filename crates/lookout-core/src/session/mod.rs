//! Conversation session types.
//!
//! - [`message`]: roles and messages
//! - [`state`]: the per-process session (history and the last-output clock)

pub mod message;
pub mod state;

pub use message::{ConversationHistory, ConversationMessage, MessageRole};
pub use state::SessionState;
