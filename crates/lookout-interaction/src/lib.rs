//! Model backends and the conversation engine.

pub mod backend;
pub mod engine;
pub mod ollama_api_agent;

pub use backend::{ChatBackend, ChunkStream};
pub use engine::ConversationEngine;
pub use ollama_api_agent::OllamaApiAgent;
