//! Chat backend contract.

use async_trait::async_trait;
use futures::stream::BoxStream;
use lookout_core::Result;
use lookout_core::session::ConversationMessage;

/// Incremental content chunks of one streamed completion.
pub type ChunkStream = BoxStream<'static, Result<String>>;

/// A chat-completion model.
///
/// Implementations decode deterministically. Both calls surface transport and
/// model failures as errors; callers decide how to report them.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns the whole completion at once.
    async fn chat(&self, messages: &[ConversationMessage]) -> Result<String>;

    /// Streams the completion as content chunks.
    async fn chat_stream(&self, messages: &[ConversationMessage]) -> Result<ChunkStream>;
}
