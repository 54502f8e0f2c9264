//! Conversation engine.
//!
//! Appends the user turn, calls the model with the whole history and appends
//! the assistant turn. Foreground calls stream to the [`OutputSink`];
//! background calls run silently and pass through a cleanup call. Model
//! failures become an assistant message in the history and are shown only in
//! the foreground.

use std::sync::Arc;

use futures::StreamExt;
use lookout_core::session::{ConversationMessage, MessageRole};
use lookout_core::task::ExecutionMode;
use lookout_core::{OutputSink, Result, SessionState, prompt};

use crate::backend::ChatBackend;

pub struct ConversationEngine {
    backend: Arc<dyn ChatBackend>,
    session: Arc<SessionState>,
    sink: Arc<dyn OutputSink>,
}

impl ConversationEngine {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        session: Arc<SessionState>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            backend,
            session,
            sink,
        }
    }

    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Runs one conversational turn.
    ///
    /// `entity` is the topic the background cleanup must stay on. Returns the
    /// answer that was appended to the history, or `None` when the model failed.
    pub async fn run(
        &self,
        user_content: impl Into<String>,
        entity: Option<&str>,
        mode: ExecutionMode,
    ) -> Option<String> {
        let messages = self.session.push_and_snapshot(MessageRole::User, user_content);

        let outcome = match mode {
            ExecutionMode::Foreground => self.run_foreground(&messages).await,
            ExecutionMode::Background => self.run_background(&messages, entity).await,
        };

        match outcome {
            Ok(answer) => Some(answer),
            Err(err) => {
                let message = format!("⚠️ Error during AI response generation: {err}");
                self.session.push_message(MessageRole::Assistant, message.clone());
                if mode.is_background() {
                    tracing::debug!("Background model call failed: {}", err);
                } else {
                    self.sink.error(&message);
                }
                None
            }
        }
    }

    async fn run_foreground(&self, messages: &[ConversationMessage]) -> Result<String> {
        let mut stream = self.backend.chat_stream(messages).await?;

        self.sink.begin_answer();
        let mut complete = String::new();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(piece) => {
                    self.sink.answer_chunk(&piece);
                    complete.push_str(&piece);
                }
                Err(err) => {
                    self.sink.end_answer();
                    return Err(err);
                }
            }
        }
        self.sink.end_answer();

        let answer = complete.trim().to_string();
        self.session.push_message(MessageRole::Assistant, answer.clone());
        self.session.mark_output();
        Ok(answer)
    }

    async fn run_background(
        &self,
        messages: &[ConversationMessage],
        entity: Option<&str>,
    ) -> Result<String> {
        let mut stream = self.backend.chat_stream(messages).await?;

        let mut complete = String::new();
        while let Some(chunk) = stream.next().await {
            complete.push_str(&chunk?);
        }

        let cleaned = self.cleanup(&complete, entity).await;
        self.session.push_message(MessageRole::Assistant, cleaned.clone());
        Ok(cleaned)
    }

    /// Asks the model to tidy a raw answer; falls back to the trimmed raw text.
    async fn cleanup(&self, raw: &str, entity: Option<&str>) -> String {
        let messages = prompt::cleanup_messages(prompt::current_year(), entity, raw);
        match self.backend.chat(&messages).await {
            Ok(cleaned) => cleaned.trim().to_string(),
            Err(err) => {
                tracing::debug!("Cleanup call failed, keeping raw answer: {}", err);
                raw.trim().to_string()
            }
        }
    }
}
