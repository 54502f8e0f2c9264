//! Single-task processing: route, ground, answer.

use std::sync::Arc;

use lookout_core::config::DEFAULT_CONTEXT_CHAR_LIMIT;
use lookout_core::normalizer::TextNormalizer;
use lookout_core::search::ContentAggregator;
use lookout_core::task::{Action, ExecutionMode, TaskRouter};
use lookout_core::{AggregationLimits, OutputSink, prompt};
use lookout_interaction::ConversationEngine;

/// Runs one task through the router, the aggregator and the engine.
pub struct TaskProcessor {
    router: TaskRouter,
    normalizer: Arc<dyn TextNormalizer>,
    aggregator: ContentAggregator,
    engine: ConversationEngine,
    sink: Arc<dyn OutputSink>,
    limits: AggregationLimits,
    context_char_limit: usize,
}

impl TaskProcessor {
    pub fn new(
        normalizer: Arc<dyn TextNormalizer>,
        aggregator: ContentAggregator,
        engine: ConversationEngine,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            router: TaskRouter::new(),
            normalizer,
            aggregator,
            engine,
            sink,
            limits: AggregationLimits::default(),
            context_char_limit: DEFAULT_CONTEXT_CHAR_LIMIT,
        }
    }

    pub fn with_limits(mut self, limits: AggregationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_context_char_limit(mut self, limit: usize) -> Self {
        self.context_char_limit = limit;
        self
    }

    /// Processes `task` and returns the answer the engine produced, if any.
    ///
    /// Error reports and searches with no usable results produce no answer.
    pub async fn process(&self, task: &str, mode: ExecutionMode) -> Option<String> {
        let routed = self.router.classify(task);
        tracing::info!(action = ?routed.action, ?mode, "Processing task");

        match routed.action {
            Action::Error => {
                if mode.is_background() {
                    tracing::info!(task = %task, "Error report flagged in background");
                } else {
                    self.sink.notice("🐞 Flagged as an error report; no answer generated.");
                }
                None
            }
            Action::Search => {
                let query = self.normalizer.normalize(&routed.payload);
                self.sink.notice(&format!("🔎 Lemmatized search: {query}"));

                let content = self.aggregator.aggregate(&[query], self.limits).await;
                if content.is_blank() {
                    self.sink.notice("⚠️ No search context found, skipping response.");
                    return None;
                }
                tracing::debug!(sources = content.sources.len(), "Grounding answer");

                let grounded = prompt::grounded_prompt(
                    prompt::current_year(),
                    &content.text(),
                    self.context_char_limit,
                    task,
                );
                self.engine.run(grounded, Some(&routed.payload), mode).await
            }
            Action::Answer => {
                self.engine
                    .run(routed.payload.clone(), Some(&routed.payload), mode)
                    .await
            }
        }
    }
}
