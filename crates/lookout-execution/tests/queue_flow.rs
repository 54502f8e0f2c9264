//! End-to-end queue behaviour against in-memory collaborators.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use lookout_core::normalizer::Lemmatizer;
use lookout_core::search::{ContentAggregator, PageScraper, SearchProvider, SearchResult};
use lookout_core::session::ConversationMessage;
use lookout_core::{AggregationLimits, LookoutError, OutputSink, Result, SessionState};
use lookout_execution::{QueueScheduler, TaskProcessor};
use lookout_interaction::{ChatBackend, ChunkStream, ConversationEngine};

const IDLE_WAIT: Duration = Duration::from_secs(5);

struct StaticSearch {
    results: Vec<SearchResult>,
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(&self, query: &str) -> Vec<SearchResult> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results.clone()
    }
}

struct StaticScraper;

#[async_trait]
impl PageScraper for StaticScraper {
    async fn scrape(&self, url: &str) -> String {
        format!("Page text for {url}")
    }
}

/// Answers with `answer:<last user message>`; fails when the message says "explode".
#[derive(Default)]
struct EchoBackend {
    requests: Mutex<Vec<Vec<ConversationMessage>>>,
}

impl EchoBackend {
    fn last_request(&self) -> Vec<ConversationMessage> {
        self.requests.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn chat(&self, messages: &[ConversationMessage]) -> Result<String> {
        let raw = messages
            .last()
            .and_then(|m| m.content.split("Raw answer: ").nth(1))
            .unwrap_or_default();
        Ok(format!("cleaned {raw}"))
    }

    async fn chat_stream(&self, messages: &[ConversationMessage]) -> Result<ChunkStream> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let question = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        if question.contains("explode") {
            return Err(LookoutError::model("backend exploded"));
        }
        let chunks = vec![Ok("answer:".to_string()), Ok(question)];
        Ok(stream::iter(chunks).boxed())
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn backgrounds(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.starts_with("background:"))
            .collect()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl OutputSink for RecordingSink {
    fn begin_answer(&self) {
        self.record("begin".into());
    }
    fn answer_chunk(&self, chunk: &str) {
        self.record(format!("chunk:{chunk}"));
    }
    fn end_answer(&self) {
        self.record("end".into());
    }
    fn background_result(&self, task: &str, answer: &str) {
        self.record(format!("background:{task} => {answer}"));
    }
    fn error(&self, message: &str) {
        self.record(format!("error:{message}"));
    }
    fn notice(&self, message: &str) {
        self.record(format!("notice:{message}"));
    }
}

struct Harness {
    scheduler: Arc<QueueScheduler>,
    session: Arc<SessionState>,
    sink: Arc<RecordingSink>,
    backend: Arc<EchoBackend>,
    search: Arc<StaticSearch>,
}

fn harness(results: Vec<SearchResult>) -> Harness {
    let session = Arc::new(SessionState::new("persona"));
    let sink = Arc::new(RecordingSink::default());
    let backend = Arc::new(EchoBackend::default());
    let search = Arc::new(StaticSearch {
        results,
        queries: Mutex::new(Vec::new()),
    });

    let aggregator = ContentAggregator::new(search.clone(), Arc::new(StaticScraper));
    let engine = ConversationEngine::new(backend.clone(), session.clone(), sink.clone());
    let processor = TaskProcessor::new(Arc::new(Lemmatizer::new()), aggregator, engine, sink.clone())
        .with_limits(AggregationLimits {
            batch_size: 2,
            min_words: 5,
            hard_page_limit: 4,
        });
    let scheduler = Arc::new(QueueScheduler::new(
        Arc::new(processor),
        session.clone(),
        sink.clone(),
        IDLE_WAIT,
        Duration::from_secs(2),
    ));

    Harness {
        scheduler,
        session,
        sink,
        backend,
        search,
    }
}

fn hit(id: usize, link: &str) -> SearchResult {
    SearchResult {
        id,
        link: link.to_string(),
        title: "title".to_string(),
        snippet: "snippet".to_string(),
    }
}

#[tokio::test]
async fn test_forced_search_grounds_the_answer() {
    let h = harness(vec![hit(0, "https://a.example"), hit(1, "https://b.example")]);

    let answer = h.scheduler.run_foreground("/latest AI news").await;
    assert!(answer.is_some());

    assert_eq!(*h.search.queries.lock().unwrap(), vec!["latest ai news"]);

    let events = h.sink.events();
    assert_eq!(events[0], "notice:🔎 Lemmatized search: latest ai news");
    assert!(events.contains(&"begin".to_string()));

    let request = h.backend.last_request();
    let grounded = &request.last().unwrap().content;
    assert!(grounded.contains("SEARCH RESULTS:\n---\nPage text for https://a.example"));
    assert!(grounded.ends_with("USER QUESTION: /latest AI news"));
}

#[tokio::test]
async fn test_search_without_results_skips_the_model() {
    let h = harness(vec![]);

    assert!(h.scheduler.run_foreground("latest rust release").await.is_none());
    assert!(h.backend.requests.lock().unwrap().is_empty());
    assert!(
        h.sink
            .events()
            .contains(&"notice:⚠️ No search context found, skipping response.".to_string())
    );
    // Only the persona is in the history.
    assert_eq!(h.session.history_len(), 1);
}

#[tokio::test]
async fn test_error_report_is_flagged_without_model_call() {
    let h = harness(vec![hit(0, "https://a.example")]);

    assert!(h.scheduler.run_foreground("Traceback: ValueError: x").await.is_none());
    assert!(h.backend.requests.lock().unwrap().is_empty());
    assert!(h.search.queries.lock().unwrap().is_empty());
    assert_eq!(h.sink.events().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deep_results_wait_for_an_idle_window() {
    let h = harness(vec![]);
    h.scheduler.enqueue_deep("task A");
    h.scheduler.enqueue_deep("task B");

    // The user is chatting: a foreground answer renders at t0.
    h.scheduler.run_foreground("hello").await;

    // A finishes one second later, inside the idle wait.
    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(h.scheduler.run_deep_once().await);
    assert_eq!(h.scheduler.idle_len(), 1);
    assert!(h.sink.backgrounds().is_empty());
    assert!(!h.scheduler.flush_idle_one());

    // B finishes after a quiet stretch and renders at once.
    tokio::time::advance(Duration::from_secs(6)).await;
    assert!(h.scheduler.run_deep_once().await);
    assert_eq!(
        h.sink.backgrounds(),
        vec!["background:task B => cleaned answer:task B"]
    );

    // Rendering B reset the clock, so A keeps waiting.
    assert!(!h.scheduler.flush_idle_one());
    assert_eq!(h.scheduler.idle_len(), 1);

    tokio::time::advance(Duration::from_secs(6)).await;
    assert!(h.scheduler.flush_idle_one());
    assert_eq!(
        h.sink.backgrounds(),
        vec![
            "background:task B => cleaned answer:task B",
            "background:task A => cleaned answer:task A",
        ]
    );
    assert_eq!(h.scheduler.idle_len(), 0);
    assert!(!h.scheduler.run_deep_once().await);
}

#[tokio::test(start_paused = true)]
async fn test_one_buffered_result_per_loop_iteration() {
    let h = harness(vec![]);
    h.scheduler.deliver_background("first".into(), "1".into());
    h.scheduler.deliver_background("second".into(), "2".into());
    assert_eq!(h.scheduler.idle_len(), 2);

    tokio::time::advance(Duration::from_secs(6)).await;
    assert!(h.scheduler.flush_idle_one());
    assert!(!h.scheduler.flush_idle_one());
    assert_eq!(h.sink.backgrounds(), vec!["background:first => 1"]);
    assert_eq!(h.scheduler.idle_len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_idle_buffer_is_left_alone_while_busy() {
    let h = harness(vec![]);
    h.scheduler.deliver_background("pending".into(), "x".into());

    tokio::time::advance(Duration::from_secs(5)).await;
    // Exactly the idle wait is not enough.
    assert!(!h.scheduler.flush_idle_one());
    assert_eq!(h.scheduler.idle_len(), 1);
    let before = h.session.last_output();

    tokio::time::advance(Duration::from_millis(1)).await;
    assert!(h.scheduler.flush_idle_one());
    assert!(h.session.last_output() > before);
}

#[tokio::test(start_paused = true)]
async fn test_immediate_queue_drains_in_order_and_prints() {
    let h = harness(vec![]);
    h.scheduler.enqueue_immediate("first question");
    h.scheduler.enqueue_immediate("second question");

    h.scheduler.drain_immediate().await;

    assert_eq!(h.scheduler.immediate_len(), 0);
    assert_eq!(h.scheduler.idle_len(), 0);
    let banners: Vec<_> = h
        .sink
        .events()
        .into_iter()
        .filter(|e| e.starts_with("notice:⚡"))
        .collect();
    assert_eq!(
        banners,
        vec![
            "notice:⚡ Processing queued task: first question",
            "notice:⚡ Processing queued task: second question",
        ]
    );
    assert!(h.sink.events().contains(&"chunk:second question".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_worker_survives_failures_and_keeps_polling() {
    let h = harness(vec![]);
    h.scheduler.enqueue_deep("please explode");
    h.scheduler.enqueue_deep("what is ownership");

    tokio::time::advance(Duration::from_secs(6)).await;
    let worker = h.scheduler.spawn_worker();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(h.scheduler.deep_len(), 0);
    assert_eq!(
        h.sink.backgrounds(),
        vec!["background:what is ownership => cleaned answer:what is ownership"]
    );
    // The failure stayed out of the terminal but is in the history.
    assert!(!h.sink.events().iter().any(|e| e.starts_with("error:")));
    let history = h.session.history_snapshot();
    assert!(
        history
            .messages()
            .iter()
            .any(|m| m.content.contains("backend exploded"))
    );

    // Work queued later is still picked up.
    h.scheduler.enqueue_deep("one more thing");
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(h.scheduler.deep_len(), 0);
    assert!(!worker.is_finished());
    worker.abort();
}
