//! Immediate and deep task queues.
//!
//! The interactive loop drains the immediate queue inline. A single spawned
//! worker owns the deep queue: it pops the oldest task, processes it in
//! background mode and hands the answer to the idle policy, or sleeps for the
//! poll interval when there is nothing to do.
//!
//! A background answer is rendered at once only if the terminal has been
//! quiet for longer than the idle wait; otherwise it waits in the idle buffer
//! until the interactive loop finds an idle window.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lookout_core::task::{ExecutionMode, TaskStatus};
use lookout_core::{OutputSink, SessionState};
use tokio::task::JoinHandle;

use crate::processor::TaskProcessor;

/// A finished background answer waiting for an idle window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleResult {
    pub task: String,
    pub answer: String,
}

pub struct QueueScheduler {
    processor: Arc<TaskProcessor>,
    session: Arc<SessionState>,
    sink: Arc<dyn OutputSink>,
    immediate: Mutex<VecDeque<String>>,
    deep: Mutex<VecDeque<String>>,
    idle_results: Mutex<VecDeque<IdleResult>>,
    idle_wait: Duration,
    poll_interval: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl QueueScheduler {
    pub fn new(
        processor: Arc<TaskProcessor>,
        session: Arc<SessionState>,
        sink: Arc<dyn OutputSink>,
        idle_wait: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            processor,
            session,
            sink,
            immediate: Mutex::new(VecDeque::new()),
            deep: Mutex::new(VecDeque::new()),
            idle_results: Mutex::new(VecDeque::new()),
            idle_wait,
            poll_interval,
        }
    }

    pub fn enqueue_immediate(&self, task: impl Into<String>) {
        let task = task.into();
        tracing::debug!(task = %task, status = ?TaskStatus::Pending, "Immediate task queued");
        lock(&self.immediate).push_back(task);
    }

    pub fn enqueue_deep(&self, task: impl Into<String>) {
        let task = task.into();
        tracing::debug!(task = %task, status = ?TaskStatus::Pending, "Deep task queued");
        lock(&self.deep).push_back(task);
    }

    pub fn immediate_len(&self) -> usize {
        lock(&self.immediate).len()
    }

    pub fn deep_len(&self) -> usize {
        lock(&self.deep).len()
    }

    pub fn idle_len(&self) -> usize {
        lock(&self.idle_results).len()
    }

    /// Processes a single interactive task in the foreground.
    pub async fn run_foreground(&self, task: &str) -> Option<String> {
        self.processor.process(task, ExecutionMode::Foreground).await
    }

    /// Processes every immediate task in order, printing each answer as it streams.
    pub async fn drain_immediate(&self) {
        loop {
            // The guard must drop before the task is awaited.
            let next = lock(&self.immediate).pop_front();
            let Some(task) = next else {
                break;
            };
            tracing::info!(task = %task, status = ?TaskStatus::InFlight, "Immediate task started");
            self.sink.notice(&format!("⚡ Processing queued task: {task}"));
            self.processor.process(&task, ExecutionMode::Foreground).await;
            tracing::info!(task = %task, status = ?TaskStatus::Done, "Immediate task finished");
        }
    }

    /// Processes the oldest deep task, if any. Returns false when the queue was empty.
    pub async fn run_deep_once(&self) -> bool {
        let next = lock(&self.deep).pop_front();
        let Some(task) = next else {
            return false;
        };

        tracing::info!(task = %task, status = ?TaskStatus::InFlight, "Deep task started");
        if let Some(answer) = self.processor.process(&task, ExecutionMode::Background).await {
            self.deliver_background(task.clone(), answer);
        }
        tracing::info!(task = %task, status = ?TaskStatus::Done, "Deep task finished");
        true
    }

    /// Renders a background answer now if the terminal is idle, else buffers it.
    pub fn deliver_background(&self, task: String, answer: String) {
        if self.session.is_idle(self.idle_wait) {
            self.sink.background_result(&task, &answer);
            self.session.mark_output();
        } else {
            tracing::debug!(task = %task, "Terminal busy, buffering background result");
            lock(&self.idle_results).push_back(IdleResult { task, answer });
        }
    }

    /// Renders at most one buffered background answer if an idle window is open.
    ///
    /// Called by the interactive loop before each prompt.
    pub fn flush_idle_one(&self) -> bool {
        if !self.session.is_idle(self.idle_wait) {
            return false;
        }
        let next = lock(&self.idle_results).pop_front();
        match next {
            Some(result) => {
                self.sink.background_result(&result.task, &result.answer);
                self.session.mark_output();
                true
            }
            None => false,
        }
    }

    /// Starts the deep-queue worker. It runs until the runtime shuts down.
    pub fn spawn_worker(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                if !scheduler.run_deep_once().await {
                    tokio::time::sleep(scheduler.poll_interval).await;
                }
            }
        })
    }
}
