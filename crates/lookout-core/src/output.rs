//! Terminal output contract.
//!
//! The engine, the processor and the scheduler write through an [`OutputSink`]
//! so the REPL decides how things look and tests can capture what was shown.

/// Destination for everything the assistant shows the user.
pub trait OutputSink: Send + Sync {
    /// A foreground answer is about to stream.
    fn begin_answer(&self);

    /// One streamed chunk of a foreground answer.
    fn answer_chunk(&self, chunk: &str);

    /// The foreground stream finished.
    fn end_answer(&self);

    /// A completed deep-queue answer is being shown.
    fn background_result(&self, task: &str, answer: &str);

    /// A model failure in the foreground.
    fn error(&self, message: &str);

    /// Informational status line (search query, skipped search, queue banners).
    fn notice(&self, message: &str);
}
