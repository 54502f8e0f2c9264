pub mod config;
pub mod error;
pub mod normalizer;
pub mod output;
pub mod prompt;
pub mod search;
pub mod session;
pub mod task;

// Re-export common types
pub use config::{AggregationLimits, LookoutConfig};
pub use error::{LookoutError, Result};
pub use output::OutputSink;
pub use session::SessionState;
