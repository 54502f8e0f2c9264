//! Task processing and queue scheduling.

pub mod processor;
pub mod scheduler;

pub use processor::TaskProcessor;
pub use scheduler::{IdleResult, QueueScheduler};
