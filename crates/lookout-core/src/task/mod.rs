//! Tasks and their routing.

pub mod model;
pub mod router;

pub use model::{Action, ExecutionMode, RoutedTask, TaskStatus};
pub use router::TaskRouter;
