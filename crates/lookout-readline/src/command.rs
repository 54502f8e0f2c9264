//! REPL input forms.

pub const QUEUE_COMMAND: &str = "/queue";
pub const DEEP_QUEUE_COMMAND: &str = "/deepqueue";

/// What one line typed at the main prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// `exit` or `quit`.
    Exit,
    /// Blank line.
    Empty,
    /// Enter tasks for the immediate queue, then drain it.
    Queue,
    /// Enter tasks for the deep queue.
    DeepQueue,
    /// Anything else, including `/<text>` forced searches. Kept verbatim.
    Task(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }

        let lowered = trimmed.to_lowercase();
        if lowered == "exit" || lowered == "quit" {
            return Self::Exit;
        }

        match trimmed.split_whitespace().next() {
            Some(QUEUE_COMMAND) => Self::Queue,
            Some(DEEP_QUEUE_COMMAND) => Self::DeepQueue,
            _ => Self::Task(line.to_string()),
        }
    }
}
