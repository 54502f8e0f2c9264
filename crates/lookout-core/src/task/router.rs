//! Task routing.
//!
//! A task is matched against an ordered rule table; the first rule whose
//! predicate holds decides the action and how the payload is derived.

use super::model::{Action, RoutedTask};

/// Case-sensitive substrings that mark a task as an error report.
pub const ERROR_INDICATORS: &[&str] = &[
    "Error",
    "Exception",
    "Traceback",
    "AttributeError",
    "ImportError",
    "ModuleNotFoundError",
    "TypeError",
    "ValueError",
];

/// Time-sensitive terms (matched against the lowercased task) that trigger a search.
pub const SEARCH_KEYWORDS: &[&str] = &[
    "latest",
    "hackathon",
    "conference",
    "release",
    "update",
    "event",
    "news",
    "documentation",
    "changelog",
    "api",
    "tutorial",
    "guide",
    "new",
    "2025",
    "2026",
];

/// Prefix that forces a search.
pub const FORCED_SEARCH_PREFIX: char = '/';

/// One entry of the routing table.
pub struct RouteRule {
    pub name: &'static str,
    pub action: Action,
    matches: fn(&str) -> bool,
    payload: fn(&str) -> String,
}

impl RouteRule {
    fn apply(&self, task: &str) -> Option<RoutedTask> {
        (self.matches)(task).then(|| RoutedTask::new(self.action, (self.payload)(task)))
    }
}

fn contains_error_indicator(task: &str) -> bool {
    ERROR_INDICATORS.iter().any(|needle| task.contains(needle))
}

fn is_forced_search(task: &str) -> bool {
    task.starts_with(FORCED_SEARCH_PREFIX)
}

fn contains_search_keyword(task: &str) -> bool {
    let lowered = task.to_lowercase();
    SEARCH_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

fn always(_: &str) -> bool {
    true
}

fn unchanged(task: &str) -> String {
    task.to_string()
}

fn strip_forced_prefix(task: &str) -> String {
    task.strip_prefix(FORCED_SEARCH_PREFIX)
        .unwrap_or(task)
        .trim()
        .to_string()
}

/// Routing rules in priority order.
pub static ROUTE_RULES: &[RouteRule] = &[
    RouteRule {
        name: "error-report",
        action: Action::Error,
        matches: contains_error_indicator,
        payload: unchanged,
    },
    RouteRule {
        name: "forced-search",
        action: Action::Search,
        matches: is_forced_search,
        payload: strip_forced_prefix,
    },
    RouteRule {
        name: "keyword-search",
        action: Action::Search,
        matches: contains_search_keyword,
        payload: unchanged,
    },
    RouteRule {
        name: "answer",
        action: Action::Answer,
        matches: always,
        payload: unchanged,
    },
];

/// Classifies raw tasks with [`ROUTE_RULES`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskRouter;

impl TaskRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, task: &str) -> RoutedTask {
        for rule in ROUTE_RULES {
            if let Some(routed) = rule.apply(task) {
                tracing::debug!(rule = rule.name, action = ?routed.action, "Task routed");
                return routed;
            }
        }
        RoutedTask::new(Action::Answer, task)
    }
}
