use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::task::Task;
use crate::text_matcher::TextMatcher;

/// Completion-status filter applied to the visible task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every task.
    #[default]
    All,
    /// Only completed tasks.
    Completed,
    /// Only tasks still open.
    Incomplete,
}

impl StatusFilter {
    /// Every variant, in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Completed, Self::Incomplete];

    /// Token accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
        }
    }

    /// Whether `task` passes this filter.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Incomplete => !task.completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`StatusFilter`] token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid filter: {token} (expected all, completed or incomplete)")]
pub struct ParseStatusFilterError {
    token: String,
}

impl FromStr for StatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == token)
            .ok_or(ParseStatusFilterError { token })
    }
}

/// Search term plus status filter, applied in that order.
#[derive(Debug, Default)]
pub struct TaskFilter {
    text: Option<TextMatcher>,
    status: StatusFilter,
}

impl TaskFilter {
    /// Build a filter from a raw search term and a status filter.
    #[must_use]
    pub fn new(search_term: &str, status: StatusFilter) -> Self {
        Self {
            text: TextMatcher::new(search_term),
            status,
        }
    }

    /// Whether `task` passes both the search and the status clause.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.text.as_ref().is_none_or(|matcher| matcher.matches(task)) && self.status.matches(task)
    }

    /// Borrow the tasks that pass the filter, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

/// Totals shown next to the filter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    /// Number of tasks.
    pub all: usize,
    /// Number of completed tasks.
    pub completed: usize,
    /// Number of open tasks.
    pub incomplete: usize,
}

impl TaskCounts {
    /// Count `tasks`.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let all = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            all,
            completed,
            incomplete: all - completed,
        }
    }
}
