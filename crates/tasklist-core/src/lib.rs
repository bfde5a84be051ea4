//! Domain types for tasklist: tasks, identifiers, validation and filtering.

/// Status filters, combined filters and counts.
pub mod filter;
/// Identifier types.
pub mod id;
/// Task record and text validation.
pub mod task;
/// Case-insensitive search.
pub mod text_matcher;

pub use filter::{ParseStatusFilterError, StatusFilter, TaskCounts, TaskFilter};
pub use id::{TaskId, TaskIdSequence};
pub use task::{MAX_TASK_TEXT_CHARS, Task, TaskValidationError, validate_text};
pub use text_matcher::TextMatcher;
