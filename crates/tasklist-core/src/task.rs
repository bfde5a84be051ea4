use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::TaskId;

/// Maximum length of task text, counted in characters.
pub const MAX_TASK_TEXT_CHARS: usize = 100;

/// Reasons task text is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskValidationError {
    /// Text was empty after trimming.
    #[error("task text must not be empty")]
    Empty,
    /// Text exceeded [`MAX_TASK_TEXT_CHARS`].
    #[error("task text is {len} characters; the limit is {max}")]
    TooLong {
        /// Length of the rejected text in characters.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Every task id has already been handed out.
    #[error("no task ids left")]
    IdsExhausted,
}

/// Trim `raw` and check it against the task text rules.
///
/// Returns the trimmed text on success.
///
/// # Errors
/// Returns [`TaskValidationError::Empty`] for blank input and
/// [`TaskValidationError::TooLong`] when the trimmed text is longer than
/// [`MAX_TASK_TEXT_CHARS`].
pub fn validate_text(raw: &str) -> Result<&str, TaskValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(TaskValidationError::Empty);
    }
    let len = text.chars().count();
    if len > MAX_TASK_TEXT_CHARS {
        return Err(TaskValidationError::TooLong {
            len,
            max: MAX_TASK_TEXT_CHARS,
        });
    }
    Ok(text)
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier.
    pub id: TaskId,
    /// User-entered description.
    pub text: String,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
    /// Whether the text is currently being edited in place. Never persisted.
    #[serde(skip)]
    pub is_editing: bool,
}

impl Task {
    /// Create an incomplete task.
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            is_editing: false,
        }
    }

    /// Flip the completion flag.
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}
