use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};

/// Identifier of a task.
///
/// Ids are minted by [`TaskIdSequence`] and serialize as a bare JSON number.
#[derive(
    Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Strictly increasing source of [`TaskId`]s.
///
/// The sequence never hands out the same id twice, regardless of how many
/// tasks are deleted in between. Once `u64::MAX` has been issued the
/// sequence is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskIdSequence {
    next: Option<u64>,
}

impl Default for TaskIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskIdSequence {
    /// Sequence starting at id `1`.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: Some(1) }
    }

    /// Sequence that continues after the largest id in `issued`.
    ///
    /// `issued` covers every id handed out so far, including the ones whose
    /// tasks have since been deleted.
    #[must_use]
    pub fn after<I>(issued: I) -> Self
    where
        I: IntoIterator<Item = TaskId>,
    {
        let next = match issued.into_iter().map(|id| id.0).max() {
            Some(last) => last.checked_add(1).map(|next| next.max(1)),
            None => Some(1),
        };
        Self { next }
    }

    /// Mint the next identifier, or `None` once the sequence is exhausted.
    pub const fn next_id(&mut self) -> Option<TaskId> {
        let Some(id) = self.next else {
            return None;
        };
        self.next = id.checked_add(1);
        Some(TaskId(id))
    }

    /// Identifier the next call to [`next_id`](Self::next_id) returns.
    #[must_use]
    pub const fn peek(&self) -> Option<TaskId> {
        match self.next {
            Some(id) => Some(TaskId(id)),
            None => None,
        }
    }
}
