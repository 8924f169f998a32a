//! Reading status and the date adjustments tied to it.
//!
//! # Invariants
//! - Stored raw values are stable: `0` on shelf, `1` in progress,
//!   `2` completed.
//! - Changing status is the only place started/completed dates are
//!   implicitly set or cleared.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Reading state of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Owned or wanted, not started yet.
    OnShelf,
    /// Currently being read.
    InProgress,
    /// Finished.
    Completed,
}

impl Status {
    /// All statuses in picker order.
    pub const ALL: [Status; 3] = [Status::OnShelf, Status::InProgress, Status::Completed];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::OnShelf => "On Shelf",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Symbolic icon name for list rows.
    pub fn icon(self) -> &'static str {
        match self {
            Self::OnShelf => "books.vertical.fill",
            Self::InProgress => "book.fill",
            Self::Completed => "checkmark.circle.fill",
        }
    }

    /// Whether a started date is meaningful in this status.
    pub fn shows_started(self) -> bool {
        matches!(self, Self::InProgress | Self::Completed)
    }

    /// Whether a completed date is meaningful in this status.
    pub fn shows_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Stable integer value used by storage.
    pub fn raw_value(self) -> i64 {
        match self {
            Self::OnShelf => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
        }
    }

    /// Parses a stored integer value.
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::OnShelf),
            1 => Some(Self::InProgress),
            2 => Some(Self::Completed),
            _ => None,
        }
    }

    /// Parses a user-facing token (`on_shelf`, `in-progress`, `Completed`, ...).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "on_shelf" | "onshelf" | "shelf" => Some(Self::OnShelf),
            "in_progress" | "inprogress" | "reading" => Some(Self::InProgress),
            "completed" | "done" | "finished" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The three reading dates of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingDates {
    pub added: i64,
    pub started: Option<i64>,
    pub completed: Option<i64>,
}

impl ReadingDates {
    /// Returns the dates after a status change from `from` to `to`.
    ///
    /// Rules:
    /// - Same status: unchanged.
    /// - To on shelf: started and completed are cleared.
    /// - Completed -> in progress: completed is cleared.
    /// - On shelf -> in progress: started becomes `now_ms`.
    /// - On shelf -> completed: completed becomes `now_ms`, started becomes added.
    /// - In progress -> completed: completed becomes `now_ms`.
    pub fn transition(self, from: Status, to: Status, now_ms: i64) -> Self {
        let mut next = self;
        match (from, to) {
            (from, to) if from == to => {}
            (_, Status::OnShelf) => {
                next.started = None;
                next.completed = None;
            }
            (Status::Completed, Status::InProgress) => {
                next.completed = None;
            }
            (Status::OnShelf, Status::InProgress) => {
                next.started = Some(now_ms);
            }
            (Status::OnShelf, Status::Completed) => {
                next.completed = Some(now_ms);
                next.started = Some(self.added);
            }
            _ => {
                next.completed = Some(now_ms);
            }
        }
        next
    }
}
