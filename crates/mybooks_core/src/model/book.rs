//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical catalog entry.
//! - Validate status/date consistency before persistence.
//!
//! # Invariants
//! - `title` and `author` are never blank.
//! - `rating`, when set, is within `1..=MAX_RATING`.
//! - On shelf: no started or completed date.
//! - In progress: started is set and not before added; no completed date.
//! - Completed: started and completed are set, with
//!   `added <= started <= completed`.

use crate::model::status::{ReadingDates, Status};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a book.
pub type BookId = Uuid;

/// Highest star rating a book can receive.
pub const MAX_RATING: u8 = 5;

/// Date field names used by validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Added,
    Started,
    Completed,
}

impl Display for DateField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "date_added"),
            Self::Started => write!(f, "date_started"),
            Self::Completed => write!(f, "date_completed"),
        }
    }
}

/// Validation failures for book records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    BlankTitle,
    BlankAuthor,
    RatingOutOfRange(u8),
    /// Date is set although `status` does not show it.
    UnexpectedDate { status: Status, field: DateField },
    /// Date is required by `status` but missing.
    MissingDate { status: Status, field: DateField },
    /// `later` is before `earlier`.
    DateOrder { earlier: DateField, later: DateField },
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "book title must not be blank"),
            Self::BlankAuthor => write!(f, "book author must not be blank"),
            Self::RatingOutOfRange(value) => {
                write!(f, "rating {value} is outside 1..={MAX_RATING}")
            }
            Self::UnexpectedDate { status, field } => {
                write!(f, "{field} must be empty while status is `{status}`")
            }
            Self::MissingDate { status, field } => {
                write!(f, "{field} is required while status is `{status}`")
            }
            Self::DateOrder { earlier, later } => {
                write!(f, "{later} must not be earlier than {earlier}")
            }
        }
    }
}

impl Error for BookValidationError {}

/// Canonical catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub date_added: i64,
    pub date_started: Option<i64>,
    pub date_completed: Option<i64>,
    /// Free-form reader notes. Stored in the column formerly named `summary`.
    pub comment: String,
    pub rating: Option<u8>,
    pub status: Status,
    pub recommended_by: String,
}

impl Book {
    /// Creates an on-shelf book added at `now_ms` with a generated ID.
    pub fn new(title: impl Into<String>, author: impl Into<String>, now_ms: i64) -> Self {
        Self::with_id(Uuid::new_v4(), title, author, now_ms)
    }

    /// Creates an on-shelf book with a caller-provided ID.
    pub fn with_id(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            date_added: now_ms,
            date_started: None,
            date_completed: None,
            comment: String::new(),
            rating: None,
            status: Status::OnShelf,
            recommended_by: String::new(),
        }
    }

    pub fn reading_dates(&self) -> ReadingDates {
        ReadingDates {
            added: self.date_added,
            started: self.date_started,
            completed: self.date_completed,
        }
    }

    /// Changes status and adjusts started/completed dates accordingly.
    pub fn set_status(&mut self, status: Status, now_ms: i64) {
        let next = self.reading_dates().transition(self.status, status, now_ms);
        self.date_started = next.started;
        self.date_completed = next.completed;
        self.status = status;
    }

    /// Checks field and status/date invariants.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookValidationError::BlankTitle);
        }
        if self.author.trim().is_empty() {
            return Err(BookValidationError::BlankAuthor);
        }
        if let Some(rating) = self.rating {
            if !(1..=MAX_RATING).contains(&rating) {
                return Err(BookValidationError::RatingOutOfRange(rating));
            }
        }
        validate_dates(self.status, self.reading_dates())
    }
}

fn validate_dates(status: Status, dates: ReadingDates) -> Result<(), BookValidationError> {
    match (status.shows_started(), dates.started) {
        (false, Some(_)) => {
            return Err(BookValidationError::UnexpectedDate {
                status,
                field: DateField::Started,
            })
        }
        (true, None) => {
            return Err(BookValidationError::MissingDate {
                status,
                field: DateField::Started,
            })
        }
        (true, Some(started)) if started < dates.added => {
            return Err(BookValidationError::DateOrder {
                earlier: DateField::Added,
                later: DateField::Started,
            })
        }
        _ => {}
    }

    match (status.shows_completed(), dates.completed, dates.started) {
        (false, Some(_), _) => Err(BookValidationError::UnexpectedDate {
            status,
            field: DateField::Completed,
        }),
        (true, None, _) => Err(BookValidationError::MissingDate {
            status,
            field: DateField::Completed,
        }),
        (true, Some(completed), Some(started)) if completed < started => {
            Err(BookValidationError::DateOrder {
                earlier: DateField::Started,
                later: DateField::Completed,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{Book, BookValidationError, DateField};
    use crate::model::status::Status;

    #[test]
    fn new_book_is_on_shelf_and_valid() {
        let book = Book::new("Dune", "Frank Herbert", 100);
        assert_eq!(book.status, Status::OnShelf);
        assert_eq!(book.date_added, 100);
        assert_eq!(book.date_started, None);
        assert!(book.validate().is_ok());
    }

    #[test]
    fn blank_title_is_rejected() {
        let book = Book::new("  ", "Someone", 0);
        assert_eq!(book.validate(), Err(BookValidationError::BlankTitle));
    }

    #[test]
    fn rating_above_max_is_rejected() {
        let mut book = Book::new("T", "A", 0);
        book.rating = Some(6);
        assert_eq!(book.validate(), Err(BookValidationError::RatingOutOfRange(6)));
        book.rating = Some(0);
        assert_eq!(book.validate(), Err(BookValidationError::RatingOutOfRange(0)));
    }

    #[test]
    fn set_status_keeps_record_valid_through_full_cycle() {
        let mut book = Book::new("T", "A", 1_000);
        book.set_status(Status::InProgress, 2_000);
        assert!(book.validate().is_ok());
        book.set_status(Status::Completed, 3_000);
        assert!(book.validate().is_ok());
        assert_eq!(book.date_started, Some(2_000));
        assert_eq!(book.date_completed, Some(3_000));
        book.set_status(Status::OnShelf, 4_000);
        assert!(book.validate().is_ok());
    }

    #[test]
    fn started_before_added_is_rejected() {
        let mut book = Book::new("T", "A", 1_000);
        book.status = Status::InProgress;
        book.date_started = Some(500);
        assert_eq!(
            book.validate(),
            Err(BookValidationError::DateOrder {
                earlier: DateField::Added,
                later: DateField::Started,
            })
        );
    }

    #[test]
    fn completed_date_on_in_progress_book_is_rejected() {
        let mut book = Book::new("T", "A", 1_000);
        book.status = Status::InProgress;
        book.date_started = Some(1_000);
        book.date_completed = Some(2_000);
        assert_eq!(
            book.validate(),
            Err(BookValidationError::UnexpectedDate {
                status: Status::InProgress,
                field: DateField::Completed,
            })
        );
    }
}
