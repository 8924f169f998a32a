//! Book use-case service.
//!
//! # Responsibility
//! - Provide create/list/edit/delete entry points for the catalog.
//! - Model the edit flow as a detached draft (`EditBook`) that is only
//!   persisted when it differs from stored state.
//!
//! # Invariants
//! - Status changes on a draft go through `ReadingDates::transition`.
//! - `update_book` never writes an unchanged draft.
//! - Service APIs never bypass repository validation.

use crate::model::book::{Book, BookId, BookValidationError};
use crate::model::status::Status;
use crate::repo::book_repo::{BookListQuery, BookRecord, BookRepository, SortOrder};
use crate::repo::{Entity, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for book use-cases.
#[derive(Debug)]
pub enum BookServiceError {
    Invalid(BookValidationError),
    BookNotFound(BookId),
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for BookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent book state: {details}"),
        }
    }
}

impl Error for BookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BookServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: Entity::Book,
                id,
            } => Self::BookNotFound(id),
            RepoError::InvalidBook(err) => Self::Invalid(err),
            other => Self::Repo(other),
        }
    }
}

impl From<BookValidationError> for BookServiceError {
    fn from(value: BookValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Allowed ranges for the draft's date fields. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    /// Latest allowed added date; set once reading has started.
    pub added_max: Option<i64>,
    /// Earliest allowed started date.
    pub started_min: Option<i64>,
    /// Earliest allowed completed date.
    pub completed_min: Option<i64>,
}

/// Detached edit state for one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBook {
    original: Book,
    status: Status,
    pub title: String,
    pub author: String,
    pub comment: String,
    pub rating: Option<u8>,
    pub recommended_by: String,
    pub date_added: i64,
    pub date_started: Option<i64>,
    pub date_completed: Option<i64>,
}

impl EditBook {
    /// Starts a draft from the stored book.
    pub fn from_book(book: Book) -> Self {
        Self {
            status: book.status,
            title: book.title.clone(),
            author: book.author.clone(),
            comment: book.comment.clone(),
            rating: book.rating,
            recommended_by: book.recommended_by.clone(),
            date_added: book.date_added,
            date_started: book.date_started,
            date_completed: book.date_completed,
            original: book,
        }
    }

    pub fn id(&self) -> BookId {
        self.original.id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The stored state this draft was created from.
    pub fn original(&self) -> &Book {
        &self.original
    }

    /// Changes the draft status and adjusts its dates.
    pub fn set_status(&mut self, status: Status, now_ms: i64) {
        let mut book = self.to_book();
        book.set_status(status, now_ms);
        self.status = status;
        self.date_started = book.date_started;
        self.date_completed = book.date_completed;
    }

    /// Picker ranges for the current status.
    pub fn date_bounds(&self) -> DateBounds {
        DateBounds {
            added_max: if self.status.shows_started() {
                self.date_started
            } else {
                None
            },
            started_min: self.status.shows_started().then_some(self.date_added),
            completed_min: if self.status.shows_completed() {
                self.date_started
            } else {
                None
            },
        }
    }

    /// Whether any editable field differs from the stored book.
    pub fn changed(&self) -> bool {
        self.to_book() != self.original
    }

    /// Materializes the draft as a full book record.
    pub fn to_book(&self) -> Book {
        Book {
            id: self.original.id,
            title: self.title.clone(),
            author: self.author.clone(),
            date_added: self.date_added,
            date_started: self.date_started,
            date_completed: self.date_completed,
            comment: self.comment.clone(),
            rating: self.rating,
            status: self.status,
            recommended_by: self.recommended_by.clone(),
        }
    }
}

/// Result of applying a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(BookRecord),
    Unchanged,
}

/// Use-case service wrapper for book operations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an on-shelf book added at `now_ms`.
    ///
    /// Title and author are trimmed and must be non-blank.
    pub fn create_book(
        &self,
        title: &str,
        author: &str,
        now_ms: i64,
    ) -> Result<BookRecord, BookServiceError> {
        let book = Book::new(title.trim(), author.trim(), now_ms);
        let id = self.repo.create_book(&book)?;
        info!("event=book_create module=service status=ok book_id={id}");
        self.read_back(id, "created book not found in read-back")
    }

    /// Inserts a fully specified book, e.g. from samples or imports.
    pub fn import_book(&self, book: &Book) -> Result<BookRecord, BookServiceError> {
        let id = self.repo.create_book(book)?;
        self.read_back(id, "imported book not found in read-back")
    }

    pub fn get_book(&self, id: BookId) -> Result<Option<BookRecord>, BookServiceError> {
        Ok(self.repo.get_book_record(id)?)
    }

    /// Lists books with the given sort order and optional title/author filter.
    pub fn list_books(
        &self,
        sort: SortOrder,
        filter: Option<String>,
    ) -> Result<Vec<BookRecord>, BookServiceError> {
        let query = BookListQuery { sort, filter };
        Ok(self.repo.list_books(&query)?)
    }

    /// Opens an edit draft for one book.
    pub fn edit_book(&self, id: BookId) -> Result<EditBook, BookServiceError> {
        let book = self
            .repo
            .get_book(id)?
            .ok_or(BookServiceError::BookNotFound(id))?;
        Ok(EditBook::from_book(book))
    }

    /// Persists a draft when it differs from stored state.
    pub fn update_book(&self, draft: &EditBook) -> Result<UpdateOutcome, BookServiceError> {
        if !draft.changed() {
            return Ok(UpdateOutcome::Unchanged);
        }

        let mut book = draft.to_book();
        book.title = book.title.trim().to_string();
        book.author = book.author.trim().to_string();
        book.validate()?;
        self.repo.update_book(&book)?;
        info!(
            "event=book_update module=service status=ok book_id={} book_status={}",
            book.id,
            book.status.raw_value()
        );

        let record = self.read_back(book.id, "updated book not found in read-back")?;
        Ok(UpdateOutcome::Updated(record))
    }

    /// Deletes a book together with its quotes and genre links.
    pub fn delete_book(&self, id: BookId) -> Result<(), BookServiceError> {
        self.repo.delete_book(id)?;
        info!("event=book_delete module=service status=ok book_id={id}");
        Ok(())
    }

    pub fn count_books(&self) -> Result<u64, BookServiceError> {
        Ok(self.repo.count_books()?)
    }

    fn read_back(&self, id: BookId, details: &'static str) -> Result<BookRecord, BookServiceError> {
        self.repo
            .get_book_record(id)?
            .ok_or(BookServiceError::InconsistentState(details))
    }
}

#[cfg(test)]
mod tests {
    use super::EditBook;
    use crate::model::book::Book;
    use crate::model::status::Status;

    #[test]
    fn fresh_draft_is_unchanged() {
        let draft = EditBook::from_book(Book::new("T", "A", 1_000));
        assert!(!draft.changed());
    }

    #[test]
    fn reverting_an_edit_clears_changed() {
        let mut draft = EditBook::from_book(Book::new("T", "A", 1_000));
        draft.title = "Other".to_string();
        assert!(draft.changed());
        draft.title = "T".to_string();
        assert!(!draft.changed());
    }

    #[test]
    fn status_change_updates_dates_and_bounds() {
        let mut draft = EditBook::from_book(Book::new("T", "A", 1_000));
        let bounds = draft.date_bounds();
        assert_eq!(bounds.added_max, None);
        assert_eq!(bounds.started_min, None);

        draft.set_status(Status::Completed, 5_000);
        assert_eq!(draft.date_started, Some(1_000));
        assert_eq!(draft.date_completed, Some(5_000));
        let bounds = draft.date_bounds();
        assert_eq!(bounds.added_max, Some(1_000));
        assert_eq!(bounds.started_min, Some(1_000));
        assert_eq!(bounds.completed_min, Some(1_000));
        assert!(draft.changed());
    }
}
