//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for books, genres and
//!   quotes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes call the model's `validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Missing targets surface as `RepoError::NotFound`, not as silent no-ops.

use crate::db::DbError;
use crate::model::book::BookValidationError;
use crate::model::genre::GenreValidationError;
use crate::model::quote::QuoteValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod book_repo;
pub mod genre_repo;
pub mod quote_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity kind referenced by `RepoError::NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Book,
    Genre,
    Quote,
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Book => write!(f, "book"),
            Self::Genre => write!(f, "genre"),
            Self::Quote => write!(f, "quote"),
        }
    }
}

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    InvalidBook(BookValidationError),
    InvalidGenre(GenreValidationError),
    InvalidQuote(QuoteValidationError),
    Db(DbError),
    NotFound { entity: Entity, id: Uuid },
    /// A genre with the same name (case-insensitive) already exists.
    DuplicateGenreName(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBook(err) => write!(f, "{err}"),
            Self::InvalidGenre(err) => write!(f, "{err}"),
            Self::InvalidQuote(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DuplicateGenreName(name) => write!(f, "genre already exists: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidBook(err) => Some(err),
            Self::InvalidGenre(err) => Some(err),
            Self::InvalidQuote(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::DuplicateGenreName(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::InvalidBook(value)
    }
}

impl From<GenreValidationError> for RepoError {
    fn from(value: GenreValidationError) -> Self {
        Self::InvalidGenre(value)
    }
}

impl From<QuoteValidationError> for RepoError {
    fn from(value: QuoteValidationError) -> Self {
        Self::InvalidQuote(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn row_exists(
    conn: &rusqlite::Connection,
    table: &'static str,
    id: Uuid,
) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE uuid = ?1);"),
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
