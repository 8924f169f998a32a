//! Core domain logic for MyBooks.
//! This crate is the single source of truth for catalog invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod samples;
pub mod service;

pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookId, BookValidationError, DateField, MAX_RATING};
pub use model::genre::{Genre, GenreColor, GenreId, GenreValidationError};
pub use model::quote::{Quote, QuoteId, QuoteValidationError};
pub use model::status::{ReadingDates, Status};
pub use repo::book_repo::{
    BookListQuery, BookRecord, BookRepository, SortOrder, SqliteBookRepository,
};
pub use repo::genre_repo::{GenreRepository, SqliteGenreRepository};
pub use repo::quote_repo::{QuoteRepository, SqliteQuoteRepository};
pub use repo::{Entity, RepoError, RepoResult};
pub use samples::{seed_samples, SeedError, SeedReport};
pub use service::book_service::{
    BookService, BookServiceError, DateBounds, EditBook, UpdateOutcome,
};
pub use service::genre_service::{GenreService, GenreServiceError};
pub use service::quote_service::{QuoteService, QuoteServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Services take `now_ms` explicitly; front-ends call this once per action.
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
