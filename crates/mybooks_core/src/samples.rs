//! Sample catalog used for first-run demos and tests.
//!
//! # Invariants
//! - Seeding only touches an empty catalog (no books and no genres).
//! - Seeding is all-or-nothing: one transaction covers every insert.
//! - Sample books always pass `Book::validate()` relative to `now_ms`.

use crate::model::book::Book;
use crate::model::genre::GenreColor;
use crate::model::status::Status;
use crate::repo::book_repo::SqliteBookRepository;
use crate::repo::genre_repo::{GenreRepository, SqliteGenreRepository};
use crate::repo::quote_repo::SqliteQuoteRepository;
use crate::repo::RepoError;
use crate::service::book_service::{BookService, BookServiceError};
use crate::service::genre_service::{GenreService, GenreServiceError};
use crate::service::quote_service::{QuoteService, QuoteServiceError};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Sample genres as `(name, color)` pairs.
pub const SAMPLE_GENRES: [(&str, GenreColor); 4] = [
    ("Fiction", GenreColor::from_rgb(0x00, 0xFF, 0x00)),
    ("Non Fiction", GenreColor::from_rgb(0x00, 0x00, 0xFF)),
    ("Romance", GenreColor::from_rgb(0xFF, 0x00, 0x00)),
    ("Thriller", GenreColor::from_rgb(0x00, 0x00, 0x00)),
];

/// Counts of inserted sample rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub books: usize,
    pub genres: usize,
    pub quotes: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.books == 0 && self.genres == 0 && self.quotes == 0
    }
}

#[derive(Debug)]
pub enum SeedError {
    Book(BookServiceError),
    Genre(GenreServiceError),
    Quote(QuoteServiceError),
    Repo(RepoError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Book(err) => write!(f, "seeding books failed: {err}"),
            Self::Genre(err) => write!(f, "seeding genres failed: {err}"),
            Self::Quote(err) => write!(f, "seeding quotes failed: {err}"),
            Self::Repo(err) => write!(f, "seeding failed: {err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Book(err) => Some(err),
            Self::Genre(err) => Some(err),
            Self::Quote(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<BookServiceError> for SeedError {
    fn from(value: BookServiceError) -> Self {
        Self::Book(value)
    }
}

impl From<GenreServiceError> for SeedError {
    fn from(value: GenreServiceError) -> Self {
        Self::Genre(value)
    }
}

impl From<QuoteServiceError> for SeedError {
    fn from(value: QuoteServiceError) -> Self {
        Self::Quote(value)
    }
}

impl From<RepoError> for SeedError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Builds the sample books relative to `now_ms`.
pub fn sample_books(now_ms: i64) -> Vec<Book> {
    let mut shelved = Book::new("QB VII", "Leon Uris", now_ms - 2 * DAY_MS);
    shelved.recommended_by = "Ginger".to_string();

    let plain = Book::new("Macbeth", "William Shakespeare", now_ms - DAY_MS);

    let mut reading = Book::new("Death in the Clouds", "Agatha Christie", now_ms - 30 * DAY_MS);
    reading.status = Status::InProgress;
    reading.date_started = Some(now_ms - 10 * DAY_MS);

    let mut finished = Book::new("The Hobbit", "J. R. R. Tolkien", now_ms - 90 * DAY_MS);
    finished.status = Status::Completed;
    finished.date_started = Some(now_ms - 80 * DAY_MS);
    finished.date_completed = Some(now_ms - 60 * DAY_MS);
    finished.rating = Some(5);
    finished.comment = "A comfortable reread.".to_string();

    let mut rated = Book::new("Pride and Prejudice", "Jane Austen", now_ms - 200 * DAY_MS);
    rated.status = Status::Completed;
    rated.date_started = Some(now_ms - 190 * DAY_MS);
    rated.date_completed = Some(now_ms - 150 * DAY_MS);
    rated.rating = Some(4);

    vec![shelved, plain, reading, finished, rated]
}

/// Inserts sample genres, books, genre links and quotes into an empty catalog.
///
/// Returns an empty report when the catalog already has books or genres.
/// On error nothing is written.
pub fn seed_samples(conn: &Connection, now_ms: i64) -> Result<SeedReport, SeedError> {
    let tx = conn.unchecked_transaction().map_err(RepoError::from)?;
    let books = BookService::new(SqliteBookRepository::new(conn));
    let links_repo = SqliteGenreRepository::new(conn);
    let genres = GenreService::new(SqliteGenreRepository::new(conn));
    let quotes = QuoteService::new(SqliteQuoteRepository::new(conn));

    if books.count_books()? > 0 || !genres.list_genres()?.is_empty() {
        info!("event=seed_samples module=samples status=skipped reason=catalog_not_empty");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();
    let mut genre_ids = Vec::with_capacity(SAMPLE_GENRES.len());
    for (name, color) in SAMPLE_GENRES {
        let genre = genres.create_genre(name, &color.to_hex())?;
        genre_ids.push(genre.id);
        report.genres += 1;
    }
    let (fiction, romance, thriller) = (genre_ids[0], genre_ids[2], genre_ids[3]);

    let sample = sample_books(now_ms);
    let links = [
        vec![fiction],
        vec![fiction],
        vec![fiction, thriller],
        vec![fiction],
        vec![fiction, romance],
    ];
    for (book, genre_set) in sample.iter().zip(links.iter()) {
        books.import_book(book)?;
        for genre_id in genre_set {
            links_repo.add_book_genre(book.id, *genre_id)?;
        }
        report.books += 1;
    }

    let hobbit = &sample[3];
    let lines = [
        ("In a hole in the ground there lived a hobbit.", Some("1")),
        ("It does not do to leave a live dragon out of your calculations.", None),
    ];
    for (offset, (text, page)) in lines.into_iter().enumerate() {
        quotes.create_quote(hobbit.id, text, page, now_ms - 70 * DAY_MS + offset as i64)?;
        report.quotes += 1;
    }
    tx.commit().map_err(RepoError::from)?;

    info!(
        "event=seed_samples module=samples status=ok books={} genres={} quotes={}",
        report.books, report.genres, report.quotes
    );
    Ok(report)
}
