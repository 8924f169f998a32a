//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and list APIs over `books` storage.
//! - Assemble `BookRecord` read models with genres and quote counts.
//!
//! # Invariants
//! - Write paths call `Book::validate()` before SQL mutations.
//! - Deleting a book cascades its quotes and genre links via foreign keys.
//! - List ordering is deterministic: every sort ends with `uuid ASC`.
//! - Filter and text sorts fold case for all scripts, not only ASCII.

use crate::db::text::fold;
use crate::model::book::{Book, BookId};
use crate::model::genre::Genre;
use crate::model::status::Status;
use crate::repo::genre_repo::load_genres_for_book;
use crate::repo::{parse_uuid, Entity, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};

const BOOK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    author,
    date_added,
    date_started,
    date_completed,
    comment,
    rating,
    status,
    recommended_by
FROM books";

/// Sort options for the book list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Title, case-insensitive ascending.
    Title,
    /// Author, case-insensitive ascending, then title.
    Author,
    /// Status raw value ascending, then title.
    Status,
    /// Newest first.
    #[default]
    DateAdded,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Title,
        SortOrder::Author,
        SortOrder::Status,
        SortOrder::DateAdded,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Status => "Status",
            Self::DateAdded => "Date Added",
        }
    }

    fn order_by_sql(self) -> &'static str {
        match self {
            Self::Title => "title COLLATE UNICODE_NOCASE ASC, uuid ASC",
            Self::Author => {
                "author COLLATE UNICODE_NOCASE ASC, title COLLATE UNICODE_NOCASE ASC, uuid ASC"
            }
            Self::Status => "status ASC, title COLLATE UNICODE_NOCASE ASC, uuid ASC",
            Self::DateAdded => "date_added DESC, uuid ASC",
        }
    }
}

/// Query options for listing books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookListQuery {
    pub sort: SortOrder,
    /// Case-insensitive substring matched against title or author.
    /// Blank means no filter.
    pub filter: Option<String>,
}

/// Read model for book list/detail use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRecord {
    #[serde(flatten)]
    pub book: Book,
    /// Linked genres ordered by name.
    pub genres: Vec<Genre>,
    pub quote_count: u32,
}

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    fn create_book(&self, book: &Book) -> RepoResult<BookId>;
    fn update_book(&self, book: &Book) -> RepoResult<()>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn get_book_record(&self, id: BookId) -> RepoResult<Option<BookRecord>>;
    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<BookRecord>>;
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
    fn count_books(&self) -> RepoResult<u64>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn to_record(&self, book: Book) -> RepoResult<BookRecord> {
        let uuid = book.id.to_string();
        let genres = load_genres_for_book(self.conn, &uuid)?;
        let quote_count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM quotes WHERE book_uuid = ?1;",
            [uuid.as_str()],
            |row| row.get(0),
        )?;
        Ok(BookRecord {
            book,
            genres,
            quote_count,
        })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &Book) -> RepoResult<BookId> {
        book.validate()?;

        self.conn.execute(
            "INSERT INTO books (
                uuid,
                title,
                author,
                date_added,
                date_started,
                date_completed,
                comment,
                rating,
                status,
                recommended_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                book.id.to_string(),
                book.title.as_str(),
                book.author.as_str(),
                book.date_added,
                book.date_started,
                book.date_completed,
                book.comment.as_str(),
                book.rating,
                book.status.raw_value(),
                book.recommended_by.as_str(),
            ],
        )?;

        Ok(book.id)
    }

    fn update_book(&self, book: &Book) -> RepoResult<()> {
        book.validate()?;

        let changed = self.conn.execute(
            "UPDATE books
             SET
                title = ?1,
                author = ?2,
                date_added = ?3,
                date_started = ?4,
                date_completed = ?5,
                comment = ?6,
                rating = ?7,
                status = ?8,
                recommended_by = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?10;",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.date_added,
                book.date_started,
                book.date_completed,
                book.comment.as_str(),
                book.rating,
                book.status.raw_value(),
                book.recommended_by.as_str(),
                book.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Book,
                id: book.id,
            });
        }

        Ok(())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }
        Ok(None)
    }

    fn get_book_record(&self, id: BookId) -> RepoResult<Option<BookRecord>> {
        match self.get_book(id)? {
            Some(book) => Ok(Some(self.to_record(book)?)),
            None => Ok(None),
        }
    }

    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<BookRecord>> {
        let mut sql = format!("{BOOK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(filter) = query
            .filter
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            sql.push_str(
                " AND (instr(unicode_lower(title), ?1) > 0 OR instr(unicode_lower(author), ?1) > 0)",
            );
            bind_values.push(Value::Text(fold(filter)));
        }

        sql.push_str(" ORDER BY ");
        sql.push_str(query.sort.order_by_sql());

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        drop(rows);

        books
            .into_iter()
            .map(|book| self.to_record(book))
            .collect()
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM books WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Book,
                id,
            });
        }
        Ok(())
    }

    fn count_books(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books;", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "books.uuid")?;

    let status_value: i64 = row.get("status")?;
    let status = Status::from_raw(status_value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_value}` in books.status"))
    })?;

    let rating = match row.get::<_, Option<i64>>("rating")? {
        Some(value) => Some(u8::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!("invalid rating `{value}` in books.rating"))
        })?),
        None => None,
    };

    let book = Book {
        id,
        title: row.get("title")?,
        author: row.get("author")?,
        date_added: row.get("date_added")?,
        date_started: row.get("date_started")?,
        date_completed: row.get("date_completed")?,
        comment: row.get("comment")?,
        rating,
        status,
        recommended_by: row.get("recommended_by")?,
    };
    book.validate()?;
    Ok(book)
}
