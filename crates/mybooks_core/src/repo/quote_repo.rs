//! Quote repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Every quote row references an existing book; creation checks this
//!   up front so callers get `NotFound` instead of a constraint error.
//! - Quote lists are ordered by `creation_date ASC, uuid ASC`.

use crate::model::book::BookId;
use crate::model::quote::{normalize_page, Quote, QuoteId};
use crate::repo::{parse_uuid, row_exists, Entity, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const QUOTE_SELECT_SQL: &str = "SELECT uuid, book_uuid, creation_date, text, page FROM quotes";

/// Repository interface for quote operations.
pub trait QuoteRepository {
    fn create_quote(&self, quote: &Quote) -> RepoResult<QuoteId>;
    /// Replaces text and page of an existing quote.
    fn update_quote(&self, id: QuoteId, text: &str, page: Option<&str>) -> RepoResult<()>;
    fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>>;
    fn list_quotes(&self, book_id: BookId) -> RepoResult<Vec<Quote>>;
    fn delete_quote(&self, id: QuoteId) -> RepoResult<()>;
    fn count_quotes(&self, book_id: BookId) -> RepoResult<u32>;
}

/// SQLite-backed quote repository.
pub struct SqliteQuoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuoteRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn ensure_book(&self, book_id: BookId) -> RepoResult<()> {
        if row_exists(self.conn, "books", book_id)? {
            Ok(())
        } else {
            Err(RepoError::NotFound {
                entity: Entity::Book,
                id: book_id,
            })
        }
    }
}

impl QuoteRepository for SqliteQuoteRepository<'_> {
    fn create_quote(&self, quote: &Quote) -> RepoResult<QuoteId> {
        quote.validate()?;
        self.ensure_book(quote.book_id)?;

        self.conn.execute(
            "INSERT INTO quotes (uuid, book_uuid, creation_date, text, page)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                quote.id.to_string(),
                quote.book_id.to_string(),
                quote.creation_date,
                quote.text.as_str(),
                quote.page.as_deref(),
            ],
        )?;
        Ok(quote.id)
    }

    fn update_quote(&self, id: QuoteId, text: &str, page: Option<&str>) -> RepoResult<()> {
        let mut quote = self.get_quote(id)?.ok_or(RepoError::NotFound {
            entity: Entity::Quote,
            id,
        })?;
        quote.text = text.to_string();
        quote.page = normalize_page(page);
        quote.validate()?;

        self.conn.execute(
            "UPDATE quotes SET text = ?2, page = ?3 WHERE uuid = ?1;",
            params![id.to_string(), quote.text.as_str(), quote.page.as_deref()],
        )?;
        Ok(())
    }

    fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_quote_row(row)?));
        }
        Ok(None)
    }

    fn list_quotes(&self, book_id: BookId) -> RepoResult<Vec<Quote>> {
        self.ensure_book(book_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "{QUOTE_SELECT_SQL}
             WHERE book_uuid = ?1
             ORDER BY creation_date ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([book_id.to_string()])?;
        let mut quotes = Vec::new();
        while let Some(row) = rows.next()? {
            quotes.push(parse_quote_row(row)?);
        }
        Ok(quotes)
    }

    fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM quotes WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Quote,
                id,
            });
        }
        Ok(())
    }

    fn count_quotes(&self, book_id: BookId) -> RepoResult<u32> {
        self.ensure_book(book_id)?;
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM quotes WHERE book_uuid = ?1;",
            [book_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn parse_quote_row(row: &Row<'_>) -> RepoResult<Quote> {
    let uuid_text: String = row.get(0)?;
    let book_text: String = row.get(1)?;
    let quote = Quote {
        id: parse_uuid(&uuid_text, "quotes.uuid")?,
        book_id: parse_uuid(&book_text, "quotes.book_uuid")?,
        creation_date: row.get(2)?,
        text: row.get(3)?,
        page: row.get(4)?,
    };
    quote.validate()?;
    Ok(quote)
}
