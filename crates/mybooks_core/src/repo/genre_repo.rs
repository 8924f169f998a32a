//! Genre repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist genres and the `book_genres` many-to-many link table.
//! - Own link replacement (`set_book_genres`) with atomic semantics.
//!
//! # Invariants
//! - Genre names are unique case-insensitively (`idx_genres_name_unicode`).
//! - Genre lists are ordered by name, case-insensitive, then uuid.
//! - Deleting a genre removes its links but never the linked books.

use crate::model::book::BookId;
use crate::model::genre::{Genre, GenreColor, GenreId};
use crate::repo::{parse_uuid, row_exists, Entity, RepoError, RepoResult};
use rusqlite::{params, Connection, ErrorCode, Row};

const GENRE_SELECT_SQL: &str = "SELECT uuid, name, color FROM genres";

/// Repository interface for genres and book/genre links.
pub trait GenreRepository {
    fn create_genre(&self, genre: &Genre) -> RepoResult<GenreId>;
    fn get_genre(&self, id: GenreId) -> RepoResult<Option<Genre>>;
    /// Case-insensitive exact name lookup.
    fn find_genre_by_name(&self, name: &str) -> RepoResult<Option<Genre>>;
    fn list_genres(&self) -> RepoResult<Vec<Genre>>;
    fn delete_genre(&self, id: GenreId) -> RepoResult<()>;
    fn genres_for_book(&self, book_id: BookId) -> RepoResult<Vec<Genre>>;
    /// Replaces all genre links of one book in a single transaction.
    fn set_book_genres(&self, book_id: BookId, genre_ids: &[GenreId]) -> RepoResult<()>;
    /// Links a genre to a book. Returns `false` when the link already existed.
    fn add_book_genre(&self, book_id: BookId, genre_id: GenreId) -> RepoResult<bool>;
    /// Unlinks a genre from a book. Returns `false` when no link existed.
    fn remove_book_genre(&self, book_id: BookId, genre_id: GenreId) -> RepoResult<bool>;
}

/// SQLite-backed genre repository.
pub struct SqliteGenreRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGenreRepository<'conn> {
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

    fn ensure_genre(&self, genre_id: GenreId) -> RepoResult<()> {
        if row_exists(self.conn, "genres", genre_id)? {
            Ok(())
        } else {
            Err(RepoError::NotFound {
                entity: Entity::Genre,
                id: genre_id,
            })
        }
    }
}

impl GenreRepository for SqliteGenreRepository<'_> {
    fn create_genre(&self, genre: &Genre) -> RepoResult<GenreId> {
        genre.validate()?;

        let result = self.conn.execute(
            "INSERT INTO genres (uuid, name, color) VALUES (?1, ?2, ?3);",
            params![
                genre.id.to_string(),
                genre.name.as_str(),
                genre.color.to_hex()
            ],
        );

        match result {
            Ok(_) => Ok(genre.id),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(RepoError::DuplicateGenreName(genre.name.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_genre(&self, id: GenreId) -> RepoResult<Option<Genre>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GENRE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_genre_row(row)?));
        }
        Ok(None)
    }

    fn find_genre_by_name(&self, name: &str) -> RepoResult<Option<Genre>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GENRE_SELECT_SQL} WHERE name = ?1 COLLATE UNICODE_NOCASE;"
        ))?;
        let mut rows = stmt.query([name.trim()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_genre_row(row)?));
        }
        Ok(None)
    }

    fn list_genres(&self) -> RepoResult<Vec<Genre>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GENRE_SELECT_SQL} ORDER BY name COLLATE UNICODE_NOCASE ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut genres = Vec::new();
        while let Some(row) = rows.next()? {
            genres.push(parse_genre_row(row)?);
        }
        Ok(genres)
    }

    fn delete_genre(&self, id: GenreId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM genres WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Genre,
                id,
            });
        }
        Ok(())
    }

    fn genres_for_book(&self, book_id: BookId) -> RepoResult<Vec<Genre>> {
        self.ensure_book(book_id)?;
        load_genres_for_book(self.conn, &book_id.to_string())
    }

    fn set_book_genres(&self, book_id: BookId, genre_ids: &[GenreId]) -> RepoResult<()> {
        let book_uuid = book_id.to_string();
        let tx = self.conn.unchecked_transaction()?;
        if !row_exists(&tx, "books", book_id)? {
            return Err(RepoError::NotFound {
                entity: Entity::Book,
                id: book_id,
            });
        }

        tx.execute(
            "DELETE FROM book_genres WHERE book_uuid = ?1;",
            [book_uuid.as_str()],
        )?;

        for genre_id in genre_ids {
            if !row_exists(&tx, "genres", *genre_id)? {
                return Err(RepoError::NotFound {
                    entity: Entity::Genre,
                    id: *genre_id,
                });
            }
            tx.execute(
                "INSERT OR IGNORE INTO book_genres (book_uuid, genre_uuid) VALUES (?1, ?2);",
                params![book_uuid.as_str(), genre_id.to_string()],
            )?;
        }

        touch_book(&tx, book_uuid.as_str())?;
        tx.commit()?;
        Ok(())
    }

    fn add_book_genre(&self, book_id: BookId, genre_id: GenreId) -> RepoResult<bool> {
        self.ensure_book(book_id)?;
        self.ensure_genre(genre_id)?;
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO book_genres (book_uuid, genre_uuid) VALUES (?1, ?2);",
            params![book_id.to_string(), genre_id.to_string()],
        )?;
        if changed > 0 {
            touch_book(self.conn, &book_id.to_string())?;
        }
        Ok(changed > 0)
    }

    fn remove_book_genre(&self, book_id: BookId, genre_id: GenreId) -> RepoResult<bool> {
        self.ensure_book(book_id)?;
        self.ensure_genre(genre_id)?;
        let changed = self.conn.execute(
            "DELETE FROM book_genres WHERE book_uuid = ?1 AND genre_uuid = ?2;",
            params![book_id.to_string(), genre_id.to_string()],
        )?;
        if changed > 0 {
            touch_book(self.conn, &book_id.to_string())?;
        }
        Ok(changed > 0)
    }
}

/// Loads genres linked to one book, ordered by name.
pub(crate) fn load_genres_for_book(conn: &Connection, book_uuid: &str) -> RepoResult<Vec<Genre>> {
    let mut stmt = conn.prepare(
        "SELECT g.uuid, g.name, g.color
         FROM book_genres bg
         INNER JOIN genres g ON g.uuid = bg.genre_uuid
         WHERE bg.book_uuid = ?1
         ORDER BY g.name COLLATE UNICODE_NOCASE ASC, g.uuid ASC;",
    )?;
    let mut rows = stmt.query([book_uuid])?;
    let mut genres = Vec::new();
    while let Some(row) = rows.next()? {
        genres.push(parse_genre_row(row)?);
    }
    Ok(genres)
}

fn touch_book(conn: &Connection, book_uuid: &str) -> RepoResult<()> {
    conn.execute(
        "UPDATE books SET updated_at = (strftime('%s', 'now') * 1000) WHERE uuid = ?1;",
        [book_uuid],
    )?;
    Ok(())
}

fn parse_genre_row(row: &Row<'_>) -> RepoResult<Genre> {
    let uuid_text: String = row.get(0)?;
    let color_text: String = row.get(2)?;
    let color = GenreColor::parse(&color_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid color `{color_text}` in genres.color"))
    })?;

    let genre = Genre {
        id: parse_uuid(&uuid_text, "genres.uuid")?,
        name: row.get(1)?,
        color,
    };
    genre.validate()?;
    Ok(genre)
}
