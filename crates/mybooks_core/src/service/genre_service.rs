//! Genre use-case service.
//!
//! # Responsibility
//! - Create and delete colored genres.
//! - Toggle or replace genre membership of a book.
//!
//! # Invariants
//! - Genre names are trimmed; blank names are rejected before storage.
//! - Membership results are always returned sorted by genre name.

use crate::model::book::BookId;
use crate::model::genre::{Genre, GenreColor, GenreId, GenreValidationError};
use crate::repo::genre_repo::GenreRepository;
use crate::repo::{Entity, RepoError};
use log::info;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum GenreServiceError {
    InvalidName,
    InvalidColor(String),
    DuplicateName(String),
    GenreNotFound(GenreId),
    BookNotFound(BookId),
    Repo(RepoError),
}

impl Display for GenreServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "genre name must not be blank"),
            Self::InvalidColor(value) => write!(f, "invalid genre color: `{value}`"),
            Self::DuplicateName(name) => write!(f, "genre already exists: `{name}`"),
            Self::GenreNotFound(id) => write!(f, "genre not found: {id}"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GenreServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for GenreServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: Entity::Genre,
                id,
            } => Self::GenreNotFound(id),
            RepoError::NotFound {
                entity: Entity::Book,
                id,
            } => Self::BookNotFound(id),
            RepoError::DuplicateGenreName(name) => Self::DuplicateName(name),
            RepoError::InvalidGenre(err) => err.into(),
            other => Self::Repo(other),
        }
    }
}

impl From<GenreValidationError> for GenreServiceError {
    fn from(value: GenreValidationError) -> Self {
        match value {
            GenreValidationError::BlankName => Self::InvalidName,
            GenreValidationError::InvalidColor(value) => Self::InvalidColor(value),
        }
    }
}

/// Genre service facade over repository implementations.
pub struct GenreService<R: GenreRepository> {
    repo: R,
}

impl<R: GenreRepository> GenreService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a genre from a name and an `RRGGBB` / `#RRGGBB` color.
    pub fn create_genre(&self, name: &str, color: &str) -> Result<Genre, GenreServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GenreServiceError::InvalidName);
        }
        let color = GenreColor::parse(color)?;
        if self.repo.find_genre_by_name(name)?.is_some() {
            return Err(GenreServiceError::DuplicateName(name.to_string()));
        }

        let genre = Genre::new(name, color);
        self.repo.create_genre(&genre)?;
        info!(
            "event=genre_create module=service status=ok genre_id={}",
            genre.id
        );
        Ok(genre)
    }

    pub fn get_genre(&self, id: GenreId) -> Result<Option<Genre>, GenreServiceError> {
        Ok(self.repo.get_genre(id)?)
    }

    /// Lists all genres sorted by name.
    pub fn list_genres(&self) -> Result<Vec<Genre>, GenreServiceError> {
        Ok(self.repo.list_genres()?)
    }

    /// Deletes a genre and unlinks it from every book.
    pub fn delete_genre(&self, id: GenreId) -> Result<(), GenreServiceError> {
        self.repo.delete_genre(id)?;
        info!("event=genre_delete module=service status=ok genre_id={id}");
        Ok(())
    }

    pub fn genres_for_book(&self, book_id: BookId) -> Result<Vec<Genre>, GenreServiceError> {
        Ok(self.repo.genres_for_book(book_id)?)
    }

    /// Adds the genre to the book if absent, removes it if present.
    ///
    /// Returns the book's genres after the change.
    pub fn toggle_book_genre(
        &self,
        book_id: BookId,
        genre_id: GenreId,
    ) -> Result<Vec<Genre>, GenreServiceError> {
        let linked = self
            .repo
            .genres_for_book(book_id)?
            .iter()
            .any(|genre| genre.id == genre_id);
        if linked {
            self.repo.remove_book_genre(book_id, genre_id)?;
        } else {
            self.repo.add_book_genre(book_id, genre_id)?;
        }
        Ok(self.repo.genres_for_book(book_id)?)
    }

    /// Replaces the book's genre set. Duplicate IDs are ignored.
    pub fn set_book_genres(
        &self,
        book_id: BookId,
        genre_ids: &[GenreId],
    ) -> Result<Vec<Genre>, GenreServiceError> {
        let unique: Vec<GenreId> = genre_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        self.repo.set_book_genres(book_id, &unique)?;
        Ok(self.repo.genres_for_book(book_id)?)
    }
}
