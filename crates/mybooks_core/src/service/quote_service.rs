//! Quote use-case service.
//!
//! # Invariants
//! - Quote text must be non-blank on create and update.
//! - Blank page input is stored as no page.

use crate::model::book::BookId;
use crate::model::quote::{Quote, QuoteId, QuoteValidationError};
use crate::repo::quote_repo::QuoteRepository;
use crate::repo::{Entity, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum QuoteServiceError {
    EmptyText,
    QuoteNotFound(QuoteId),
    BookNotFound(BookId),
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl Display for QuoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text must not be empty"),
            Self::QuoteNotFound(id) => write!(f, "quote not found: {id}"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent quote state: {details}"),
        }
    }
}

impl Error for QuoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for QuoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: Entity::Quote,
                id,
            } => Self::QuoteNotFound(id),
            RepoError::NotFound {
                entity: Entity::Book,
                id,
            } => Self::BookNotFound(id),
            RepoError::InvalidQuote(QuoteValidationError::EmptyText) => Self::EmptyText,
            other => Self::Repo(other),
        }
    }
}

/// Quote service facade over repository implementations.
pub struct QuoteService<R: QuoteRepository> {
    repo: R,
}

impl<R: QuoteRepository> QuoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Attaches a new quote to a book.
    pub fn create_quote(
        &self,
        book_id: BookId,
        text: &str,
        page: Option<&str>,
        now_ms: i64,
    ) -> Result<Quote, QuoteServiceError> {
        if text.trim().is_empty() {
            return Err(QuoteServiceError::EmptyText);
        }
        let quote = Quote::new(book_id, text, page, now_ms);
        self.repo.create_quote(&quote)?;
        info!(
            "event=quote_create module=service status=ok book_id={} quote_id={}",
            book_id, quote.id
        );
        Ok(quote)
    }

    /// Replaces text and page of an existing quote.
    pub fn update_quote(
        &self,
        id: QuoteId,
        text: &str,
        page: Option<&str>,
    ) -> Result<Quote, QuoteServiceError> {
        if text.trim().is_empty() {
            return Err(QuoteServiceError::EmptyText);
        }
        self.repo.update_quote(id, text, page)?;
        self.repo
            .get_quote(id)?
            .ok_or(QuoteServiceError::InconsistentState(
                "updated quote not found in read-back",
            ))
    }

    pub fn get_quote(&self, id: QuoteId) -> Result<Option<Quote>, QuoteServiceError> {
        Ok(self.repo.get_quote(id)?)
    }

    /// Lists a book's quotes, oldest first.
    pub fn list_quotes(&self, book_id: BookId) -> Result<Vec<Quote>, QuoteServiceError> {
        Ok(self.repo.list_quotes(book_id)?)
    }

    pub fn delete_quote(&self, id: QuoteId) -> Result<(), QuoteServiceError> {
        self.repo.delete_quote(id)?;
        info!("event=quote_delete module=service status=ok quote_id={id}");
        Ok(())
    }

    pub fn quote_count(&self, book_id: BookId) -> Result<u32, QuoteServiceError> {
        Ok(self.repo.count_quotes(book_id)?)
    }
}
