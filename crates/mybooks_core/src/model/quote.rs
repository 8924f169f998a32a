//! Quote domain model.
//!
//! # Invariants
//! - `text` is never blank.
//! - `page` is either `None` or a non-blank reference; blank input collapses
//!   to `None`.

use crate::model::book::BookId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a quote.
pub type QuoteId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteValidationError {
    EmptyText,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text must not be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

/// Excerpt attached to one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub book_id: BookId,
    /// Creation time in epoch milliseconds; list order key.
    pub creation_date: i64,
    pub text: String,
    /// Free-form page reference such as `42` or `xii`.
    pub page: Option<String>,
}

impl Quote {
    pub fn new(book_id: BookId, text: impl Into<String>, page: Option<&str>, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id,
            creation_date: now_ms,
            text: text.into(),
            page: normalize_page(page),
        }
    }

    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        if self.text.trim().is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Collapses blank page references to `None` and trims the rest.
pub fn normalize_page(page: Option<&str>) -> Option<String> {
    page.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
