//! Domain model for the book catalog.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the reading-status rules that drive date fields.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Timestamps are Unix epoch milliseconds.
//! - A `Quote` belongs to exactly one `Book`; genres are shared many-to-many.

pub mod book;
pub mod genre;
pub mod quote;
pub mod status;
