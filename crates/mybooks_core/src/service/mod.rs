//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI and other front-ends decoupled from storage details.

pub mod book_service;
pub mod genre_service;
pub mod quote_service;
