//! Catalog domain model.
//!
//! # Responsibility
//! - Define the input record shape read from the JSON document.
//! - Define persisted rows for books, authors and categories.
//!
//! # Invariants
//! - Authors and categories are identified by exact name within one run.
//! - Books carry a normalized `published_date` string once persisted.

pub mod book;
pub mod named;
pub mod published_date;
