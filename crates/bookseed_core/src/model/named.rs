//! Name-identified catalog entities: authors and categories.

use crate::db::schema::{
    AUTHORS_TABLE, BOOK_AUTHORS_TABLE, BOOK_CATEGORIES_TABLE, CATEGORIES_TABLE,
};

/// Generated `authors.id` / `categories.id`.
pub type NamedId = i64;

/// Which name-identified entity a row or operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Author,
    Category,
}

impl NameKind {
    pub fn table(self) -> &'static str {
        match self {
            Self::Author => AUTHORS_TABLE,
            Self::Category => CATEGORIES_TABLE,
        }
    }

    /// Join table linking books to this entity.
    pub fn link_table(self) -> &'static str {
        match self {
            Self::Author => BOOK_AUTHORS_TABLE,
            Self::Category => BOOK_CATEGORIES_TABLE,
        }
    }

    /// Foreign-key column of this entity inside `link_table()`.
    pub fn link_column(self) -> &'static str {
        match self {
            Self::Author => "author_id",
            Self::Category => "category_id",
        }
    }
}

/// Persisted author or category row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRow {
    pub id: NamedId,
    pub name: String,
}

pub type Author = NamedRow;
pub type Category = NamedRow;
