//! Author/category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Insert batches of names into `authors` or `categories`.
//! - Read rows back with their generated ids.
//!
//! # Invariants
//! - One `bulk_create` call is one transaction; it fully applies or not at all.
//! - Names are stored verbatim; no trimming or case folding.

use crate::model::named::{NameKind, NamedRow};
use crate::repo::RepoResult;
use rusqlite::{params, Connection};

/// Repository interface for name-identified catalog entities.
pub trait NamedEntityRepository {
    /// Inserts every name as a new row and returns the number inserted.
    fn bulk_create(&self, kind: NameKind, names: &[String]) -> RepoResult<usize>;
    /// Returns all rows of `kind` ordered by id.
    fn list_all(&self, kind: NameKind) -> RepoResult<Vec<NamedRow>>;
}

/// SQLite-backed author/category repository.
pub struct SqliteNamedEntityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNamedEntityRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NamedEntityRepository for SqliteNamedEntityRepository<'_> {
    fn bulk_create(&self, kind: NameKind, names: &[String]) -> RepoResult<usize> {
        if names.is_empty() {
            return Ok(0);
        }

        // `unchecked_transaction` because the repository only borrows the
        // connection immutably.
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} (name) VALUES (?1);",
                kind.table()
            ))?;
            for name in names {
                inserted += stmt.execute(params![name.as_str()])?;
            }
        }
        tx.commit()?;

        Ok(inserted)
    }

    fn list_all(&self, kind: NameKind) -> RepoResult<Vec<NamedRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name FROM {} ORDER BY id ASC;",
            kind.table()
        ))?;
        let mut rows = stmt.query([])?;
        let mut named = Vec::new();

        while let Some(row) = rows.next()? {
            named.push(NamedRow {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }

        Ok(named)
    }
}
