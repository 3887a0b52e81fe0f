//! Catalog schema registry and destructive reset.
//!
//! # Responsibility
//! - Declare the `books`, `authors` and `categories` entity tables.
//! - Declare the `book_categories` and `book_authors` join tables.
//! - Drop and recreate every registered table in one transaction.
//!
//! # Invariants
//! - `TABLES` lists parents before the join tables that reference them.
//! - After a reset every table is empty and `user_version == SCHEMA_VERSION`.

use crate::db::DbResult;
use log::info;
use rusqlite::Connection;

/// Schema version written to `PRAGMA user_version` after a reset.
pub const SCHEMA_VERSION: u32 = 1;

pub const BOOKS_TABLE: &str = "books";
pub const AUTHORS_TABLE: &str = "authors";
pub const CATEGORIES_TABLE: &str = "categories";
pub const BOOK_CATEGORIES_TABLE: &str = "book_categories";
pub const BOOK_AUTHORS_TABLE: &str = "book_authors";

#[derive(Debug, Clone, Copy)]
struct TableDef {
    name: &'static str,
    sql: &'static str,
}

const TABLES: &[TableDef] = &[
    TableDef {
        name: BOOKS_TABLE,
        sql: include_str!("books.sql"),
    },
    TableDef {
        name: AUTHORS_TABLE,
        sql: include_str!("authors.sql"),
    },
    TableDef {
        name: CATEGORIES_TABLE,
        sql: include_str!("categories.sql"),
    },
    TableDef {
        name: BOOK_CATEGORIES_TABLE,
        sql: include_str!("book_categories.sql"),
    },
    TableDef {
        name: BOOK_AUTHORS_TABLE,
        sql: include_str!("book_authors.sql"),
    },
];

/// Returns registered table names in creation order.
pub fn table_names() -> Vec<&'static str> {
    TABLES.iter().map(|table| table.name).collect()
}

/// Drops every registered table and recreates it empty.
///
/// Join tables are dropped first so foreign keys never dangle mid-reset.
///
/// # Side effects
/// - Destroys all catalog rows from previous runs.
/// - Emits one `schema_reset` logging event.
pub fn reset_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    for table in TABLES.iter().rev() {
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", table.name))?;
    }
    for table in TABLES {
        tx.execute_batch(table.sql)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    info!(
        "event=schema_reset module=db status=ok tables={} version={}",
        TABLES.len(),
        SCHEMA_VERSION
    );
    Ok(())
}

/// Reads the schema version recorded by the last reset.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
