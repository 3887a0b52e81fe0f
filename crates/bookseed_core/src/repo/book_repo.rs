//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Insert book rows and their author/category join rows.
//! - Provide read paths used to inspect an imported catalog.
//!
//! # Invariants
//! - Each book insert is its own implicit unit of work.
//! - Linking an already-linked pair is a no-op, not an error.

use crate::model::book::{Book, BookId, NewBook};
use crate::model::named::{NameKind, NamedId, NamedRow};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    isbn,
    page_count,
    published_date,
    thumbnail_url,
    short_description,
    long_description,
    description,
    status
FROM books";

/// Repository interface for book rows and their associations.
pub trait BookRepository {
    fn create_book(&self, book: &NewBook) -> RepoResult<BookId>;
    /// Returns `true` when a new join row was written.
    fn link_author(&self, book_id: BookId, author_id: NamedId) -> RepoResult<bool>;
    /// Returns `true` when a new join row was written.
    fn link_category(&self, book_id: BookId, category_id: NamedId) -> RepoResult<bool>;
    fn get_book(&self, book_id: BookId) -> RepoResult<Option<Book>>;
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    fn authors_of(&self, book_id: BookId) -> RepoResult<Vec<NamedRow>>;
    fn categories_of(&self, book_id: BookId) -> RepoResult<Vec<NamedRow>>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn link(&self, kind: NameKind, book_id: BookId, related_id: NamedId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {} (book_id, {}) VALUES (?1, ?2);",
                kind.link_table(),
                kind.link_column()
            ),
            params![book_id, related_id],
        )?;
        Ok(changed > 0)
    }

    fn related(&self, kind: NameKind, book_id: BookId) -> RepoResult<Vec<NamedRow>> {
        if !self.book_exists(book_id)? {
            return Err(RepoError::NotFound(book_id));
        }

        let mut stmt = self.conn.prepare(&format!(
            "SELECT n.id, n.name
             FROM {table} n
             INNER JOIN {link} l ON l.{column} = n.id
             WHERE l.book_id = ?1
             ORDER BY n.id ASC;",
            table = kind.table(),
            link = kind.link_table(),
            column = kind.link_column(),
        ))?;
        let mut rows = stmt.query([book_id])?;
        let mut related = Vec::new();
        while let Some(row) = rows.next()? {
            related.push(NamedRow {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }

        Ok(related)
    }

    fn book_exists(&self, book_id: BookId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM books WHERE id = ?1);",
            [book_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &NewBook) -> RepoResult<BookId> {
        self.conn.execute(
            "INSERT INTO books (
                title,
                isbn,
                page_count,
                published_date,
                thumbnail_url,
                short_description,
                long_description,
                description,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                book.title.as_deref(),
                book.isbn.as_deref(),
                book.page_count,
                book.published_date.as_str(),
                book.thumbnail_url.as_deref(),
                book.short_description.as_deref(),
                book.long_description.as_deref(),
                book.description.as_deref(),
                book.status.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn link_author(&self, book_id: BookId, author_id: NamedId) -> RepoResult<bool> {
        self.link(NameKind::Author, book_id, author_id)
    }

    fn link_category(&self, book_id: BookId, category_id: NamedId) -> RepoResult<bool> {
        self.link(NameKind::Category, book_id, category_id)
    }

    fn get_book(&self, book_id: BookId) -> RepoResult<Option<Book>> {
        let book = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
                [book_id],
                parse_book_row,
            )
            .optional()?;
        Ok(book)
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let books = stmt
            .query_map([], parse_book_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    fn authors_of(&self, book_id: BookId) -> RepoResult<Vec<NamedRow>> {
        self.related(NameKind::Author, book_id)
    }

    fn categories_of(&self, book_id: BookId) -> RepoResult<Vec<NamedRow>> {
        self.related(NameKind::Category, book_id)
    }
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        isbn: row.get("isbn")?,
        page_count: row.get("page_count")?,
        published_date: row.get("published_date")?,
        thumbnail_url: row.get("thumbnail_url")?,
        short_description: row.get("short_description")?,
        long_description: row.get("long_description")?,
        description: row.get("description")?,
        status: row.get("status")?,
    })
}
