//! Catalog import use-case.
//!
//! # Responsibility
//! - Deduplicate author/category names across all loaded records.
//! - Bulk-insert names, then create books and link them by exact name.
//!
//! # Invariants
//! - Order is fixed: collect, bulk insert authors, bulk insert categories,
//!   re-read both, then create and link books in input order.
//! - A record with an invalid `publishedDate` produces no rows at all.
//! - A name that does not resolve drops only that link, silently.
//! - Repository errors abort the import; nothing is retried.

use crate::logging::sanitize_message;
use crate::model::book::BookRecord;
use crate::model::named::{NameKind, NamedId, NamedRow};
use crate::model::published_date::{normalize_published_date, InvalidPublishedDate};
use crate::repo::book_repo::BookRepository;
use crate::repo::named_repo::NamedEntityRepository;
use crate::repo::RepoResult;
use indexmap::IndexSet;
use log::{debug, warn};
use std::collections::HashMap;

const MAX_LOGGED_VALUE_CHARS: usize = 200;

/// Distinct names referenced by a set of records, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedNames {
    pub authors: IndexSet<String>,
    pub categories: IndexSet<String>,
}

/// Counters describing one completed import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub authors_created: usize,
    pub categories_created: usize,
    pub books_created: usize,
    pub books_skipped: usize,
    pub author_links: usize,
    pub category_links: usize,
    /// Listed names with no matching stored row.
    pub unresolved_links: usize,
}

/// Collects distinct author and category names from every record.
///
/// Records with invalid dates still contribute their names.
pub fn collect_names(records: &[BookRecord]) -> CollectedNames {
    let mut collected = CollectedNames::default();
    for record in records {
        for author in &record.authors {
            collected.authors.insert(author.clone());
        }
        for category in &record.categories {
            collected.categories.insert(category.clone());
        }
    }
    collected
}

/// Import orchestration over name and book repositories.
pub struct ImportService<N: NamedEntityRepository, B: BookRepository> {
    names: N,
    books: B,
}

impl<N: NamedEntityRepository, B: BookRepository> ImportService<N, B> {
    pub fn new(names: N, books: B) -> Self {
        Self { names, books }
    }

    /// Imports all records into an empty catalog.
    ///
    /// # Side effects
    /// - Writes author, category, book and join rows.
    /// - Emits one `book_skip` warning per record with an invalid date.
    pub fn import(&self, records: &[BookRecord]) -> RepoResult<ImportReport> {
        let collected = collect_names(records);
        let mut report = ImportReport::default();

        let authors: Vec<String> = collected.authors.into_iter().collect();
        let categories: Vec<String> = collected.categories.into_iter().collect();
        report.authors_created = self.names.bulk_create(NameKind::Author, &authors)?;
        report.categories_created = self.names.bulk_create(NameKind::Category, &categories)?;
        debug!(
            "event=names_insert module=import status=ok authors={} categories={}",
            report.authors_created, report.categories_created
        );

        let author_ids = name_index(self.names.list_all(NameKind::Author)?);
        let category_ids = name_index(self.names.list_all(NameKind::Category)?);

        for (index, record) in records.iter().enumerate() {
            let published_date = match normalize_published_date(record.published_date.as_ref()) {
                Ok(formatted) => formatted,
                Err(err) => {
                    warn!("{}", skip_message(index, &err));
                    report.books_skipped += 1;
                    continue;
                }
            };

            let book_id = self.books.create_book(&record.to_new_book(published_date))?;
            report.books_created += 1;

            for name in &record.categories {
                match category_ids.get(name) {
                    Some(&category_id) => {
                        if self.books.link_category(book_id, category_id)? {
                            report.category_links += 1;
                        }
                    }
                    None => report.unresolved_links += 1,
                }
            }

            for name in &record.authors {
                match author_ids.get(name) {
                    Some(&author_id) => {
                        if self.books.link_author(book_id, author_id)? {
                            report.author_links += 1;
                        }
                    }
                    None => report.unresolved_links += 1,
                }
            }
        }

        Ok(report)
    }
}

fn skip_message(index: usize, err: &InvalidPublishedDate) -> String {
    format!(
        "event=book_skip module=import status=error index={} reason=invalid_published_date value={}",
        index,
        sanitize_message(err.raw_value(), MAX_LOGGED_VALUE_CHARS)
    )
}

// First row wins when a name appears more than once.
fn name_index(rows: Vec<NamedRow>) -> HashMap<String, NamedId> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(row.name).or_insert(row.id);
    }
    index
}
