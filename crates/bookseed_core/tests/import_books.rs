use bookseed_core::db::open_db_in_memory;
use bookseed_core::db::schema::reset_schema;
use bookseed_core::model::published_date::INVALID_DATE;
use bookseed_core::{
    parse_books, BookRecord, BookRepository, ImportReport, ImportService, NameKind,
    NamedEntityRepository, NamedRow, RepoResult, SqliteBookRepository,
    SqliteNamedEntityRepository,
};
use rusqlite::Connection;
use serde_json::json;
use std::collections::BTreeSet;

fn ready_db() -> Connection {
    let mut conn = open_db_in_memory().unwrap();
    reset_schema(&mut conn).unwrap();
    conn
}

fn records(value: serde_json::Value) -> Vec<BookRecord> {
    parse_books(&value.to_string()).unwrap()
}

#[test]
fn valid_book_is_created_and_linked_while_null_date_is_skipped() {
    let conn = ready_db();
    let input = records(json!([
        {
            "authors": ["A"],
            "categories": ["C"],
            "publishedDate": {"$date": "2020-01-01T00:00:00Z"},
            "title": "T1"
        },
        {
            "authors": ["A"],
            "categories": [],
            "publishedDate": null,
            "title": "T2"
        }
    ]));

    let service = ImportService::new(
        SqliteNamedEntityRepository::new(&conn),
        SqliteBookRepository::new(&conn),
    );
    let report = service.import(&input).unwrap();

    assert_eq!(report.authors_created, 1);
    assert_eq!(report.categories_created, 1);
    assert_eq!(report.books_created, 1);
    assert_eq!(report.books_skipped, 1);
    assert_eq!(report.author_links, 1);
    assert_eq!(report.category_links, 1);
    assert_eq!(report.unresolved_links, 0);

    let books = SqliteBookRepository::new(&conn);
    let stored = books.list_books().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title.as_deref(), Some("T1"));
    assert_eq!(stored[0].published_date, "2020-01-01 00:00:00");

    let authors = books.authors_of(stored[0].id).unwrap();
    let categories = books.categories_of(stored[0].id).unwrap();
    assert_eq!(authors[0].name, "A");
    assert_eq!(categories[0].name, "C");
}

#[test]
fn names_are_deduplicated_across_valid_and_invalid_records() {
    let conn = ready_db();
    let input = records(json!([
        {"authors": ["Ann", "Bob"], "categories": ["Java"], "publishedDate": {"$date": "2011-01-01"}},
        {"authors": ["Bob", "Cid"], "categories": ["Java", "Web"], "publishedDate": {"$date": "2012-01-01"}},
        {"authors": ["Dee", "Ann"], "categories": ["Python"], "publishedDate": "2013"},
        {"authors": ["Ann"], "categories": ["Web"]}
    ]));

    let names = SqliteNamedEntityRepository::new(&conn);
    let service = ImportService::new(
        SqliteNamedEntityRepository::new(&conn),
        SqliteBookRepository::new(&conn),
    );
    let report = service.import(&input).unwrap();

    let expected_authors: BTreeSet<String> = input
        .iter()
        .flat_map(|record| record.authors.iter().cloned())
        .collect();
    let stored_authors: Vec<String> = names
        .list_all(NameKind::Author)
        .unwrap()
        .into_iter()
        .map(|row| row.name)
        .collect();
    assert_eq!(stored_authors.len(), expected_authors.len());
    assert_eq!(
        stored_authors.iter().cloned().collect::<BTreeSet<_>>(),
        expected_authors
    );

    let stored_categories: BTreeSet<String> = names
        .list_all(NameKind::Category)
        .unwrap()
        .into_iter()
        .map(|row| row.name)
        .collect();
    assert_eq!(
        stored_categories,
        ["Java", "Python", "Web"]
            .map(String::from)
            .into_iter()
            .collect::<BTreeSet<String>>()
    );

    assert_eq!(report.books_created, 2);
    assert_eq!(report.books_skipped, 2);
    assert_eq!(report.author_links, 4);
    assert_eq!(report.category_links, 3);
}

#[test]
fn books_are_created_in_input_order() {
    let conn = ready_db();
    let input = records(json!([
        {"title": "first", "publishedDate": {"$date": 0}},
        {"title": "second", "publishedDate": {"$date": "2001-02-03T04:05:06.000-0000"}},
        {"title": "third", "publishedDate": {"$date": {"$numberLong": "946684800000"}}}
    ]));

    let service = ImportService::new(
        SqliteNamedEntityRepository::new(&conn),
        SqliteBookRepository::new(&conn),
    );
    let report = service.import(&input).unwrap();
    assert_eq!(report.books_skipped, 1);

    let stored = SqliteBookRepository::new(&conn).list_books().unwrap();
    let rows: Vec<(Option<&str>, &str)> = stored
        .iter()
        .map(|book| (book.title.as_deref(), book.published_date.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (Some("second"), "2001-02-03 04:05:06"),
            (Some("third"), "2000-01-01 00:00:00"),
        ]
    );
}

#[test]
fn unreadable_wrapped_date_is_stored_as_invalid_date() {
    let conn = ready_db();
    let input = records(json!([
        {"title": "odd date", "authors": ["Ann"], "categories": ["Java"], "publishedDate": {"$date": "garbage"}}
    ]));

    let service = ImportService::new(
        SqliteNamedEntityRepository::new(&conn),
        SqliteBookRepository::new(&conn),
    );
    let report = service.import(&input).unwrap();
    assert_eq!(report.books_created, 1);
    assert_eq!(report.books_skipped, 0);

    let books = SqliteBookRepository::new(&conn);
    let stored = books.list_books().unwrap();
    assert_eq!(stored[0].published_date, INVALID_DATE);
    assert_eq!(books.authors_of(stored[0].id).unwrap()[0].name, "Ann");
    assert_eq!(books.categories_of(stored[0].id).unwrap()[0].name, "Java");
}

#[test]
fn repeated_name_within_one_record_links_once() {
    let conn = ready_db();
    let input = records(json!([
        {"authors": ["Ann", "Ann"], "categories": ["Java", "Java"], "publishedDate": {"$date": "2011-01-01"}}
    ]));

    let service = ImportService::new(
        SqliteNamedEntityRepository::new(&conn),
        SqliteBookRepository::new(&conn),
    );
    let report = service.import(&input).unwrap();

    assert_eq!(report.author_links, 1);
    assert_eq!(report.category_links, 1);
    assert_eq!(report.unresolved_links, 0);
}

/// Stores every name except the ones listed in `drop`.
struct LossyNames<'conn> {
    inner: SqliteNamedEntityRepository<'conn>,
    drop: &'static [&'static str],
}

impl NamedEntityRepository for LossyNames<'_> {
    fn bulk_create(&self, kind: NameKind, names: &[String]) -> RepoResult<usize> {
        let kept: Vec<String> = names
            .iter()
            .filter(|name| !self.drop.contains(&name.as_str()))
            .cloned()
            .collect();
        self.inner.bulk_create(kind, &kept)
    }

    fn list_all(&self, kind: NameKind) -> RepoResult<Vec<NamedRow>> {
        self.inner.list_all(kind)
    }
}

#[test]
fn unresolved_names_drop_only_their_link() {
    let conn = ready_db();
    let input = records(json!([
        {
            "title": "partially linked",
            "authors": ["Kept", "Lost"],
            "categories": ["Gone"],
            "publishedDate": {"$date": "2015-06-01T12:00:00Z"}
        }
    ]));

    let service = ImportService::new(
        LossyNames {
            inner: SqliteNamedEntityRepository::new(&conn),
            drop: &["Lost", "Gone"],
        },
        SqliteBookRepository::new(&conn),
    );
    let report = service.import(&input).unwrap();

    assert_eq!(report.books_created, 1);
    assert_eq!(report.author_links, 1);
    assert_eq!(report.category_links, 0);
    assert_eq!(report.unresolved_links, 2);

    let books = SqliteBookRepository::new(&conn);
    let book = &books.list_books().unwrap()[0];
    let authors = books.authors_of(book.id).unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].name, "Kept");
    assert!(books.categories_of(book.id).unwrap().is_empty());
}

#[test]
fn empty_input_creates_nothing() {
    let conn = ready_db();
    let service = ImportService::new(
        SqliteNamedEntityRepository::new(&conn),
        SqliteBookRepository::new(&conn),
    );

    let report = service.import(&[]).unwrap();
    assert_eq!(report, ImportReport::default());
}
