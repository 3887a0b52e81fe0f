use bookseed_core::db::open_db;
use bookseed_core::{
    run_seed, BookRepository, ConfigError, DatabaseTarget, LoadError, SeedConfig, SeedError,
    SqliteBookRepository,
};
use rusqlite::Connection;
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_input(dir: &TempDir, value: &serde_json::Value) -> PathBuf {
    let path = dir.path().join("books-data.json");
    std::fs::write(&path, value.to_string()).unwrap();
    path
}

fn file_config(database: &Path, input: &Path) -> SeedConfig {
    SeedConfig {
        database: DatabaseTarget::File(database.to_path_buf()),
        input_path: input.to_path_buf(),
        ..SeedConfig::default()
    }
}

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn run_seed_writes_catalog_to_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("books.sqlite3");
    let input = write_input(
        &dir,
        &json!([
            {
                "title": "T1",
                "authors": ["A"],
                "categories": ["C"],
                "publishedDate": {"$date": "2020-01-01T00:00:00Z"}
            },
            {
                "title": "T2",
                "authors": ["A"],
                "categories": [],
                "publishedDate": null
            }
        ]),
    );

    let report = run_seed(&file_config(&database, &input)).unwrap();
    assert_eq!(report.books_created, 1);
    assert_eq!(report.books_skipped, 1);

    let conn = open_db(&database).unwrap();
    assert_eq!(row_count(&conn, "books"), 1);
    assert_eq!(row_count(&conn, "authors"), 1);
    assert_eq!(row_count(&conn, "categories"), 1);
    assert_eq!(row_count(&conn, "book_authors"), 1);
    assert_eq!(row_count(&conn, "book_categories"), 1);

    let books = SqliteBookRepository::new(&conn);
    let stored = books.list_books().unwrap();
    assert_eq!(stored[0].title.as_deref(), Some("T1"));
}

#[test]
fn second_run_replaces_first_run() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("books.sqlite3");
    let input = write_input(
        &dir,
        &json!([
            {"title": "only", "authors": ["A", "B"], "publishedDate": {"$date": "2010-05-05"}}
        ]),
    );
    let config = file_config(&database, &input);

    let first = run_seed(&config).unwrap();
    let second = run_seed(&config).unwrap();
    assert_eq!(first, second);

    let conn = open_db(&database).unwrap();
    assert_eq!(row_count(&conn, "books"), 1);
    assert_eq!(row_count(&conn, "authors"), 2);
    assert_eq!(row_count(&conn, "book_authors"), 2);
}

#[test]
fn missing_input_is_fatal_after_schema_reset() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("books.sqlite3");
    let config = file_config(&database, &dir.path().join("absent.json"));

    let err = run_seed(&config).unwrap_err();
    assert!(matches!(err, SeedError::Load(LoadError::Io { .. })));

    // Connection was released; the file opens cleanly with empty tables.
    let conn = open_db(&database).unwrap();
    assert_eq!(row_count(&conn, "books"), 0);
    assert_eq!(row_count(&conn, "authors"), 0);
}

#[test]
fn malformed_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("books.sqlite3");
    let input = dir.path().join("books-data.json");
    std::fs::write(&input, "[{\"title\": \"cut short\"").unwrap();

    let err = run_seed(&file_config(&database, &input)).unwrap_err();
    assert!(matches!(err, SeedError::Load(LoadError::Json { .. })));
}

#[test]
fn unreachable_database_is_fatal_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("no-such-dir").join("books.sqlite3");
    let input = write_input(&dir, &json!([]));

    let err = run_seed(&file_config(&database, &input)).unwrap_err();
    assert!(matches!(err, SeedError::Db(_)));
}

#[test]
fn invalid_config_is_rejected_before_connecting() {
    let config = SeedConfig {
        input_path: PathBuf::new(),
        database: DatabaseTarget::Memory,
        ..SeedConfig::default()
    };

    let err = run_seed(&config).unwrap_err();
    assert!(matches!(err, SeedError::Config(ConfigError::EmptyInputPath)));
}

#[test]
fn in_memory_target_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        &dir,
        &json!([
            {"authors": ["X"], "categories": ["Y", "Z"], "publishedDate": {"$date": 1_000_000_000_000_i64}},
            {"authors": ["X"], "categories": ["Z"], "publishedDate": {"$date": "garbage"}}
        ]),
    );
    let config = SeedConfig {
        database: DatabaseTarget::Memory,
        input_path: input,
        ..SeedConfig::default()
    };

    let report = run_seed(&config).unwrap();
    assert_eq!(report.authors_created, 1);
    assert_eq!(report.categories_created, 2);
    assert_eq!(report.books_created, 2);
    assert_eq!(report.books_skipped, 0);
    assert_eq!(report.category_links, 3);
}
