//! Core logic for seeding a book catalog database from a JSON export.
//! The CLI is a thin shell around `run_seed`.

pub mod config;
pub mod db;
pub mod loader;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::{ConfigError, DatabaseTarget, SeedConfig};
pub use loader::{load_books, parse_books, LoadError, LoadResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookId, BookRecord, NewBook};
pub use model::named::{Author, Category, NameKind, NamedId, NamedRow};
pub use model::published_date::{normalize_published_date, InvalidPublishedDate};
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::named_repo::{NamedEntityRepository, SqliteNamedEntityRepository};
pub use repo::{RepoError, RepoResult};
pub use seed::{run_seed, seed_connection, SeedError, SeedResult};
pub use service::import_service::{collect_names, CollectedNames, ImportReport, ImportService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
