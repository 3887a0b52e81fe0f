//! End-to-end seeding pipeline.
//!
//! # Responsibility
//! - Run connect, schema reset, load and import in strict order.
//! - Own the connection for the whole run and release it exactly once.
//!
//! # Invariants
//! - Once opened, the connection is closed on success and on every error.
//! - A close failure never masks an earlier seeding error.

use crate::config::{ConfigError, DatabaseTarget, SeedConfig};
use crate::db::schema::reset_schema;
use crate::db::{close_db, open_db, open_db_in_memory, DbError};
use crate::loader::{load_books, LoadError};
use crate::repo::book_repo::SqliteBookRepository;
use crate::repo::named_repo::SqliteNamedEntityRepository;
use crate::repo::RepoError;
use crate::service::import_service::{ImportReport, ImportService};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

pub type SeedResult<T> = Result<T, SeedError>;

/// Fatal seeding failure.
#[derive(Debug)]
pub enum SeedError {
    Config(ConfigError),
    Db(DbError),
    Load(LoadError),
    Repo(RepoError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Db(err) => write!(f, "database error: {err}"),
            Self::Load(err) => write!(f, "input error: {err}"),
            Self::Repo(err) => write!(f, "import error: {err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Load(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ConfigError> for SeedError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for SeedError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<LoadError> for SeedError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<RepoError> for SeedError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Seeds the configured database from the configured input file.
///
/// # Side effects
/// - Drops and recreates every catalog table in the target database.
/// - Emits `db_connect`, `seed_done` and `db_close` logging events.
pub fn run_seed(config: &SeedConfig) -> SeedResult<ImportReport> {
    config.validate()?;

    let mut conn = match &config.database {
        DatabaseTarget::File(path) => open_db(path)?,
        DatabaseTarget::Memory => open_db_in_memory()?,
    };
    info!("event=db_connect module=seed status=ok");

    let outcome = seed_connection(&mut conn, &config.input_path);
    let closed = close_db(conn);

    match (outcome, closed) {
        (Ok(report), Ok(())) => Ok(report),
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(err), _) => Err(err),
    }
}

/// Resets the schema on an open connection and imports `input_path` into it.
///
/// The caller keeps ownership of `conn` and is responsible for closing it.
pub fn seed_connection(conn: &mut Connection, input_path: &Path) -> SeedResult<ImportReport> {
    let started_at = Instant::now();
    let result = seed_steps(conn, input_path);
    match &result {
        Ok(report) => info!(
            "event=seed_done module=seed status=ok duration_ms={} books={} skipped={} authors={} categories={} author_links={} category_links={}",
            started_at.elapsed().as_millis(),
            report.books_created,
            report.books_skipped,
            report.authors_created,
            report.categories_created,
            report.author_links,
            report.category_links
        ),
        Err(err) => error!(
            "event=seed_done module=seed status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn seed_steps(conn: &mut Connection, input_path: &Path) -> SeedResult<ImportReport> {
    reset_schema(conn)?;
    let records = load_books(input_path)?;

    let conn: &Connection = conn;
    let service = ImportService::new(
        SqliteNamedEntityRepository::new(conn),
        SqliteBookRepository::new(conn),
    );
    Ok(service.import(&records)?)
}
