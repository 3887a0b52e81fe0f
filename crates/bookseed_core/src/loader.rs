//! JSON input loading for book records.
//!
//! # Responsibility
//! - Read the input document from disk in one shot.
//! - Parse it as an array of `BookRecord`.
//!
//! # Invariants
//! - Per-record validation is deferred to import; only the document shape is checked here.

use crate::model::book::BookRecord;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "failed to parse `{}` as book records: {source}", path.display())
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Reads and parses the book records file at `path`.
///
/// # Errors
/// - `LoadError::Io` when the file is missing or unreadable.
/// - `LoadError::Json` when the content is not a JSON array of objects.
pub fn load_books(path: impl AsRef<Path>) -> LoadResult<Vec<BookRecord>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_books(&raw).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "event=input_load module=loader status=ok path={} records={}",
        path.display(),
        records.len()
    );
    Ok(records)
}

/// Parses book records from an in-memory JSON document.
pub fn parse_books(raw: &str) -> Result<Vec<BookRecord>, serde_json::Error> {
    serde_json::from_str(raw)
}
