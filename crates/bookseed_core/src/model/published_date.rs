//! Published-date normalization for imported book records.
//!
//! # Responsibility
//! - Recognize the wrapped `{"$date": ...}` timestamp shape.
//! - Render accepted timestamps as `YYYY-MM-DD HH:MM:SS` in UTC.
//!
//! # Invariants
//! - A falsy `$date` (`null`, `false`, `0`, `""`) is treated as absent.
//! - A truthy `$date` always yields a value; unreadable ones become `INVALID_DATE`.
//! - Rejections always carry the raw JSON value for diagnostics.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage format of `books.published_date`.
pub const PUBLISHED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Stored when a wrapped `$date` cannot be read as a timestamp.
pub const INVALID_DATE: &str = "Invalid date";

const WRAPPED_DATE_KEY: &str = "$date";
const NUMBER_LONG_KEY: &str = "$numberLong";

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Why a record's `publishedDate` could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidPublishedDate {
    /// The record has no `publishedDate` member at all.
    Missing,
    /// Present, but not an object with a truthy `$date` member.
    NotWrapped(String),
}

impl InvalidPublishedDate {
    /// Raw offending value rendered as compact JSON.
    pub fn raw_value(&self) -> &str {
        match self {
            Self::Missing => "<missing>",
            Self::NotWrapped(raw) => raw.as_str(),
        }
    }
}

impl Display for InvalidPublishedDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "publishedDate is missing"),
            Self::NotWrapped(raw) => write!(f, "publishedDate `{raw}` has no `$date` value"),
        }
    }
}

impl Error for InvalidPublishedDate {}

/// Normalizes a raw `publishedDate` value into the storage format.
///
/// # Errors
/// - `Missing` when `value` is `None`.
/// - `NotWrapped` when the value lacks a truthy `$date` member.
///
/// A wrapped value that is not a recognizable timestamp is not an error;
/// it normalizes to `INVALID_DATE`.
pub fn normalize_published_date(value: Option<&Value>) -> Result<String, InvalidPublishedDate> {
    let value = value.ok_or(InvalidPublishedDate::Missing)?;
    let wrapped = value
        .as_object()
        .and_then(|object| object.get(WRAPPED_DATE_KEY))
        .filter(|inner| is_truthy(inner))
        .ok_or_else(|| InvalidPublishedDate::NotWrapped(value.to_string()))?;

    match parse_timestamp(wrapped) {
        Some(timestamp) => Ok(timestamp.format(PUBLISHED_DATE_FORMAT).to_string()),
        None => Ok(INVALID_DATE.to_string()),
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_text(text.trim()),
        Value::Number(number) => {
            let millis = number
                .as_i64()
                .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))?;
            DateTime::<Utc>::from_timestamp_millis(millis)
        }
        Value::Object(object) => {
            let millis = object.get(NUMBER_LONG_KEY)?.as_str()?.trim().parse().ok()?;
            DateTime::<Utc>::from_timestamp_millis(millis)
        }
        _ => None,
    }
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(text, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|f| f != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
