//! Book input records and persisted book rows.
//!
//! # Responsibility
//! - Describe the JSON shape of one imported book record.
//! - Convert a record plus its normalized date into an insertable row.
//!
//! # Invariants
//! - `publishedDate` stays raw until import so its shape can be checked per record.
//! - Unknown input members are ignored, never rejected.
//! - A mistyped known member degrades to a coerced value or `None`; it never
//!   fails the whole load.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Generated `books.id`.
pub type BookId = i64;

/// One element of the input JSON array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub isbn: Option<String>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub page_count: Option<i64>,
    /// Raw value; expected as `{"$date": ...}`. Absent and `null` are kept apart.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub published_date: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub short_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub long_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    /// Scalar entries only; anything else in the list is dropped.
    #[serde(default, deserialize_with = "lenient_names")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "lenient_names")]
    pub categories: Vec<String>,
}

impl BookRecord {
    /// Builds the row to insert once `published_date` has been normalized.
    pub fn to_new_book(&self, published_date: String) -> NewBook {
        NewBook {
            title: self.title.clone(),
            isbn: self.isbn.clone(),
            page_count: self.page_count,
            published_date,
            thumbnail_url: self.thumbnail_url.clone(),
            short_description: self.short_description.clone(),
            long_description: self.long_description.clone(),
            description: self.description.clone(),
            status: self.status.clone(),
        }
    }
}

/// Insert model for `books`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub page_count: Option<i64>,
    /// Already formatted as `YYYY-MM-DD HH:MM:SS`.
    pub published_date: String,
    pub thumbnail_url: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Read model for a persisted `books` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub page_count: Option<i64>,
    pub published_date: String,
    pub thumbnail_url: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

// `Option<Value>` would collapse an explicit `null` into `None`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| scalar_text(&value))
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(entries) => entries.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
