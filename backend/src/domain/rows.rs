//! Result rows and their normalisation.
//!
//! Store calls answer with either a flat row set or a sequence of row sets
//! (the first one holding the rows, any others carrying call metadata). The
//! adapter classifies the answer once into [`RawResult`]; everything above it
//! works on the rows produced by [`RowNormalizer::normalize`].

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use tracing::debug;

/// One result row: column name to value, in the order the store returned.
pub type Row = Map<String, Value>;

/// Field names that hold credential digests in one table or another.
pub const DEFAULT_SENSITIVE_FIELDS: &[&str] =
    &["password", "USER_PWD", "PWD", "user_password", "passwd"];

/// Errors raised while classifying a JSON document as a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowShapeError {
    /// The document was neither null nor an array.
    #[error("expected an array of rows, found {found}")]
    NotAnArray {
        /// JSON kind that was found instead.
        found: &'static str,
    },
    /// A row set contained something other than objects.
    #[error("row {index} of result set {set} is a {found}, expected an object")]
    NotARow {
        /// Zero-based result set index.
        set: usize,
        /// Zero-based row index within the set.
        index: usize,
        /// JSON kind that was found instead.
        found: &'static str,
    },
}

/// Result of a store call, resolved once at the adapter boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// A flat sequence of rows.
    SingleRowSet(Vec<Row>),
    /// A sequence of row sets; the first one holds the rows.
    MultiRowSet(Vec<Vec<Row>>),
}

impl RawResult {
    /// An empty result.
    pub fn empty() -> Self {
        Self::SingleRowSet(Vec::new())
    }

    /// Classify a JSON document.
    ///
    /// `[[{..}], ..]` becomes [`RawResult::MultiRowSet`] (non-array trailing
    /// elements are call metadata and skipped); `[{..}, ..]` becomes
    /// [`RawResult::SingleRowSet`]; `null` is an empty result. Row sets holding
    /// anything but objects are rejected rather than silently filtered.
    ///
    /// # Examples
    /// ```
    /// use mineops::domain::RawResult;
    /// use serde_json::json;
    ///
    /// let raw = RawResult::from_json(json!([[{ "a": 1 }]])).expect("valid shape");
    /// assert!(matches!(raw, RawResult::MultiRowSet(_)));
    /// ```
    pub fn from_json(value: Value) -> Result<Self, RowShapeError> {
        let items = match value {
            Value::Null => return Ok(Self::empty()),
            Value::Array(items) => items,
            other => {
                return Err(RowShapeError::NotAnArray {
                    found: kind_of(&other),
                });
            }
        };

        if matches!(items.first(), Some(Value::Array(_))) {
            let sets = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Array(rows) => Some(rows),
                    _ => None,
                })
                .enumerate()
                .map(|(set, rows)| into_rows(set, rows))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::MultiRowSet(sets));
        }

        into_rows(0, items).map(Self::SingleRowSet)
    }

    /// Unwrap exactly one level of nesting and return the primary rows.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Self::SingleRowSet(rows) => rows,
            Self::MultiRowSet(sets) => {
                let mut sets = sets.into_iter();
                let primary = sets.next().unwrap_or_default();
                let trailing = sets.len();
                if trailing > 0 {
                    debug!(trailing, "ignoring trailing result sets");
                }
                primary
            }
        }
    }
}

fn into_rows(set: usize, items: Vec<Value>) -> Result<Vec<Row>, RowShapeError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(row) => Ok(row),
            other => Err(RowShapeError::NotARow {
                set,
                index,
                found: kind_of(&other),
            }),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a date or timestamp string and return its calendar date.
///
/// Timestamps with an offset keep the date as written in that offset.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(stamp.date());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Reformat a date-typed value as `YYYY-MM-DD`.
///
/// Null stays null. Values that are not recognisable dates are returned
/// unchanged.
///
/// # Examples
/// ```
/// use mineops::domain::normalize_date;
/// use serde_json::{json, Value};
///
/// assert_eq!(normalize_date(json!("2024-03-05T10:00:00Z")), json!("2024-03-05"));
/// assert_eq!(normalize_date(Value::Null), Value::Null);
/// ```
pub fn normalize_date(value: Value) -> Value {
    match value {
        Value::String(raw) => match parse_calendar_date(&raw) {
            Some(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            None => {
                debug!(value = %raw, "leaving unrecognised date value untouched");
                Value::String(raw)
            }
        },
        other => other,
    }
}

/// Reshapes raw results into JSON-safe rows.
///
/// Sensitive field names are matched ignoring ASCII case so a digest column
/// is removed whichever alias or casing the table used.
#[derive(Debug, Clone, Default)]
pub struct RowNormalizer {
    date_fields: BTreeSet<String>,
    sensitive_fields: BTreeSet<String>,
}

impl RowNormalizer {
    /// Normaliser stripping [`DEFAULT_SENSITIVE_FIELDS`] and no date fields.
    pub fn new() -> Self {
        Self::default().with_sensitive_fields(DEFAULT_SENSITIVE_FIELDS.iter().copied())
    }

    /// Add fields whose values are reformatted as calendar dates.
    pub fn with_date_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Add fields removed from every row.
    pub fn with_sensitive_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sensitive_fields.extend(
            fields
                .into_iter()
                .map(|field| field.as_ref().to_ascii_lowercase()),
        );
        self
    }

    /// Unwrap, reformat dates and strip sensitive fields.
    ///
    /// # Examples
    /// ```
    /// use mineops::domain::{RawResult, RowNormalizer};
    /// use serde_json::json;
    ///
    /// let raw = RawResult::from_json(json!([[{ "Prod_date": "2024-03-05T10:00:00Z", "password": "x" }]]))
    ///     .expect("valid shape");
    /// let rows = RowNormalizer::new().with_date_fields(["Prod_date"]).normalize(raw);
    /// assert_eq!(rows[0].get("Prod_date"), Some(&json!("2024-03-05")));
    /// assert!(rows[0].get("password").is_none());
    /// ```
    pub fn normalize(&self, raw: RawResult) -> Vec<Row> {
        raw.into_rows()
            .into_iter()
            .map(|row| self.normalize_row(row))
            .collect()
    }

    /// Apply the date and sensitive-field passes to one row.
    pub fn normalize_row(&self, row: Row) -> Row {
        row.into_iter()
            .filter(|(column, _)| !self.is_sensitive(column))
            .map(|(column, value)| {
                if self.date_fields.contains(&column) {
                    (column, normalize_date(value))
                } else {
                    (column, value)
                }
            })
            .collect()
    }

    fn is_sensitive(&self, column: &str) -> bool {
        self.sensitive_fields
            .contains(column.to_ascii_lowercase().as_str())
    }
}
