//! SQL identifiers interpolated into statement text.
//!
//! Table, column, schema and procedure names cannot be bound as parameters,
//! so they are checked here before they reach a query string.

use std::fmt;

/// Rejection reasons for [`SqlIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The identifier was empty.
    #[error("SQL identifier must not be empty")]
    Empty,
    /// A segment broke the `[A-Za-z_][A-Za-z0-9_]*` rule.
    #[error("invalid SQL identifier segment: {segment:?}")]
    InvalidSegment { segment: String },
    /// More than one schema qualifier was given.
    #[error("SQL identifier may have at most one schema qualifier: {raw:?}")]
    TooManySegments { raw: String },
}

/// An unquoted, optionally schema-qualified SQL identifier.
///
/// PostgreSQL folds unquoted identifiers to lower case, so `SP_MINES_X` and
/// `sp_mines_x` name the same procedure.
///
/// # Examples
/// ```
/// use mineops::outbound::persistence::SqlIdentifier;
///
/// assert!(SqlIdentifier::new("balcorpdb.mines_users").is_ok());
/// assert!(SqlIdentifier::new("mines_users; DROP TABLE x").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlIdentifier(String);

impl SqlIdentifier {
    /// Validate `raw`.
    pub fn new(raw: &str) -> Result<Self, IdentifierError> {
        if raw.is_empty() {
            return Err(IdentifierError::Empty);
        }
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.len() > 2 {
            return Err(IdentifierError::TooManySegments { raw: raw.to_owned() });
        }
        if let Some(bad) = segments.iter().find(|segment| !is_valid_segment(segment)) {
            return Err(IdentifierError::InvalidSegment {
                segment: (*bad).to_owned(),
            });
        }
        Ok(Self(raw.to_owned()))
    }

    /// Qualify an unqualified `name` with this identifier as schema.
    pub fn qualify(&self, name: &str) -> Result<Self, IdentifierError> {
        Self::new(&format!("{}.{name}", self.0))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SqlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
