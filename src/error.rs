//! Error types for the character record core.
//!
//! Every fallible operation in the crate returns a `SheetError`.

use crate::entry_key::EntryKey;
use crate::value::EntryValue;
use thiserror::Error;

/// Errors raised while tracking, loading, projecting or exporting a record.
///
/// # Examples
///
/// ```rust
/// use chargen::{EntryKey, SheetError};
///
/// let err = SheetError::KeyNotFound(EntryKey::from_str("name"));
/// assert_eq!(err.to_string(), "Key not registered: name");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SheetError {
    /// Read or write of a key that is not registered in the store.
    #[error("Key not registered: {0}")]
    KeyNotFound(EntryKey),

    /// A composite key does not split into the expected number of segments.
    ///
    /// This always indicates corrupted persisted input and is never
    /// silently dropped.
    #[error("Malformed composite key: {0}")]
    MalformedKey(String),

    /// A watched key holds a value that cannot be summed as an integer, or
    /// adding it overflows the total.
    #[error("Cannot add {value} for key {key} to the running total")]
    InvalidAggregateValue { key: EntryKey, value: EntryValue },

    /// A skill key names an ability that is not one of the four known ones.
    #[error("Skill key {key} refers to unknown ability {ability:?}")]
    UnknownAbility { key: EntryKey, ability: String },

    /// A numeric field (level, armor) holds a non-integer value, or one too
    /// large to derive from.
    #[error("Expected an integer for {key}, found {value}")]
    InvalidValue { key: EntryKey, value: EntryValue },

    /// The sheet template is malformed.
    #[error("Template error: {0}")]
    Template(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// A document could not be parsed or serialized.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for SheetError {
    fn from(err: std::io::Error) -> Self {
        SheetError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SheetError {
    fn from(err: serde_json::Error) -> Self {
        SheetError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for SheetError {
    fn from(err: toml::de::Error) -> Self {
        SheetError::Parse(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetError>;
