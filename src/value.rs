//! Scalar values held by record entries.
//!
//! An entry holds either free text or an integer. The kind of an entry's
//! initial value decides what "empty" means for it on reset.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar record value.
///
/// Serializes as a bare JSON string or number, so persisted documents stay
/// a flat key-value mapping.
///
/// # Examples
///
/// ```rust
/// use chargen::EntryValue;
///
/// let level = EntryValue::from(4);
/// assert_eq!(level.as_int(), Some(4));
///
/// let typed = EntryValue::from(" 3 ");
/// assert_eq!(typed.as_int(), Some(3));
///
/// let text = EntryValue::from("Grumpy wizard");
/// assert_eq!(text.as_int(), None);
/// assert_eq!(text.empty_like(), EntryValue::from(""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    Int(i64),
    Text(String),
}

impl EntryValue {
    /// Interpret the value as an integer.
    ///
    /// Text holding a (whitespace-padded) integer counts, mirroring how a
    /// numeric form field reports its contents.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            EntryValue::Int(n) => Some(*n),
            EntryValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Borrow the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            EntryValue::Text(s) => Some(s),
            EntryValue::Int(_) => None,
        }
    }

    /// The empty value of the same kind: `0` or `""`.
    pub fn empty_like(&self) -> EntryValue {
        match self {
            EntryValue::Int(_) => EntryValue::Int(0),
            EntryValue::Text(_) => EntryValue::Text(String::new()),
        }
    }

    /// Render the value the way it appears on a sheet.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl Default for EntryValue {
    fn default() -> Self {
        EntryValue::Text(String::new())
    }
}

impl fmt::Display for EntryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryValue::Int(n) => write!(f, "{n}"),
            EntryValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntryValue {
    fn from(n: i64) -> Self {
        EntryValue::Int(n)
    }
}

impl From<i32> for EntryValue {
    fn from(n: i32) -> Self {
        EntryValue::Int(i64::from(n))
    }
}

impl From<&str> for EntryValue {
    fn from(s: &str) -> Self {
        EntryValue::Text(s.to_string())
    }
}

impl From<String> for EntryValue {
    fn from(s: String) -> Self {
        EntryValue::Text(s)
    }
}
