//! Value sources module.
//!
//! The running total reads values through the `ValueSource` trait, so it
//! can sum the store's live entries or a detached snapshot.

use crate::entry_key::EntryKey;
use crate::snapshot::Snapshot;
use crate::value::EntryValue;

/// Read-only access to entry values by key.
///
/// # Examples
///
/// ```rust
/// use chargen::{EntryKey, EntryValue, Snapshot, ValueSource};
///
/// let snapshot: Snapshot = [("ability_body", 3)].into_iter().collect();
/// let key = EntryKey::from_str("ability_body");
/// assert_eq!(snapshot.value_of(&key), Some(&EntryValue::Int(3)));
/// ```
pub trait ValueSource {
    /// Current value for a key, or `None` when the key is absent.
    fn value_of(&self, key: &EntryKey) -> Option<&EntryValue>;
}

impl ValueSource for Snapshot {
    fn value_of(&self, key: &EntryKey) -> Option<&EntryValue> {
        self.get(key)
    }
}
