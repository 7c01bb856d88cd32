//! Running total module.
//!
//! `RunningTotal` sums the integer values of a watched subset of keys.
//! The record store owns one and drives its recomputation; see
//! [`RecordStore::watch`](crate::record::RecordStore::watch).

use crate::entry_key::EntryKey;
use crate::error::{Result, SheetError};
use crate::source::ValueSource;
use std::fmt;

type TotalObserver = Box<dyn FnMut(i64)>;

/// A reactive sum over watched entries.
///
/// Recomputation reads every watched key from a [`ValueSource`]. Keys that
/// are watched but absent from the source contribute nothing. Observers
/// are told the new total once per recomputation.
///
/// # Examples
///
/// ```rust
/// use chargen::{EntryKey, RunningTotal, Snapshot};
///
/// let values: Snapshot = [("ability_body", 2), ("ability_wits", 3)]
///     .into_iter()
///     .collect();
///
/// let mut total = RunningTotal::new();
/// total.watch(EntryKey::from_str("ability_body"), &values).unwrap();
/// total.watch(EntryKey::from_str("ability_wits"), &values).unwrap();
/// assert_eq!(total.value(), 5);
/// ```
#[derive(Default)]
pub struct RunningTotal {
    watched: Vec<EntryKey>,
    value: i64,
    observers: Vec<TotalObserver>,
}

impl RunningTotal {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sum as of the last successful recomputation.
    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn is_watching(&self, key: &EntryKey) -> bool {
        self.watched.contains(key)
    }

    /// Watched keys in the order they were added.
    pub fn watched(&self) -> &[EntryKey] {
        &self.watched
    }

    /// Register a callback invoked with the new total after each
    /// recomputation.
    pub fn subscribe(&mut self, observer: impl FnMut(i64) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Start watching a key and recompute.
    ///
    /// Watching an already-watched key only recomputes. If the new key's
    /// value is not an integer the key is not added.
    pub fn watch(&mut self, key: EntryKey, source: &impl ValueSource) -> Result<i64> {
        if !self.is_watching(&key) {
            self.watched.push(key.clone());
        }
        match self.recompute(source) {
            Ok(total) => Ok(total),
            Err(err) => {
                self.watched.retain(|k| k != &key);
                Err(err)
            }
        }
    }

    /// Stop watching a key and recompute. Unknown keys are ignored.
    ///
    /// If the remaining keys cannot be summed the key stays watched.
    pub fn unwatch(&mut self, key: &EntryKey, source: &impl ValueSource) -> Result<i64> {
        let before = self.watched.clone();
        self.watched.retain(|k| k != key);
        match self.recompute(source) {
            Ok(total) => Ok(total),
            Err(err) => {
                self.watched = before;
                Err(err)
            }
        }
    }

    /// Drop a key from the watched set without recomputing.
    ///
    /// Used by batched operations that recompute once at the end.
    pub(crate) fn forget(&mut self, key: &EntryKey) {
        self.watched.retain(|k| k != key);
    }

    /// Add a key to the watched set without recomputing.
    pub(crate) fn remember(&mut self, key: EntryKey) {
        if !self.is_watching(&key) {
            self.watched.push(key);
        }
    }

    pub(crate) fn restore_watched(&mut self, keys: Vec<EntryKey>) {
        self.watched = keys;
    }

    /// Sum every watched value, store it and notify observers.
    ///
    /// # Errors
    ///
    /// [`SheetError::InvalidAggregateValue`] if a watched value is not an
    /// integer or the sum overflows `i64`. The previous total is kept and
    /// observers are not called.
    pub fn recompute(&mut self, source: &impl ValueSource) -> Result<i64> {
        let total = Self::sum(&self.watched, source)?;
        self.value = total;
        for observer in &mut self.observers {
            observer(total);
        }
        Ok(total)
    }

    fn sum(keys: &[EntryKey], source: &impl ValueSource) -> Result<i64> {
        let mut total = 0i64;
        for key in keys {
            if let Some(value) = source.value_of(key) {
                total = value
                    .as_int()
                    .and_then(|n| total.checked_add(n))
                    .ok_or_else(|| SheetError::InvalidAggregateValue {
                        key: key.clone(),
                        value: value.clone(),
                    })?;
            }
        }
        Ok(total)
    }
}

impl fmt::Debug for RunningTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningTotal")
            .field("watched", &self.watched)
            .field("value", &self.value)
            .field("observers", &self.observers.len())
            .finish()
    }
}
