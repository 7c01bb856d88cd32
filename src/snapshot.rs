//! Ordered flat snapshots of a record.
//!
//! A `Snapshot` is the unit handed to the projector, to persistence and to
//! bulk loads. It keeps insertion order, so serializing the same record
//! twice yields byte-identical documents.

use crate::entry_key::EntryKey;
use crate::error::Result;
use crate::value::EntryValue;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An ordered, duplicate-free key → value mapping.
///
/// # Examples
///
/// ```rust
/// use chargen::Snapshot;
///
/// let snapshot: Snapshot = [("name", "Mira"), ("concept", "Sky pirate")]
///     .into_iter()
///     .collect();
///
/// let keys: Vec<&str> = snapshot.keys().map(|k| k.as_str()).collect();
/// assert_eq!(keys, ["name", "concept"]);
///
/// let json = snapshot.to_json_string().unwrap();
/// assert_eq!(chargen::Snapshot::from_json_str(&json).unwrap(), snapshot);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<(EntryKey, EntryValue)>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a value by key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&EntryValue> {
        let key = key.as_ref();
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut EntryValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.get(key).is_some()
    }

    /// Insert or overwrite a value.
    ///
    /// A new key is appended; an existing key keeps its position and takes
    /// the new value. Returns `true` when the key was new.
    pub fn insert(&mut self, key: impl Into<EntryKey>, value: impl Into<EntryValue>) -> bool {
        let key = key.into();
        let value = value.into();
        match self.get_mut(key.as_str()) {
            Some(slot) => {
                *slot = value;
                false
            }
            None => {
                self.entries.push((key, value));
                true
            }
        }
    }

    /// Remove a key, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<EntryValue> {
        let idx = self.entries.iter().position(|(k, _)| k.as_str() == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&EntryKey, &EntryValue) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = (&EntryKey, &mut EntryValue)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    /// Stable-reorder composite entries by `rank`, leaving simple entries in
    /// their slots. Composites fill the composite slots in rank order.
    pub(crate) fn reorder_composites(&mut self, rank: impl Fn(&EntryKey) -> usize) {
        let slots: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, (k, _))| k.is_composite())
            .map(|(i, _)| i)
            .collect();
        let mut composites: Vec<(EntryKey, EntryValue)> =
            slots.iter().map(|&i| self.entries[i].clone()).collect();
        composites.sort_by_key(|(k, _)| rank(k));
        for (slot, entry) in slots.into_iter().zip(composites) {
            self.entries[slot] = entry;
        }
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntryKey, &EntryValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &EntryKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Serialize to pretty-printed JSON, keeping entry order.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a JSON object, keeping document order.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<K, V> FromIterator<(K, V)> for Snapshot
where
    K: Into<EntryKey>,
    V: Into<EntryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for (k, v) in iter {
            snapshot.insert(k, v);
        }
        snapshot
    }
}

impl Serialize for Snapshot {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct SnapshotVisitor;

impl<'de> Visitor<'de> for SnapshotVisitor {
    type Value = Snapshot;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a flat map of string keys to strings or integers")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Snapshot, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut snapshot = Snapshot::new();
        while let Some((key, value)) = access.next_entry::<EntryKey, EntryValue>()? {
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SnapshotVisitor)
    }
}
