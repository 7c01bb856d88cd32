//! Record store module.
//!
//! Provides the `RecordStore` type, the main entry point of the crate. It
//! owns the ordered entries of a character record, the running total over
//! watched entries, per-key change observers and the host's load/reset
//! hooks.

use crate::entry_key::{EntryKey, KeyKind};
use crate::error::{Result, SheetError};
use crate::snapshot::Snapshot;
use crate::total::RunningTotal;
use crate::value::EntryValue;
use std::fmt;

type ChangeObserver = Box<dyn FnMut(&EntryKey, &EntryValue)>;

/// A skill found in a snapshot during [`RecordStore::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredSkill {
    pub ability: String,
    pub name: String,
    pub level: EntryValue,
}

/// A stunt found in a snapshot during [`RecordStore::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredStunt {
    pub name: String,
    pub description: EntryValue,
}

/// Callbacks into the host application.
///
/// The store calls `reset` before it clears itself, and hands the skills
/// and stunts of a loaded snapshot to `restore_skills` / `restore_stunts`,
/// which must recreate the matching entries. The defaults register them
/// straight into the store with their values exactly as loaded, so a store
/// without a UI still round-trips.
pub trait StoreHooks {
    /// Called at the start of every reset, including the one a load does.
    fn reset(&mut self) {}

    fn restore_skills(&mut self, store: &mut RecordStore, skills: Vec<RestoredSkill>) -> Result<()> {
        for skill in skills {
            let key = EntryKey::skill(&skill.ability, &skill.name);
            store.register(key.clone(), skill.level)?;
            store.watch(&key)?;
        }
        Ok(())
    }

    fn restore_stunts(&mut self, store: &mut RecordStore, stunts: Vec<RestoredStunt>) -> Result<()> {
        for stunt in stunts {
            store.register(EntryKey::stunt(&stunt.name), stunt.description)?;
        }
        Ok(())
    }
}

/// Hooks that only use the default behavior.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;

impl StoreHooks for DefaultHooks {}

/// The ordered record of a character.
///
/// Entries are registered with an initial value whose kind (text or
/// integer) also fixes what the entry resets to. Keys can be watched by the
/// running total; watched entries only accept integer values.
///
/// Re-registering an existing key keeps its position and overwrites its
/// value.
///
/// # Examples
///
/// ```rust
/// use chargen::{EntryKey, RecordStore};
///
/// let mut store = RecordStore::new();
/// let body = EntryKey::from_str("ability_body");
///
/// store.register(EntryKey::from_str("name"), "Mira").unwrap();
/// store.register(body.clone(), 0).unwrap();
/// store.watch(&body).unwrap();
///
/// store.set(&body, 3).unwrap();
/// assert_eq!(store.total(), 3);
///
/// store.reset().unwrap();
/// assert_eq!(store.total(), 0);
/// assert_eq!(store.get(&EntryKey::from_str("name")).unwrap().to_text(), "");
/// ```
pub struct RecordStore {
    entries: Snapshot,
    total: RunningTotal,
    observers: Vec<(EntryKey, ChangeObserver)>,
    hooks: Box<dyn StoreHooks>,
    batching: bool,
}

impl RecordStore {
    /// Create an empty store with [`DefaultHooks`].
    pub fn new() -> Self {
        Self {
            entries: Snapshot::new(),
            total: RunningTotal::new(),
            observers: Vec::new(),
            hooks: Box::new(DefaultHooks),
            batching: false,
        }
    }

    /// Install the host's hooks, replacing the current ones.
    pub fn set_hooks(&mut self, hooks: impl StoreHooks + 'static) {
        self.hooks = Box::new(hooks);
    }

    /// Register a key with an initial value.
    ///
    /// # Errors
    ///
    /// * [`SheetError::MalformedKey`] for a composite key with the wrong
    ///   number of segments.
    /// * [`SheetError::InvalidAggregateValue`] when re-registering a watched
    ///   key with a non-integer value.
    pub fn register(&mut self, key: EntryKey, initial: impl Into<EntryValue>) -> Result<()> {
        key.kind()?;
        let value = initial.into();
        let watched = self.total.is_watching(&key);
        let previous = if watched {
            Self::check_int(&key, &value)?;
            self.entries.get(&key).cloned()
        } else {
            None
        };
        if self.entries.insert(key.clone(), value) {
            tracing::debug!(key = %key, "registered entry");
        }
        if watched {
            if let Err(err) = self.refresh_total() {
                match previous {
                    Some(value) => {
                        self.entries.insert(key, value);
                    }
                    None => {
                        self.entries.remove(key.as_str());
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Remove a key along with its observers and its place in the total.
    ///
    /// Removing an unknown key is a no-op. If the remaining total cannot be
    /// computed the key stays registered.
    pub fn unregister(&mut self, key: &EntryKey) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        if self.total.is_watching(key) {
            self.drop_from_total(key)?;
        }
        self.entries.remove(key.as_str());
        tracing::debug!(key = %key, "unregistered entry");
        self.observers.retain(|(k, _)| k != key);
        Ok(())
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a registered key.
    pub fn get(&self, key: &EntryKey) -> Result<&EntryValue> {
        self.entries
            .get(key)
            .ok_or_else(|| SheetError::KeyNotFound(key.clone()))
    }

    /// Write a registered key, then recompute the total if the key is
    /// watched and notify the key's observers.
    ///
    /// # Errors
    ///
    /// * [`SheetError::KeyNotFound`] if the key is not registered.
    /// * [`SheetError::InvalidAggregateValue`] if the key is watched and
    ///   the value is not an integer, or the new total overflows. The store
    ///   is left unchanged.
    pub fn set(&mut self, key: &EntryKey, value: impl Into<EntryValue>) -> Result<()> {
        let value = value.into();
        if !self.entries.contains_key(key) {
            return Err(SheetError::KeyNotFound(key.clone()));
        }
        let watched = self.total.is_watching(key);
        if watched {
            Self::check_int(key, &value)?;
        }
        let previous = self
            .entries
            .get_mut(key.as_str())
            .map(|slot| std::mem::replace(slot, value));
        if watched {
            if let Err(err) = self.refresh_total() {
                if let (Some(slot), Some(previous)) =
                    (self.entries.get_mut(key.as_str()), previous)
                {
                    *slot = previous;
                }
                return Err(err);
            }
        }
        if !self.batching {
            self.notify(key);
        }
        Ok(())
    }

    /// Register a callback run synchronously after each write to `key`.
    ///
    /// Observers receive the key and its new value, never the store, so
    /// they cannot feed writes back into it.
    pub fn on_change(
        &mut self,
        key: EntryKey,
        observer: impl FnMut(&EntryKey, &EntryValue) + 'static,
    ) {
        self.observers.push((key, Box::new(observer)));
    }

    /// Add a registered key to the running total.
    pub fn watch(&mut self, key: &EntryKey) -> Result<()> {
        let value = self.get(key)?;
        Self::check_int(key, value)?;
        let newly_watched = !self.total.is_watching(key);
        self.total.remember(key.clone());
        if let Err(err) = self.refresh_total() {
            if newly_watched {
                self.total.forget(key);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Remove a key from the running total. Unwatched keys are ignored.
    pub fn unwatch(&mut self, key: &EntryKey) -> Result<()> {
        if !self.total.is_watching(key) {
            return Ok(());
        }
        self.drop_from_total(key)
    }

    /// Current running total.
    pub fn total(&self) -> i64 {
        self.total.value()
    }

    pub fn running_total(&self) -> &RunningTotal {
        &self.total
    }

    /// Register a callback told the new total after each recomputation.
    pub fn subscribe_total(&mut self, observer: impl FnMut(i64) + 'static) {
        self.total.subscribe(observer);
    }

    /// Ordered copy of every registered entry.
    pub fn collect(&self) -> Snapshot {
        self.entries.clone()
    }

    /// Clear the record.
    ///
    /// Calls the host's reset hook, removes every composite entry, restores
    /// simple entries to their empty value, then recomputes the total once
    /// and notifies observers of the keys that changed.
    pub fn reset(&mut self) -> Result<()> {
        let before = self.entries.clone();
        self.batching = true;
        let mut hooks = self.take_hooks();
        hooks.reset();
        self.hooks = hooks;
        self.clear_entries();
        self.observers.retain(|(key, _)| !key.is_composite());
        self.batching = false;
        self.total.recompute(&self.entries)?;
        self.notify_changes(&before);
        tracing::debug!(entries = self.entries.len(), "record reset");
        Ok(())
    }

    /// Replace the record with the contents of a snapshot.
    ///
    /// The whole snapshot is validated first. The store is then reset,
    /// values are applied to matching simple keys and composite entries are
    /// handed to the hooks for recreation. Unknown simple keys are ignored.
    /// Recreated composite entries follow the snapshot's order, so
    /// `load(&collect())` leaves the record as it was. The total is
    /// recomputed once at the end.
    ///
    /// # Errors
    ///
    /// * [`SheetError::MalformedKey`] for a composite key with the wrong
    ///   segment count.
    /// * [`SheetError::InvalidAggregateValue`] for a skill level or a
    ///   watched simple key that is not an integer, or a total that
    ///   overflows.
    /// * Any error returned by the hooks.
    ///
    /// On error the store is left exactly as it was.
    pub fn load(&mut self, snapshot: &Snapshot) -> Result<()> {
        let mut simple = Vec::new();
        let mut skills = Vec::new();
        let mut stunts = Vec::new();
        for (key, value) in snapshot.iter() {
            match key.kind()? {
                KeyKind::Skill { ability, name } => {
                    Self::check_int(key, value)?;
                    skills.push(RestoredSkill {
                        ability: ability.to_string(),
                        name: name.to_string(),
                        level: value.clone(),
                    });
                }
                KeyKind::Stunt { name } => stunts.push(RestoredStunt {
                    name: name.to_string(),
                    description: value.clone(),
                }),
                KeyKind::Simple if self.entries.contains_key(key) => {
                    if self.total.is_watching(key) {
                        Self::check_int(key, value)?;
                    }
                    simple.push((key.clone(), value.clone()));
                }
                KeyKind::Simple => {
                    tracing::warn!(key = %key, "ignoring unknown key on load");
                }
            }
        }

        let order: Vec<EntryKey> = snapshot
            .keys()
            .filter(|key| key.is_composite())
            .map(EntryKey::canonical)
            .collect();
        let before = self.entries.clone();
        let watched_before = self.total.watched().to_vec();
        let observers_before = std::mem::take(&mut self.observers);
        let (skill_count, stunt_count) = (skills.len(), stunts.len());

        self.batching = true;
        let mut hooks = self.take_hooks();
        hooks.reset();
        self.clear_entries();
        for (key, value) in simple {
            if let Some(slot) = self.entries.get_mut(key.as_str()) {
                *slot = value;
            }
        }
        let restored = hooks
            .restore_skills(self, skills)
            .and_then(|()| hooks.restore_stunts(self, stunts));
        self.hooks = hooks;
        self.batching = false;

        self.entries.reorder_composites(|key| {
            let key = key.canonical();
            order.iter().position(|k| *k == key).unwrap_or(order.len())
        });
        let outcome = restored.and_then(|()| self.total.recompute(&self.entries));
        if let Err(err) = outcome {
            tracing::warn!(error = %err, "load failed, restoring previous record");
            self.entries = before;
            self.total.restore_watched(watched_before);
            self.observers = observers_before;
            return Err(err);
        }

        // Observers added by the hooks belong to the new entries.
        let added = std::mem::replace(&mut self.observers, observers_before);
        self.observers.retain(|(key, _)| !key.is_composite());
        self.observers.extend(added);

        self.notify_changes(&before);
        tracing::debug!(
            entries = self.entries.len(),
            skills = skill_count,
            stunts = stunt_count,
            "record loaded"
        );
        Ok(())
    }

    fn take_hooks(&mut self) -> Box<dyn StoreHooks> {
        std::mem::replace(&mut self.hooks, Box::new(DefaultHooks))
    }

    fn clear_entries(&mut self) {
        let total = &mut self.total;
        self.entries.retain(|key, _| {
            if key.is_composite() {
                total.forget(key);
                false
            } else {
                true
            }
        });
        for (_, value) in self.entries.values_mut() {
            *value = value.empty_like();
        }
    }

    /// Stop watching `key`, keeping the watched set as it was if the
    /// remaining total cannot be computed.
    fn drop_from_total(&mut self, key: &EntryKey) -> Result<()> {
        let watched_before = self.total.watched().to_vec();
        self.total.forget(key);
        if let Err(err) = self.refresh_total() {
            self.total.restore_watched(watched_before);
            return Err(err);
        }
        Ok(())
    }

    fn refresh_total(&mut self) -> Result<()> {
        if self.batching {
            return Ok(());
        }
        self.total.recompute(&self.entries).map(|_| ())
    }

    fn check_int(key: &EntryKey, value: &EntryValue) -> Result<()> {
        if value.as_int().is_some() {
            Ok(())
        } else {
            tracing::warn!(key = %key, value = %value, "rejected non-integer value");
            Err(SheetError::InvalidAggregateValue {
                key: key.clone(),
                value: value.clone(),
            })
        }
    }

    fn notify(&mut self, key: &EntryKey) {
        if let Some(value) = self.entries.get(key) {
            for (observed, observer) in &mut self.observers {
                if observed == key {
                    observer(key, value);
                }
            }
        }
    }

    fn notify_changes(&mut self, before: &Snapshot) {
        for (key, value) in self.entries.iter() {
            if before.get(key) == Some(value) {
                continue;
            }
            for (observed, observer) in &mut self.observers {
                if observed == key {
                    observer(key, value);
                }
            }
        }
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("entries", &self.entries)
            .field("total", &self.total)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key(s: &str) -> EntryKey {
        EntryKey::from_str(s)
    }

    #[test]
    fn test_register_and_get() {
        let mut store = RecordStore::new();
        store.register(key("name"), "Mira").unwrap();
        assert_eq!(store.get(&key("name")).unwrap(), &EntryValue::from("Mira"));
    }

    #[test]
    fn test_get_unknown_key() {
        let store = RecordStore::new();
        assert_eq!(
            store.get(&key("name")),
            Err(SheetError::KeyNotFound(key("name")))
        );
    }

    #[test]
    fn test_set_unknown_key() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.set(&key("level"), 2),
            Err(SheetError::KeyNotFound(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_reregister_overwrites_in_place() {
        let mut store = RecordStore::new();
        store.register(key("a"), "1").unwrap();
        store.register(key("b"), "2").unwrap();
        store.register(key("a"), "3").unwrap();

        let collected: Vec<_> = store
            .collect()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_text()))
            .collect();
        assert_eq!(
            collected,
            vec![
                ("a".to_string(), "3".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_register_rejects_malformed_composite() {
        let mut store = RecordStore::new();
        let err = store.register(key("stunt|a|b"), "x").unwrap_err();
        assert!(matches!(err, SheetError::MalformedKey(_)));
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut store = RecordStore::new();
        store.register(key("a"), 1).unwrap();
        store.unregister(&key("a")).unwrap();
        store.unregister(&key("a")).unwrap();
        assert!(!store.contains(&key("a")));
    }

    #[test]
    fn test_unregister_leaves_total() {
        let mut store = RecordStore::new();
        store.register(key("a"), 2).unwrap();
        store.register(key("b"), 5).unwrap();
        store.watch(&key("a")).unwrap();
        store.watch(&key("b")).unwrap();
        assert_eq!(store.total(), 7);

        store.unregister(&key("b")).unwrap();
        assert_eq!(store.total(), 2);
        assert!(!store.running_total().is_watching(&key("b")));
    }

    #[test]
    fn test_watched_set_rejects_text() {
        let mut store = RecordStore::new();
        store.register(key("a"), 1).unwrap();
        store.watch(&key("a")).unwrap();

        let err = store.set(&key("a"), "many").unwrap_err();
        assert!(matches!(err, SheetError::InvalidAggregateValue { .. }));
        assert_eq!(store.get(&key("a")).unwrap(), &EntryValue::Int(1));
        assert_eq!(store.total(), 1);
    }

    #[test]
    fn test_watch_unregistered_key() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.watch(&key("ghost")),
            Err(SheetError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_on_change_runs_after_set() {
        let mut store = RecordStore::new();
        store.register(key("name"), "").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.on_change(key("name"), move |_, v| sink.borrow_mut().push(v.to_text()));

        store.set(&key("name"), "Mira").unwrap();
        store.set(&key("name"), "Mira Vale").unwrap();

        assert_eq!(*seen.borrow(), vec!["Mira", "Mira Vale"]);
    }

    #[test]
    fn test_reset_clears_composites() {
        let mut store = RecordStore::new();
        store.register(key("name"), "Mira").unwrap();
        store.register(key("level"), 3).unwrap();
        store.register(key("stunt|Dodge"), "Avoid it").unwrap();

        store.reset().unwrap();

        assert!(!store.contains(&key("stunt|Dodge")));
        assert_eq!(store.get(&key("name")).unwrap(), &EntryValue::from(""));
        assert_eq!(store.get(&key("level")).unwrap(), &EntryValue::Int(0));
    }

    #[test]
    fn test_reset_calls_hook() {
        struct Counting(Rc<RefCell<u32>>);
        impl StoreHooks for Counting {
            fn reset(&mut self) {
                *self.0.borrow_mut() += 1;
            }
        }

        let resets = Rc::new(RefCell::new(0));
        let mut store = RecordStore::new();
        store.set_hooks(Counting(Rc::clone(&resets)));
        store.reset().unwrap();
        store.load(&Snapshot::new()).unwrap();

        assert_eq!(*resets.borrow(), 2);
    }

    #[test]
    fn test_load_ignores_unknown_simple_keys() {
        let mut store = RecordStore::new();
        store.register(key("name"), "").unwrap();
        let snapshot: Snapshot = [("name", "Mira"), ("favourite_colour", "teal")]
            .into_iter()
            .collect();

        store.load(&snapshot).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&key("name")).unwrap().to_text(), "Mira");
    }

    #[test]
    fn test_failed_hook_rolls_back() {
        struct Failing;
        impl StoreHooks for Failing {
            fn restore_stunts(
                &mut self,
                _store: &mut RecordStore,
                _stunts: Vec<RestoredStunt>,
            ) -> Result<()> {
                Err(SheetError::Io("widget factory gone".to_string()))
            }
        }

        let mut store = RecordStore::new();
        store.register(key("name"), "Before").unwrap();
        store.add_skill("Body", "Punch", 2).unwrap();
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        store.on_change(key("skill|Body|Punch"), move |_, _| *sink.borrow_mut() += 1);
        let before = store.collect();
        store.set_hooks(Failing);

        let snapshot: Snapshot = [("name", "After"), ("stunt|Dodge", "Avoid it")]
            .into_iter()
            .collect();
        assert!(store.load(&snapshot).is_err());

        assert_eq!(store.collect(), before);
        assert_eq!(store.total(), 2);
        assert!(store.running_total().is_watching(&key("skill|Body|Punch")));

        store.set(&key("skill|Body|Punch"), 4).unwrap();
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_load_keeps_interleaved_composite_order() {
        let mut store = RecordStore::new();
        store.register(key("name"), "Mira").unwrap();
        store.add_stunt("Dodge", "Avoid it.").unwrap();
        store.add_skill("Body", "Punch", 2).unwrap();
        store.add_stunt("Second Wind", "Recover.").unwrap();
        let before = store.collect();

        store.load(&before).unwrap();

        assert_eq!(store.collect(), before);
        assert_eq!(store.total(), 2);
    }

    #[test]
    fn test_load_restores_values_verbatim() {
        let mut store = RecordStore::new();
        let dodge = store.add_stunt("Dodge", "Avoid it.").unwrap().unwrap();
        store.set(&dodge, "Avoid it.\n").unwrap();
        store.register(key("stunt|Count"), 3).unwrap();
        store.add_skill("Wits", "Notice", " 2").unwrap();
        let before = store.collect();

        store.load(&before).unwrap();

        assert_eq!(store.get(&dodge).unwrap(), &EntryValue::from("Avoid it.\n"));
        assert_eq!(store.get(&key("stunt|Count")).unwrap(), &EntryValue::Int(3));
        assert_eq!(
            store.get(&key("skill|Wits|Notice")).unwrap(),
            &EntryValue::from(" 2")
        );
        assert_eq!(store.collect(), before);
    }

    #[test]
    fn test_load_sanitized_names_keep_snapshot_order() {
        let mut store = RecordStore::new();
        let snapshot: Snapshot = [
            ("stunt|Ward:Fire", EntryValue::from("Resist.")),
            ("skill|Body|Punch", EntryValue::from(1)),
        ]
        .into_iter()
        .collect();

        store.load(&snapshot).unwrap();

        let keys: Vec<String> = store.collect().keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, ["stunt|Ward Fire", "skill|Body|Punch"]);
    }

    #[test]
    fn test_overflowing_set_is_rejected() {
        let mut store = RecordStore::new();
        store.register(key("a"), i64::MAX).unwrap();
        store.register(key("b"), 0).unwrap();
        store.watch(&key("a")).unwrap();
        store.watch(&key("b")).unwrap();

        let err = store.set(&key("b"), 1).unwrap_err();
        assert!(matches!(err, SheetError::InvalidAggregateValue { .. }));
        assert_eq!(store.get(&key("b")).unwrap(), &EntryValue::Int(0));
        assert_eq!(store.total(), i64::MAX);
    }

    #[test]
    fn test_overflowing_watch_is_rolled_back() {
        let mut store = RecordStore::new();
        store.register(key("a"), i64::MAX).unwrap();
        store.register(key("b"), 1).unwrap();
        store.watch(&key("a")).unwrap();

        assert!(store.watch(&key("b")).is_err());
        assert!(!store.running_total().is_watching(&key("b")));
        assert_eq!(store.total(), i64::MAX);
    }

    #[test]
    fn test_overflowing_load_is_rolled_back() {
        let mut store = RecordStore::new();
        store.add_skill("Body", "Punch", 2).unwrap();
        let before = store.collect();
        let snapshot: Snapshot = [("skill|Body|Punch", i64::MAX), ("skill|Wits|Notice", 1)]
            .into_iter()
            .collect();

        assert!(matches!(
            store.load(&snapshot),
            Err(SheetError::InvalidAggregateValue { .. })
        ));
        assert_eq!(store.collect(), before);
        assert_eq!(store.total(), 2);
    }
}
