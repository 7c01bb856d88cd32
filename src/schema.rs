//! The fixed layout of a character record.
//!
//! Declares the simple keys every character has, the four abilities, and
//! the helpers that add and remove skills and stunts with sanitized names.

use crate::entry_key::EntryKey;
use crate::error::Result;
use crate::record::RecordStore;
use crate::value::EntryValue;

/// One of the four fixed abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ability {
    Body,
    Reflexes,
    Wits,
    Persona,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 4] = [
        Ability::Body,
        Ability::Reflexes,
        Ability::Wits,
        Ability::Persona,
    ];

    /// Name as shown on the sheet and embedded in skill keys.
    pub fn display_name(self) -> &'static str {
        match self {
            Ability::Body => "Body",
            Ability::Reflexes => "Reflexes",
            Ability::Wits => "Wits",
            Ability::Persona => "Persona",
        }
    }

    /// Lowercase identifier used in the ability's own key.
    pub fn id(self) -> &'static str {
        match self {
            Ability::Body => "body",
            Ability::Reflexes => "reflexes",
            Ability::Wits => "wits",
            Ability::Persona => "persona",
        }
    }

    /// The `ability_<id>` key holding this ability's level.
    pub fn key(self) -> EntryKey {
        EntryKey::from(format!("ability_{}", self.id()))
    }

    /// Exact, case-sensitive lookup by display name.
    ///
    /// ```rust
    /// use chargen::Ability;
    ///
    /// assert_eq!(Ability::from_display_name("Wits"), Some(Ability::Wits));
    /// assert_eq!(Ability::from_display_name("wits"), None);
    /// ```
    pub fn from_display_name(name: &str) -> Option<Ability> {
        Self::ALL.into_iter().find(|a| a.display_name() == name)
    }
}

/// Aspect labels, in sheet order.
pub const ASPECTS: [&str; 9] = [
    "Ambition",
    "Background",
    "Conviction",
    "Disadvantage",
    "Exceptional Skill",
    "Foe",
    "Gear",
    "Help",
    "Inferior Skill",
];

/// The `aspect_<id>` key for an aspect label.
///
/// ```rust
/// assert_eq!(chargen::schema::aspect_key("Exceptional Skill").as_str(), "aspect_exceptional_skill");
/// ```
pub fn aspect_key(label: &str) -> EntryKey {
    EntryKey::from(format!("aspect_{}", label.replace(' ', "_").to_lowercase()))
}

pub const NAME: &str = "name";
pub const CONCEPT: &str = "concept";
pub const LEVEL: &str = "level";
pub const ARMOR: &str = "armor";

/// Initial level of a fresh character.
pub const STARTING_LEVEL: i64 = 1;

/// Build a store holding the fixed keys of a blank character.
///
/// Abilities are watched by the running total.
///
/// ```rust
/// let store = chargen::schema::character().unwrap();
/// let keys: Vec<String> = store.collect().keys().map(|k| k.to_string()).collect();
/// assert_eq!(keys.first().map(String::as_str), Some("name"));
/// assert_eq!(keys.last().map(String::as_str), Some("ability_persona"));
/// assert_eq!(store.total(), 0);
/// ```
pub fn character() -> Result<RecordStore> {
    let mut store = RecordStore::new();
    register_fixed(&mut store)?;
    Ok(store)
}

/// Register the fixed keys of a character into an existing store.
pub fn register_fixed(store: &mut RecordStore) -> Result<()> {
    store.register(EntryKey::from_str(NAME), "")?;
    store.register(EntryKey::from_str(CONCEPT), "")?;
    for label in ASPECTS {
        store.register(aspect_key(label), "")?;
    }
    store.register(EntryKey::from_str(LEVEL), STARTING_LEVEL)?;
    store.register(EntryKey::from_str(ARMOR), 0)?;
    for ability in Ability::ALL {
        let key = ability.key();
        store.register(key.clone(), 0)?;
        store.watch(&key)?;
    }
    Ok(())
}

impl RecordStore {
    /// Add a skill under an ability and watch its level.
    ///
    /// Names are sanitized. Returns `None` without touching the store when
    /// both the ability and the name are empty.
    ///
    /// ```rust
    /// let mut store = chargen::schema::character().unwrap();
    /// let key = store.add_skill("Body", "Sword|Fighting", 2).unwrap().unwrap();
    /// assert_eq!(key.as_str(), "skill|Body|Sword Fighting");
    /// assert_eq!(store.total(), 2);
    /// ```
    pub fn add_skill(
        &mut self,
        ability: &str,
        name: &str,
        level: impl Into<EntryValue>,
    ) -> Result<Option<EntryKey>> {
        if ability.is_empty() && name.is_empty() {
            return Ok(None);
        }
        let key = EntryKey::skill(ability, name);
        self.register(key.clone(), level)?;
        if let Err(err) = self.watch(&key) {
            self.unregister(&key)?;
            return Err(err);
        }
        Ok(Some(key))
    }

    /// Add a stunt from user input. The description is trimmed; it is not
    /// watched.
    ///
    /// Returns `None` when both the name and the description are empty.
    /// Loading restores stunt descriptions verbatim and does not go through
    /// here.
    pub fn add_stunt(&mut self, name: &str, description: &str) -> Result<Option<EntryKey>> {
        if name.is_empty() && description.is_empty() {
            return Ok(None);
        }
        let key = EntryKey::stunt(name);
        self.register(key.clone(), description.trim())?;
        Ok(Some(key))
    }

    /// Remove a skill entry and its share of the total.
    pub fn remove_skill(&mut self, ability: &str, name: &str) -> Result<()> {
        self.unregister(&EntryKey::skill(ability, name))
    }

    /// Remove a stunt entry.
    pub fn remove_stunt(&mut self, name: &str) -> Result<()> {
        self.unregister(&EntryKey::stunt(name))
    }
}
