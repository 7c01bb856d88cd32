//! Entry key module.
//!
//! Provides the `EntryKey` type, a cheaply clonable string identifier for
//! record entries, and the parsing rules for composite keys.
//!
//! Simple keys are plain identifiers (`name`, `level`, `aspect_foe`).
//! Composite keys encode a path with the reserved separator `|`:
//!
//! ```text
//! skill|<ability>|<skill name>
//! stunt|<stunt name>
//! ```

use crate::error::{Result, SheetError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Separator between the segments of a composite key.
pub const SEPARATOR: char = '|';

/// Characters that may never appear inside a composite key segment.
pub const RESERVED: [char; 2] = ['|', ':'];

const SKILL_PREFIX: &str = "skill|";
const STUNT_PREFIX: &str = "stunt|";

/// Shared string identifier for record entries.
///
/// Uses `Arc<str>` so the store, the running total and observers can hold
/// the same key without reallocating.
///
/// # Examples
///
/// ```rust
/// use chargen::EntryKey;
///
/// let name = EntryKey::from_str("name");
/// let name2: EntryKey = "name".into();
/// assert_eq!(name, name2);
///
/// let skill = EntryKey::skill("Body", "Sword|Fighting");
/// assert_eq!(skill.as_str(), "skill|Body|Sword Fighting");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryKey(Arc<str>);

impl Serialize for EntryKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EntryKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(EntryKey::from(s))
    }
}

/// The parsed shape of an entry key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind<'a> {
    /// A fixed identifier.
    Simple,
    /// `skill|<ability>|<name>`
    Skill { ability: &'a str, name: &'a str },
    /// `stunt|<name>`
    Stunt { name: &'a str },
}

impl EntryKey {
    /// Create a key from a string slice, verbatim.
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Build a skill key, sanitizing both the ability and the skill name.
    pub fn skill(ability: &str, name: &str) -> Self {
        Self::from(format!(
            "{SKILL_PREFIX}{}{SEPARATOR}{}",
            sanitize_name(ability),
            sanitize_name(name)
        ))
    }

    /// Build a stunt key, sanitizing the stunt name.
    pub fn stunt(name: &str) -> Self {
        Self::from(format!("{STUNT_PREFIX}{}", sanitize_name(name)))
    }

    /// Get the string representation of this key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key carries a composite prefix (`skill|` or `stunt|`).
    ///
    /// This only inspects the prefix; use [`EntryKey::kind`] to validate
    /// the segment count.
    pub fn is_composite(&self) -> bool {
        self.0.starts_with(SKILL_PREFIX) || self.0.starts_with(STUNT_PREFIX)
    }

    /// Parse the key into its [`KeyKind`].
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::MalformedKey`] when a composite key does not
    /// have exactly the expected number of segments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chargen::{EntryKey, KeyKind, SheetError};
    ///
    /// let key = EntryKey::from_str("skill|Wits|Notice");
    /// assert_eq!(
    ///     key.kind().unwrap(),
    ///     KeyKind::Skill { ability: "Wits", name: "Notice" }
    /// );
    ///
    /// let broken = EntryKey::from_str("skill|OnlyOneSegment");
    /// assert!(matches!(broken.kind(), Err(SheetError::MalformedKey(_))));
    /// ```
    pub fn kind(&self) -> Result<KeyKind<'_>> {
        if self.0.starts_with(SKILL_PREFIX) {
            let mut parts = self.0.split(SEPARATOR).skip(1);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(ability), Some(name), None) => Ok(KeyKind::Skill { ability, name }),
                _ => Err(SheetError::MalformedKey(self.0.to_string())),
            }
        } else if self.0.starts_with(STUNT_PREFIX) {
            let mut parts = self.0.split(SEPARATOR).skip(1);
            match (parts.next(), parts.next()) {
                (Some(name), None) => Ok(KeyKind::Stunt { name }),
                _ => Err(SheetError::MalformedKey(self.0.to_string())),
            }
        } else {
            Ok(KeyKind::Simple)
        }
    }

    /// The key as `skill`/`stunt` would build it from its segments.
    ///
    /// Simple and malformed keys come back unchanged.
    ///
    /// ```rust
    /// use chargen::EntryKey;
    ///
    /// let raw = EntryKey::from_str("stunt|Ward:Fire");
    /// assert_eq!(raw.canonical().as_str(), "stunt|Ward Fire");
    /// ```
    pub fn canonical(&self) -> EntryKey {
        match self.kind() {
            Ok(KeyKind::Skill { ability, name }) => EntryKey::skill(ability, name),
            Ok(KeyKind::Stunt { name }) => EntryKey::stunt(name),
            _ => self.clone(),
        }
    }
}

/// Replace every reserved character in a user-supplied name with a space.
///
/// Never fails: names are corrected silently so composite keys stay
/// parseable.
///
/// ```rust
/// use chargen::entry_key::sanitize_name;
///
/// assert_eq!(sanitize_name("Sword|Fighting"), "Sword Fighting");
/// assert_eq!(sanitize_name("Ward: Fire"), "Ward  Fire");
/// ```
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED.contains(&c) { ' ' } else { c })
        .collect()
}

impl From<&str> for EntryKey {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EntryKey {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl AsRef<str> for EntryKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_key_creation() {
        let id1 = EntryKey::from_str("concept");
        let id2 = EntryKey::from(String::from("concept"));
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "concept");
    }

    #[test]
    fn test_simple_key_kind() {
        let key = EntryKey::from_str("aspect_foe");
        assert_eq!(key.kind().unwrap(), KeyKind::Simple);
        assert!(!key.is_composite());
    }

    #[test]
    fn test_stunt_key_kind() {
        let key = EntryKey::stunt("Iron Will");
        assert_eq!(key.as_str(), "stunt|Iron Will");
        assert_eq!(key.kind().unwrap(), KeyKind::Stunt { name: "Iron Will" });
    }

    #[test]
    fn test_skill_name_sanitized() {
        let key = EntryKey::skill("Body", "Sword|Fighting");
        assert_eq!(key.as_str(), "skill|Body|Sword Fighting");
        assert_eq!(key.as_str().split(SEPARATOR).count(), 3);
    }

    #[test]
    fn test_colon_sanitized() {
        let key = EntryKey::stunt("Ward:Fire");
        assert_eq!(key.as_str(), "stunt|Ward Fire");
    }

    #[test]
    fn test_canonical_sanitizes_segments() {
        let raw = EntryKey::from_str("skill|Body|Sword:Play");
        assert_eq!(raw.canonical().as_str(), "skill|Body|Sword Play");
        let simple = EntryKey::from_str("aspect_foe");
        assert_eq!(simple.canonical(), simple);
    }

    #[test]
    fn test_malformed_keys() {
        for raw in ["skill|OnlyOneSegment", "skill|A|B|C", "stunt|a|b"] {
            let key = EntryKey::from_str(raw);
            assert!(key.is_composite());
            assert_eq!(key.kind(), Err(SheetError::MalformedKey(raw.to_string())));
        }
    }

    #[test]
    fn test_serde_as_plain_string() {
        let key = EntryKey::from_str("stunt|Dodge");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"stunt|Dodge\"");
        let back: EntryKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
