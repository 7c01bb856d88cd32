//! Projector module.
//!
//! Turns a flat snapshot into [`SheetData`]:
//!
//! ```text
//! ability_<id>             → abilities[i].level
//! skill|<Ability>|<name>   → abilities[i].skills
//! stunt|<name>             → stunts (description wrapped)
//! armor                    → armor tiers N..1
//! level                    → level, stamina = level * 20
//! concept, aspect_*        → wrapped text
//! anything else            → passed through
//! ```

use crate::config::SheetConfig;
use crate::entry_key::{EntryKey, KeyKind};
use crate::error::{Result, SheetError};
use crate::projection::{AbilityBlock, ArmorTier, SheetData, SkillLine, StuntBlock};
use crate::schema::{Ability, ARMOR, CONCEPT, LEVEL};
use crate::snapshot::Snapshot;
use crate::value::EntryValue;
use crate::wrap::{wrap_aspect, wrap_stunt};

const ABILITY_PREFIX: &str = "ability_";
const ASPECT_PREFIX: &str = "aspect_";

/// Projects snapshots using a [`SheetConfig`].
///
/// Projection is pure: the same snapshot always yields the same
/// `SheetData`.
///
/// # Examples
///
/// ```rust
/// use chargen::{Projector, Snapshot};
///
/// let snapshot: Snapshot = [
///     ("ability_body", 2),
///     ("skill|Body|Punch", 2),
///     ("level", 4),
///     ("armor", 3),
/// ]
/// .into_iter()
/// .collect();
///
/// let sheet = Projector::new().project(&snapshot).unwrap();
/// assert_eq!(sheet.stamina, Some(80));
/// assert_eq!(sheet.armor.iter().map(|a| a.tier).collect::<Vec<_>>(), [3, 2, 1]);
/// assert_eq!(sheet.ability("Body").unwrap().skills[0].name, "Punch");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Projector {
    config: SheetConfig,
}

impl Projector {
    /// Projector with the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SheetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Build the sheet structure for a snapshot.
    ///
    /// # Errors
    ///
    /// * [`SheetError::MalformedKey`] for a composite key with the wrong
    ///   segment count.
    /// * [`SheetError::UnknownAbility`] for a skill whose ability is not one
    ///   of the four display names (matched case-sensitively).
    /// * [`SheetError::InvalidValue`] when `level` or `armor` is not an
    ///   integer, or when `level` is too large to derive stamina from.
    pub fn project(&self, snapshot: &Snapshot) -> Result<SheetData> {
        let mut abilities: Vec<AbilityBlock> = Ability::ALL
            .iter()
            .map(|ability| AbilityBlock {
                name: ability.display_name().to_string(),
                level: snapshot
                    .get(ability.key())
                    .cloned()
                    .unwrap_or(EntryValue::Int(0)),
                skills: Vec::new(),
            })
            .collect();
        let mut stunts = Vec::new();
        let mut armor = Vec::new();
        let mut stamina = None;
        let mut fields = Snapshot::new();

        for (key, value) in snapshot.iter() {
            match key.kind()? {
                KeyKind::Skill { ability, name } => {
                    let slot = Ability::ALL
                        .iter()
                        .position(|a| a.display_name() == ability)
                        .ok_or_else(|| SheetError::UnknownAbility {
                            key: key.clone(),
                            ability: ability.to_string(),
                        })?;
                    abilities[slot].skills.push(SkillLine {
                        name: name.to_string(),
                        level: value.clone(),
                    });
                }
                KeyKind::Stunt { name } => stunts.push(StuntBlock {
                    name: name.to_string(),
                    description: wrap_stunt(
                        &value.to_text(),
                        self.config.wrap_width,
                        self.config.stunt_indent,
                    ),
                }),
                KeyKind::Simple => {
                    let raw = key.as_str();
                    if raw.starts_with(ABILITY_PREFIX) {
                        continue;
                    } else if raw == ARMOR {
                        let tiers = Self::int_field(key, value)?;
                        armor = (1..=tiers).rev().map(|tier| ArmorTier { tier }).collect();
                    } else if raw == LEVEL {
                        let level = Self::int_field(key, value)?;
                        let derived = level
                            .checked_mul(self.config.stamina_per_level)
                            .ok_or_else(|| SheetError::InvalidValue {
                                key: key.clone(),
                                value: value.clone(),
                            })?;
                        stamina = Some(derived);
                        fields.insert(key.clone(), value.clone());
                    } else if raw == CONCEPT || raw.starts_with(ASPECT_PREFIX) {
                        let wrapped = wrap_aspect(
                            &value.to_text(),
                            self.config.wrap_width,
                            self.config.aspect_indent,
                        );
                        fields.insert(key.clone(), wrapped);
                    } else {
                        fields.insert(key.clone(), value.clone());
                    }
                }
            }
        }

        Ok(SheetData {
            abilities,
            stunts,
            armor,
            stamina,
            fields,
        })
    }

    fn int_field(key: &EntryKey, value: &EntryValue) -> Result<i64> {
        value.as_int().ok_or_else(|| SheetError::InvalidValue {
            key: key.clone(),
            value: value.clone(),
        })
    }
}

/// Project a snapshot with the default layout.
pub fn project(snapshot: &Snapshot) -> Result<SheetData> {
    Projector::new().project(snapshot)
}
