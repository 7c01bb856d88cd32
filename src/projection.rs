//! Projected sheet structure.
//!
//! `SheetData` is the nested, export-only shape rebuilt from a flat
//! snapshot on every export. Its serialized field names are the
//! placeholders used by sheet templates.

use crate::error::Result;
use crate::snapshot::Snapshot;
use crate::value::EntryValue;
use serde::Serialize;

/// Template-ready view of a character record.
///
/// Serializes to a single JSON object: the list fields below plus every
/// entry of `fields` (name, concept, aspects, level and passthrough keys)
/// at the top level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetData {
    /// The four abilities in fixed order.
    pub abilities: Vec<AbilityBlock>,

    /// Stunts in snapshot order, descriptions wrapped.
    pub stunts: Vec<StuntBlock>,

    /// Armor tiers, highest first.
    pub armor: Vec<ArmorTier>,

    /// Derived from the level; absent when the snapshot has no level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamina: Option<i64>,

    /// Scalar fields in snapshot order.
    #[serde(flatten)]
    pub fields: Snapshot,
}

impl SheetData {
    /// Look up an ability block by display name.
    pub fn ability(&self, name: &str) -> Option<&AbilityBlock> {
        self.abilities.iter().find(|a| a.name == name)
    }

    pub fn field(&self, key: &str) -> Option<&EntryValue> {
        self.fields.get(key)
    }

    /// Convert to the JSON value consumed by the template renderer.
    pub fn to_context(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityBlock {
    pub name: String,
    pub level: EntryValue,
    pub skills: Vec<SkillLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillLine {
    pub name: String,
    pub level: EntryValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StuntBlock {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArmorTier {
    pub tier: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_flat_object() {
        let data = SheetData {
            abilities: vec![AbilityBlock {
                name: "Body".to_string(),
                level: EntryValue::Int(2),
                skills: vec![SkillLine {
                    name: "Punch".to_string(),
                    level: EntryValue::Int(1),
                }],
            }],
            stunts: Vec::new(),
            armor: vec![ArmorTier { tier: 1 }],
            stamina: Some(20),
            fields: [("name", "Mira")].into_iter().collect(),
        };

        let context = data.to_context().unwrap();
        assert_eq!(context["name"], "Mira");
        assert_eq!(context["stamina"], 20);
        assert_eq!(context["armor"][0]["tier"], 1);
        assert_eq!(context["abilities"][0]["skills"][0]["name"], "Punch");
        assert!(context["stunts"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_missing_stamina_is_omitted() {
        let data = SheetData {
            abilities: Vec::new(),
            stunts: Vec::new(),
            armor: Vec::new(),
            stamina: None,
            fields: Snapshot::new(),
        };
        assert!(data.to_context().unwrap().get("stamina").is_none());
        assert!(data.ability("Body").is_none());
    }
}
