//! Plain-text character sheet export.

use crate::error::Result;
use crate::projector::Projector;
use crate::snapshot::Snapshot;
use crate::template::Template;
use std::path::Path;

/// The built-in sheet layout.
pub const SHEET_TEMPLATE: &str = "{name}

High Concept              - {concept}
Ambition Aspect           - {aspect_ambition}
Background Aspect         - {aspect_background}
Conviction Aspect         - {aspect_conviction}
Disadvantage Aspect       - {aspect_disadvantage}
Exceptional Skill Aspect  - {aspect_exceptional_skill}
Foe Aspect                - {aspect_foe}
Gear Aspect               - {aspect_gear}
Help Aspect               - {aspect_help}
Inferior Skill Aspect     - {aspect_inferior_skill}


Level      [{level}]
Stamina    [{stamina}]
Edge       [{level}]

Health
{#armor}    [Armor tier {tier}]
{/armor}    [Healthy]
    [Injured]
    [Wounded]
    [Incapacitated]

{#abilities}
{name:<28}[{level}]{#skills}
    {name:<24}[{level}]{/skills}
{/abilities}

Stunts/Powers{#stunts}
    {name}
{description}
{/stunts}";

/// Renders snapshots into sheet text.
///
/// # Examples
///
/// ```rust
/// use chargen::{schema, SheetExporter};
///
/// let mut store = schema::character().unwrap();
/// store.set(&"name".into(), "Mira Vale").unwrap();
/// store.set(&"armor".into(), 2).unwrap();
///
/// let text = SheetExporter::new().unwrap().export(&store.collect()).unwrap();
/// assert!(text.starts_with("Mira Vale\n"));
/// assert!(text.contains("    [Armor tier 2]\n    [Armor tier 1]\n    [Healthy]"));
/// assert!(text.ends_with('\n'));
/// ```
#[derive(Debug, Clone)]
pub struct SheetExporter {
    projector: Projector,
    template: Template,
}

impl SheetExporter {
    /// Exporter using the built-in template and default layout.
    pub fn new() -> Result<Self> {
        Self::with_template(Projector::new(), SHEET_TEMPLATE)
    }

    pub fn with_template(projector: Projector, template: &str) -> Result<Self> {
        Ok(Self {
            projector,
            template: Template::parse(template)?,
        })
    }

    /// Project and render a snapshot. Surrounding whitespace is trimmed and a
    /// single trailing newline added.
    pub fn export(&self, snapshot: &Snapshot) -> Result<String> {
        let sheet = self.projector.project(snapshot)?;
        let text = self.template.render(&sheet.to_context()?)?;
        Ok(format!("{}\n", text.trim()))
    }

    /// Export to a file. The file is only written once rendering succeeded.
    pub fn export_to_file(&self, path: impl AsRef<Path>, snapshot: &Snapshot) -> Result<()> {
        let text = self.export(snapshot)?;
        std::fs::write(path.as_ref(), text)?;
        tracing::debug!(path = %path.as_ref().display(), "exported sheet");
        Ok(())
    }
}

/// Export with the built-in template and default layout.
pub fn export_sheet(snapshot: &Snapshot) -> Result<String> {
    SheetExporter::new()?.export(snapshot)
}
