//! # chargen - Character Record Core
//!
//! The UI-independent core of a tabletop character generator:
//! - **Ordered record** of named scalar entries with dynamic skills and stunts
//! - **Running total** over watched entries, recomputed synchronously
//! - **Projection** of the flat record into a nested, template-ready sheet
//! - **Export** of the sheet through a small template engine
//!
//! ## Core Concepts
//!
//! ### Data Flow
//!
//! ```text
//! [UI edits] → [RecordStore] → collect() → [Snapshot] → [Projector] → [SheetData] → [Template]
//!                   ↓
//!            [RunningTotal]
//! ```
//!
//! 1. **Entries** are registered by the host (fixed fields) or added by the
//!    user (skills `skill|<Ability>|<name>`, stunts `stunt|<name>`)
//! 2. **Watched entries** feed the running total
//! 3. **Snapshots** are saved, loaded and projected
//!
//! ## Example
//!
//! ```rust
//! use chargen::*;
//!
//! let mut store = schema::character().unwrap();
//! store.set(&Ability::Body.key(), 3).unwrap();
//! store.add_skill("Body", "Punch", 2).unwrap();
//! assert_eq!(store.total(), 5);
//!
//! let sheet = project(&store.collect()).unwrap();
//! assert_eq!(sheet.ability("Body").unwrap().skills[0].name, "Punch");
//! assert_eq!(sheet.stamina, Some(20));
//! ```
//!
//! ## Modules
//!
//! - [`entry_key`] - Entry keys and composite key parsing
//! - [`value`] - Scalar entry values
//! - [`snapshot`] - Ordered flat snapshots
//! - [`source`] - Read access to values
//! - [`record`] - The record store and host hooks
//! - [`total`] - Running total
//! - [`schema`] - Fixed character layout, skills and stunts
//! - [`projector`] / [`projection`] - Sheet projection
//! - [`wrap`] - Word wrapping
//! - [`template`] / [`sheet`] - Template rendering and sheet export
//! - [`persist`] - Record files
//! - [`config`] - Layout configuration
//! - [`error`] - Error types

pub mod config;
pub mod entry_key;
pub mod error;
pub mod persist;
pub mod projection;
pub mod projector;
pub mod record;
pub mod schema;
pub mod sheet;
pub mod snapshot;
pub mod source;
pub mod template;
pub mod total;
pub mod value;
pub mod wrap;

// Re-export main types for convenience
pub use config::SheetConfig;
pub use entry_key::{EntryKey, KeyKind};
pub use error::SheetError;
pub use record::{DefaultHooks, RecordStore, RestoredSkill, RestoredStunt, StoreHooks};
pub use snapshot::Snapshot;
pub use source::ValueSource;
pub use total::RunningTotal;
pub use value::EntryValue;

pub use persist::{read_snapshot, save_snapshot};
pub use projection::{AbilityBlock, ArmorTier, SheetData, SkillLine, StuntBlock};
pub use projector::{project, Projector};
pub use schema::Ability;
pub use sheet::{export_sheet, SheetExporter, SHEET_TEMPLATE};
pub use template::Template;
