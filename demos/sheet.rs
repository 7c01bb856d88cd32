//! Sheet example: build a character, save it, load it back and export it
//!
//! This example demonstrates:
//! - Registering the fixed character layout
//! - Adding skills and stunts, watching the running total
//! - Saving to and loading from a record file
//! - Exporting the plain-text sheet
//!
//! Run with `RUST_LOG=chargen=debug` to see the store's log output.

use chargen::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SheetError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chargen=info")),
        )
        .init();

    let mut store = schema::character()?;
    store.subscribe_total(|total| println!("  total is now {total}"));

    println!("Filling in the character:");
    store.set(&"name".into(), "Mira Vale")?;
    store.set(&"concept".into(), "Disgraced sky-pirate captain")?;
    store.set(&schema::aspect_key("Foe"), "The Admiralty wants my ship back")?;
    store.set(&"level".into(), 3)?;
    store.set(&"armor".into(), 1)?;
    store.set(&Ability::Body.key(), 2)?;
    store.set(&Ability::Reflexes.key(), 3)?;
    store.add_skill("Reflexes", "Sword|Fighting", 2)?;
    store.add_skill("Persona", "Command", 3)?;
    store.add_stunt(
        "Second Wind",
        "Once per scene, recover from a wound.\nCosts a point of edge.",
    )?;

    let dir = std::env::temp_dir();
    let record = dir.join("chargen-demo.json");
    store.save_to(&record)?;
    println!("\nSaved record to {}", record.display());

    println!("\nStarting over and loading it back:");
    store.reset()?;
    store.load_from(&record)?;

    let sheet = SheetExporter::new()?.export(&store.collect())?;
    println!("\n=== Character Sheet ===\n{sheet}");

    Ok(())
}
