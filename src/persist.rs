//! Reading and writing record files.
//!
//! A record file is a flat JSON object in snapshot order:
//!
//! ```json
//! {
//!   "name": "Mira Vale",
//!   "level": 2,
//!   "skill|Body|Punch": 2,
//!   "stunt|Second Wind": "Recover a wound once per scene."
//! }
//! ```

use crate::error::Result;
use crate::record::RecordStore;
use crate::snapshot::Snapshot;
use std::path::Path;

/// Write a snapshot as pretty-printed JSON.
pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &Snapshot) -> Result<()> {
    let text = snapshot.to_json_string()?;
    std::fs::write(path.as_ref(), text + "\n")?;
    tracing::debug!(path = %path.as_ref().display(), entries = snapshot.len(), "saved record");
    Ok(())
}

/// Read a snapshot written by [`save_snapshot`].
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Snapshot> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let snapshot = Snapshot::from_json_str(&text)?;
    tracing::debug!(path = %path.as_ref().display(), entries = snapshot.len(), "read record");
    Ok(snapshot)
}

impl RecordStore {
    /// Save the current record to a file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        save_snapshot(path, &self.collect())
    }

    /// Replace the record with a file's contents.
    ///
    /// Read and parse errors leave the store untouched, as do the errors
    /// of [`RecordStore::load`].
    pub fn load_from(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = read_snapshot(path)?;
        self.load(&snapshot)
    }
}
