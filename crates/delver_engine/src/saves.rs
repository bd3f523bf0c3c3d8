//! Saved game slots.

use std::collections::BTreeMap;

use delver_foundation::{Error, ErrorKind, Result};
use delver_storage::{SaveSummary, Snapshot};

/// Lowest save slot.
pub const FIRST_SLOT: u8 = 1;

/// Highest save slot.
pub const LAST_SLOT: u8 = 10;

/// Checks that a slot number is in range.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidSlot`] outside 1 through 10.
pub fn check_slot(slot: u8) -> Result<()> {
    if (FIRST_SLOT..=LAST_SLOT).contains(&slot) {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::InvalidSlot(slot)))
    }
}

/// Where saved games live.
pub trait SaveStore {
    /// Stores a snapshot under a slot, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid slot or a failed write.
    fn save(&mut self, slot: u8, description: &str, snapshot: &Snapshot) -> Result<()>;

    /// Loads the snapshot in a slot.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid or empty slot, or unreadable data.
    fn load(&self, slot: u8) -> Result<Snapshot>;

    /// Every used slot, in slot order.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be read.
    fn list(&self) -> Result<Vec<SaveSummary>>;

    /// Empties a slot. Missing slots are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid slot or a failed delete.
    fn delete(&mut self, slot: u8) -> Result<()>;
}

/// Saves kept in memory, for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemorySaveStore {
    slots: BTreeMap<u8, (SaveSummary, Snapshot)>,
}

impl MemorySaveStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemorySaveStore {
    fn save(&mut self, slot: u8, description: &str, snapshot: &Snapshot) -> Result<()> {
        check_slot(slot)?;
        let summary = SaveSummary {
            slot,
            description: description.to_string(),
            timer: snapshot.timer,
        };
        self.slots.insert(slot, (summary, snapshot.clone()));
        Ok(())
    }

    fn load(&self, slot: u8) -> Result<Snapshot> {
        check_slot(slot)?;
        self.slots
            .get(&slot)
            .map(|(_, snapshot)| snapshot.clone())
            .ok_or_else(|| Error::new(ErrorKind::EmptySlot(slot)))
    }

    fn list(&self) -> Result<Vec<SaveSummary>> {
        Ok(self.slots.values().map(|(summary, _)| summary.clone()).collect())
    }

    fn delete(&mut self, slot: u8) -> Result<()> {
        check_slot(slot)?;
        self.slots.remove(&slot);
        Ok(())
    }
}
