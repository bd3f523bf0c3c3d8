//! Save slots on disk, using `MessagePack`.
//!
//! Each slot is one file; a small index file holds the slot descriptions so
//! listing saves does not read every snapshot.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use delver_engine::SaveStore;
use delver_engine::saves::check_slot;
use delver_foundation::{Error, ErrorKind, Result};
use delver_storage::{SaveSummary, Snapshot};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

const INDEX_FILE: &str = "index.sav";

/// Serializes a value to bytes using `MessagePack` format.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(value)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Deserializes a value from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    rmp_serde::from_slice(bytes)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to create file '{}': {e}",
            path.display()
        )))
    })?;

    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to write to file '{}': {e}",
            path.display()
        )))
    })?;

    writer.flush().map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to flush file '{}': {e}",
            path.display()
        )))
    })
}

/// Reads a file, or `None` if it does not exist.
fn read_file(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::new(ErrorKind::IoError(format!(
            "failed to read file '{}': {e}",
            path.display()
        )))),
    }
}

/// Saved games kept in a directory.
#[derive(Clone, Debug)]
pub struct FileSaveStore {
    dir: PathBuf,
}

impl FileSaveStore {
    /// Opens a save directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            Error::new(ErrorKind::IoError(format!(
                "failed to create directory '{}': {e}",
                dir.display()
            )))
        })?;
        Ok(Self { dir })
    }

    /// The directory holding the slot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: u8) -> PathBuf {
        self.dir.join(format!("slot-{slot:02}.sav"))
    }

    fn read_index(&self) -> Result<BTreeMap<u8, SaveSummary>> {
        match read_file(&self.dir.join(INDEX_FILE))? {
            Some(bytes) => from_bytes(&bytes),
            None => Ok(BTreeMap::new()),
        }
    }

    fn write_index(&self, index: &BTreeMap<u8, SaveSummary>) -> Result<()> {
        write_file(&self.dir.join(INDEX_FILE), &to_bytes(index)?)
    }
}

impl SaveStore for FileSaveStore {
    fn save(&mut self, slot: u8, description: &str, snapshot: &Snapshot) -> Result<()> {
        check_slot(slot)?;
        write_file(&self.slot_path(slot), &to_bytes(snapshot)?)?;
        let mut index = self.read_index()?;
        index.insert(
            slot,
            SaveSummary {
                slot,
                description: description.to_string(),
                timer: snapshot.timer,
            },
        );
        self.write_index(&index)?;
        debug!(slot, dir = %self.dir.display(), "slot written");
        Ok(())
    }

    fn load(&self, slot: u8) -> Result<Snapshot> {
        check_slot(slot)?;
        let bytes = read_file(&self.slot_path(slot))?
            .ok_or_else(|| Error::new(ErrorKind::EmptySlot(slot)))?;
        from_bytes(&bytes)
    }

    fn list(&self) -> Result<Vec<SaveSummary>> {
        Ok(self
            .read_index()?
            .into_values()
            .filter(|summary| self.slot_path(summary.slot).exists())
            .collect())
    }

    fn delete(&mut self, slot: u8) -> Result<()> {
        check_slot(slot)?;
        let path = self.slot_path(slot);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == IoErrorKind::NotFound => {}
            Err(e) => {
                return Err(Error::new(ErrorKind::IoError(format!(
                    "failed to delete file '{}': {e}",
                    path.display()
                ))));
            }
        }
        let mut index = self.read_index()?;
        if index.remove(&slot).is_some() {
            self.write_index(&index)?;
        }
        Ok(())
    }
}
