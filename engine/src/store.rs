use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Serialize, Deserialize};
use shared::shared_lucky_draw::SpinResult;

/// The one durable record the engine keeps: last draw time, lifetime draw
/// count, and the result the user won. Written as a single unit so a crash
/// can never leave the fields inconsistent with each other.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DrawRecord {
    pub last_draw_at_epoch_ms: i64,
    pub draw_count: u32,
    pub last_result: SpinResult,
}

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Format(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "storage I/O error: {}", e),
            StoreError::Format(e) => write!(f, "storage format error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Format(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Format(err)
    }
}

/// Durable key-value collaborator for the cooldown record. Any crash-safe
/// mechanism qualifies as long as a load after a crash reflects the last
/// successfully saved record.
pub trait CooldownStore {
    fn load(&self) -> Result<Option<DrawRecord>, StoreError>;
    fn save(&mut self, record: &DrawRecord) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// File-backed store: one JSON document, replaced via a temp file and rename
/// so an interrupted save leaves the previous record intact.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CooldownStore for JsonFileStore {
    fn load(&self) -> Result<Option<DrawRecord>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&mut self, record: &DrawRecord) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(record)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Option<DrawRecord>,
}

impl CooldownStore for MemoryStore {
    fn load(&self) -> Result<Option<DrawRecord>, StoreError> {
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &DrawRecord) -> Result<(), StoreError> {
        self.record = Some(record.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.record = None;
        Ok(())
    }
}
