//! Local shipment persistence.
//!
//! Records are read and written whole. [`FileStore`] keeps one JSON file per
//! shipment (`parcel_<ID>.json`) plus a `search-history.json` list;
//! [`MemoryStore`] keeps the same data in process for tests and offline runs.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use swiftify_tracking::{ShipmentRecord, TrackingId};
use tracing::{debug, warn};

const HISTORY_FILE: &str = "search-history.json";
const RECORD_PREFIX: &str = "parcel_";

/// Default number of remembered searches
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Storage for shipment records and tracking search history
pub trait ShipmentStore: Send + Sync {
    fn load(&self, id: &TrackingId) -> Result<Option<ShipmentRecord>>;

    /// Insert or replace the record with the same ID
    fn save(&self, record: &ShipmentRecord) -> Result<()>;

    /// All stored records, newest first
    fn list(&self) -> Result<Vec<ShipmentRecord>>;

    /// Tracked IDs, most recent first
    fn search_history(&self) -> Result<Vec<TrackingId>>;

    /// Move `id` to the front of the history, keeping at most `limit` entries.
    /// Returns the updated history.
    fn record_search(&self, id: &TrackingId, limit: usize) -> Result<Vec<TrackingId>>;

    fn clear_search_history(&self) -> Result<()>;
}

/// Puts `id` first, drops any older occurrence and truncates to `limit`.
pub fn push_history(history: &mut Vec<TrackingId>, id: &TrackingId, limit: usize) {
    history.retain(|existing| existing != id);
    history.insert(0, id.clone());
    history.truncate(limit);
}

fn newest_first(records: &mut [ShipmentRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, ShipmentRecord>>,
    history: RwLock<Vec<TrackingId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShipmentStore for MemoryStore {
    fn load(&self, id: &TrackingId) -> Result<Option<ShipmentRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(id.as_str()).cloned())
    }

    fn save(&self, record: &ShipmentRecord) -> Result<()> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(record.id.to_string(), record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<ShipmentRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<_> = records.values().cloned().collect();
        newest_first(&mut all);
        Ok(all)
    }

    fn search_history(&self) -> Result<Vec<TrackingId>> {
        Ok(self.history.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn record_search(&self, id: &TrackingId, limit: usize) -> Result<Vec<TrackingId>> {
        let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
        push_history(&mut history, id, limit);
        Ok(history.clone())
    }

    fn clear_search_history(&self) -> Result<()> {
        self.history.write().unwrap_or_else(PoisonError::into_inner).clear();
        Ok(())
    }
}

/// JSON files under a data directory
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    // Serializes read-modify-write of the history file within this process.
    history_lock: RwLock<()>,
}

impl FileStore {
    /// Opens (and creates if needed) a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "Opened shipment store");
        Ok(Self {
            dir,
            history_lock: RwLock::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &TrackingId) -> PathBuf {
        self.dir.join(format!("{RECORD_PREFIX}{id}.json"))
    }

    fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE)
    }

    fn read_history(&self) -> Result<Vec<TrackingId>> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw: Vec<String> = serde_json::from_str(&fs::read_to_string(&path)?)?;
        // Entries that no longer validate are dropped rather than failing the whole list.
        Ok(raw.iter().filter_map(|s| TrackingId::parse(s).ok()).collect())
    }

    fn write_history(&self, history: &[TrackingId]) -> Result<()> {
        write_atomic(&self.history_path(), &serde_json::to_vec_pretty(history)?)
    }
}

/// Writes via a sibling temp file and rename so readers never see a partial record.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl ShipmentStore for FileStore {
    fn load(&self, id: &TrackingId) -> Result<Option<ShipmentRecord>> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let record = serde_json::from_str(&fs::read_to_string(&path)?)?;
        Ok(Some(record))
    }

    fn save(&self, record: &ShipmentRecord) -> Result<()> {
        let path = self.record_path(&record.id);
        write_atomic(&path, &serde_json::to_vec_pretty(record)?)?;
        debug!(id = %record.id, path = %path.display(), "Saved shipment record");
        Ok(())
    }

    fn list(&self) -> Result<Vec<ShipmentRecord>> {
        let mut records = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_record = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(RECORD_PREFIX) && n.ends_with(".json"));
            if !is_record {
                continue;
            }

            match fs::read_to_string(&path)
                .map_err(crate::SessionError::from)
                .and_then(|raw| serde_json::from_str(&raw).map_err(Into::into))
            {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable shipment record"),
            }
        }

        newest_first(&mut records);
        Ok(records)
    }

    fn search_history(&self) -> Result<Vec<TrackingId>> {
        let _guard = self.history_lock.read().unwrap_or_else(PoisonError::into_inner);
        self.read_history()
    }

    fn record_search(&self, id: &TrackingId, limit: usize) -> Result<Vec<TrackingId>> {
        let _guard = self.history_lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut history = self.read_history()?;
        push_history(&mut history, id, limit);
        self.write_history(&history)?;
        Ok(history)
    }

    fn clear_search_history(&self) -> Result<()> {
        let _guard = self.history_lock.write().unwrap_or_else(PoisonError::into_inner);
        let path = self.history_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
