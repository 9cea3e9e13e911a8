//! Key-value storage for persisted counters.

use derive_more::{Display, Error};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Storage error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// String-keyed, string-valued store.
///
/// Reads never fail: a store that cannot produce a value reports it as
/// missing.
pub trait StatsStore {
    /// Value stored under `key`.
    fn read(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the value could not be persisted.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store; contents vanish with the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl StatsStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object in a file.
///
/// The whole file is loaded on open and rewritten on every write. A missing
/// file starts empty; an unreadable or malformed file is logged and also
/// treated as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => parse_entries(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Stats file not found, starting empty");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stats file, starting empty");
                BTreeMap::new()
            }
        };
        info!(entries = values.len(), "Opened stats file");
        Self { path, values }
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::new(format!("Failed to create '{}': {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| StoreError::new(format!("Failed to encode stats: {}", e)))?;
        std::fs::write(&self.path, json).map_err(|e| {
            StoreError::new(format!("Failed to write '{}': {}", self.path.display(), e))
        })
    }
}

/// Reads a flat JSON object. Numbers are kept as their decimal text; nested
/// values are dropped.
fn parse_entries(content: &str) -> BTreeMap<String, String> {
    let object: BTreeMap<String, serde_json::Value> = match serde_json::from_str(content) {
        Ok(object) => object,
        Err(e) => {
            warn!(error = %e, "Stats file is not a JSON object, starting empty");
            return BTreeMap::new();
        }
    };

    object
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(s) => Some((key, s)),
            serde_json::Value::Number(n) => Some((key, n.to_string())),
            other => {
                warn!(%key, value = %other, "Dropping non-scalar stats entry");
                None
            }
        })
        .collect()
}

impl StatsStore for JsonFileStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
