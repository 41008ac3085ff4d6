//! Persistence backends for the weight map.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::error::{Result, RuleError};

/// Flat `"{profile}_{rule_name}"` → weight map, as persisted.
pub type WeightMap = BTreeMap<String, f64>;

/// Where the weight map lives between sessions.
///
/// `persist` always receives the complete map; backends overwrite, never merge.
pub trait WeightBackend: Send + Sync {
    /// Read the stored map. A store that does not exist yet is empty, not an error.
    fn load(&self) -> Result<WeightMap>;

    /// Replace the stored map with `weights`.
    fn persist(&self, weights: &WeightMap) -> Result<()>;
}

/// In-memory backend. Clones share state, so a test can keep a handle
/// after moving one into a store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    stored: Arc<Mutex<WeightMap>>,
    persist_count: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with `weights`.
    pub fn with_weights(weights: WeightMap) -> Self {
        let backend = Self::default();
        *backend.stored.lock().expect("memory backend lock poisoned") = weights;
        backend
    }

    /// Make subsequent `persist` calls fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `persist` calls.
    pub fn persist_count(&self) -> usize {
        self.persist_count.load(Ordering::SeqCst)
    }

    /// Copy of what is currently "on disk".
    pub fn stored(&self) -> WeightMap {
        self.stored.lock().expect("memory backend lock poisoned").clone()
    }
}

impl WeightBackend for MemoryBackend {
    fn load(&self) -> Result<WeightMap> {
        Ok(self.stored())
    }

    fn persist(&self, weights: &WeightMap) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RuleError::Persistence("memory backend configured to fail".to_string()));
        }
        *self.stored.lock().expect("memory backend lock poisoned") = weights.clone();
        self.persist_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// JSON file on disk, rewritten atomically (temp file + rename).
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp file `.{file_name}.{pid}.tmp` in the same directory, so the
    /// final rename never crosses filesystems and concurrent processes never
    /// share a temp inode.
    pub(super) fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "weights".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
    }

    fn write_atomic(&self, weights: &WeightMap) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(weights)?;
        let tmp_path = self.tmp_path();
        let mut file = File::create(&tmp_path)?;
        file.write_all(&json)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)
    }
}

impl WeightBackend for JsonFileBackend {
    fn load(&self) -> Result<WeightMap> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no weight store on disk yet, starting empty");
            return Ok(WeightMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| RuleError::Persistence(format!("failed to read {}: {}", self.path.display(), e)))?;
        let weights: WeightMap = serde_json::from_str(&contents)
            .map_err(|e| RuleError::Persistence(format!("corrupt weight store {}: {}", self.path.display(), e)))?;
        info!(path = %self.path.display(), entries = weights.len(), "weight memory loaded");
        Ok(weights)
    }

    fn persist(&self, weights: &WeightMap) -> Result<()> {
        self.write_atomic(weights).map_err(|e| {
            let _ = fs::remove_file(self.tmp_path());
            RuleError::Persistence(format!("failed to write {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), entries = weights.len(), "weight store rewritten");
        Ok(())
    }
}
