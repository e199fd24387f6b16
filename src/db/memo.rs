use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Facts memoized per IMDb ID so repeated runs produce the same feed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemoKey {
    ItemId(String),
    FirstSeenInProduction(String),
    /// Keyed by the title, status and release estimate fingerprint
    DetailsUpdated {
        imdb_id: String,
        title: String,
        status: String,
        release_estimate: String,
    },
}

impl Display for MemoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoKey::ItemId(imdb_id) => write!(f, "item_id:{}", imdb_id),
            MemoKey::FirstSeenInProduction(imdb_id) => {
                write!(f, "first_seen_in_production:{}", imdb_id)
            }
            MemoKey::DetailsUpdated {
                imdb_id,
                title,
                status,
                release_estimate,
            } => write!(
                f,
                "details_updated:{}:{}:{}:{}",
                imdb_id, title, status, release_estimate
            ),
        }
    }
}

/// Deferred computation of a value missing from the store
pub type Compute<'a> = Box<dyn FnOnce() -> AppResult<Value> + 'a>;

/// Key/value store with get-or-compute semantics and LRU eviction
///
/// `compute` runs while the store holds its internal lock and must not call
/// back into the store.
pub trait MemoStore: Send + Sync {
    /// Returns the value stored under `key`, marking it recently used, or
    /// computes, stores and returns a new one.
    fn get_or_compute(&self, key: &str, compute: Compute<'_>) -> AppResult<Value>;

    /// Releases the store. Persistent backends flush to disk exactly once.
    fn close(&self) -> AppResult<()> {
        Ok(())
    }
}

impl<'s> dyn MemoStore + 's {
    /// Typed wrapper around [`MemoStore::get_or_compute`]
    pub fn memoize<T, F>(&self, key: &MemoKey, compute: F) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let key = key.to_string();
        let value = self.get_or_compute(
            &key,
            Box::new(move || -> AppResult<Value> { Ok(serde_json::to_value(compute())?) }),
        )?;

        serde_json::from_value(value).map_err(|e| {
            AppError::Cache(format!("stored value for {} has unexpected shape: {}", key, e))
        })
    }
}

/// In-memory backend
pub struct LruStore {
    entries: Mutex<LruCache<String, Value>>,
}

impl LruStore {
    pub fn new(max_items: usize) -> AppResult<Self> {
        let capacity = NonZeroUsize::new(max_items).ok_or_else(|| {
            AppError::InvalidInput("memo store capacity must be greater than zero".to_string())
        })?;

        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Builds a store from entries ordered least to most recently used
    fn with_entries(max_items: usize, entries: Vec<(String, Value)>) -> AppResult<Self> {
        let store = Self::new(max_items)?;
        {
            let mut cache = store.entries.lock();
            for (key, value) in entries {
                cache.put(key, value);
            }
        }
        Ok(store)
    }

    /// Entries ordered least to most recently used
    fn snapshot(&self) -> Vec<(String, Value)> {
        self.entries
            .lock()
            .iter()
            .rev()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl MemoStore for LruStore {
    fn get_or_compute(&self, key: &str, compute: Compute<'_>) -> AppResult<Value> {
        let mut entries = self.entries.lock();

        if let Some(value) = entries.get(key) {
            tracing::trace!(key = %key, "Memo hit");
            return Ok(value.clone());
        }

        let value = compute()?;
        tracing::debug!(key = %key, "Memo miss, stored new value");

        if let Some((evicted, _)) = entries.push(key.to_string(), value.clone()) {
            tracing::debug!(key = %evicted, "Evicted least recently used memo entry");
        }

        Ok(value)
    }
}

/// On-disk layout of the persistent backend
#[derive(Debug, Default, Serialize, Deserialize)]
struct MemoFile {
    /// Ordered least to most recently used
    entries: Vec<(String, Value)>,
}

/// Backend persisted to a JSON file when closed
pub struct PersistentStore {
    path: PathBuf,
    inner: LruStore,
    closed: AtomicBool,
}

impl PersistentStore {
    /// Loads the store from `path`, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>, max_items: usize) -> AppResult<Self> {
        let path = path.into();

        let file = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<MemoFile>(&bytes).map_err(|e| {
                AppError::Cache(format!("failed to parse {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => MemoFile::default(),
            Err(e) => return Err(e.into()),
        };

        let loaded = file.entries.len();
        let inner = LruStore::with_entries(max_items, file.entries)?;

        tracing::info!(
            path = %path.display(),
            entries = inner.len(),
            loaded = loaded,
            "Opened persistent memo store"
        );

        Ok(Self {
            path,
            inner,
            closed: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes all entries to a sibling temp file, then renames it over the store
    fn flush(&self) -> AppResult<()> {
        let file = MemoFile {
            entries: self.inner.snapshot(),
        };

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer(&mut writer, &file)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::info!(
            path = %self.path.display(),
            entries = file.entries.len(),
            "Flushed persistent memo store"
        );

        Ok(())
    }
}

impl MemoStore for PersistentStore {
    fn get_or_compute(&self, key: &str, compute: Compute<'_>) -> AppResult<Value> {
        self.inner.get_or_compute(key, compute)
    }

    fn close(&self) -> AppResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.flush()
    }
}

impl Drop for PersistentStore {
    fn drop(&mut self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::warn!(path = %self.path.display(), "Memo store dropped without close, flushing");
            if let Err(e) = self.flush() {
                tracing::error!(error = %e, "Failed to flush memo store on drop");
            }
        }
    }
}

/// Opens the persistent backend when a path is configured, otherwise an in-memory one
pub fn open_store(cache_file: Option<&Path>, max_items: usize) -> AppResult<Box<dyn MemoStore>> {
    match cache_file {
        Some(path) => Ok(Box::new(PersistentStore::open(path, max_items)?)),
        None => Ok(Box::new(LruStore::new(max_items)?)),
    }
}
