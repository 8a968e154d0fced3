use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use lru::LruCache;

use crate::config::AppConfig;
use crate::du::{self, DuSnapshot};
use crate::error::AppResult;
use crate::metrics::Metrics;

/// Identity of a snapshot file on disk; a rewritten file gets a new key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SnapshotKey {
    path: PathBuf,
    len: u64,
    modified: Option<SystemTime>,
}

/// Parsed snapshots, most recently used first.
#[derive(Clone)]
pub struct SnapshotCache {
    inner: Arc<Mutex<LruCache<SnapshotKey, Arc<DuSnapshot>>>>,
}

impl SnapshotCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { inner: Arc::new(Mutex::new(LruCache::new(capacity))) }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the parsed snapshot at `path`, parsing it on the blocking pool
    /// unless an unchanged copy is cached.
    pub async fn load(&self, path: &Path, metrics: &Metrics) -> AppResult<Arc<DuSnapshot>> {
        let meta = tokio::fs::metadata(path).await?;
        let key = SnapshotKey { path: path.to_path_buf(), len: meta.len(), modified: meta.modified().ok() };

        if let Some(hit) = self.inner.lock().ok().and_then(|mut c| c.get(&key).cloned()) {
            metrics.inc_snapshot_cache_hits();
            return Ok(hit);
        }

        let owned = path.to_path_buf();
        let snapshot = tokio::task::spawn_blocking(move || du::open_snapshot(&owned)).await??;
        let snapshot = Arc::new(snapshot);
        metrics.inc_snapshots_parsed();
        tracing::debug!(path = %path.display(), entries = snapshot.len(), "parsed du snapshot");

        if let Ok(mut cache) = self.inner.lock() {
            cache.put(key, Arc::clone(&snapshot));
        }
        Ok(snapshot)
    }
}

/// The shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub metrics: Metrics,
    pub snapshots: SnapshotCache,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let snapshots = SnapshotCache::new(config.reports.cache_capacity);
        Self { config: Arc::new(config), metrics: Metrics::new(), snapshots }
    }

    /// Directory holding the snapshots of `location`.
    pub fn location_dir(&self, location: &str) -> PathBuf {
        self.config.reports.directory.join(location)
    }
}
