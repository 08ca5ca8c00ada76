//! Two-tier scan cache.
//!
//! Walk results are keyed by a hash of the root path string and kept in a
//! process-local map, mirrored as one JSON record per key on disk. Records
//! expire after a wall-clock TTL. The directory contents are never compared,
//! so files added within the TTL window stay invisible until the caller
//! forces a refresh or invalidates the path.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use vidshelf_common::{Error, Result};

use crate::scanner::{ScanResult, Walker};

/// Default record lifetime.
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// One cached walk, as stored in memory and on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Root path the walk started from.
    pub path: String,
    pub timestamp: DateTime<Utc>,
    pub result: ScanResult,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.timestamp) < ttl
    }
}

/// Hit and walk counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub memory_hits: u64,
    pub disk_hits: u64,
    pub walks: u64,
    pub entries: usize,
}

/// Stable cache key for a scan root: first 8 bytes of the SHA-256 of the
/// path string, hex encoded.
pub fn cache_key(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

/// Scan cache in front of a [`Walker`].
pub struct ScanCache {
    entries: DashMap<String, CacheEntry>,
    disk_dir: Option<PathBuf>,
    ttl: Duration,
    walker: Arc<Walker>,
    memory_hits: AtomicU64,
    disk_hits: AtomicU64,
    walks: AtomicU64,
}

impl ScanCache {
    /// Create a memory-only cache with the default TTL.
    pub fn new(walker: Walker) -> Self {
        Self {
            entries: DashMap::new(),
            disk_dir: None,
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
            walker: Arc::new(walker),
            memory_hits: AtomicU64::new(0),
            disk_hits: AtomicU64::new(0),
            walks: AtomicU64::new(0),
        }
    }

    /// Persist records under `dir` as `<key>.json`.
    pub fn with_disk_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.disk_dir = Some(dir.into());
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached walk of `root`, or walk it and cache the result.
    ///
    /// With `force_refresh` both tiers are bypassed and overwritten.
    ///
    /// # Errors
    ///
    /// Only walker failures (missing or non-directory root) are returned.
    /// Disk tier problems are logged and treated as misses.
    pub async fn get_or_scan(&self, root: &Path, force_refresh: bool) -> Result<ScanResult> {
        let key = cache_key(root);

        if !force_refresh {
            if let Some(result) = self.lookup(&key) {
                return Ok(result);
            }
        }

        let result = self.walk(root).await?;
        self.store(key, root, &result);
        Ok(result)
    }

    fn lookup(&self, key: &str) -> Option<ScanResult> {
        let now = Utc::now();

        if let Some(entry) = self.entries.get(key) {
            if entry.is_fresh(self.ttl, now) {
                self.memory_hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, path = %entry.path, "Scan cache memory hit");
                return Some(entry.result.clone());
            }
            drop(entry);
            self.entries.remove(key);
        }

        let entry = self.read_disk(key)?;
        if !entry.is_fresh(self.ttl, now) {
            debug!(key, path = %entry.path, "Scan cache disk record expired");
            return None;
        }

        self.disk_hits.fetch_add(1, Ordering::Relaxed);
        debug!(key, path = %entry.path, "Scan cache disk hit");
        let result = entry.result.clone();
        self.entries.insert(key.to_string(), entry);
        Some(result)
    }

    async fn walk(&self, root: &Path) -> Result<ScanResult> {
        self.walks.fetch_add(1, Ordering::Relaxed);
        let walker = Arc::clone(&self.walker);
        let root = root.to_path_buf();
        tokio::task::spawn_blocking(move || walker.walk(&root))
            .await
            .map_err(|e| Error::internal(format!("walk task failed: {e}")))?
    }

    fn store(&self, key: String, root: &Path, result: &ScanResult) {
        let entry = CacheEntry {
            path: root.to_string_lossy().into_owned(),
            timestamp: Utc::now(),
            result: result.clone(),
        };
        if let Err(e) = self.write_disk(&key, &entry) {
            warn!(path = %root.display(), error = %e, "Failed to persist scan cache record");
        }
        self.entries.insert(key, entry);
    }

    fn record_path(&self, key: &str) -> Option<PathBuf> {
        self.disk_dir
            .as_ref()
            .map(|dir| dir.join(format!("{key}.json")))
    }

    fn read_disk(&self, key: &str) -> Option<CacheEntry> {
        let path = self.record_path(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read scan cache record");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt scan cache record");
                None
            }
        }
    }

    fn write_disk(&self, key: &str, entry: &CacheEntry) -> Result<()> {
        let (Some(dir), Some(path)) = (self.disk_dir.as_ref(), self.record_path(key)) else {
            return Ok(());
        };
        fs::create_dir_all(dir)?;
        let json = serde_json::to_vec_pretty(entry)
            .map_err(|e| Error::internal(format!("failed to encode scan cache record: {e}")))?;
        fs::write(&path, json)?;
        Ok(())
    }

    /// Drop the cached walk of `root` from both tiers.
    pub fn invalidate(&self, root: &Path) {
        let key = cache_key(root);
        self.entries.remove(&key);
        if let Some(path) = self.record_path(&key) {
            remove_record(&path);
        }
        debug!(path = %root.display(), "Scan cache entry invalidated");
    }

    /// Drop every cached walk. Returns the number of disk records removed.
    pub fn clear(&self) -> usize {
        self.entries.clear();

        let Some(dir) = self.disk_dir.as_ref() else {
            return 0;
        };
        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Failed to list scan cache directory");
                return 0;
            }
        };

        let mut removed = 0;
        for entry in read_dir.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") && remove_record(&path) {
                removed += 1;
            }
        }
        info!(removed, "Scan cache cleared");
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            memory_hits: self.memory_hits.load(Ordering::Relaxed),
            disk_hits: self.disk_hits.load(Ordering::Relaxed),
            walks: self.walks.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

fn remove_record(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to remove scan cache record");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn library() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let season = dir.path().join("Breaking Bad/Temporada 1");
        fs::create_dir_all(&season).unwrap();
        for n in 1..=3 {
            fs::write(season.join(format!("S01E{n:02}.mp4")), b"video").unwrap();
        }
        dir
    }

    #[test]
    fn cache_key_is_stable() {
        let a = cache_key(Path::new("/HD"));
        assert_eq!(a, cache_key(Path::new("/HD")));
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, cache_key(Path::new("/HD2")));
    }

    #[tokio::test]
    async fn second_scan_is_served_from_memory() {
        let lib = library();
        let cache = ScanCache::new(Walker::default());

        let first = cache.get_or_scan(lib.path(), false).await.unwrap();
        let second = cache.get_or_scan(lib.path(), false).await.unwrap();

        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
        let stats = cache.stats();
        assert_eq!(stats.walks, 1);
        assert_eq!(stats.memory_hits, 1);
    }

    #[tokio::test]
    async fn new_files_stay_hidden_until_forced() {
        let lib = library();
        let cache = ScanCache::new(Walker::default());

        let first = cache.get_or_scan(lib.path(), false).await.unwrap();
        assert_eq!(first.episode_count(), 3);

        fs::write(lib.path().join("Breaking Bad/Temporada 1/S01E04.mp4"), b"video").unwrap();

        let cached = cache.get_or_scan(lib.path(), false).await.unwrap();
        assert_eq!(cached.episode_count(), 3);

        let fresh = cache.get_or_scan(lib.path(), true).await.unwrap();
        assert_eq!(fresh.episode_count(), 4);
        assert_eq!(cache.stats().walks, 2);

        // The forced walk replaced the cached record.
        let after = cache.get_or_scan(lib.path(), false).await.unwrap();
        assert_eq!(after.episode_count(), 4);
    }

    #[tokio::test]
    async fn disk_records_survive_a_new_cache() {
        let lib = library();
        let data = tempfile::tempdir().unwrap();

        let first = ScanCache::new(Walker::default()).with_disk_dir(data.path());
        let original = first.get_or_scan(lib.path(), false).await.unwrap();
        assert!(data
            .path()
            .join(format!("{}.json", cache_key(lib.path())))
            .exists());

        let second = ScanCache::new(Walker::default()).with_disk_dir(data.path());
        let restored = second.get_or_scan(lib.path(), false).await.unwrap();
        assert_eq!(restored, original);

        let stats = second.stats();
        assert_eq!(stats.walks, 0);
        assert_eq!(stats.disk_hits, 1);

        // Promoted to memory.
        second.get_or_scan(lib.path(), false).await.unwrap();
        assert_eq!(second.stats().memory_hits, 1);
    }

    #[tokio::test]
    async fn expired_disk_record_triggers_walk() {
        let lib = library();
        let data = tempfile::tempdir().unwrap();
        let key = cache_key(lib.path());
        let stale = CacheEntry {
            path: lib.path().to_string_lossy().into_owned(),
            timestamp: Utc::now() - Duration::hours(25),
            result: ScanResult::default(),
        };
        fs::write(
            data.path().join(format!("{key}.json")),
            serde_json::to_vec(&stale).unwrap(),
        )
        .unwrap();

        let cache = ScanCache::new(Walker::default()).with_disk_dir(data.path());
        let result = cache.get_or_scan(lib.path(), false).await.unwrap();

        assert_eq!(result.episode_count(), 3);
        assert_eq!(cache.stats().walks, 1);
        assert_eq!(cache.stats().disk_hits, 0);
    }

    #[tokio::test]
    async fn corrupt_disk_record_is_a_miss() {
        let lib = library();
        let data = tempfile::tempdir().unwrap();
        let key = cache_key(lib.path());
        fs::write(data.path().join(format!("{key}.json")), b"{not json").unwrap();

        let cache = ScanCache::new(Walker::default()).with_disk_dir(data.path());
        let result = cache.get_or_scan(lib.path(), false).await.unwrap();
        assert_eq!(result.episode_count(), 3);
        assert_eq!(cache.stats().walks, 1);
    }

    #[tokio::test]
    async fn zero_ttl_always_walks() {
        let lib = library();
        let cache = ScanCache::new(Walker::default()).with_ttl(Duration::zero());

        cache.get_or_scan(lib.path(), false).await.unwrap();
        cache.get_or_scan(lib.path(), false).await.unwrap();
        assert_eq!(cache.stats().walks, 2);
    }

    #[tokio::test]
    async fn disk_write_failure_is_not_fatal() {
        let lib = library();
        let data = tempfile::tempdir().unwrap();
        // A regular file where the cache directory should be.
        let blocker = data.path().join("scan-cache");
        fs::write(&blocker, b"").unwrap();

        let cache = ScanCache::new(Walker::default()).with_disk_dir(&blocker);
        let result = cache.get_or_scan(lib.path(), false).await.unwrap();
        assert_eq!(result.episode_count(), 3);

        cache.get_or_scan(lib.path(), false).await.unwrap();
        assert_eq!(cache.stats().walks, 1);
        assert_eq!(cache.stats().memory_hits, 1);
    }

    #[tokio::test]
    async fn missing_root_caches_nothing() {
        let data = tempfile::tempdir().unwrap();
        let cache = ScanCache::new(Walker::default()).with_disk_dir(data.path());
        let missing = data.path().join("missing");

        assert!(cache.get_or_scan(&missing, false).await.is_err());
        assert_eq!(cache.stats().entries, 0);
        assert!(!data.path().join(format!("{}.json", cache_key(&missing))).exists());
    }

    #[tokio::test]
    async fn invalidate_and_clear() {
        let lib = library();
        let data = tempfile::tempdir().unwrap();
        let cache = ScanCache::new(Walker::default()).with_disk_dir(data.path());

        cache.get_or_scan(lib.path(), false).await.unwrap();
        cache.invalidate(lib.path());
        assert_eq!(cache.stats().entries, 0);

        cache.get_or_scan(lib.path(), false).await.unwrap();
        assert_eq!(cache.stats().walks, 2);

        assert_eq!(cache.clear(), 1);
        assert_eq!(cache.stats().entries, 0);
        assert_eq!(cache.clear(), 0);
    }
}
