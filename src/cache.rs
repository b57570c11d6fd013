//! Disk cache for API responses.
//!
//! One JSON file per cache key. Freshness is the file's modification time
//! measured against a configurable TTL; the entry content itself carries
//! no expiry information.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::transport::PageMeta;

/// Default maximum age of a cache entry: two weeks.
pub const DEFAULT_TTL: Duration = Duration::from_secs(14 * 24 * 3600);

/// On-disk shape of a cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CacheEnvelope {
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

#[derive(Debug)]
struct CacheConfig {
    dir: Option<PathBuf>,
    ttl: Duration,
}

/// Stores API responses as JSON files under a configurable directory.
///
/// Caching is disabled until a directory is set, and a zero TTL disables
/// it as well; disabled means every call reaches the network and nothing
/// is written. Both settings may be changed at any time and apply to
/// subsequent calls. Concurrent writers to the same key are not
/// coordinated: the last write wins.
#[derive(Debug)]
pub struct CacheStore {
    config: RwLock<CacheConfig>,
}

impl CacheStore {
    pub(crate) fn new() -> Self {
        Self {
            config: RwLock::new(CacheConfig {
                dir: None,
                ttl: DEFAULT_TTL,
            }),
        }
    }

    /// The per-user cache location (`~/.cache/tyria` on Linux), if one
    /// can be determined.
    pub fn default_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "tyria").map(|dirs| dirs.cache_dir().to_path_buf())
    }

    /// Set the cache directory, creating it if absent. `None` disables
    /// caching. Fails if the path exists and is not a directory. Already
    /// cached files in a previously configured directory are neither
    /// migrated nor deleted.
    pub fn set_dir(&self, dir: Option<&Path>) -> Result<()> {
        let dir = match dir {
            Some(dir) => dir,
            None => {
                self.config.write().dir = None;
                return Ok(());
            }
        };
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        } else if !dir.is_dir() {
            return Err(Error::CacheDir(dir.to_path_buf()));
        }
        self.config.write().dir = Some(dir.to_path_buf());
        Ok(())
    }

    /// Set the maximum entry age. A zero duration disables caching.
    pub fn set_ttl(&self, ttl: Duration) {
        self.config.write().ttl = ttl;
    }

    pub fn dir(&self) -> Option<PathBuf> {
        self.config.read().dir.clone()
    }

    pub fn ttl(&self) -> Duration {
        self.config.read().ttl
    }

    /// Whether reads and writes are currently enabled.
    pub fn enabled(&self) -> bool {
        let config = self.config.read();
        config.dir.is_some() && !config.ttl.is_zero()
    }

    /// Freshness probe: true iff caching is enabled, an entry for `key`
    /// exists and it is younger than the TTL. Never touches the network
    /// and never fails on a missing entry.
    pub fn is_fresh(&self, key: &str) -> bool {
        let Some((path, ttl)) = self.entry(key) else {
            return false;
        };
        match fs::metadata(&path).and_then(|meta| meta.modified()) {
            Ok(mtime) => SystemTime::now()
                .duration_since(mtime)
                .map(|age| age < ttl)
                .unwrap_or(true),
            Err(_) => false,
        }
    }

    /// Read a fresh entry. A missing, stale, corrupt or partially written
    /// file is a miss.
    pub(crate) fn read(&self, key: &str) -> Option<CacheEnvelope> {
        if !self.is_fresh(key) {
            return None;
        }
        let (path, _) = self.entry(key)?;
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(envelope) => {
                debug!(key, "cache hit");
                Some(envelope)
            }
            Err(err) => {
                warn!(key, %err, "ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Persist an entry, overwriting any previous one for the same key.
    /// Write failures are logged and swallowed.
    pub(crate) fn write(&self, key: &str, envelope: &CacheEnvelope) {
        let Some((path, _)) = self.entry(key) else {
            return;
        };
        match serde_json::to_string(envelope) {
            Ok(json) => {
                if let Err(err) = fs::write(&path, json) {
                    warn!(key, %err, "failed to write cache entry");
                }
            }
            Err(err) => warn!(key, %err, "failed to serialize cache entry"),
        }
    }

    /// File and TTL for `key`, or `None` while caching is disabled.
    fn entry(&self, key: &str) -> Option<(PathBuf, Duration)> {
        let config = self.config.read();
        if config.ttl.is_zero() {
            return None;
        }
        config
            .dir
            .as_ref()
            .map(|dir| (dir.join(file_name(key)), config.ttl))
    }
}

/// Keys may contain path segments (`wvw/objectives`) and ids with odd
/// characters; flatten them to a single safe file name.
fn file_name(key: &str) -> String {
    let safe: String = key
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | ' ' => '_',
            c => c,
        })
        .collect();
    format!("{safe}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_with_dir() -> (CacheStore, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let store = CacheStore::new();
        store.set_dir(Some(dir.path())).expect("set_dir");
        store.set_ttl(Duration::from_secs(3600));
        (store, dir)
    }

    fn envelope(data: Value) -> CacheEnvelope {
        CacheEnvelope { data, meta: None }
    }

    #[test]
    fn disabled_without_directory() {
        let store = CacheStore::new();
        assert!(!store.enabled());
        assert!(!store.is_fresh("items"));
        store.write("items", &envelope(json!([1, 2])));
        assert!(store.read("items").is_none());
    }

    #[test]
    fn zero_ttl_disables_reads_and_writes() {
        let (store, dir) = store_with_dir();
        store.write("items", &envelope(json!([1])));
        assert!(store.is_fresh("items"));

        store.set_ttl(Duration::ZERO);
        assert!(!store.enabled());
        assert!(!store.is_fresh("items"));
        assert!(store.read("items").is_none());
        store.write("other", &envelope(json!([2])));
        assert!(!dir.path().join("other.json").exists());
    }

    #[test]
    fn write_then_read_roundtrip() {
        let (store, dir) = store_with_dir();
        store.write("quaggans", &envelope(json!(["404", "aloha"])));
        assert!(dir.path().join("quaggans.json").exists());

        let entry = store.read("quaggans").expect("fresh entry");
        assert_eq!(entry.data, json!(["404", "aloha"]));
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let (store, dir) = store_with_dir();
        store.write("items", &envelope(json!([1])));
        fs::write(dir.path().join("items.json"), "{\"data\": [1").expect("truncate");

        assert!(store.is_fresh("items"));
        assert!(store.read("items").is_none());
    }

    #[test]
    fn stale_entry_is_not_fresh() {
        let (store, _dir) = store_with_dir();
        store.write("items", &envelope(json!([1])));
        store.set_ttl(Duration::from_nanos(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(!store.is_fresh("items"));
    }

    #[test]
    fn overwrite_replaces_content() {
        let (store, _dir) = store_with_dir();
        store.write("items", &envelope(json!([1])));
        store.write("items", &envelope(json!([2])));
        assert_eq!(store.read("items").expect("entry").data, json!([2]));
    }

    #[test]
    fn keys_with_separators_become_flat_files() {
        let (store, dir) = store_with_dir();
        store.write("wvw/objectives.en.all", &envelope(json!([])));
        assert!(dir.path().join("wvw_objectives.en.all.json").exists());
    }

    #[test]
    fn set_dir_rejects_files() {
        let dir = TempDir::new().expect("temp dir");
        let file = dir.path().join("occupied");
        fs::write(&file, "x").expect("write file");

        let store = CacheStore::new();
        match store.set_dir(Some(&file)) {
            Err(Error::CacheDir(path)) => assert_eq!(path, file),
            other => panic!("expected CacheDir error, got {other:?}"),
        }
    }

    #[test]
    fn set_dir_creates_missing_directories() {
        let dir = TempDir::new().expect("temp dir");
        let nested = dir.path().join("a").join("b");
        let store = CacheStore::new();
        store.set_dir(Some(&nested)).expect("set_dir");
        assert!(nested.is_dir());
    }
}
