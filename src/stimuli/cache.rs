//! JSON-backed cache with an explicit miss path.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Whether a value came from disk or was rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// A single JSON file holding one persisted value.
#[derive(Debug, Clone)]
pub struct JsonCache<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCache<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached value.
    ///
    /// A missing file is a miss. So is a file that does not parse; it is
    /// logged and left for the next `store` to overwrite.
    pub fn lookup(&self) -> Result<Option<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "cache miss");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(value) => {
                debug!(path = %self.path.display(), "cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                warn!(path = %self.path.display(), "ignoring malformed cache file: {e}");
                Ok(None)
            }
        }
    }

    /// Persist `value`, replacing any previous file.
    ///
    /// Written to a sibling temp file first and renamed into place.
    pub fn store(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string(value)
            .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), "cache stored");
        Ok(())
    }

    /// Return the cached value, or build and persist it.
    pub fn load_or_build<F>(&self, build: F) -> Result<(T, CacheStatus)>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.lookup()? {
            return Ok((value, CacheStatus::Hit));
        }
        let value = build()?;
        self.store(&value)?;
        Ok((value, CacheStatus::Miss))
    }

    /// Remove the cache file if present.
    pub fn invalidate(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    #[test]
    fn test_lookup_missing_file_is_miss() {
        let dir = TempDir::new().unwrap();
        let cache: JsonCache<Vec<u32>> = JsonCache::new(dir.path().join("absent.json"));
        assert!(cache.lookup().unwrap().is_none());
    }

    #[test]
    fn test_store_then_lookup() {
        let dir = TempDir::new().unwrap();
        let cache = JsonCache::new(dir.path().join("values.json"));
        cache.store(&vec![3u32, 1, 2]).unwrap();
        assert_eq!(cache.lookup().unwrap(), Some(vec![3, 1, 2]));
        assert!(!dir.path().join("values.json.tmp").exists());
    }

    #[test]
    fn test_store_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let cache = JsonCache::new(dir.path().join("nested/deeper/values.json"));
        cache.store(&vec![1u8]).unwrap();
        assert!(cache.path().exists());
    }

    #[test]
    fn test_malformed_file_is_miss() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let cache: JsonCache<Vec<u32>> = JsonCache::new(&path);
        assert!(cache.lookup().unwrap().is_none());
    }

    #[test]
    fn test_load_or_build_only_builds_once() {
        let dir = TempDir::new().unwrap();
        let cache = JsonCache::new(dir.path().join("built.json"));

        let (value, status) = cache.load_or_build(|| Ok(vec![7u32])).unwrap();
        assert_eq!(value, vec![7]);
        assert_eq!(status, CacheStatus::Miss);

        let (value, status) = cache
            .load_or_build(|| panic!("cache hit must not rebuild"))
            .unwrap();
        assert_eq!(value, vec![7]);
        assert_eq!(status, CacheStatus::Hit);
    }

    #[test]
    fn test_build_error_does_not_write() {
        let dir = TempDir::new().unwrap();
        let cache: JsonCache<Vec<u32>> = JsonCache::new(dir.path().join("never.json"));
        let result = cache.load_or_build(|| Err(Error::UnknownStimulus("a".into())));
        assert!(result.is_err());
        assert!(!cache.path().exists());
    }

    #[test]
    fn test_map_order_survives_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = JsonCache::new(dir.path().join("ordered.json"));
        let mut map = IndexMap::new();
        map.insert("zebra".to_string(), 1u32);
        map.insert("apple".to_string(), 2);
        map.insert("mango".to_string(), 3);
        cache.store(&map).unwrap();

        let loaded: IndexMap<String, u32> = cache.lookup().unwrap().unwrap();
        let keys: Vec<&str> = loaded.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let cache = JsonCache::new(dir.path().join("gone.json"));
        cache.store(&vec![1u8]).unwrap();
        cache.invalidate().unwrap();
        cache.invalidate().unwrap();
        assert!(!cache.path().exists());
    }
}
