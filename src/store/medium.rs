//! Persistent key-value medium
//!
//! The record store is backed by a durable key-value medium addressed by
//! collection name, holding one serialized blob per key. Two backends are
//! provided:
//!
//! - `FileMedium`: one JSON file per key under a data directory. Writes go
//!   through a temp file plus rename so a failed save never leaves a
//!   partially-written blob behind.
//! - `MemoryMedium`: in-process map, used by tests and benchmarks.

use crate::store::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// A durable key-value medium: `load` returns the blob for a key (or None
/// if the key was never saved), `save` replaces it wholesale.
#[async_trait]
pub trait KeyValueMedium: Send + Sync {
    async fn load(&self, key: &str) -> StoreResult<Option<String>>;
    async fn save(&self, key: &str, blob: &str) -> StoreResult<()>;
}

/// File-backed medium: each key is a `<key>.json` file under `dir`
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    /// Open a file medium rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueMedium for FileMedium {
    async fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Unavailable(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn save(&self, key: &str, blob: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        // Temp file then atomic rename: readers never observe a half-write
        tokio::fs::write(&tmp, blob)
            .await
            .map_err(|e| StoreError::Unavailable(format!("write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Unavailable(format!("rename {}: {e}", path.display())))?;

        tracing::debug!(key, bytes = blob.len(), "collection saved");
        Ok(())
    }
}

/// In-memory medium for tests and benchmarks
#[derive(Default)]
pub struct MemoryMedium {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueMedium for MemoryMedium {
    async fn load(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.map.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, blob: &str) -> StoreResult<()> {
        self.map
            .write()
            .await
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_medium_round_trip() {
        let dir = tempdir().unwrap();
        let medium = FileMedium::open(dir.path()).unwrap();

        assert_eq!(medium.load("locs").await.unwrap(), None);

        medium.save("locs", "[1,2,3]").await.unwrap();
        assert_eq!(medium.load("locs").await.unwrap().as_deref(), Some("[1,2,3]"));

        // Overwrite replaces wholesale
        medium.save("locs", "[]").await.unwrap();
        assert_eq!(medium.load("locs").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_file_medium_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let medium = FileMedium::open(dir.path()).unwrap();
        medium.save("locs", "[]").await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["locs.json".to_string()]);
    }

    #[tokio::test]
    async fn test_memory_medium() {
        let medium = MemoryMedium::new();
        assert_eq!(medium.load("k").await.unwrap(), None);
        medium.save("k", "v").await.unwrap();
        assert_eq!(medium.load("k").await.unwrap().as_deref(), Some("v"));
    }
}
