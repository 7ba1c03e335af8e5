use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{Chunk, Index};
use crate::search::error::{Result, SearchError};

/// Bumped whenever the on-disk layout changes.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Deserialize)]
struct CacheHeader {
    version: u32,
    fingerprint: String,
}

#[derive(Serialize)]
struct CacheFileRef<'a> {
    version: u32,
    fingerprint: &'a str,
    indexed_at: DateTime<Utc>,
    chunks: &'a [Chunk],
    embeddings: &'a [Vec<f32>],
}

#[derive(Deserialize)]
struct CacheFile {
    #[allow(dead_code)]
    version: u32,
    #[allow(dead_code)]
    fingerprint: String,
    indexed_at: DateTime<Utc>,
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
}

/// An index restored from disk.
#[derive(Debug, Clone)]
pub struct CachedIndex {
    pub index: Index,
    pub indexed_at: DateTime<Utc>,
}

/// Single-file binary snapshot of an [`Index`].
///
/// The fingerprint identifies the settings the index was built with; a cache
/// written under a different fingerprint is treated as absent.
pub struct IndexCache {
    path: PathBuf,
    fingerprint: String,
}

impl IndexCache {
    pub fn new(path: PathBuf, fingerprint: String) -> Self {
        Self { path, fingerprint }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn size_bytes(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// Load the cache if it is present and consistent. Anything unusable is
    /// logged and reported as `None` so the caller rebuilds.
    pub fn load(&self) -> Option<CachedIndex> {
        match self.try_load() {
            Ok(cached) => cached,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring unusable index cache"
                );
                None
            }
        }
    }

    fn try_load(&self) -> Result<Option<CachedIndex>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path)?;

        let header: CacheHeader = bincode::deserialize(&bytes)?;
        if header.version != CACHE_SCHEMA_VERSION {
            return Err(SearchError::Cache(format!(
                "schema version {} (expected {})",
                header.version, CACHE_SCHEMA_VERSION
            )));
        }
        if header.fingerprint != self.fingerprint {
            return Err(SearchError::Cache(
                "built with different indexing settings".to_string(),
            ));
        }

        let file: CacheFile = bincode::deserialize(&bytes)?;

        let index = Index::new(file.chunks, file.embeddings)?;
        debug!(chunks = index.len(), path = %self.path.display(), "loaded index cache");

        Ok(Some(CachedIndex {
            index,
            indexed_at: file.indexed_at,
        }))
    }

    /// Replace the cache with `index`. The write goes to a sibling temp file
    /// first so a crash never leaves a half-written cache behind.
    pub fn save(&self, index: &Index) -> Result<DateTime<Utc>> {
        let indexed_at = Utc::now();
        let file = CacheFileRef {
            version: CACHE_SCHEMA_VERSION,
            fingerprint: &self.fingerprint,
            indexed_at,
            chunks: index.chunks(),
            embeddings: index.embeddings(),
        };
        let bytes = bincode::serialize(&file)?;
        self.atomic_write(&bytes)?;

        debug!(
            chunks = index.len(),
            bytes = bytes.len(),
            path = %self.path.display(),
            "wrote index cache"
        );
        Ok(indexed_at)
    }

    fn atomic_write(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, bytes)?;
        fs::rename(temp_path, &self.path)?;

        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Short, stable digest of the settings that shape an index.
pub fn fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_index() -> Index {
        Index::new(
            vec![
                Chunk::new("Stats101", Some(3), "variance measures spread"),
                Chunk::new("Stats101", None, "the p-value test"),
                Chunk::new("ML", Some(10), "overfitting in models"),
            ],
            vec![
                vec![1.0, 0.0, 0.5],
                vec![0.0, 1.0, 0.25],
                vec![0.5, 0.5, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = IndexCache::new(dir.path().join("cache.bin"), "fp".to_string());
        let index = sample_index();

        let written_at = cache.save(&index).unwrap();
        assert!(cache.exists());
        assert!(cache.size_bytes() > 0);

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.index, index);
        assert_eq!(loaded.indexed_at, written_at);
    }

    #[test]
    fn test_save_creates_parent_dirs_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cache.bin");
        let cache = IndexCache::new(path.clone(), "fp".to_string());

        cache.save(&sample_index()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let cache = IndexCache::new(dir.path().join("absent.bin"), "fp".to_string());
        assert!(cache.load().is_none());
        assert_eq!(cache.size_bytes(), 0);
    }

    #[test]
    fn test_corrupt_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");
        fs::write(&path, b"definitely not bincode").unwrap();

        let cache = IndexCache::new(path, "fp".to_string());
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_truncated_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");
        let cache = IndexCache::new(path.clone(), "fp".to_string());
        cache.save(&sample_index()).unwrap();

        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_fingerprint_mismatch_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");
        IndexCache::new(path.clone(), "old-settings".to_string())
            .save(&sample_index())
            .unwrap();

        let cache = IndexCache::new(path, "new-settings".to_string());
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_schema_version_mismatch_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");
        let index = sample_index();
        let file = CacheFileRef {
            version: CACHE_SCHEMA_VERSION + 1,
            fingerprint: "fp",
            indexed_at: Utc::now(),
            chunks: index.chunks(),
            embeddings: index.embeddings(),
        };
        fs::write(&path, bincode::serialize(&file).unwrap()).unwrap();

        assert!(IndexCache::new(path, "fp".to_string()).load().is_none());
    }

    #[test]
    fn test_row_count_mismatch_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.bin");
        let chunks = vec![
            Chunk::new("a", None, "one"),
            Chunk::new("a", None, "two"),
        ];
        let embeddings = vec![vec![1.0, 0.0]];
        let file = CacheFileRef {
            version: CACHE_SCHEMA_VERSION,
            fingerprint: "fp",
            indexed_at: Utc::now(),
            chunks: &chunks,
            embeddings: &embeddings,
        };
        fs::write(&path, bincode::serialize(&file).unwrap()).unwrap();

        assert!(IndexCache::new(path, "fp".to_string()).load().is_none());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let cache = IndexCache::new(dir.path().join("cache.bin"), "fp".to_string());
        cache.save(&sample_index()).unwrap();

        cache.clear().unwrap();
        assert!(!cache.exists());
        cache.clear().unwrap();
    }

    #[test]
    fn test_fingerprint() {
        let a = fingerprint(&["all-minilm", "400", "50"]);
        let b = fingerprint(&["all-minilm", "400", "50"]);
        let c = fingerprint(&["all-minilm", "40", "050"]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }
}
