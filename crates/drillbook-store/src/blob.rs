//! JSON blob storage keyed by bank id.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex characters of the digest kept in file names.
const KEY_LEN: usize = 16;

/// Content-derived storage key for a bank id.
///
/// Bank ids are file stems and may contain characters that are unsafe in
/// file names; the key is a truncated SHA-256 hex digest instead.
pub fn store_key(bank_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bank_id.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..KEY_LEN].to_string()
}

/// Stores one JSON document per `(kind, bank id)` under a root directory.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the blob, e.g. `<root>/progress/progress_<key>.json`.
    pub fn path_for(&self, kind: &str, bank_id: &str) -> PathBuf {
        self.root
            .join(kind)
            .join(format!("{kind}_{}.json", store_key(bank_id)))
    }

    /// Write a blob. The file is replaced atomically via a temporary file
    /// and rename.
    pub fn save<T: Serialize>(&self, kind: &str, bank_id: &str, value: &T) -> Result<PathBuf> {
        let path = self.path_for(kind, bank_id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("failed to serialize {kind} for '{bank_id}'"))?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)
            .with_context(|| format!("failed to write {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;

        tracing::debug!("saved {kind} for '{bank_id}' to {}", path.display());
        Ok(path)
    }

    /// Read a blob, or `None` if it was never written.
    pub fn load<T: DeserializeOwned>(&self, kind: &str, bank_id: &str) -> Result<Option<T>> {
        let path = self.path_for(kind, bank_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Some(value))
    }

    /// Delete a blob. Returns `true` if one existed.
    pub fn remove(&self, kind: &str, bank_id: &str) -> Result<bool> {
        let path = self.path_for(kind, bank_id);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn key_is_stable_and_file_safe() {
        let key = store_key("期末考试/第一章");
        assert_eq!(key.len(), KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, store_key("期末考试/第一章"));
        assert_ne!(key, store_key("期末考试/第二章"));
    }

    #[test]
    fn known_digest_prefix() {
        // sha256("abc")
        assert_eq!(store_key("abc"), "ba7816bf8f01cfea");
    }

    #[test]
    fn save_load_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path());
        let mut value = BTreeMap::new();
        value.insert("answered".to_string(), 3u32);

        assert_eq!(
            store.load::<BTreeMap<String, u32>>("progress", "geo").unwrap(),
            None
        );

        let path = store.save("progress", "geo", &value).unwrap();
        assert!(path.starts_with(dir.path().join("progress")));
        assert!(!path.with_extension("json.tmp").exists());

        let loaded: Option<BTreeMap<String, u32>> = store.load("progress", "geo").unwrap();
        assert_eq!(loaded, Some(value));

        assert!(store.remove("progress", "geo").unwrap());
        assert!(!store.remove("progress", "geo").unwrap());
    }

    #[test]
    fn kinds_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path());
        store.save("progress", "geo", &1u32).unwrap();
        store.save("notebook", "geo", &2u32).unwrap();
        assert_eq!(store.load::<u32>("progress", "geo").unwrap(), Some(1));
        assert_eq!(store.load::<u32>("notebook", "geo").unwrap(), Some(2));
    }

    #[test]
    fn corrupt_blob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path());
        let path = store.path_for("notebook", "geo");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();
        assert!(store.load::<u32>("notebook", "geo").is_err());
    }
}
