//! In-memory bank cache keyed by path and modification time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use drillbook_core::classify::Classifier;
use drillbook_core::model::QuestionBank;

use crate::loader::load_bank;

struct CachedBank {
    modified: SystemTime,
    bank: Arc<QuestionBank>,
}

/// Caches loaded banks until their file changes on disk.
pub struct BankCache {
    classifier: Classifier,
    entries: HashMap<PathBuf, CachedBank>,
}

impl BankCache {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            entries: HashMap::new(),
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Return the cached bank for `path`, reloading it if the file's
    /// modification time differs from the cached one.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<QuestionBank>> {
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .with_context(|| format!("failed to stat {}", path.display()))?;

        if let Some(cached) = self.entries.get(path) {
            if cached.modified == modified {
                return Ok(Arc::clone(&cached.bank));
            }
            tracing::debug!("{} changed on disk, reloading", path.display());
        }

        let bank = Arc::new(load_bank(path, &self.classifier)?);
        self.entries.insert(
            path.to_path_buf(),
            CachedBank {
                modified,
                bank: Arc::clone(&bank),
            },
        );
        Ok(bank)
    }

    /// Drop the cached entry for `path`. Returns `true` if one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const ONE: &str = "[[questions]]\nquestion = \"1 + 1 = ____\"\nanswer = \"2\"\n";
    const TWO: &str = "[[questions]]\nquestion = \"1 + 1 = ____\"\nanswer = \"2\"\n\n\
                       [[questions]]\nquestion = \"2 + 2 = ____\"\nanswer = \"4\"\n";

    #[test]
    fn reuses_unchanged_bank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("math.toml");
        std::fs::write(&path, ONE).unwrap();

        let mut cache = BankCache::new(Classifier::default());
        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn reloads_after_modification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("math.toml");
        std::fs::write(&path, ONE).unwrap();

        let mut cache = BankCache::new(Classifier::default());
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 1);

        std::fs::write(&path, TWO).unwrap();
        let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();
        drop(file);

        assert_eq!(cache.get_or_load(&path).unwrap().len(), 2);
    }

    #[test]
    fn invalidate_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("math.toml");
        std::fs::write(&path, ONE).unwrap();

        let mut cache = BankCache::new(Classifier::default());
        let first = cache.get_or_load(&path).unwrap();
        assert!(cache.invalidate(&path));
        assert!(!cache.invalidate(&path));
        let second = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_file() {
        let mut cache = BankCache::new(Classifier::default());
        assert!(cache.get_or_load(Path::new("/nonexistent/bank.toml")).is_err());
        assert!(cache.is_empty());
    }
}
