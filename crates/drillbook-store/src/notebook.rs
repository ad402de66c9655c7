//! Saved wrong-question notebooks.

use anyhow::Result;
use drillbook_core::notebook::WrongNotebook;

use crate::blob::BlobStore;

const KIND: &str = "notebook";

/// Persists one wrong-question notebook per bank.
#[derive(Debug, Clone)]
pub struct NotebookStore {
    blobs: BlobStore,
}

impl NotebookStore {
    pub fn new(blobs: BlobStore) -> Self {
        Self { blobs }
    }

    /// Load a bank's notebook, or an empty one if none was saved.
    pub fn load(&self, bank_id: &str) -> Result<WrongNotebook> {
        Ok(self
            .blobs
            .load(KIND, bank_id)?
            .unwrap_or_else(|| WrongNotebook::new(bank_id)))
    }

    pub fn save(&self, notebook: &WrongNotebook) -> Result<()> {
        self.blobs.save(KIND, &notebook.bank_id, notebook)?;
        Ok(())
    }

    /// Delete a bank's notebook. Returns `true` if one existed.
    pub fn clear(&self, bank_id: &str) -> Result<bool> {
        self.blobs.remove(KIND, bank_id)
    }
}
