//! Saved practice sessions.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use drillbook_core::session::SessionState;
use serde::{Deserialize, Serialize};

use crate::blob::BlobStore;

const KIND: &str = "progress";

/// Days after which saved progress is ignored.
pub const DEFAULT_EXPIRY_DAYS: i64 = 30;

/// A session as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedProgress {
    pub bank_id: String,
    pub saved_at: DateTime<Utc>,
    pub session: SessionState,
}

/// Persists one resumable session per bank.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    blobs: BlobStore,
    expiry: Duration,
}

impl ProgressStore {
    pub fn new(blobs: BlobStore) -> Self {
        Self {
            blobs,
            expiry: Duration::days(DEFAULT_EXPIRY_DAYS),
        }
    }

    pub fn with_expiry_days(mut self, days: i64) -> Self {
        self.expiry = Duration::days(days.max(0));
        self
    }

    pub fn save(&self, session: &SessionState, now: DateTime<Utc>) -> Result<()> {
        let saved = SavedProgress {
            bank_id: session.bank_id.clone(),
            saved_at: now,
            session: session.clone(),
        };
        self.blobs.save(KIND, &session.bank_id, &saved)?;
        Ok(())
    }

    /// Load the saved session of a bank.
    ///
    /// Returns `None` when nothing was saved, when the save is older than
    /// the expiry, or when the file cannot be read back.
    pub fn load(&self, bank_id: &str, now: DateTime<Utc>) -> Result<Option<SessionState>> {
        let saved: SavedProgress = match self.blobs.load(KIND, bank_id) {
            Ok(Some(saved)) => saved,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!("ignoring unreadable progress for '{bank_id}': {e:#}");
                return Ok(None);
            }
        };

        // Whole days, so a save exactly at the boundary still counts.
        if (now - saved.saved_at).num_days() > self.expiry.num_days() {
            tracing::debug!(
                "progress for '{bank_id}' saved {} expired",
                saved.saved_at.to_rfc3339()
            );
            return Ok(None);
        }
        if saved.bank_id != bank_id {
            tracing::warn!(
                "progress file for '{bank_id}' belongs to '{}', ignoring",
                saved.bank_id
            );
            return Ok(None);
        }
        Ok(Some(saved.session))
    }

    /// Delete the saved session. Returns `true` if one existed.
    pub fn clear(&self, bank_id: &str) -> Result<bool> {
        self.blobs.remove(KIND, bank_id)
    }
}
