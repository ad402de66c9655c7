//! drillbook-store: on-disk progress and wrong-question notebooks.
//!
//! Every bank gets at most one progress file and one notebook file, named
//! after a digest of the bank id.

pub mod blob;
pub mod notebook;
pub mod progress;

pub use blob::{store_key, BlobStore};
pub use notebook::NotebookStore;
pub use progress::{ProgressStore, SavedProgress, DEFAULT_EXPIRY_DAYS};
