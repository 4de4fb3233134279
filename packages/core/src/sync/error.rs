//! Sync controller error types

use thiserror::Error;

use crate::operations::ReorderError;
use crate::store::StoreError;

/// Errors surfaced to callers of the sync controller
///
/// Persistence failures during a debounced or arrow persist are not
/// reported here: they are recovered by refetching and announced through
/// [`SyncEvent`](super::SyncEvent)s.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The requested reorder is invalid for the local tree
    #[error("Reorder rejected: {0}")]
    Reorder(#[from] ReorderError),

    /// Sync configuration failed validation
    #[error("Invalid sync configuration: {0}")]
    Config(String),

    /// Fetching the hierarchy failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
