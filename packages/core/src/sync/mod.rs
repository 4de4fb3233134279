//! Optimistic Synchronization
//!
//! - [`SyncController`] - owns the local tree, debounces and persists reorders
//! - [`SyncEvent`] / [`SyncState`] - observable lifecycle of each module
//! - [`SyncError`] - errors returned to callers

mod controller;
mod error;
mod events;

pub use controller::SyncController;
pub use error::SyncError;
pub use events::{SyncEvent, SyncState};
