//! CourseDesk Core
//!
//! Content model and reordering logic for the CourseDesk administrative
//! console: courses made of modules, sections and lessons, and the
//! optimistic reorder workflow that keeps the console responsive while the
//! persistence API catches up.
//!
//! # Architecture
//!
//! - **Pure engines**: reorders are computed synchronously with no I/O
//! - **Optimistic sync**: local tree updated first, persisted after a debounce
//! - **Server truth**: successful persists are reconciled with the server's
//!   answer; failures are reverted by a full refetch
//!
//! # Modules
//!
//! - [`models`] - Course tree (Course, Module, Section, Lesson, ContentItem)
//! - [`operations`] - Reorder engines and lesson display numbering
//! - [`store`] - Persistence trait, REST client, in-memory store
//! - [`sync`] - Optimistic sync controller
//! - [`config`] - Sync configuration

pub mod config;
pub mod models;
pub mod operations;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use config::SyncConfig;
pub use models::*;
pub use store::{ContentStore, HttpContentStore, InMemoryContentStore, StoreError};
pub use sync::{SyncController, SyncError, SyncEvent, SyncState};
