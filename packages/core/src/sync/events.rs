//! Sync events and per-module state
//!
//! The controller broadcasts a [`SyncEvent`] on every transition so views can
//! refresh parents, show a saving indicator, or flash a "reverted" notice.
//! Subscribers receive events through a tokio broadcast channel.

use crate::models::Course;

/// Lifecycle of a module's local order relative to the server
///
/// ```text
/// Idle -> LocalApplied -> Persisting -> Synced -> Idle
///                                    \-> Reverting -> Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Local tree matches the last server answer
    #[default]
    Idle,

    /// A reorder was applied locally and a debounced persist is pending
    LocalApplied,

    /// The ordered list is on its way to the server
    Persisting,

    /// The server accepted the order and its answer replaced the local copy
    Synced,

    /// Persisting failed; the hierarchy is being refetched
    Reverting,
}

/// Events emitted by [`SyncController`](super::SyncController)
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A reorder was applied to the local tree
    LocalApplied { module_id: String },

    /// The debounce timer fired (or an arrow move started) and a request was sent
    Persisting { module_id: String },

    /// The server accepted the order; `course` is its canonical answer
    Synced { module_id: String, course: Course },

    /// The server rejected the order or could not be reached
    PersistFailed { module_id: String, error: String },

    /// Local optimistic state was replaced by a fresh fetch
    Reverted { module_id: String },

    /// The fetch issued to revert failed too; local state is unchanged
    RefetchFailed { module_id: String, error: String },
}

impl SyncEvent {
    /// Module the event refers to
    pub fn module_id(&self) -> &str {
        match self {
            SyncEvent::LocalApplied { module_id }
            | SyncEvent::Persisting { module_id }
            | SyncEvent::Synced { module_id, .. }
            | SyncEvent::PersistFailed { module_id, .. }
            | SyncEvent::Reverted { module_id }
            | SyncEvent::RefetchFailed { module_id, .. } => module_id,
        }
    }

    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            SyncEvent::LocalApplied { .. } => "reorder:local-applied",
            SyncEvent::Persisting { .. } => "reorder:persisting",
            SyncEvent::Synced { .. } => "reorder:synced",
            SyncEvent::PersistFailed { .. } => "reorder:persist-failed",
            SyncEvent::Reverted { .. } => "reorder:reverted",
            SyncEvent::RefetchFailed { .. } => "reorder:refetch-failed",
        }
    }
}
