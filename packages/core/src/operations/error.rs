//! Error types for the reorder engines
//!
//! Index errors are programming errors: the console only ever passes indices
//! of rows it rendered. They are still reported instead of panicking so a
//! stale UI event can never index out of bounds.

use thiserror::Error;

/// Errors that can occur while computing or applying a reorder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// Index outside the current item count
    #[error("Invalid index {index} for list of {len} item(s)")]
    InvalidIndex { index: usize, len: usize },

    /// Referenced module does not exist in the local tree
    #[error("Module '{module_id}' does not exist")]
    ModuleNotFound { module_id: String },

    /// Referenced section does not exist in the given module
    #[error("Section '{section_id}' does not exist in module '{module_id}'")]
    SectionNotFound {
        module_id: String,
        section_id: String,
    },
}

impl ReorderError {
    /// Create an InvalidIndex error
    pub fn invalid_index(index: usize, len: usize) -> Self {
        Self::InvalidIndex { index, len }
    }

    /// Create a ModuleNotFound error
    pub fn module_not_found(module_id: impl Into<String>) -> Self {
        Self::ModuleNotFound {
            module_id: module_id.into(),
        }
    }

    /// Create a SectionNotFound error
    pub fn section_not_found(module_id: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self::SectionNotFound {
            module_id: module_id.into(),
            section_id: section_id.into(),
        }
    }
}
