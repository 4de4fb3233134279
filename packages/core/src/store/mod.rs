//! Remote Persistence
//!
//! The console treats persistence as an external collaborator reached over
//! three endpoints: fetch the full course hierarchy, persist a module's
//! content order, and persist a section's lesson order. Both persist calls
//! answer with the canonical updated hierarchy.
//!
//! [`ContentStore`] abstracts those endpoints so the sync controller can run
//! against the REST API ([`HttpContentStore`]) or an in-process authoritative
//! store ([`InMemoryContentStore`]) used by the reference server and tests.

mod error;
mod http;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{ContentItem, Course, Lesson};

pub use error::StoreError;
pub use http::HttpContentStore;
pub use memory::InMemoryContentStore;

/// Body of the module content-order endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderContentRequest {
    pub ordered_items: Vec<ContentItem>,
}

/// Body of the section lesson-order endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderLessonsRequest {
    pub lessons: Vec<Lesson>,
}

/// Persistence endpoints the sync controller depends on
///
/// Implementations must treat identical resubmissions as no-ops: persisting
/// an order that is already stored must not duplicate or reorder items.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the canonical course hierarchy
    async fn fetch_course(&self, course_id: &str) -> Result<Course, StoreError>;

    /// Persist the full ordered content list of one module
    async fn persist_module_order(
        &self,
        course_id: &str,
        module_id: &str,
        request: &ReorderContentRequest,
    ) -> Result<Course, StoreError>;

    /// Persist the full ordered lesson list of one section
    async fn persist_section_lessons(
        &self,
        course_id: &str,
        module_id: &str,
        section_id: &str,
        request: &ReorderLessonsRequest,
    ) -> Result<Course, StoreError>;
}
