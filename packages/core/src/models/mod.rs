//! Data Models
//!
//! This module contains the content tree used throughout CourseDesk:
//!
//! - `Course` - Root of the hierarchy returned by the fetch endpoint
//! - `Module` - Top-level grouping holding sections and direct lessons
//! - `ContentItem` - Tagged union of `Section` and `Lesson`
//!
//! Ordering is expressed through the `order` field and the [`Ordered`] trait.

mod content;
mod course;

pub use content::{ContentItem, ContentKind, Lesson, Ordered, Section, MISSING_ORDER_SENTINEL};
pub use course::{Course, Module, ValidationError};
