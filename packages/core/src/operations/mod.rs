//! Content Reordering Operations
//!
//! Pure, synchronous reorder logic. Nothing in this module performs I/O; the
//! [`sync`](crate::sync) controller calls into it to apply a user action to
//! the local tree before persisting.
//!
//! # Engines
//!
//! - [`compute_reorder`] - drag and drop move (remove + reinsert)
//! - [`compute_arrow_move`] - arrow button swap with a neighbour
//!
//! Both renumber their output to `1..=N`.

mod error;
mod numbering;
mod reorder;
mod tree;

pub use error::ReorderError;
pub use numbering::{lesson_number, lesson_numbers};
pub use reorder::{
    compute_arrow_move, compute_reorder, renumber, sort_by_order, ArrowMove, Direction,
};
pub use tree::{move_section_lesson, reorder_module_content, reorder_section_lessons};
