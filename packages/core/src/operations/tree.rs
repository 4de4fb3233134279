//! Applying reorders to a course tree
//!
//! Thin wrappers that look up the target module or section, run a reorder
//! engine over its sorted children, and write the result back. Only the
//! addressed module is touched.

use crate::models::{ContentItem, Course, Lesson, Module};

use super::error::ReorderError;
use super::reorder::{compute_arrow_move, compute_reorder, sort_by_order, ArrowMove, Direction};

fn module_mut<'a>(
    course: &'a mut Course,
    module_id: &str,
) -> Result<&'a mut Module, ReorderError> {
    course
        .module_mut(module_id)
        .ok_or_else(|| ReorderError::module_not_found(module_id))
}

fn section_lessons_mut<'a>(
    course: &'a mut Course,
    module_id: &str,
    section_id: &str,
) -> Result<&'a mut Vec<Lesson>, ReorderError> {
    let module = module_mut(course, module_id)?;
    module
        .section_mut(section_id)
        .map(|section| &mut section.lessons)
        .ok_or_else(|| ReorderError::section_not_found(module_id, section_id))
}

/// Drag-move within a module's flattened content list
///
/// Returns the new content list in display order.
pub fn reorder_module_content(
    course: &mut Course,
    module_id: &str,
    from_index: usize,
    to_index: usize,
) -> Result<Vec<ContentItem>, ReorderError> {
    let module = module_mut(course, module_id)?;
    let reordered = compute_reorder(&module.content_items(), from_index, to_index)?;
    module.apply_content_order(reordered.clone());
    Ok(reordered)
}

/// Drag-move of a lesson within one section
pub fn reorder_section_lessons(
    course: &mut Course,
    module_id: &str,
    section_id: &str,
    from_index: usize,
    to_index: usize,
) -> Result<Vec<Lesson>, ReorderError> {
    let lessons = section_lessons_mut(course, module_id, section_id)?;
    sort_by_order(&mut lessons[..]);
    let reordered = compute_reorder(&lessons[..], from_index, to_index)?;
    *lessons = reordered.clone();
    Ok(reordered)
}

/// Arrow move of a lesson within one section
///
/// A boundary move leaves the tree untouched.
pub fn move_section_lesson(
    course: &mut Course,
    module_id: &str,
    section_id: &str,
    index: usize,
    direction: Direction,
) -> Result<ArrowMove<Lesson>, ReorderError> {
    let lessons = section_lessons_mut(course, module_id, section_id)?;
    let mut sorted = lessons.clone();
    sort_by_order(&mut sorted);

    let outcome = compute_arrow_move(&sorted, index, direction)?;
    if let ArrowMove::Moved(items) = &outcome {
        *lessons = items.clone();
    }
    Ok(outcome)
}
