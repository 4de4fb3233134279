//! Lesson display numbering
//!
//! The console labels lessons "Lesson 1", "Lesson 2", ... across the whole
//! course. The number is derived on demand from the current tree and is not
//! persisted, so reordering one module renumbers the display labels of every
//! later module.

use std::collections::HashMap;

use crate::models::{ContentItem, Course};

use super::reorder::sort_by_order;

/// Map every lesson ID to its 1-based position in course reading order
///
/// Walks modules in course order, each module's flattened content by `order`,
/// and expands sections into their lessons sorted by section-scoped `order`.
pub fn lesson_numbers(course: &Course) -> HashMap<String, usize> {
    let mut numbers = HashMap::new();
    let mut next = 1;

    for module in &course.modules {
        for item in module.content_items() {
            match item {
                ContentItem::Lesson(lesson) => {
                    numbers.insert(lesson.id, next);
                    next += 1;
                }
                ContentItem::Section(section) => {
                    let mut lessons = section.lessons;
                    sort_by_order(&mut lessons);
                    for lesson in lessons {
                        numbers.insert(lesson.id, next);
                        next += 1;
                    }
                }
            }
        }
    }

    numbers
}

/// Display number for a single lesson, if it exists in the course
pub fn lesson_number(course: &Course, lesson_id: &str) -> Option<usize> {
    lesson_numbers(course).get(lesson_id).copied()
}
