//! In-process authoritative content store
//!
//! Applies submitted orders the way the persistence API does: only `id`,
//! `kind` and position are taken from the client; titles, metadata and a
//! section's own lessons stay as stored. Submissions are sorted by their
//! `order` and renumbered, so resubmitting a fetched hierarchy is a no-op.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{ContentItem, ContentKind, Course, Lesson, Module};
use crate::operations::{renumber, sort_by_order};

use super::{ContentStore, ReorderContentRequest, ReorderLessonsRequest, StoreError};

/// Thread-safe map of courses keyed by course ID
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    courses: RwLock<HashMap<String, Course>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from seed courses, validating each one
    pub fn with_courses(courses: Vec<Course>) -> Result<Self, StoreError> {
        let store = Self::new();
        for course in courses {
            store.insert_course(course)?;
        }
        Ok(store)
    }

    /// Insert or replace a course after validating it
    pub fn insert_course(&self, course: Course) -> Result<(), StoreError> {
        course.validate()?;
        self.courses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(course.id.clone(), course);
        Ok(())
    }

    /// IDs of every stored course, sorted
    pub fn course_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .courses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    fn update_course<F>(&self, course_id: &str, apply: F) -> Result<Course, StoreError>
    where
        F: FnOnce(&mut Course) -> Result<(), StoreError>,
    {
        let mut courses = self.courses.write().unwrap_or_else(PoisonError::into_inner);
        let stored = courses
            .get_mut(course_id)
            .ok_or_else(|| StoreError::not_found(format!("course '{}'", course_id)))?;

        // Work on a copy so a rejected submission leaves the store untouched
        let mut updated = stored.clone();
        apply(&mut updated)?;
        updated.updated_at = Some(Utc::now());
        *stored = updated.clone();

        Ok(updated)
    }
}

fn find_module<'a>(
    course: &'a mut Course,
    module_id: &str,
) -> Result<&'a mut Module, StoreError> {
    course
        .module_mut(module_id)
        .ok_or_else(|| StoreError::not_found(format!("module '{}'", module_id)))
}

fn check_len(expected: usize, submitted: usize) -> Result<(), StoreError> {
    if expected != submitted {
        return Err(StoreError::invalid_order(format!(
            "expected {} item(s), got {}",
            expected, submitted
        )));
    }
    Ok(())
}

/// Rebuild a module's content list in the submitted order
fn apply_module_order(module: &mut Module, submitted: &[ContentItem]) -> Result<(), StoreError> {
    let current = module.content_items();
    check_len(current.len(), submitted.len())?;

    let mut stored: HashMap<(ContentKind, String), ContentItem> = current
        .into_iter()
        .map(|item| ((item.kind(), item.id().to_string()), item))
        .collect();

    let mut submitted = submitted.to_vec();
    sort_by_order(&mut submitted);

    let mut reordered = Vec::with_capacity(submitted.len());
    for item in &submitted {
        let key = (item.kind(), item.id().to_string());
        let stored_item = stored.remove(&key).ok_or_else(|| {
            StoreError::invalid_order(format!(
                "{} '{}' is unknown or listed twice in module '{}'",
                item.kind(),
                item.id(),
                module.id
            ))
        })?;
        reordered.push(stored_item);
    }

    renumber(&mut reordered);
    module.apply_content_order(reordered);
    Ok(())
}

/// Rebuild a section's lessons in the submitted order
fn apply_lesson_order(lessons: &mut Vec<Lesson>, submitted: &[Lesson]) -> Result<(), StoreError> {
    check_len(lessons.len(), submitted.len())?;

    let mut stored: HashMap<String, Lesson> = lessons
        .drain(..)
        .map(|lesson| (lesson.id.clone(), lesson))
        .collect();

    let mut submitted = submitted.to_vec();
    sort_by_order(&mut submitted);

    let mut reordered = Vec::with_capacity(submitted.len());
    for lesson in &submitted {
        let stored_lesson = stored.remove(&lesson.id).ok_or_else(|| {
            StoreError::invalid_order(format!(
                "lesson '{}' is unknown or listed twice",
                lesson.id
            ))
        })?;
        reordered.push(stored_lesson);
    }

    renumber(&mut reordered);
    *lessons = reordered;
    Ok(())
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn fetch_course(&self, course_id: &str) -> Result<Course, StoreError> {
        self.courses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(course_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("course '{}'", course_id)))
    }

    async fn persist_module_order(
        &self,
        course_id: &str,
        module_id: &str,
        request: &ReorderContentRequest,
    ) -> Result<Course, StoreError> {
        let course = self.update_course(course_id, |course| {
            let module = find_module(course, module_id)?;
            apply_module_order(module, &request.ordered_items)
        })?;

        tracing::info!(
            "Persisted content order of module '{}' ({} item(s))",
            module_id,
            request.ordered_items.len()
        );
        Ok(course)
    }

    async fn persist_section_lessons(
        &self,
        course_id: &str,
        module_id: &str,
        section_id: &str,
        request: &ReorderLessonsRequest,
    ) -> Result<Course, StoreError> {
        let course = self.update_course(course_id, |course| {
            let module = find_module(course, module_id)?;
            let section = module.section_mut(section_id).ok_or_else(|| {
                StoreError::not_found(format!(
                    "section '{}' in module '{}'",
                    section_id, module_id
                ))
            })?;
            apply_lesson_order(&mut section.lessons, &request.lessons)
        })?;

        tracing::info!(
            "Persisted lesson order of section '{}' ({} lesson(s))",
            section_id,
            request.lessons.len()
        );
        Ok(course)
    }
}
