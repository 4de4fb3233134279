//! Course Hierarchy
//!
//! A [`Course`] is the root of the content tree returned by the hierarchy
//! fetch endpoint. Each [`Module`] stores its sections and direct lessons in
//! two separate vectors; display order is derived from the `order` field by
//! merging both into one flattened content list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

use super::content::{ContentItem, Lesson, Ordered, Section};

/// Structural problems in a course tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Duplicate module ID: {0}")]
    DuplicateModule(String),

    #[error("Duplicate section ID '{section_id}' in module '{module_id}'")]
    DuplicateSection {
        module_id: String,
        section_id: String,
    },

    /// A lesson may live directly in a module or in one section, never both
    #[error("Lesson '{0}' belongs to more than one container")]
    LessonInMultipleContainers(String),
}

/// Top-level content grouping within a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Storage is unordered; see [`Module::content_items`]
    #[serde(default)]
    pub sections: Vec<Section>,

    /// Lessons attached directly to the module, outside any section
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Module {
    /// Create an empty module with a generated UUID
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new_with_id(Uuid::new_v4().to_string(), title, description)
    }

    pub fn new_with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            sections: Vec::new(),
            lessons: Vec::new(),
        }
    }

    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons = lessons;
        self
    }

    /// Sections and direct lessons merged and sorted ascending by `order`
    ///
    /// Sections come before lessons in the merge, so with equal or missing
    /// orders the stable sort keeps sections first and storage order within
    /// each kind.
    pub fn content_items(&self) -> Vec<ContentItem> {
        let mut items: Vec<ContentItem> = self
            .sections
            .iter()
            .cloned()
            .map(ContentItem::Section)
            .chain(self.lessons.iter().cloned().map(ContentItem::Lesson))
            .collect();
        items.sort_by_key(Ordered::sort_key);
        items
    }

    /// Write a flattened content list back into `sections` and `lessons`
    ///
    /// The list fully replaces both vectors, so an item can never end up in
    /// two containers.
    pub fn apply_content_order(&mut self, items: Vec<ContentItem>) {
        let mut sections = Vec::new();
        let mut lessons = Vec::new();
        for item in items {
            match item {
                ContentItem::Section(section) => sections.push(section),
                ContentItem::Lesson(lesson) => lessons.push(lesson),
            }
        }
        self.sections = sections;
        self.lessons = lessons;
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn section_mut(&mut self, section_id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }
}

/// Root of the content hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,

    pub title: String,

    /// Display order is vector order
    #[serde(default)]
    pub modules: Vec<Module>,

    /// Set by the server whenever a reorder is persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Course {
    pub fn new(title: impl Into<String>) -> Self {
        Self::new_with_id(Uuid::new_v4().to_string(), title)
    }

    pub fn new_with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            modules: Vec::new(),
            updated_at: None,
        }
    }

    pub fn with_modules(mut self, modules: Vec<Module>) -> Self {
        self.modules = modules;
        self
    }

    pub fn module(&self, module_id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    pub fn module_mut(&mut self, module_id: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.id == module_id)
    }

    /// Replace the module with the same ID, returning false if absent
    pub fn replace_module(&mut self, module: Module) -> bool {
        match self.module_mut(&module.id) {
            Some(slot) => {
                *slot = module;
                true
            }
            None => false,
        }
    }

    /// Check the structural invariants of the tree
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }

        let mut module_ids = HashSet::new();
        let mut lesson_ids = HashSet::new();

        for module in &self.modules {
            if module.id.is_empty() {
                return Err(ValidationError::MissingField("module.id".to_string()));
            }
            if !module_ids.insert(module.id.as_str()) {
                return Err(ValidationError::DuplicateModule(module.id.clone()));
            }

            let mut section_ids = HashSet::new();
            for section in &module.sections {
                if !section_ids.insert(section.id.as_str()) {
                    return Err(ValidationError::DuplicateSection {
                        module_id: module.id.clone(),
                        section_id: section.id.clone(),
                    });
                }
            }

            let nested = module.sections.iter().flat_map(|s| s.lessons.iter());
            for lesson in module.lessons.iter().chain(nested) {
                if !lesson_ids.insert(lesson.id.as_str()) {
                    return Err(ValidationError::LessonInMultipleContainers(
                        lesson.id.clone(),
                    ));
                }
            }
        }

        Ok(())
    }
}
