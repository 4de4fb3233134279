//! Content Item Data Structures
//!
//! Sections and lessons are the two kinds of content that live inside a
//! module. On the wire and in the reorder engines they travel together as a
//! [`ContentItem`], an internally-tagged union discriminated by `kind`.
//!
//! # Examples
//!
//! ```rust
//! use coursedesk_core::models::{ContentItem, Lesson, Section};
//!
//! let intro = Lesson::new("Reading the order book").with_order(2);
//! let basics = Section::new("Basics").with_order(1);
//!
//! let items = vec![ContentItem::Section(basics), ContentItem::Lesson(intro)];
//! assert_eq!(items[1].kind(), coursedesk_core::models::ContentKind::Lesson);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sort key used when an item carries no `order`, so it sorts last.
pub const MISSING_ORDER_SENTINEL: u32 = u32::MAX;

/// Anything that has a position among its siblings.
///
/// The reorder engines are generic over this trait so the same move and
/// renumber logic serves module content and section lessons alike.
pub trait Ordered {
    /// Current position, if one has been assigned
    fn order(&self) -> Option<u32>;

    /// Assign a new position
    fn set_order(&mut self, order: u32);

    /// Key used for ascending sort; missing orders sort last
    fn sort_key(&self) -> u32 {
        self.order().unwrap_or(MISSING_ORDER_SENTINEL)
    }
}

/// Discriminator for [`ContentItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Section,
    Lesson,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Section => "section",
            ContentKind::Lesson => "lesson",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf content unit (video or text)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,

    pub title: String,

    /// Position within the owning module or section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,

    /// Human readable running time, e.g. "12:30"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    #[serde(default)]
    pub is_published: bool,
}

impl Lesson {
    /// Create an unpublished lesson with a generated UUID
    pub fn new(title: impl Into<String>) -> Self {
        Self::new_with_id(Uuid::new_v4().to_string(), title)
    }

    /// Create a lesson with a caller-provided ID
    pub fn new_with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order: None,
            duration: None,
            video_url: None,
            is_published: false,
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

impl Ordered for Lesson {
    fn order(&self) -> Option<u32> {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = Some(order);
    }
}

/// Optional sub-grouping of lessons inside a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,

    pub title: String,

    /// Position within the owning module's flattened content list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,

    /// Lessons of this section; each `order` is scoped to the section
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Section {
    /// Create an empty section with a generated UUID
    pub fn new(title: impl Into<String>) -> Self {
        Self::new_with_id(Uuid::new_v4().to_string(), title)
    }

    /// Create an empty section with a caller-provided ID
    pub fn new_with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order: None,
            lessons: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons = lessons;
        self
    }

    /// Lessons sorted ascending by `order`, ties kept in storage order
    pub fn sorted_lessons(&self) -> Vec<Lesson> {
        let mut lessons = self.lessons.clone();
        lessons.sort_by_key(Ordered::sort_key);
        lessons
    }
}

impl Ordered for Section {
    fn order(&self) -> Option<u32> {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = Some(order);
    }
}

/// One entry of a module's flattened content list
///
/// Serialized internally tagged: `{"kind":"section","id":...,"lessons":[...]}`
/// or `{"kind":"lesson","id":...,"videoUrl":...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentItem {
    Section(Section),
    Lesson(Lesson),
}

impl ContentItem {
    pub fn id(&self) -> &str {
        match self {
            ContentItem::Section(section) => &section.id,
            ContentItem::Lesson(lesson) => &lesson.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Section(section) => &section.title,
            ContentItem::Lesson(lesson) => &lesson.title,
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentItem::Section(_) => ContentKind::Section,
            ContentItem::Lesson(_) => ContentKind::Lesson,
        }
    }
}

impl Ordered for ContentItem {
    fn order(&self) -> Option<u32> {
        match self {
            ContentItem::Section(section) => section.order,
            ContentItem::Lesson(lesson) => lesson.order,
        }
    }

    fn set_order(&mut self, order: u32) {
        match self {
            ContentItem::Section(section) => section.set_order(order),
            ContentItem::Lesson(lesson) => lesson.set_order(order),
        }
    }
}
