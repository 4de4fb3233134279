//! Reorder Engines
//!
//! Two pure engines compute new sibling orders:
//!
//! - [`compute_reorder`] moves one item (remove, then reinsert) as a drag and
//!   drop does. Used for a module's flattened content list and for lessons
//!   dragged within a section.
//! - [`compute_arrow_move`] swaps an item with its neighbour, as the up/down
//!   arrow buttons on section lessons do.
//!
//! Both finish with [`renumber`], which assigns `order = index + 1` so the
//! result is always contiguous from 1 regardless of prior gaps.

use crate::models::Ordered;

use super::error::ReorderError;

/// Direction of an arrow move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Outcome of [`compute_arrow_move`]
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowMove<T> {
    /// Neighbours were swapped and the list renumbered
    Moved(Vec<T>),

    /// Item already at the top (Up) or bottom (Down); list returned unchanged
    Boundary(Vec<T>),
}

impl<T> ArrowMove<T> {
    pub fn is_boundary(&self) -> bool {
        matches!(self, ArrowMove::Boundary(_))
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            ArrowMove::Moved(items) | ArrowMove::Boundary(items) => items,
        }
    }
}

/// Sort ascending by `order`; missing orders sort last, ties keep input order
pub fn sort_by_order<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(Ordered::sort_key);
}

/// Assign `order = index + 1` to every item
pub fn renumber<T: Ordered>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_order(index as u32 + 1);
    }
}

/// Move the item at `from_index` to `to_index` and renumber
///
/// `items` must already be sorted by `order`. The move has array "move"
/// semantics: every item between the two positions shifts by one.
///
/// # Examples
///
/// ```rust
/// use coursedesk_core::models::{Lesson, Ordered};
/// use coursedesk_core::operations::compute_reorder;
///
/// let lessons = vec![
///     Lesson::new_with_id("a", "A").with_order(1),
///     Lesson::new_with_id("b", "B").with_order(2),
///     Lesson::new_with_id("c", "C").with_order(3),
/// ];
///
/// let moved = compute_reorder(&lessons, 2, 0).unwrap();
/// assert_eq!(moved[0].id, "c");
/// assert_eq!(moved[0].order(), Some(1));
/// ```
pub fn compute_reorder<T: Ordered + Clone>(
    items: &[T],
    from_index: usize,
    to_index: usize,
) -> Result<Vec<T>, ReorderError> {
    let len = items.len();
    if from_index >= len {
        return Err(ReorderError::invalid_index(from_index, len));
    }
    if to_index >= len {
        return Err(ReorderError::invalid_index(to_index, len));
    }

    let mut reordered = items.to_vec();
    let moved = reordered.remove(from_index);
    reordered.insert(to_index, moved);
    renumber(&mut reordered);

    Ok(reordered)
}

/// Swap the item at `index` with its neighbour in `direction` and renumber
///
/// Moving past either end is not an error: the input comes back unchanged as
/// [`ArrowMove::Boundary`] so callers can skip persisting.
pub fn compute_arrow_move<T: Ordered + Clone>(
    items: &[T],
    index: usize,
    direction: Direction,
) -> Result<ArrowMove<T>, ReorderError> {
    let len = items.len();
    if index >= len {
        return Err(ReorderError::invalid_index(index, len));
    }

    let neighbour = match direction {
        Direction::Up if index == 0 => return Ok(ArrowMove::Boundary(items.to_vec())),
        Direction::Down if index == len - 1 => return Ok(ArrowMove::Boundary(items.to_vec())),
        Direction::Up => index - 1,
        Direction::Down => index + 1,
    };

    let mut swapped = items.to_vec();
    swapped.swap(index, neighbour);
    renumber(&mut swapped);

    Ok(ArrowMove::Moved(swapped))
}
