//! Text containers the style engine and codec operate on.
//!
//! A container stores the text and the tag ranges over it. It never runs
//! style logic itself: insertions and selection changes are queued as
//! [`ContainerEvent`]s and drained by the owner after the mutating call
//! returns.

mod tagged;

pub use tagged::{Direction, TaggedBuffer};

use std::ops::Range;

use crate::style::{Tag, TagSet};

/// Notifications produced by a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerEvent {
    /// Text was inserted over this range.
    Inserted(Range<usize>),
    /// The caret (empty range) or selection moved.
    SelectionChanged(Range<usize>),
}

/// A mutable, tag-aware text store addressed by code-point offsets.
pub trait TextContainer {
    /// Number of code points.
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Text within `range`, clamped to the container.
    fn text_range(&self, range: Range<usize>) -> String;

    /// Changes whenever the content is cleared or swapped wholesale.
    fn generation(&self) -> u64;

    /// Insert `text` at `offset` (clamped). Returns the inserted range.
    fn insert(&mut self, offset: usize, text: &str) -> Range<usize>;

    fn delete(&mut self, range: Range<usize>);

    fn apply_tag(&mut self, tag: Tag, range: Range<usize>);

    fn remove_tag(&mut self, tag: Tag, range: Range<usize>);

    /// Whether the character at `offset` carries `tag`.
    fn has_tag(&self, tag: Tag, offset: usize) -> bool;

    /// Tags carried by the character at `offset`.
    fn tags_at(&self, offset: usize) -> TagSet;

    /// Smallest offset greater than `offset` where `tag` (or any tag when
    /// `None`) starts or stops applying, or `len_chars()` if there is none.
    fn next_toggle(&self, offset: usize, tag: Option<Tag>) -> usize;

    /// Current selection; empty for a bare caret.
    fn selection(&self) -> Range<usize>;

    fn set_selection(&mut self, range: Range<usize>);

    /// Drain pending notifications in the order they happened.
    fn take_events(&mut self) -> Vec<ContainerEvent>;
}
