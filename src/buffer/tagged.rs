use std::ops::Range;

use ropey::Rope;

use super::{ContainerEvent, TextContainer};
use crate::style::{Tag, TagSet};

/// Direction for caret movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A text buffer backed by a rope, with one interval list per tag.
///
/// Each list is sorted, disjoint and never holds two adjacent ranges, so a
/// tag's toggle boundaries are exactly the range endpoints. Inserted text
/// carries no tags: a range straddling the insertion point is split around
/// the new text.
pub struct TaggedBuffer {
    rope: Rope,
    tags: [Vec<Range<usize>>; Tag::COUNT],
    anchor: usize,
    cursor: usize,
    generation: u64,
    events: Vec<ContainerEvent>,
}

impl TaggedBuffer {
    /// Create a buffer holding untagged `text`, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            tags: Default::default(),
            anchor: 0,
            cursor: 0,
            generation: 0,
            events: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The full text content.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Caret offset (the moving end of the selection).
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Ranges currently carrying `tag`.
    pub fn tag_ranges(&self, tag: Tag) -> &[Range<usize>] {
        &self.tags[tag.index()]
    }

    /// Drop all text and tags. Bumps the generation so deferred work aimed at
    /// the old content can tell it is stale.
    pub fn clear(&mut self) {
        self.rope = Rope::new();
        self.tags = Default::default();
        self.anchor = 0;
        self.cursor = 0;
        self.generation += 1;
        self.events.clear();
        self.events.push(ContainerEvent::SelectionChanged(0..0));
    }

    /// Type `text` at the caret, replacing any selection.
    pub fn insert_at_cursor(&mut self, text: &str) {
        let selection = self.selection();
        if !selection.is_empty() {
            self.delete(selection.clone());
        }
        let inserted = self.insert(selection.start, text);
        self.set_selection(inserted.end..inserted.end);
    }

    /// Delete the selection, or the character before the caret (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        let selection = self.selection();
        let target = if selection.is_empty() {
            if self.cursor == 0 {
                return false;
            }
            self.cursor - 1..self.cursor
        } else {
            selection
        };
        self.delete(target.clone());
        self.set_selection(target.start..target.start);
        true
    }

    /// Delete the selection, or the character after the caret (Delete).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let selection = self.selection();
        let target = if selection.is_empty() {
            if self.cursor >= self.len_chars() {
                return false;
            }
            self.cursor..self.cursor + 1
        } else {
            selection
        };
        self.delete(target.clone());
        self.set_selection(target.start..target.start);
        true
    }

    /// Move the caret, collapsing any selection.
    pub fn move_cursor(&mut self, direction: Direction) {
        let target = match direction {
            Direction::Left => self.cursor.saturating_sub(1),
            Direction::Right => (self.cursor + 1).min(self.len_chars()),
            Direction::Up => self.vertical_target(false),
            Direction::Down => self.vertical_target(true),
        };
        self.set_selection(target..target);
    }

    /// Place the caret at `offset` (clamped).
    pub fn move_to(&mut self, offset: usize) {
        let offset = offset.min(self.len_chars());
        self.set_selection(offset..offset);
    }

    /// Extend the selection from its anchor to `offset` (Shift+movement).
    pub fn extend_to(&mut self, offset: usize) {
        let offset = offset.min(self.len_chars());
        if offset == self.cursor {
            return;
        }
        self.cursor = offset;
        self.events
            .push(ContainerEvent::SelectionChanged(self.selection()));
    }

    // --- Private helpers ---

    fn vertical_target(&self, down: bool) -> usize {
        let line = self.rope.char_to_line(self.cursor);
        let col = self.cursor - self.rope.line_to_char(line);
        let target_line = if down {
            if line + 1 >= self.rope.len_lines() {
                return self.cursor;
            }
            line + 1
        } else {
            if line == 0 {
                return self.cursor;
            }
            line - 1
        };
        let start = self.rope.line_to_char(target_line);
        let line_len = self
            .rope
            .line(target_line)
            .chars()
            .take_while(|c| *c != '\n' && *c != '\r')
            .count();
        start + col.min(line_len)
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len_chars();
        let end = range.end.min(len);
        range.start.min(end)..end
    }
}

impl TextContainer for TaggedBuffer {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn text_range(&self, range: Range<usize>) -> String {
        let range = self.clamp(range);
        self.rope.slice(range).to_string()
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn insert(&mut self, offset: usize, text: &str) -> Range<usize> {
        let offset = offset.min(self.len_chars());
        if text.is_empty() {
            return offset..offset;
        }
        self.rope.insert(offset, text);
        let added = text.chars().count();
        for list in &mut self.tags {
            shift_for_insert(list, offset, added);
        }
        if self.anchor >= offset {
            self.anchor += added;
        }
        if self.cursor >= offset {
            self.cursor += added;
        }
        let inserted = offset..offset + added;
        self.events.push(ContainerEvent::Inserted(inserted.clone()));
        inserted
    }

    fn delete(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        self.rope.remove(range.clone());
        for list in &mut self.tags {
            shift_for_delete(list, &range);
        }
        self.anchor = map_through_delete(self.anchor, &range);
        self.cursor = map_through_delete(self.cursor, &range);
    }

    fn apply_tag(&mut self, tag: Tag, range: Range<usize>) {
        let range = self.clamp(range);
        add_interval(&mut self.tags[tag.index()], range);
    }

    fn remove_tag(&mut self, tag: Tag, range: Range<usize>) {
        let range = self.clamp(range);
        remove_interval(&mut self.tags[tag.index()], range);
    }

    fn has_tag(&self, tag: Tag, offset: usize) -> bool {
        interval_contains(&self.tags[tag.index()], offset)
    }

    fn tags_at(&self, offset: usize) -> TagSet {
        Tag::ALL
            .into_iter()
            .filter(|tag| self.has_tag(*tag, offset))
            .collect()
    }

    fn next_toggle(&self, offset: usize, tag: Option<Tag>) -> usize {
        let len = self.len_chars();
        let next = match tag {
            Some(tag) => next_boundary(&self.tags[tag.index()], offset),
            None => self
                .tags
                .iter()
                .filter_map(|list| next_boundary(list, offset))
                .min(),
        };
        next.unwrap_or(len).min(len).max(offset.min(len))
    }

    fn selection(&self) -> Range<usize> {
        self.anchor.min(self.cursor)..self.anchor.max(self.cursor)
    }

    fn set_selection(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        self.anchor = range.start;
        self.cursor = range.end;
        self.events.push(ContainerEvent::SelectionChanged(range));
    }

    fn take_events(&mut self) -> Vec<ContainerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for TaggedBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for TaggedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tagged: Vec<_> = Tag::ALL
            .into_iter()
            .filter(|tag| !self.tags[tag.index()].is_empty())
            .map(|tag| (tag.name(), &self.tags[tag.index()]))
            .collect();
        f.debug_struct("TaggedBuffer")
            .field(
                "rope",
                &format_args!("Rope({} chars)", self.rope.len_chars()),
            )
            .field("tags", &tagged)
            .field("selection", &self.selection())
            .field("generation", &self.generation)
            .finish()
    }
}

fn add_interval(list: &mut Vec<Range<usize>>, range: Range<usize>) {
    if range.is_empty() {
        return;
    }
    // Everything overlapping or touching `range` collapses into one interval.
    let lo = list.partition_point(|r| r.end < range.start);
    let hi = list.partition_point(|r| r.start <= range.end);
    let mut merged = range;
    if lo < hi {
        merged.start = merged.start.min(list[lo].start);
        merged.end = merged.end.max(list[hi - 1].end);
    }
    list.splice(lo..hi, std::iter::once(merged));
}

fn remove_interval(list: &mut Vec<Range<usize>>, range: Range<usize>) {
    if range.is_empty() {
        return;
    }
    let lo = list.partition_point(|r| r.end <= range.start);
    let hi = list.partition_point(|r| r.start < range.end);
    if lo >= hi {
        return;
    }
    let first_start = list[lo].start;
    let last_end = list[hi - 1].end;
    let mut keep = Vec::with_capacity(2);
    if first_start < range.start {
        keep.push(first_start..range.start);
    }
    if last_end > range.end {
        keep.push(range.end..last_end);
    }
    list.splice(lo..hi, keep);
}

fn interval_contains(list: &[Range<usize>], offset: usize) -> bool {
    let idx = list.partition_point(|r| r.end <= offset);
    list.get(idx).is_some_and(|r| r.start <= offset)
}

fn next_boundary(list: &[Range<usize>], offset: usize) -> Option<usize> {
    let idx = list.partition_point(|r| r.end <= offset);
    list.get(idx)
        .map(|r| if r.start > offset { r.start } else { r.end })
}

fn shift_for_insert(list: &mut Vec<Range<usize>>, at: usize, added: usize) {
    let mut shifted = Vec::with_capacity(list.len() + 1);
    for r in list.drain(..) {
        if r.start >= at {
            shifted.push(r.start + added..r.end + added);
        } else if r.end > at {
            shifted.push(r.start..at);
            shifted.push(at + added..r.end + added);
        } else {
            shifted.push(r);
        }
    }
    *list = shifted;
}

fn shift_for_delete(list: &mut Vec<Range<usize>>, deleted: &Range<usize>) {
    let mut shifted: Vec<Range<usize>> = Vec::with_capacity(list.len());
    for r in list.drain(..) {
        let mapped = map_through_delete(r.start, deleted)..map_through_delete(r.end, deleted);
        if mapped.is_empty() {
            continue;
        }
        match shifted.last_mut() {
            Some(prev) if prev.end >= mapped.start => prev.end = prev.end.max(mapped.end),
            _ => shifted.push(mapped),
        }
    }
    *list = shifted;
}

const fn map_through_delete(pos: usize, deleted: &Range<usize>) -> usize {
    if pos <= deleted.start {
        pos
    } else if pos >= deleted.end {
        pos - (deleted.end - deleted.start)
    } else {
        deleted.start
    }
}
