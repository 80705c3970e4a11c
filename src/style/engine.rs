//! The style engine: pending insertion style, range tagging and style
//! reporting for one open document.

use std::collections::VecDeque;
use std::ops::Range;

use serde::Serialize;

use super::preset::{NORMAL, PresetName, StylePreset, match_preset};
use super::tags::{Decoration, Decorations, Size, Tag, TagSet};
use crate::buffer::{ContainerEvent, TextContainer};

/// The style stamped onto the next inserted run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStyle {
    pub decorations: Decorations,
    pub size: Size,
}

impl PendingStyle {
    pub const fn from_preset(preset: StylePreset) -> Self {
        Self {
            decorations: preset.decorations,
            size: preset.size,
        }
    }
}

impl Default for PendingStyle {
    fn default() -> Self {
        Self::from_preset(NORMAL)
    }
}

/// Style state reflected by toolbars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleReport {
    pub decorations: Decorations,
    pub size: Option<Size>,
    pub preset: PresetName,
}

impl StyleReport {
    fn new(decorations: Decorations, size: Option<Size>) -> Self {
        Self {
            decorations,
            size,
            preset: match_preset(decorations, size).0,
        }
    }

    fn from_pending(pending: PendingStyle) -> Self {
        Self::new(pending.decorations, Some(pending.size))
    }

    pub const fn is_active(&self, decoration: Decoration) -> bool {
        self.decorations.contains(decoration)
    }
}

/// A style mutation requested by the user, typically via a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleCommand {
    ToggleDecoration(Decoration),
    SetDecoration(Decoration, bool),
    SetSize(Size),
    SetPreset(PresetName),
}

#[derive(Debug, Clone)]
struct DeferredStamp {
    range: Range<usize>,
    generation: u64,
    style: PendingStyle,
}

/// Applies styles to a [`TextContainer`] and tracks the pending style.
///
/// Every mutator has two regimes: with a non-empty selection it retags the
/// selected range directly; with a bare caret it only changes the pending
/// style used for the next insertion.
#[derive(Debug)]
pub struct StyleEngine {
    pending: PendingStyle,
    enabled: bool,
    inherit_styles: bool,
    idle: VecDeque<DeferredStamp>,
    report: StyleReport,
    report_changed: bool,
}

impl StyleEngine {
    pub fn new() -> Self {
        let pending = PendingStyle::default();
        Self {
            pending,
            enabled: true,
            inherit_styles: false,
            idle: VecDeque::new(),
            report: StyleReport::from_pending(pending),
            report_changed: false,
        }
    }

    /// Mirror the style found at the caret into the pending style on every
    /// caret move.
    pub const fn with_inherit_styles(mut self, inherit: bool) -> Self {
        self.inherit_styles = inherit;
        self
    }

    pub const fn set_inherit_styles(&mut self, inherit: bool) {
        self.inherit_styles = inherit;
    }

    pub const fn pending(&self) -> PendingStyle {
        self.pending
    }

    /// Latest style report.
    pub const fn report(&self) -> StyleReport {
        self.report
    }

    /// The report, if it changed since the last call.
    pub const fn take_report_changed(&mut self) -> Option<StyleReport> {
        if self.report_changed {
            self.report_changed = false;
            Some(self.report)
        } else {
            None
        }
    }

    // --- Mutators ---

    /// Run a [`StyleCommand`].
    pub fn apply<C: TextContainer + ?Sized>(&mut self, container: &mut C, command: StyleCommand) {
        match command {
            StyleCommand::ToggleDecoration(decoration) => {
                self.toggle_decoration(container, decoration, None);
            }
            StyleCommand::SetDecoration(decoration, active) => {
                self.toggle_decoration(container, decoration, Some(active));
            }
            StyleCommand::SetSize(size) => self.set_size(container, size),
            StyleCommand::SetPreset(name) => self.set_style_preset(container, name),
        }
    }

    /// Toggle `decoration`, or force it to `desired`.
    ///
    /// With a selection the tag is removed when it already covers the whole
    /// selection and applied otherwise; the pending style is untouched.
    /// Returns the resulting state.
    pub fn toggle_decoration<C: TextContainer + ?Sized>(
        &mut self,
        container: &mut C,
        decoration: Decoration,
        desired: Option<bool>,
    ) -> bool {
        let tag = Tag::Decoration(decoration);
        let selection = container.selection();
        if !selection.is_empty() {
            let active = desired
                .unwrap_or_else(|| !is_tag_fully_applied(&*container, tag, selection.clone()));
            if active {
                container.apply_tag(tag, selection.clone());
            } else {
                container.remove_tag(tag, selection.clone());
            }
            self.refresh_selection_report(&*container, selection);
            return active;
        }

        let active = desired.unwrap_or(!self.pending.decorations.contains(decoration));
        self.pending.decorations.set(decoration, active);
        self.set_report(StyleReport::from_pending(self.pending));
        active
    }

    /// Set the size of the selection, or of the pending style.
    ///
    /// Other sizes are cleared from the selection first, so no offset ever
    /// carries two sizes.
    pub fn set_size<C: TextContainer + ?Sized>(&mut self, container: &mut C, size: Size) {
        let selection = container.selection();
        if !selection.is_empty() {
            restamp_size(container, size, &selection);
            self.refresh_selection_report(&*container, selection);
            return;
        }
        self.pending.size = size;
        self.set_report(StyleReport::from_pending(self.pending));
    }

    /// Replace the selection's style, or the pending style, with a preset.
    /// `Custom` is not a settable preset and is ignored.
    pub fn set_style_preset<C: TextContainer + ?Sized>(
        &mut self,
        container: &mut C,
        name: PresetName,
    ) {
        let Some(preset) = name.preset() else {
            return;
        };
        let selection = container.selection();
        if !selection.is_empty() {
            for tag in Tag::ALL {
                container.remove_tag(tag, selection.clone());
            }
            for tag in preset.tags().iter() {
                container.apply_tag(tag, selection.clone());
            }
            self.refresh_selection_report(&*container, selection);
            return;
        }
        self.pending = PendingStyle::from_preset(preset);
        self.set_report(StyleReport::from_pending(self.pending));
    }

    /// The preset matching the current style exactly, or `Custom`.
    ///
    /// The current style is the pending style at a caret, or the tags applied
    /// uniformly across a selection.
    pub fn current_style_preset<C: TextContainer + ?Sized>(
        &self,
        container: &C,
    ) -> (PresetName, Option<StylePreset>) {
        let selection = container.selection();
        if selection.is_empty() {
            return match_preset(self.pending.decorations, Some(self.pending.size));
        }
        let (decorations, size) = selection_style(container, &selection);
        match_preset(decorations, size)
    }

    /// Restore the pending style to the `normal` preset.
    pub fn reset(&mut self) {
        self.pending = PendingStyle::default();
        self.set_report(StyleReport::from_pending(self.pending));
    }

    // --- Enable / disable ---

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn enable(&mut self) {
        self.enabled = true;
    }

    pub const fn disable(&mut self) {
        self.enabled = false;
    }

    /// Run `f` with insertion stamping and caret reporting switched off, then
    /// restore the previous state. Wrap bulk programmatic inserts (document
    /// loads) in this.
    pub fn with_disabled<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let was_enabled = self.enabled;
        self.enabled = false;
        let result = f(self);
        self.enabled = was_enabled;
        result
    }

    // --- Container notifications ---

    /// Queue the pending style to be stamped onto `range`.
    ///
    /// Nothing touches the container here; the stamp happens in
    /// [`StyleEngine::run_idle`].
    pub fn on_insertion<C: TextContainer + ?Sized>(&mut self, container: &C, range: Range<usize>) {
        if !self.enabled || range.is_empty() {
            return;
        }
        tracing::trace!(?range, style = ?self.pending, "queueing insertion stamp");
        self.idle.push_back(DeferredStamp {
            range,
            generation: container.generation(),
            style: self.pending,
        });
    }

    /// Number of stamps waiting for [`StyleEngine::run_idle`].
    pub fn deferred_len(&self) -> usize {
        self.idle.len()
    }

    /// Apply queued insertion stamps. Stamps aimed at content that has since
    /// been cleared, or at ranges that no longer fit, are dropped.
    ///
    /// Returns the number of stamps applied.
    pub fn run_idle<C: TextContainer + ?Sized>(&mut self, container: &mut C) -> usize {
        let mut applied = 0;
        while let Some(stamp) = self.idle.pop_front() {
            if stamp.generation != container.generation() || stamp.range.end > container.len_chars()
            {
                tracing::debug!(range = ?stamp.range, "discarding stale insertion stamp");
                continue;
            }
            for decoration in stamp.style.decorations.iter() {
                container.apply_tag(Tag::Decoration(decoration), stamp.range.clone());
            }
            restamp_size(container, stamp.style.size, &stamp.range);
            applied += 1;
        }
        applied
    }

    /// Report the style at a caret or across a selection.
    ///
    /// At a caret this is the tag set of the character before it. Across a
    /// selection a decoration counts only when it covers every offset, and
    /// the size only when one size covers the whole selection.
    pub fn on_cursor_or_selection_changed<C: TextContainer + ?Sized>(
        &mut self,
        container: &C,
        range: Range<usize>,
    ) -> StyleReport {
        if !self.enabled {
            return self.report;
        }
        if !range.is_empty() {
            self.refresh_selection_report(container, range);
            return self.report;
        }

        let tags = caret_tags(container, range.start);
        let decorations = tags.decorations();
        let size = tags.size();
        if self.inherit_styles {
            self.pending.decorations = decorations;
            if let Some(size) = size {
                self.pending.size = size;
            }
        }
        self.set_report(StyleReport::new(decorations, size));
        self.report
    }

    /// Dispatch the container's queued notifications and run deferred work.
    ///
    /// Insertions are stamped before the last selection change is reported,
    /// so the report sees freshly typed text with its style applied.
    pub fn pump<C: TextContainer + ?Sized>(&mut self, container: &mut C) {
        let mut last_selection = None;
        for event in container.take_events() {
            tracing::trace!(?event, "container event");
            match event {
                ContainerEvent::Inserted(range) => self.on_insertion(&*container, range),
                ContainerEvent::SelectionChanged(range) => last_selection = Some(range),
            }
        }
        self.run_idle(container);
        if let Some(range) = last_selection {
            self.on_cursor_or_selection_changed(&*container, range);
        }
    }

    // --- Private helpers ---

    fn refresh_selection_report<C: TextContainer + ?Sized>(&mut self, container: &C, range: Range<usize>) {
        let (decorations, size) = selection_style(container, &range);
        self.set_report(StyleReport::new(decorations, size));
    }

    fn set_report(&mut self, report: StyleReport) {
        if report != self.report {
            self.report = report;
            self.report_changed = true;
        }
    }
}

impl Default for StyleEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `tag` covers every offset in `range`.
///
/// Walks toggle boundaries rather than characters, so the cost depends on how
/// often the tag switches inside the range, not on its length. Empty ranges
/// are never fully applied. A container whose toggle lookup fails to advance
/// is treated as not fully applied.
pub fn is_tag_fully_applied<C: TextContainer + ?Sized>(
    container: &C,
    tag: Tag,
    range: Range<usize>,
) -> bool {
    let end = range.end.min(container.len_chars());
    let mut at = range.start;
    if at >= end {
        return false;
    }
    while at < end {
        if !container.has_tag(tag, at) {
            return false;
        }
        let next = container.next_toggle(at, Some(tag));
        if next <= at {
            return false;
        }
        at = next;
    }
    true
}

fn selection_style<C: TextContainer + ?Sized>(
    container: &C,
    range: &Range<usize>,
) -> (Decorations, Option<Size>) {
    let decorations = Decoration::ALL
        .into_iter()
        .filter(|d| is_tag_fully_applied(container, Tag::Decoration(*d), range.clone()))
        .collect();
    let size = Size::ALL
        .into_iter()
        .find(|s| is_tag_fully_applied(container, Tag::Size(*s), range.clone()));
    (decorations, size)
}

fn caret_tags<C: TextContainer + ?Sized>(container: &C, offset: usize) -> TagSet {
    let len = container.len_chars();
    if len == 0 {
        return TagSet::EMPTY;
    }
    let probe = offset.saturating_sub(1).min(len - 1);
    container.tags_at(probe)
}

fn restamp_size<C: TextContainer + ?Sized>(container: &mut C, size: Size, range: &Range<usize>) {
    for other in Size::ALL.into_iter().filter(|s| *s != size) {
        container.remove_tag(Tag::Size(other), range.clone());
    }
    container.apply_tag(Tag::Size(size), range.clone());
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::buffer::TaggedBuffer;

    const BOLD: Tag = Tag::Decoration(Decoration::Bold);

    fn typed(engine: &mut StyleEngine, buf: &mut TaggedBuffer, text: &str) {
        buf.insert_at_cursor(text);
        engine.pump(buf);
    }

    /// Delegates to a [`TaggedBuffer`] and counts toggle lookups.
    struct CountingBuffer {
        inner: TaggedBuffer,
        toggle_lookups: Cell<usize>,
    }

    impl TextContainer for CountingBuffer {
        fn len_chars(&self) -> usize {
            self.inner.len_chars()
        }
        fn text_range(&self, range: Range<usize>) -> String {
            self.inner.text_range(range)
        }
        fn generation(&self) -> u64 {
            self.inner.generation()
        }
        fn insert(&mut self, offset: usize, text: &str) -> Range<usize> {
            self.inner.insert(offset, text)
        }
        fn delete(&mut self, range: Range<usize>) {
            self.inner.delete(range);
        }
        fn apply_tag(&mut self, tag: Tag, range: Range<usize>) {
            self.inner.apply_tag(tag, range);
        }
        fn remove_tag(&mut self, tag: Tag, range: Range<usize>) {
            self.inner.remove_tag(tag, range);
        }
        fn has_tag(&self, tag: Tag, offset: usize) -> bool {
            self.inner.has_tag(tag, offset)
        }
        fn tags_at(&self, offset: usize) -> TagSet {
            self.inner.tags_at(offset)
        }
        fn next_toggle(&self, offset: usize, tag: Option<Tag>) -> usize {
            self.toggle_lookups.set(self.toggle_lookups.get() + 1);
            self.inner.next_toggle(offset, tag)
        }
        fn selection(&self) -> Range<usize> {
            self.inner.selection()
        }
        fn set_selection(&mut self, range: Range<usize>) {
            self.inner.set_selection(range);
        }
        fn take_events(&mut self) -> Vec<ContainerEvent> {
            self.inner.take_events()
        }
    }

    /// A container whose toggle lookup never advances.
    struct StuckToggle(TaggedBuffer);

    impl TextContainer for StuckToggle {
        fn len_chars(&self) -> usize {
            self.0.len_chars()
        }
        fn text_range(&self, range: Range<usize>) -> String {
            self.0.text_range(range)
        }
        fn generation(&self) -> u64 {
            0
        }
        fn insert(&mut self, offset: usize, text: &str) -> Range<usize> {
            self.0.insert(offset, text)
        }
        fn delete(&mut self, range: Range<usize>) {
            self.0.delete(range);
        }
        fn apply_tag(&mut self, tag: Tag, range: Range<usize>) {
            self.0.apply_tag(tag, range);
        }
        fn remove_tag(&mut self, tag: Tag, range: Range<usize>) {
            self.0.remove_tag(tag, range);
        }
        fn has_tag(&self, tag: Tag, offset: usize) -> bool {
            self.0.has_tag(tag, offset)
        }
        fn tags_at(&self, offset: usize) -> TagSet {
            self.0.tags_at(offset)
        }
        fn next_toggle(&self, offset: usize, _tag: Option<Tag>) -> usize {
            offset
        }
        fn selection(&self) -> Range<usize> {
            self.0.selection()
        }
        fn set_selection(&mut self, range: Range<usize>) {
            self.0.set_selection(range);
        }
        fn take_events(&mut self) -> Vec<ContainerEvent> {
            self.0.take_events()
        }
    }

    // --- Caret regime ---

    #[test]
    fn test_toggle_at_caret_only_changes_pending() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::from_text("abc");
        assert!(engine.toggle_decoration(&mut buf, Decoration::Bold, None));
        assert!(engine.pending().decorations.contains(Decoration::Bold));
        assert!(buf.tag_ranges(BOLD).is_empty());
        assert!(!engine.toggle_decoration(&mut buf, Decoration::Bold, None));
        assert!(!engine.toggle_decoration(&mut buf, Decoration::Bold, Some(false)));
    }

    #[test]
    fn test_typed_text_gets_pending_style() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::empty();
        engine.toggle_decoration(&mut buf, Decoration::Italic, None);
        engine.set_size(&mut buf, Size::Pt16);
        typed(&mut engine, &mut buf, "hello");
        assert_eq!(buf.tag_ranges(Tag::Decoration(Decoration::Italic)), &[0..5]);
        assert_eq!(buf.tag_ranges(Tag::Size(Size::Pt16)), &[0..5]);
        assert!(buf.tag_ranges(Tag::Size(Size::Pt11)).is_empty());
    }

    #[test]
    fn test_insertion_stamp_is_deferred() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::empty();
        let range = buf.insert(0, "abc");
        engine.on_insertion(&buf, range);
        assert!(buf.tags_at(0).is_empty(), "stamp must not run inside the notification");
        assert_eq!(engine.deferred_len(), 1);
        assert_eq!(engine.run_idle(&mut buf), 1);
        assert_eq!(buf.tags_at(0).size(), Some(Size::Pt11));
    }

    #[test]
    fn test_stale_stamp_is_dropped_after_clear() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::empty();
        let range = buf.insert(0, "abc");
        engine.on_insertion(&buf, range);
        buf.clear();
        buf.insert(0, "xyz");
        assert_eq!(engine.run_idle(&mut buf), 0);
        assert!(buf.tags_at(0).is_empty());
    }

    #[test]
    fn test_disabled_engine_skips_stamping() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::empty();
        engine.with_disabled(|engine| {
            buf.insert_at_cursor("loaded");
            engine.pump(&mut buf);
        });
        assert!(engine.is_enabled());
        assert!(buf.tags_at(0).is_empty());
    }

    #[test]
    fn test_with_disabled_restores_previous_state() {
        let mut engine = StyleEngine::new();
        engine.disable();
        engine.with_disabled(|_| {});
        assert!(!engine.is_enabled());
    }

    #[test]
    fn test_caret_reports_style_of_previous_char() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::from_text("abcd");
        buf.apply_tag(BOLD, 0..2);
        buf.apply_tag(Tag::Size(Size::Pt26), 0..2);
        let report = engine.on_cursor_or_selection_changed(&buf, 2..2);
        assert!(report.is_active(Decoration::Bold));
        assert_eq!(report.size, Some(Size::Pt26));
        assert_eq!(report.preset, PresetName::H1);
        let report = engine.on_cursor_or_selection_changed(&buf, 3..3);
        assert!(!report.is_active(Decoration::Bold));
        assert_eq!(report.size, None);
        assert_eq!(report.preset, PresetName::Custom);
        // Reporting does not touch the pending style.
        assert_eq!(engine.pending(), PendingStyle::default());
    }

    #[test]
    fn test_inherit_styles_mirrors_caret_style() {
        let mut engine = StyleEngine::new().with_inherit_styles(true);
        let mut buf = TaggedBuffer::from_text("abcd");
        buf.apply_tag(BOLD, 0..2);
        buf.apply_tag(Tag::Size(Size::Pt22), 0..2);
        engine.on_cursor_or_selection_changed(&buf, 1..1);
        assert_eq!(engine.current_style_preset(&buf).0, PresetName::H2);
    }

    // --- Selection regime ---

    #[test]
    fn test_toggle_selection_applies_then_removes() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::from_text("hello world");
        buf.apply_tag(BOLD, 0..3);
        buf.set_selection(0..5);
        assert!(engine.toggle_decoration(&mut buf, Decoration::Bold, None));
        assert_eq!(buf.tag_ranges(BOLD), &[0..5]);
        assert!(!engine.toggle_decoration(&mut buf, Decoration::Bold, None));
        assert!(buf.tag_ranges(BOLD).is_empty());
        assert_eq!(engine.pending(), PendingStyle::default());
    }

    #[test]
    fn test_set_size_on_selection_clears_other_sizes() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::from_text("0123456789");
        buf.apply_tag(Tag::Size(Size::Pt11), 0..10);
        buf.set_selection(3..6);
        engine.set_size(&mut buf, Size::Pt32);
        assert_eq!(buf.tag_ranges(Tag::Size(Size::Pt11)), &[0..3, 6..10]);
        assert_eq!(buf.tag_ranges(Tag::Size(Size::Pt32)), &[3..6]);
        assert_eq!(engine.report().size, Some(Size::Pt32));
    }

    #[test]
    fn test_preset_on_selection_replaces_all_tags() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::from_text("0123456789");
        buf.apply_tag(Tag::Decoration(Decoration::Underline), 0..10);
        buf.apply_tag(Tag::Size(Size::Pt12), 0..10);
        buf.set_selection(2..8);
        engine.set_style_preset(&mut buf, PresetName::H4);
        let tags = buf.tags_at(4);
        assert_eq!(
            tags.decorations(),
            Decorations::of(&[Decoration::Bold, Decoration::Italic])
        );
        assert_eq!(tags.size(), Some(Size::Pt14));
        assert_eq!(tags.len(), 3);
        assert_eq!(
            engine.current_style_preset(&buf),
            (PresetName::H4, PresetName::H4.preset())
        );
    }

    #[test]
    fn test_custom_preset_is_ignored() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::empty();
        engine.set_style_preset(&mut buf, PresetName::H1);
        engine.set_style_preset(&mut buf, PresetName::Custom);
        assert_eq!(engine.current_style_preset(&buf).0, PresetName::H1);
    }

    #[test]
    fn test_preset_match_breaks_after_divergent_toggle() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::empty();
        engine.set_style_preset(&mut buf, PresetName::H1);
        assert_eq!(
            engine.current_style_preset(&buf),
            (PresetName::H1, PresetName::H1.preset())
        );
        engine.toggle_decoration(&mut buf, Decoration::Underline, None);
        assert_eq!(engine.current_style_preset(&buf), (PresetName::Custom, None));
    }

    #[test]
    fn test_selection_report_requires_full_coverage() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::from_text("0123456789");
        buf.apply_tag(BOLD, 0..4);
        buf.apply_tag(BOLD, 5..10);
        let report = engine.on_cursor_or_selection_changed(&buf, 0..10);
        assert!(!report.is_active(Decoration::Bold));
        let report = engine.on_cursor_or_selection_changed(&buf, 5..9);
        assert!(report.is_active(Decoration::Bold));
    }

    #[test]
    fn test_reset_restores_normal() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::empty();
        engine.set_style_preset(&mut buf, PresetName::Code);
        engine.reset();
        assert_eq!(engine.pending(), PendingStyle::default());
        assert_eq!(engine.report().preset, PresetName::Normal);
    }

    #[test]
    fn test_report_changed_is_taken_once() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::empty();
        assert_eq!(engine.take_report_changed(), None);
        engine.toggle_decoration(&mut buf, Decoration::Mono, None);
        let report = engine.take_report_changed().unwrap();
        assert!(report.is_active(Decoration::Mono));
        assert_eq!(engine.take_report_changed(), None);
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut engine = StyleEngine::new();
        let mut buf = TaggedBuffer::empty();
        engine.apply(&mut buf, StyleCommand::SetPreset(PresetName::H3));
        engine.apply(&mut buf, StyleCommand::SetDecoration(Decoration::Bold, false));
        engine.apply(&mut buf, StyleCommand::SetSize(Size::Pt10));
        assert_eq!(engine.pending().decorations, Decorations::NONE);
        assert_eq!(engine.pending().size, Size::Pt10);
    }

    // --- Boundary-bounded scan ---

    #[test]
    fn test_full_coverage_scan_is_bounded_by_toggles() {
        let text = "x".repeat(100_000);
        let mut inner = TaggedBuffer::from_text(&text);
        inner.apply_tag(BOLD, 0..100_000);
        inner.remove_tag(BOLD, 40_000..40_001);
        let buf = CountingBuffer {
            inner,
            toggle_lookups: Cell::new(0),
        };
        assert!(!is_tag_fully_applied(&buf, BOLD, 0..100_000));
        assert!(buf.toggle_lookups.get() <= 2);

        buf.toggle_lookups.set(0);
        assert!(is_tag_fully_applied(&buf, BOLD, 40_001..100_000));
        assert_eq!(buf.toggle_lookups.get(), 1);
    }

    #[test]
    fn test_stuck_toggle_is_not_fully_applied() {
        let mut inner = TaggedBuffer::from_text("abcdef");
        inner.apply_tag(BOLD, 0..6);
        let buf = StuckToggle(inner);
        assert!(!is_tag_fully_applied(&buf, BOLD, 0..6));
    }

    #[test]
    fn test_empty_range_is_not_fully_applied() {
        let mut buf = TaggedBuffer::from_text("abc");
        buf.apply_tag(BOLD, 0..3);
        assert!(!is_tag_fully_applied(&buf, BOLD, 1..1));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Type(String),
            Select(usize, usize),
            Caret(usize),
            Size(usize),
            Preset(usize),
            Toggle(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                "[a-z ]{1,6}".prop_map(Op::Type),
                (0..40usize, 0..40usize).prop_map(|(a, b)| Op::Select(a, b)),
                (0..40usize).prop_map(Op::Caret),
                (0..Size::ALL.len()).prop_map(Op::Size),
                (0..7usize).prop_map(Op::Preset),
                (0..Decoration::ALL.len()).prop_map(Op::Toggle),
            ]
        }

        const PRESET_NAMES: [PresetName; 7] = [
            PresetName::Normal,
            PresetName::Code,
            PresetName::H1,
            PresetName::H2,
            PresetName::H3,
            PresetName::H4,
            PresetName::Custom,
        ];

        proptest! {
            #[test]
            fn no_offset_has_two_sizes(ops in prop::collection::vec(op(), 1..40)) {
                let mut engine = StyleEngine::new();
                let mut buf = TaggedBuffer::empty();
                for op in ops {
                    match op {
                        Op::Type(text) => buf.insert_at_cursor(&text),
                        Op::Select(a, b) => buf.set_selection(a.min(b)..a.max(b)),
                        Op::Caret(at) => buf.move_to(at),
                        Op::Size(i) => engine.set_size(&mut buf, Size::ALL[i]),
                        Op::Preset(i) => engine.set_style_preset(&mut buf, PRESET_NAMES[i]),
                        Op::Toggle(i) => {
                            engine.toggle_decoration(&mut buf, Decoration::ALL[i], None);
                        }
                    }
                    engine.pump(&mut buf);
                }
                for offset in 0..buf.len_chars() {
                    prop_assert!(buf.tags_at(offset).sizes().count() <= 1);
                }
            }
        }
    }
}
