//! Note editing session.
//!
//! A [`NoteEditor`] holds one open note: a [`TaggedBuffer`], the
//! [`StyleEngine`] working on it, and the markup last loaded or saved. Input
//! arrives as [`Message`]s; key chords are resolved through a
//! [`ShortcutMatcher`] owned by the host.

use std::ops::Range;

use crate::buffer::{Direction, TaggedBuffer, TextContainer};
use crate::codec;
use crate::keybinding::{Binding, BindingStore, ShortcutMatcher, ShortcutType};
use crate::style::{Decoration, PresetName, StyleCommand, StyleEngine, StylePreset, StyleReport};

/// Editing input for an open note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Text
    /// Type text at the caret, replacing any selection
    Insert(String),
    /// Backspace
    DeleteBack,
    /// Forward delete
    DeleteForward,

    // Caret
    /// Move the caret one step
    Move(Direction),
    /// Put the caret at an offset
    MoveTo(usize),
    /// Extend the selection to an offset
    ExtendTo(usize),
    /// Select a range
    Select(Range<usize>),

    // Styling
    Style(StyleCommand),
}

/// Notifications for the host, drained with [`NoteEditor::take_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The note became dirty or clean.
    DirtyChanged(bool),
    /// The note with this id was saved.
    Saved(String),
    /// The open note was closed.
    Closed,
}

/// Markup to write for a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedNote {
    pub id: String,
    pub markup: String,
}

/// What [`NoteEditor::handle_key`] did with a key chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A style shortcut was applied.
    Styled(StyleCommand),
    /// Save was requested; holds the markup to write when the note was dirty.
    Save(Option<SavedNote>),
    /// Delete or rename the open note. The host carries it out.
    NoteAction(ShortcutType),
    /// An application shortcut, left to the host.
    Application(ShortcutType),
    /// Not a shortcut.
    Ignored,
}

#[derive(Debug, Default)]
pub struct NoteEditor {
    buffer: TaggedBuffer,
    engine: StyleEngine,
    note_id: Option<String>,
    saved: String,
    dirty: bool,
    events: Vec<EditorEvent>,
}

impl NoteEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror the style at the caret into the pending style on caret moves.
    pub fn with_inherit_styles(mut self, inherit: bool) -> Self {
        self.engine.set_inherit_styles(inherit);
        self
    }

    // --- Session ---

    /// Open note `id` from its stored markup.
    ///
    /// The previously open note is saved first; its markup is returned when
    /// it was dirty.
    pub fn load(&mut self, id: impl Into<String>, markup: &str) -> Option<SavedNote> {
        let previous = self.save();
        self.unload();

        self.buffer.clear();
        let buffer = &mut self.buffer;
        self.engine.with_disabled(|engine| {
            codec::deserialize(markup, buffer);
            engine.pump(buffer);
        });
        self.engine.reset();
        self.buffer.move_to(0);
        self.engine.pump(&mut self.buffer);

        self.note_id = Some(id.into());
        self.saved = codec::serialize(&self.buffer);
        self.dirty = false;
        self.events.push(EditorEvent::DirtyChanged(false));
        previous
    }

    /// Close the open note without saving. Returns `false` if nothing was
    /// open.
    pub fn unload(&mut self) -> bool {
        if self.note_id.take().is_none() {
            return false;
        }
        self.buffer.clear();
        self.engine.pump(&mut self.buffer);
        self.engine.reset();
        self.saved.clear();
        self.dirty = false;
        self.events.push(EditorEvent::Closed);
        self.events.push(EditorEvent::DirtyChanged(false));
        true
    }

    /// Markup of the open note if it has unsaved changes. The note counts as
    /// saved afterwards.
    pub fn save(&mut self) -> Option<SavedNote> {
        let id = self.note_id.clone()?;
        let markup = self.markup();
        if markup == self.saved {
            return None;
        }
        self.saved.clone_from(&markup);
        self.dirty = false;
        self.events.push(EditorEvent::DirtyChanged(false));
        self.events.push(EditorEvent::Saved(id.clone()));
        Some(SavedNote { id, markup })
    }

    /// Whether the content differs from the markup last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.note_id.is_some() && self.markup() != self.saved
    }

    pub fn note_id(&self) -> Option<&str> {
        self.note_id.as_deref()
    }

    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Editing ---

    pub fn update(&mut self, msg: Message) {
        if self.note_id.is_none() {
            tracing::debug!(?msg, "no note open, ignoring message");
            return;
        }
        match msg {
            Message::Insert(text) => self.buffer.insert_at_cursor(&text),
            Message::DeleteBack => {
                self.buffer.delete_back();
            }
            Message::DeleteForward => {
                self.buffer.delete_forward();
            }
            Message::Move(direction) => self.buffer.move_cursor(direction),
            Message::MoveTo(offset) => self.buffer.move_to(offset),
            Message::ExtendTo(offset) => self.buffer.extend_to(offset),
            Message::Select(range) => self.buffer.set_selection(range),
            Message::Style(command) => self.engine.apply(&mut self.buffer, command),
        }
        self.engine.pump(&mut self.buffer);
        self.refresh_dirty();
    }

    /// Resolve `input` against `matcher` and run the editor's part of it.
    pub fn handle_key<S: BindingStore>(
        &mut self,
        matcher: &ShortcutMatcher<S>,
        input: Binding,
    ) -> KeyOutcome {
        let Some(kind) = matcher.check(input) else {
            return KeyOutcome::Ignored;
        };
        let command = match kind {
            ShortcutType::SaveNote => return KeyOutcome::Save(self.save()),
            ShortcutType::DeleteNote | ShortcutType::RenameNote => {
                return KeyOutcome::NoteAction(kind);
            }
            ShortcutType::NewNote
            | ShortcutType::ToggleSidebar
            | ShortcutType::SearchNotes
            | ShortcutType::OpenPreferences => return KeyOutcome::Application(kind),
            ShortcutType::ToggleBold => StyleCommand::ToggleDecoration(Decoration::Bold),
            ShortcutType::ToggleItalic => StyleCommand::ToggleDecoration(Decoration::Italic),
            ShortcutType::ToggleUnderline => StyleCommand::ToggleDecoration(Decoration::Underline),
            ShortcutType::ToggleMono => StyleCommand::ToggleDecoration(Decoration::Mono),
            ShortcutType::TextSizeH1 => StyleCommand::SetPreset(PresetName::H1),
            ShortcutType::TextSizeH2 => StyleCommand::SetPreset(PresetName::H2),
            ShortcutType::TextSizeH3 => StyleCommand::SetPreset(PresetName::H3),
            ShortcutType::TextSizeH4 => StyleCommand::SetPreset(PresetName::H4),
            ShortcutType::TextStyleCode => StyleCommand::SetPreset(PresetName::Code),
            ShortcutType::TextSizeNormal => StyleCommand::SetPreset(PresetName::Normal),
        };
        if self.note_id.is_none() {
            return KeyOutcome::Ignored;
        }
        self.update(Message::Style(command));
        KeyOutcome::Styled(command)
    }

    // --- Queries ---

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Current content as note markup.
    pub fn markup(&self) -> String {
        codec::serialize(&self.buffer)
    }

    pub const fn buffer(&self) -> &TaggedBuffer {
        &self.buffer
    }

    pub const fn engine(&self) -> &StyleEngine {
        &self.engine
    }

    /// Style at the caret or across the selection, for toolbars.
    pub const fn report(&self) -> StyleReport {
        self.engine.report()
    }

    pub fn current_style_preset(&self) -> (PresetName, Option<StylePreset>) {
        self.engine.current_style_preset(&self.buffer)
    }

    fn refresh_dirty(&mut self) {
        let dirty = self.is_dirty();
        if dirty != self.dirty {
            self.dirty = dirty;
            self.events.push(EditorEvent::DirtyChanged(dirty));
        }
    }
}
