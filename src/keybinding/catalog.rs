//! The fixed shortcut catalog.
//!
//! Order matters: when one input chord triggers several shortcuts,
//! [`ShortcutMatcher::check`](super::ShortcutMatcher::check) reports the one
//! listed first here.

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Serialize, Serializer};

use super::{Binding, ShortcutError};

/// Where a shortcut is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutGroup {
    /// Handled by the host (window, sidebar, preferences).
    Application,
    /// Handled by the note editor.
    Editor,
}

impl ShortcutGroup {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::Editor => "Editor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShortcutType {
    SaveNote,
    NewNote,
    DeleteNote,
    RenameNote,
    ToggleSidebar,
    SearchNotes,
    OpenPreferences,
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    ToggleMono,
    TextSizeH1,
    TextSizeH2,
    TextSizeH3,
    TextSizeH4,
    TextStyleCode,
    TextSizeNormal,
}

impl ShortcutType {
    pub const COUNT: usize = 17;

    pub const ALL: [Self; Self::COUNT] = [
        Self::SaveNote,
        Self::NewNote,
        Self::DeleteNote,
        Self::RenameNote,
        Self::ToggleSidebar,
        Self::SearchNotes,
        Self::OpenPreferences,
        Self::ToggleBold,
        Self::ToggleItalic,
        Self::ToggleUnderline,
        Self::ToggleMono,
        Self::TextSizeH1,
        Self::TextSizeH2,
        Self::TextSizeH3,
        Self::TextSizeH4,
        Self::TextStyleCode,
        Self::TextSizeNormal,
    ];

    /// Position in [`SHORTCUTS`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable name used as the persistence key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SaveNote => "save-note",
            Self::NewNote => "new-note",
            Self::DeleteNote => "delete-note",
            Self::RenameNote => "rename-note",
            Self::ToggleSidebar => "toggle-sidebar",
            Self::SearchNotes => "search-notes",
            Self::OpenPreferences => "open-prefs",
            Self::ToggleBold => "toggle-bold",
            Self::ToggleItalic => "toggle-italic",
            Self::ToggleUnderline => "toggle-underline",
            Self::ToggleMono => "toggle-mono",
            Self::TextSizeH1 => "text-size-h1",
            Self::TextSizeH2 => "text-size-h2",
            Self::TextSizeH3 => "text-size-h3",
            Self::TextSizeH4 => "text-size-h4",
            Self::TextStyleCode => "text-style-code",
            Self::TextSizeNormal => "text-size-normal",
        }
    }

    pub fn meta(self) -> &'static Shortcut {
        &SHORTCUTS[self.index()]
    }
}

impl fmt::Display for ShortcutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShortcutType {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ShortcutError::UnknownType(s.to_string()))
    }
}

impl Serialize for ShortcutType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Catalog entry for one shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shortcut {
    #[serde(rename = "type")]
    pub kind: ShortcutType,
    pub group: ShortcutGroup,
    pub label: &'static str,
    pub description: &'static str,
    #[serde(serialize_with = "serialize_binding")]
    pub default_binding: Binding,
    pub case_sensitive: bool,
}

const CTRL: KeyModifiers = KeyModifiers::CONTROL;

const fn editor(
    kind: ShortcutType,
    label: &'static str,
    description: &'static str,
    default_binding: Binding,
) -> Shortcut {
    Shortcut {
        kind,
        group: ShortcutGroup::Editor,
        label,
        description,
        default_binding,
        case_sensitive: false,
    }
}

const fn application(
    kind: ShortcutType,
    label: &'static str,
    description: &'static str,
    default_binding: Binding,
) -> Shortcut {
    Shortcut {
        group: ShortcutGroup::Application,
        ..editor(kind, label, description, default_binding)
    }
}

pub static SHORTCUTS: [Shortcut; ShortcutType::COUNT] = [
    editor(
        ShortcutType::SaveNote,
        "Save note",
        "Write the current note to disk",
        Binding::char('s', CTRL),
    ),
    application(
        ShortcutType::NewNote,
        "New note",
        "Create an empty note",
        Binding::char('n', CTRL),
    ),
    editor(
        ShortcutType::DeleteNote,
        "Delete note",
        "Delete the current note",
        Binding::new(KeyCode::Delete, KeyModifiers::SHIFT),
    ),
    editor(
        ShortcutType::RenameNote,
        "Rename note",
        "Rename the current note",
        Binding::new(KeyCode::F(2), KeyModifiers::NONE),
    ),
    application(
        ShortcutType::ToggleSidebar,
        "Toggle sidebar",
        "Show or hide the note list",
        Binding::char('h', CTRL),
    ),
    application(
        ShortcutType::SearchNotes,
        "Search notes",
        "Focus the note search field",
        Binding::char('f', CTRL.union(KeyModifiers::SHIFT)),
    ),
    application(
        ShortcutType::OpenPreferences,
        "Preferences",
        "Open the preferences window",
        Binding::char(',', CTRL),
    ),
    editor(
        ShortcutType::ToggleBold,
        "Bold",
        "Toggle bold text",
        Binding::char('b', CTRL),
    ),
    editor(
        ShortcutType::ToggleItalic,
        "Italic",
        "Toggle italic text",
        Binding::char('i', CTRL),
    ),
    editor(
        ShortcutType::ToggleUnderline,
        "Underline",
        "Toggle underlined text",
        Binding::char('u', CTRL),
    ),
    editor(
        ShortcutType::ToggleMono,
        "Monospace",
        "Toggle monospace text",
        Binding::char('m', CTRL),
    ),
    editor(
        ShortcutType::TextSizeH1,
        "Heading 1",
        "Apply the heading 1 style",
        Binding::char('1', CTRL),
    ),
    editor(
        ShortcutType::TextSizeH2,
        "Heading 2",
        "Apply the heading 2 style",
        Binding::char('2', CTRL),
    ),
    editor(
        ShortcutType::TextSizeH3,
        "Heading 3",
        "Apply the heading 3 style",
        Binding::char('3', CTRL),
    ),
    editor(
        ShortcutType::TextSizeH4,
        "Heading 4",
        "Apply the heading 4 style",
        Binding::char('4', CTRL),
    ),
    editor(
        ShortcutType::TextStyleCode,
        "Code",
        "Apply the code style",
        Binding::char('5', CTRL),
    ),
    editor(
        ShortcutType::TextSizeNormal,
        "Normal text",
        "Apply the normal text style",
        Binding::char('0', CTRL),
    ),
];

fn serialize_binding<S: Serializer>(binding: &Binding, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(binding)
}
