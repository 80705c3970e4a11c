// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. style::StyleEngine)
    clippy::module_name_repetitions
)]

//! # Quillnote
//!
//! The core of a rich-text note editor, without the UI.
//!
//! - Bold, italic, underline and monospace decorations plus one font size per
//!   character, applied to a selection or queued for the next typed text
//! - Named style presets (normal, code, headings) and reporting of the style
//!   under the caret or selection
//! - A plain-text note format with inline `<tag>` markers
//! - Configurable keyboard shortcuts with persistent bindings
//!
//! ## Architecture
//!
//! A [`editor::NoteEditor`] owns the text ([`buffer::TaggedBuffer`]) and the
//! [`style::StyleEngine`] for one open note and is driven by `Message`s in
//! the Elm style. The buffer never calls back into the engine: it queues
//! [`buffer::ContainerEvent`]s, and the engine drains them and runs its
//! deferred work in [`style::StyleEngine::pump`].
//!
//! ## Modules
//!
//! - [`style`]: Tag vocabulary, presets and the style engine
//! - [`buffer`]: Text container trait and the rope-backed buffer
//! - [`codec`]: Note markup serialization
//! - [`keybinding`]: Shortcut catalog, accelerator parsing and matching
//! - [`editor`]: Note editing session
//! - [`config`]: Saved command-line defaults

pub mod buffer;
pub mod codec;
pub mod config;
pub mod editor;
pub mod keybinding;
pub mod style;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::buffer::{TaggedBuffer, TextContainer};
    pub use crate::editor::{KeyOutcome, Message, NoteEditor};
    pub use crate::keybinding::{Binding, ShortcutMatcher, ShortcutType};
    pub use crate::style::{Decoration, PresetName, Size, StyleCommand, StyleEngine};
}
