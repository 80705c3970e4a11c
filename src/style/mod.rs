//! Rich-text styling: the tag vocabulary, presets and the style engine.
//!
//! The vocabulary is fixed at compile time. Engine operations take typed
//! [`Decoration`], [`Size`] and [`PresetName`] values, so names are only
//! validated where they enter as text (via `FromStr`).

mod engine;
mod preset;
mod tags;

pub use engine::{PendingStyle, StyleCommand, StyleEngine, StyleReport, is_tag_fully_applied};
pub use preset::{NORMAL, PRESETS, PresetName, StylePreset, match_preset};
pub use tags::{Decoration, Decorations, Size, Tag, TagSet};

/// Invalid names or values for the fixed style vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    #[error("invalid style tag: {0}")]
    InvalidTag(String),
    #[error("invalid text size: {0}")]
    InvalidSize(u32),
    #[error("invalid style preset: {0}")]
    InvalidPreset(String),
}
