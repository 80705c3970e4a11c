//! Named style presets.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::StyleError;
use super::tags::{Decoration, Decorations, Size, TagSet};

/// A bundle of decorations plus a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StylePreset {
    pub decorations: Decorations,
    pub size: Size,
}

impl StylePreset {
    pub const fn new(decorations: Decorations, size: Size) -> Self {
        Self { decorations, size }
    }

    pub fn tags(self) -> TagSet {
        TagSet::from_style(self.decorations, self.size)
    }
}

/// Preset identifiers. `Custom` means no preset matches exactly and is never
/// applied or persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    Normal,
    Code,
    H1,
    H2,
    H3,
    H4,
    Custom,
}

impl PresetName {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Code => "code",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::Custom => "custom",
        }
    }

    /// The preset's style, or `None` for `Custom`.
    pub fn preset(self) -> Option<StylePreset> {
        PRESETS
            .iter()
            .find(|(name, _)| *name == self)
            .map(|(_, preset)| *preset)
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetName {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "code" => Ok(Self::Code),
            "h1" => Ok(Self::H1),
            "h2" => Ok(Self::H2),
            "h3" => Ok(Self::H3),
            "h4" => Ok(Self::H4),
            "custom" => Ok(Self::Custom),
            _ => Err(StyleError::InvalidPreset(s.to_string())),
        }
    }
}

/// Preset table, scanned in order when matching a style.
pub const PRESETS: [(PresetName, StylePreset); 6] = [
    (
        PresetName::Normal,
        StylePreset::new(Decorations::NONE, Size::Pt11),
    ),
    (
        PresetName::Code,
        StylePreset::new(Decorations::of(&[Decoration::Mono]), Size::Pt11),
    ),
    (
        PresetName::H1,
        StylePreset::new(Decorations::of(&[Decoration::Bold]), Size::Pt26),
    ),
    (
        PresetName::H2,
        StylePreset::new(Decorations::of(&[Decoration::Bold]), Size::Pt22),
    ),
    (
        PresetName::H3,
        StylePreset::new(Decorations::of(&[Decoration::Bold]), Size::Pt18),
    ),
    (
        PresetName::H4,
        StylePreset::new(
            Decorations::of(&[Decoration::Bold, Decoration::Italic]),
            Size::Pt14,
        ),
    ),
];

/// The style of freshly loaded or reset documents.
pub const NORMAL: StylePreset = PRESETS[0].1;

/// First preset whose decorations and size equal the given style exactly.
pub fn match_preset(decorations: Decorations, size: Option<Size>) -> (PresetName, Option<StylePreset>) {
    let Some(size) = size else {
        return (PresetName::Custom, None);
    };
    PRESETS
        .iter()
        .find(|(_, preset)| preset.decorations == decorations && preset.size == size)
        .map_or((PresetName::Custom, None), |(name, preset)| (*name, Some(*preset)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_named_preset_matches_itself() {
        for (name, preset) in PRESETS {
            assert_eq!(
                match_preset(preset.decorations, Some(preset.size)),
                (name, Some(preset))
            );
        }
    }

    #[test]
    fn test_presets_are_distinct() {
        for (i, (_, a)) in PRESETS.iter().enumerate() {
            for (_, b) in &PRESETS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_unmatched_style_is_custom() {
        let style = Decorations::of(&[Decoration::Underline]);
        assert_eq!(match_preset(style, Some(Size::Pt11)), (PresetName::Custom, None));
        assert_eq!(match_preset(Decorations::NONE, None), (PresetName::Custom, None));
    }

    #[test]
    fn test_custom_has_no_preset() {
        assert_eq!(PresetName::Custom.preset(), None);
        assert_eq!(PresetName::H2.preset().map(|p| p.size), Some(Size::Pt22));
        assert_eq!("h3".parse::<PresetName>(), Ok(PresetName::H3));
        assert!("title".parse::<PresetName>().is_err());
    }
}
