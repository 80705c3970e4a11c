//! The fixed tag vocabulary: decorations, sizes and compact sets of both.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::StyleError;

/// An independently toggleable text attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoration {
    Bold,
    Italic,
    Underline,
    Mono,
}

impl Decoration {
    /// Every decoration, in marker order.
    pub const ALL: [Self; 4] = [Self::Bold, Self::Italic, Self::Underline, Self::Mono];

    /// Marker name used in the note format.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Mono => "mono",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Bold => 1,
            Self::Italic => 1 << 1,
            Self::Underline => 1 << 2,
            Self::Mono => 1 << 3,
        }
    }
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Decoration {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| StyleError::InvalidTag(s.to_string()))
    }
}

/// A font size. At most one size applies to any offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Size {
    Pt10,
    Pt11,
    Pt12,
    Pt14,
    Pt16,
    Pt18,
    Pt20,
    Pt22,
    Pt26,
    Pt32,
}

impl Size {
    /// Every size, smallest first.
    pub const ALL: [Self; 10] = [
        Self::Pt10,
        Self::Pt11,
        Self::Pt12,
        Self::Pt14,
        Self::Pt16,
        Self::Pt18,
        Self::Pt20,
        Self::Pt22,
        Self::Pt26,
        Self::Pt32,
    ];

    /// Size in points.
    pub const fn points(self) -> u8 {
        match self {
            Self::Pt10 => 10,
            Self::Pt11 => 11,
            Self::Pt12 => 12,
            Self::Pt14 => 14,
            Self::Pt16 => 16,
            Self::Pt18 => 18,
            Self::Pt20 => 20,
            Self::Pt22 => 22,
            Self::Pt26 => 26,
            Self::Pt32 => 32,
        }
    }

    /// Look up a size by its point value.
    ///
    /// # Errors
    /// Returns [`StyleError::InvalidSize`] for point values outside the fixed set.
    pub fn from_points(points: u32) -> Result<Self, StyleError> {
        Self::ALL
            .into_iter()
            .find(|s| u32::from(s.points()) == points)
            .ok_or(StyleError::InvalidSize(points))
    }

    /// Marker name used in the note format (`size-<points>`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pt10 => "size-10",
            Self::Pt11 => "size-11",
            Self::Pt12 => "size-12",
            Self::Pt14 => "size-14",
            Self::Pt16 => "size-16",
            Self::Pt18 => "size-18",
            Self::Pt20 => "size-20",
            Self::Pt22 => "size-22",
            Self::Pt26 => "size-26",
            Self::Pt32 => "size-32",
        }
    }

    const fn ordinal(self) -> usize {
        match self {
            Self::Pt10 => 0,
            Self::Pt11 => 1,
            Self::Pt12 => 2,
            Self::Pt14 => 3,
            Self::Pt16 => 4,
            Self::Pt18 => 5,
            Self::Pt20 => 6,
            Self::Pt22 => 7,
            Self::Pt26 => 8,
            Self::Pt32 => 9,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.points())
    }
}

impl Serialize for Size {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.points())
    }
}

impl FromStr for Size {
    type Err = StyleError;

    /// Accepts either the marker name (`size-14`) or the bare point value (`14`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("size-").unwrap_or(s);
        let points = digits
            .parse::<u32>()
            .map_err(|_| StyleError::InvalidTag(s.to_string()))?;
        Self::from_points(points)
    }
}

/// Any style tag that can be applied over a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Decoration(Decoration),
    Size(Size),
}

impl Tag {
    /// Number of distinct tags.
    pub const COUNT: usize = Decoration::ALL.len() + Size::ALL.len();

    /// Every tag in stable order: decorations first, then sizes ascending.
    /// Markers are opened in this order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Decoration(Decoration::Bold),
        Self::Decoration(Decoration::Italic),
        Self::Decoration(Decoration::Underline),
        Self::Decoration(Decoration::Mono),
        Self::Size(Size::Pt10),
        Self::Size(Size::Pt11),
        Self::Size(Size::Pt12),
        Self::Size(Size::Pt14),
        Self::Size(Size::Pt16),
        Self::Size(Size::Pt18),
        Self::Size(Size::Pt20),
        Self::Size(Size::Pt22),
        Self::Size(Size::Pt26),
        Self::Size(Size::Pt32),
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Decoration(d) => d.name(),
            Self::Size(s) => s.name(),
        }
    }

    /// Dense index into [`Tag::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::Decoration(Decoration::Bold) => 0,
            Self::Decoration(Decoration::Italic) => 1,
            Self::Decoration(Decoration::Underline) => 2,
            Self::Decoration(Decoration::Mono) => 3,
            Self::Size(s) => 4 + s.ordinal(),
        }
    }

    pub const fn is_size(self) -> bool {
        matches!(self, Self::Size(_))
    }
}

impl From<Decoration> for Tag {
    fn from(value: Decoration) -> Self {
        Self::Decoration(value)
    }
}

impl From<Size> for Tag {
    fn from(value: Size) -> Self {
        Self::Size(value)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tag {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| StyleError::InvalidTag(s.to_string()))
    }
}

/// A compact set of decorations.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Decorations(u8);

impl Decorations {
    pub const NONE: Self = Self(0);

    /// Build a set from a list; usable in constant tables.
    pub const fn of(list: &[Decoration]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < list.len() {
            bits |= list[i].bit();
            i += 1;
        }
        Self(bits)
    }

    pub const fn contains(self, decoration: Decoration) -> bool {
        self.0 & decoration.bit() != 0
    }

    pub const fn insert(&mut self, decoration: Decoration) {
        self.0 |= decoration.bit();
    }

    pub const fn remove(&mut self, decoration: Decoration) {
        self.0 &= !decoration.bit();
    }

    pub const fn set(&mut self, decoration: Decoration, active: bool) {
        if active {
            self.insert(decoration);
        } else {
            self.remove(decoration);
        }
    }

    /// Flip a decoration, returning its new state.
    pub const fn toggle(&mut self, decoration: Decoration) -> bool {
        self.0 ^= decoration.bit();
        self.contains(decoration)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Decoration> {
        Decoration::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Decoration> for Decorations {
    fn from_iter<I: IntoIterator<Item = Decoration>>(iter: I) -> Self {
        let mut set = Self::NONE;
        for decoration in iter {
            set.insert(decoration);
        }
        set
    }
}

impl fmt::Debug for Decorations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Decoration::name)).finish()
    }
}

impl Serialize for Decorations {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A compact set over all [`Tag`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagSet(u16);

impl TagSet {
    pub const EMPTY: Self = Self(0);

    pub const fn contains(self, tag: Tag) -> bool {
        self.0 & (1 << tag.index()) != 0
    }

    pub const fn insert(&mut self, tag: Tag) {
        self.0 |= 1 << tag.index();
    }

    pub const fn remove(&mut self, tag: Tag) {
        self.0 &= !(1 << tag.index());
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Tags in `self` that are not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Members in [`Tag::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = Tag> {
        Tag::ALL.into_iter().filter(move |t| self.contains(*t))
    }

    pub fn decorations(self) -> Decorations {
        Decoration::ALL
            .into_iter()
            .filter(|d| self.contains(Tag::Decoration(*d)))
            .collect()
    }

    pub fn sizes(self) -> impl Iterator<Item = Size> {
        Size::ALL
            .into_iter()
            .filter(move |s| self.contains(Tag::Size(*s)))
    }

    /// The smallest size present, if any.
    pub fn size(self) -> Option<Size> {
        self.sizes().next()
    }

    /// Build the full tag set for a decoration bundle and size.
    pub fn from_style(decorations: Decorations, size: Size) -> Self {
        let mut set: Self = decorations.iter().map(Tag::Decoration).collect();
        set.insert(Tag::Size(size));
        set
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Tag::name)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_index_matches_all_order() {
        for (i, tag) in Tag::ALL.iter().enumerate() {
            assert_eq!(tag.index(), i, "{tag}");
        }
    }

    #[test]
    fn test_tag_names_parse_back() {
        for tag in Tag::ALL {
            assert_eq!(tag.name().parse::<Tag>().unwrap(), tag);
        }
        assert_eq!(
            "strike".parse::<Tag>(),
            Err(StyleError::InvalidTag("strike".to_string()))
        );
    }

    #[test]
    fn test_size_from_points_rejects_unknown_values() {
        assert_eq!(Size::from_points(26), Ok(Size::Pt26));
        assert_eq!(Size::from_points(13), Err(StyleError::InvalidSize(13)));
        assert_eq!("14".parse::<Size>(), Ok(Size::Pt14));
        assert_eq!("size-32".parse::<Size>(), Ok(Size::Pt32));
        assert!("size-x".parse::<Size>().is_err());
    }

    #[test]
    fn test_decorations_toggle_and_iter() {
        let mut set = Decorations::of(&[Decoration::Bold, Decoration::Mono]);
        assert!(set.contains(Decoration::Bold));
        assert!(!set.toggle(Decoration::Bold));
        assert!(set.toggle(Decoration::Italic));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Decoration::Italic, Decoration::Mono]
        );
    }

    #[test]
    fn test_tag_set_splits_into_decorations_and_size() {
        let set = TagSet::from_style(Decorations::of(&[Decoration::Underline]), Size::Pt18);
        assert_eq!(set.len(), 2);
        assert_eq!(set.decorations(), Decorations::of(&[Decoration::Underline]));
        assert_eq!(set.size(), Some(Size::Pt18));
        assert_eq!(format!("{set:?}"), r#"{"underline", "size-18"}"#);
    }
}
