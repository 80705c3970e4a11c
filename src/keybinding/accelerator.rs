//! Key chords and the accelerator-name grammar (`<Control><Shift>s`).

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::AcceleratorError;

/// A key plus a modifier mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
}

/// Modifier spellings in output order. Lookups are case-insensitive and also
/// accept the aliases in [`MODIFIER_ALIASES`].
const MODIFIER_NAMES: [(&str, KeyModifiers); 6] = [
    ("Shift", KeyModifiers::SHIFT),
    ("Control", KeyModifiers::CONTROL),
    ("Alt", KeyModifiers::ALT),
    ("Super", KeyModifiers::SUPER),
    ("Hyper", KeyModifiers::HYPER),
    ("Meta", KeyModifiers::META),
];

const MODIFIER_ALIASES: [(&str, KeyModifiers); 5] = [
    ("ctrl", KeyModifiers::CONTROL),
    ("ctl", KeyModifiers::CONTROL),
    ("primary", KeyModifiers::CONTROL),
    ("shft", KeyModifiers::SHIFT),
    ("mod1", KeyModifiers::ALT),
];

/// Named keys. Characters listed here are always written by name.
const NAMED_KEYS: [(&str, KeyCode); 31] = [
    ("space", KeyCode::Char(' ')),
    ("comma", KeyCode::Char(',')),
    ("period", KeyCode::Char('.')),
    ("minus", KeyCode::Char('-')),
    ("plus", KeyCode::Char('+')),
    ("equal", KeyCode::Char('=')),
    ("slash", KeyCode::Char('/')),
    ("backslash", KeyCode::Char('\\')),
    ("semicolon", KeyCode::Char(';')),
    ("apostrophe", KeyCode::Char('\'')),
    ("grave", KeyCode::Char('`')),
    ("bracketleft", KeyCode::Char('[')),
    ("bracketright", KeyCode::Char(']')),
    ("less", KeyCode::Char('<')),
    ("greater", KeyCode::Char('>')),
    ("Return", KeyCode::Enter),
    ("Escape", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("ISO_Left_Tab", KeyCode::BackTab),
    ("BackSpace", KeyCode::Backspace),
    ("Delete", KeyCode::Delete),
    ("Insert", KeyCode::Insert),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("Page_Up", KeyCode::PageUp),
    ("Page_Down", KeyCode::PageDown),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Menu", KeyCode::Menu),
];

impl Binding {
    pub const fn new(key: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    /// A character key with the given modifiers.
    pub const fn char(ch: char, modifiers: KeyModifiers) -> Self {
        Self::new(KeyCode::Char(ch), modifiers)
    }

    pub const fn from_key_event(event: &KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }

    /// Whether this input chord triggers `stored`.
    ///
    /// Keys must be equal (or equal after lower-casing when the shortcut is
    /// case-insensitive). Every modifier of `stored` must be held; extra
    /// modifiers in the input are allowed.
    pub fn triggers(self, stored: Self, case_sensitive: bool) -> bool {
        keys_equal(self.key, stored.key, case_sensitive) && self.modifiers.contains(stored.modifiers)
    }

    /// Whether both chords are the same binding (same key and exactly the
    /// same modifiers).
    pub fn same_as(self, other: Self, case_sensitive: bool) -> bool {
        keys_equal(self.key, other.key, case_sensitive) && self.modifiers == other.modifiers
    }

    /// Accelerator-name form, or `None` for keys the grammar cannot express.
    pub fn accelerator_name(self) -> Option<String> {
        let key = key_name(self.key)?;
        let mut out = String::new();
        for (name, modifier) in MODIFIER_NAMES {
            if self.modifiers.contains(modifier) {
                out.push('<');
                out.push_str(name);
                out.push('>');
            }
        }
        out.push_str(&key);
        Some(out)
    }

    /// Human-readable label, e.g. `Ctrl+Shift+F`.
    pub fn label(self) -> String {
        let mut parts: Vec<Cow<'static, str>> = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".into());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".into());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".into());
        }
        if self.modifiers.contains(KeyModifiers::SUPER) {
            parts.push("Super".into());
        }
        let key = match self.key {
            KeyCode::Char(ch) if ch.is_alphabetic() => ch.to_uppercase().collect::<String>().into(),
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(ch) => ch.to_string().into(),
            other => key_name(other).unwrap_or_else(|| format!("{other:?}").into()),
        };
        parts.push(key);
        parts.join("+")
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accelerator_name() {
            Some(name) => f.write_str(&name),
            None => write!(f, "{:?}", self.key),
        }
    }
}

impl FromStr for Binding {
    type Err = AcceleratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_accelerator(s)
    }
}

/// Parse an accelerator name such as `<Control><Shift>f` or `F2`.
///
/// # Errors
/// Returns an [`AcceleratorError`] for empty input, unclosed or unknown
/// modifiers, a missing key, or an unknown key name.
pub fn parse_accelerator(text: &str) -> Result<Binding, AcceleratorError> {
    let mut rest = text.trim();
    if rest.is_empty() {
        return Err(AcceleratorError::Empty);
    }
    let mut modifiers = KeyModifiers::NONE;
    while let Some(after) = rest.strip_prefix('<') {
        let Some(end) = after.find('>') else {
            return Err(AcceleratorError::Unclosed(text.to_string()));
        };
        let name = &after[..end];
        let modifier = modifier_from_name(name)
            .ok_or_else(|| AcceleratorError::UnknownModifier(name.to_string()))?;
        modifiers |= modifier;
        rest = &after[end + 1..];
    }
    if rest.is_empty() {
        return Err(AcceleratorError::MissingKey(text.to_string()));
    }
    let key = key_from_name(rest).ok_or_else(|| AcceleratorError::UnknownKey(rest.to_string()))?;
    Ok(Binding::new(key, modifiers))
}

fn modifier_from_name(name: &str) -> Option<KeyModifiers> {
    MODIFIER_NAMES
        .iter()
        .chain(MODIFIER_ALIASES.iter())
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, modifier)| *modifier)
}

fn key_from_name(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(ch));
    }
    if let Some(code) = NAMED_KEYS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
    {
        return Some(code);
    }
    let number = name.strip_prefix(['F', 'f'])?.parse::<u8>().ok()?;
    (1..=35).contains(&number).then_some(KeyCode::F(number))
}

fn key_name(code: KeyCode) -> Option<Cow<'static, str>> {
    if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, candidate)| *candidate == code) {
        return Some(Cow::Borrowed(name));
    }
    match code {
        KeyCode::Char(ch) => Some(Cow::Owned(ch.to_string())),
        KeyCode::F(n) => Some(Cow::Owned(format!("F{n}"))),
        _ => None,
    }
}

fn keys_equal(a: KeyCode, b: KeyCode, case_sensitive: bool) -> bool {
    a == b || (!case_sensitive && lower(a) == lower(b))
}

fn lower(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(ch) => KeyCode::Char(ch.to_lowercase().next().unwrap_or(ch)),
        other => other,
    }
}
