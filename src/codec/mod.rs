//! Note markup codec.
//!
//! Notes are stored as UTF-8 text with inline `<name>` / `</name>` markers
//! for every style tag. Literal `&`, `<` and `>` in the text are escaped as
//! `&amp;`, `&lt;` and `&gt;`.
//!
//! Serialization walks the container from toggle boundary to toggle boundary
//! and keeps the open markers on a stack, closing them in reverse opening
//! order. The emitted marker stream is always well nested, however the
//! underlying ranges overlap.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::buffer::TextContainer;
use crate::style::{Tag, TagSet};

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([-\w]+)>").expect("marker pattern is valid"));

/// Flatten the container's text and tags into note markup.
pub fn serialize<C: TextContainer + ?Sized>(container: &C) -> String {
    let len = container.len_chars();
    let mut out = String::with_capacity(len);
    let mut stack: Vec<Tag> = Vec::new();
    let mut at = 0;

    while at < len {
        let next = container.next_toggle(at, None).clamp(at + 1, len);
        let active = container.tags_at(at);

        // Closing a tag closes everything opened after it; the ones still
        // active are reopened straight away in their original order.
        if let Some(depth) = stack.iter().position(|tag| !active.contains(*tag)) {
            let popped = stack.split_off(depth);
            for tag in popped.iter().rev() {
                write_marker(&mut out, *tag, true);
            }
            for tag in popped {
                if active.contains(tag) {
                    write_marker(&mut out, tag, false);
                    stack.push(tag);
                }
            }
        }

        let open: TagSet = stack.iter().copied().collect();
        for tag in active.difference(open).iter() {
            write_marker(&mut out, tag, false);
            stack.push(tag);
        }

        out.push_str(&escape(&container.text_range(at..next)));
        at = next;
    }

    for tag in stack.iter().rev() {
        write_marker(&mut out, *tag, true);
    }
    out
}

/// Append decoded markup to the end of `container`, tagging each text run
/// with every marker open around it.
///
/// Unknown markers are ignored. A close marker removes the nearest open
/// marker of the same name, so mildly malformed nesting still loads. Callers
/// loading a document should run this with the style engine disabled.
pub fn deserialize<C: TextContainer + ?Sized>(markup: &str, container: &mut C) {
    let mut stack: Vec<Marker<'_>> = Vec::new();
    let mut last = 0;

    for caps in MARKER.captures_iter(markup) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            insert_run(container, &markup[last..whole.start()], &stack);
        }
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps.get(2).map_or("", |m| m.as_str());
        if closing {
            match stack.iter().rposition(|marker| marker.name() == name) {
                Some(idx) => {
                    stack.remove(idx);
                }
                None => tracing::debug!(name, "ignoring unmatched close marker"),
            }
        } else {
            let marker = Marker::parse(name);
            if let Marker::Unknown(name) = marker {
                tracing::debug!(name, "ignoring unknown marker");
            }
            stack.push(marker);
        }
        last = whole.end();
    }

    if last < markup.len() {
        insert_run(container, &markup[last..], &stack);
    }
}

/// Whether every close marker in `markup` matches the innermost open marker
/// and nothing is left open.
pub fn is_well_nested(markup: &str) -> bool {
    let mut stack: Vec<&str> = Vec::new();
    for caps in MARKER.captures_iter(markup) {
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps.get(2).map_or("", |m| m.as_str());
        if closing {
            if stack.pop() != Some(name) {
                return false;
            }
        } else {
            stack.push(name);
        }
    }
    stack.is_empty()
}

/// Escape `&`, `<` and `>` in a text run.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Reverse [`escape`]. Unrecognised entities are kept verbatim.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        let (decoded, consumed) = if rest.starts_with("&amp;") {
            ('&', 5)
        } else if rest.starts_with("&lt;") {
            ('<', 4)
        } else if rest.starts_with("&gt;") {
            ('>', 4)
        } else {
            ('&', 1)
        };
        out.push(decoded);
        rest = &rest[consumed..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[derive(Debug, Clone, Copy)]
enum Marker<'a> {
    Known(Tag),
    Unknown(&'a str),
}

impl<'a> Marker<'a> {
    fn parse(name: &'a str) -> Self {
        name.parse::<Tag>().map_or(Self::Unknown(name), Self::Known)
    }

    const fn name(self) -> &'a str {
        match self {
            Self::Known(tag) => tag.name(),
            Self::Unknown(name) => name,
        }
    }
}

fn insert_run<C: TextContainer + ?Sized>(container: &mut C, raw: &str, stack: &[Marker<'_>]) {
    let text = unescape(raw);
    let at = container.len_chars();
    let range = container.insert(at, &text);
    for marker in stack {
        if let Marker::Known(tag) = marker {
            container.apply_tag(*tag, range.clone());
        }
    }
}

fn write_marker(out: &mut String, tag: Tag, closing: bool) {
    out.push('<');
    if closing {
        out.push('/');
    }
    out.push_str(tag.name());
    out.push('>');
}
