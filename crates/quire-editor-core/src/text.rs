//! Selection-indexed markdown transformations.
//!
//! Every function here is pure: it takes the document text plus a selection
//! (character offsets) and returns a new string. Nothing is toggled. Applying
//! bold twice nests the markers (`****x****`); callers wanting toggle
//! semantics must look at the text themselves.
//!
//! Offsets that are backwards or past the end of the text are normalized and
//! clamped before slicing, so any `(start, end)` pair produces output.

use crate::types::SelectionRange;

/// Marker used for bold text.
pub const BOLD_MARKER: &str = "**";
/// Marker used for italic text.
pub const ITALIC_MARKER: &str = "*";
/// Heading level used when none is given.
pub const DEFAULT_HEADING_LEVEL: u8 = 2;
/// Prefix for an unordered list item.
pub const BULLET_PREFIX: &str = "- ";
/// Prefix for an ordered list item.
pub const NUMBERED_PREFIX: &str = "1. ";
/// Alt text used for images inserted without one.
pub const DEFAULT_IMAGE_ALT: &str = "image";

/// Byte index of the `char_offset`-th character, or the text length.
fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Split `text` into (before, selected, after) around a character range.
fn split_at_selection(text: &str, start: usize, end: usize) -> (&str, &str, &str) {
    let range = SelectionRange::new(start, end).clamp_to(text.chars().count());
    let start = byte_offset(text, range.start);
    let end = start + byte_offset(&text[start..], range.len());
    (&text[..start], &text[start..end], &text[end..])
}

/// `before + marker + selected + marker + after`.
pub fn wrap_selection(text: &str, start: usize, end: usize, marker: &str) -> String {
    let (before, selected, after) = split_at_selection(text, start, end);
    let mut out = String::with_capacity(text.len() + marker.len() * 2);
    out.push_str(before);
    out.push_str(marker);
    out.push_str(selected);
    out.push_str(marker);
    out.push_str(after);
    out
}

/// `before + prefix + selected + after`.
///
/// The prefix lands exactly at `start`, not at the beginning of the line that
/// contains it. Selecting the middle of a line and asking for a heading
/// produces `foo ## bar`.
pub fn prefix_at_start(text: &str, start: usize, end: usize, prefix: &str) -> String {
    let (before, selected, after) = split_at_selection(text, start, end);
    let mut out = String::with_capacity(text.len() + prefix.len());
    out.push_str(before);
    out.push_str(prefix);
    out.push_str(selected);
    out.push_str(after);
    out
}

/// `before + "[" + selected + "](" + url + ")" + after`.
pub fn insert_link(text: &str, start: usize, end: usize, url: &str) -> String {
    let (before, selected, after) = split_at_selection(text, start, end);
    format!("{before}[{selected}]({url}){after}")
}

/// Fence the selection as a code block:
/// `before + "\n```" + language + "\n" + selected + "\n```\n" + after`.
pub fn insert_code_block(text: &str, start: usize, end: usize, language: &str) -> String {
    let (before, selected, after) = split_at_selection(text, start, end);
    format!("{before}\n```{language}\n{selected}\n```\n{after}")
}

/// Insert an image reference at `at`, leaving the surrounding text intact.
pub fn insert_image(text: &str, at: usize, url: &str, alt: &str) -> String {
    let (before, _, after) = split_at_selection(text, at, at);
    format!("{before}![{alt}]({url}){after}")
}

pub fn apply_bold(text: &str, start: usize, end: usize) -> String {
    wrap_selection(text, start, end, BOLD_MARKER)
}

pub fn apply_italic(text: &str, start: usize, end: usize) -> String {
    wrap_selection(text, start, end, ITALIC_MARKER)
}

/// Heading prefix for `level`, clamped to markdown's 1..=6.
pub fn heading_prefix(level: u8) -> String {
    let level = level.clamp(1, 6) as usize;
    format!("{} ", "#".repeat(level))
}

pub fn apply_heading(text: &str, start: usize, end: usize, level: u8) -> String {
    prefix_at_start(text, start, end, &heading_prefix(level))
}

pub fn insert_list(text: &str, start: usize, end: usize, ordered: bool) -> String {
    let prefix = if ordered {
        NUMBERED_PREFIX
    } else {
        BULLET_PREFIX
    };
    prefix_at_start(text, start, end, prefix)
}
