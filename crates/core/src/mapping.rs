//! Offset mapping between UTF-16 code units and UTF-8 byte positions
//!
//! Every offset that crosses the crate boundary is counted in UTF-16 code
//! units, while Rust strings are indexed by byte. `TextIndex` records both
//! positions for every char boundary of a text so that spans can be sliced,
//! clamped and searched without ever splitting a character.

use serde::{Deserialize, Serialize};

/// Represents a span of text in UTF-16 code units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharSpan {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl CharSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: CharSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Create a point span (zero-width)
    pub fn point(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Shift both ends by `offset`
    pub fn offset_by(&self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }
}

/// Number of UTF-16 code units needed to encode `text`
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Char-boundary index over a borrowed text
///
/// Boundaries are stored in two parallel, strictly increasing vectors (one
/// entry per char plus a sentinel for the end of the text), so conversions in
/// either direction are a binary search.
#[derive(Debug, Clone)]
pub struct TextIndex<'a> {
    text: &'a str,
    utf16: Vec<usize>,
    bytes: Vec<usize>,
}

impl<'a> TextIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut utf16 = Vec::with_capacity(text.len() + 1);
        let mut bytes = Vec::with_capacity(text.len() + 1);
        let mut unit = 0;

        for (pos, ch) in text.char_indices() {
            utf16.push(unit);
            bytes.push(pos);
            unit += ch.len_utf16();
        }
        utf16.push(unit);
        bytes.push(text.len());

        Self { text, utf16, bytes }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Length of the text in UTF-16 code units
    pub fn len_utf16(&self) -> usize {
        self.utf16.last().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset of an exact char boundary, `None` inside a surrogate pair
    /// or past the end
    pub fn byte_at(&self, unit: usize) -> Option<usize> {
        self.utf16
            .binary_search(&unit)
            .ok()
            .map(|i| self.bytes[i])
    }

    /// Byte offset of the closest boundary at or before `unit`
    pub fn floor_byte(&self, unit: usize) -> usize {
        let i = self.utf16.partition_point(|&u| u <= unit);
        self.bytes[i.saturating_sub(1)]
    }

    /// UTF-16 offset of a byte position that sits on a char boundary
    pub fn unit_at(&self, byte: usize) -> Option<usize> {
        self.bytes
            .binary_search(&byte)
            .ok()
            .map(|i| self.utf16[i])
    }

    /// Clamp an untrusted `[start, end)` pair into the text
    pub fn clamp(&self, start: usize, end: usize) -> CharSpan {
        let len = self.len_utf16();
        let start = start.min(len);
        let end = end.clamp(start, len);
        CharSpan::new(start, end)
    }

    /// Substring covered by `span`; `None` unless both ends are boundaries
    pub fn slice(&self, span: CharSpan) -> Option<&'a str> {
        if span.start > span.end {
            return None;
        }
        let start = self.byte_at(span.start)?;
        let end = self.byte_at(span.end)?;
        self.text.get(start..end)
    }

    /// Byte range of the window `[start, end)` snapped outward-safe to
    /// boundaries (both ends floored)
    pub fn byte_window(&self, start: usize, end: usize) -> (usize, usize) {
        let lo = self.floor_byte(start);
        let hi = self.floor_byte(end).max(lo);
        (lo, hi)
    }

    /// Convert a byte range known to lie on boundaries into a UTF-16 span
    pub fn span_of_bytes(&self, start: usize, end: usize) -> Option<CharSpan> {
        Some(CharSpan::new(self.unit_at(start)?, self.unit_at(end)?))
    }
}
