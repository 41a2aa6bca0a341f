//! Selection type shared by the transformation library and the dispatcher.

/// A selected sub-range of document text, measured in character offsets
/// (NOT byte offsets).
///
/// A well-formed range satisfies `start <= end <= len(text)`. Ranges coming
/// from a UI may be backwards or stale; [`SelectionRange::clamp_to`] turns any
/// pair into a well-formed range for a given text length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed selection (plain cursor).
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize range so start <= end.
    pub fn normalize(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }

    /// Normalize, then clamp both ends to `len` characters.
    pub fn clamp_to(self, len: usize) -> Self {
        let range = self.normalize();
        Self {
            start: range.start.min(len),
            end: range.end.min(len),
        }
    }
}

impl From<std::ops::Range<usize>> for SelectionRange {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<SelectionRange> for std::ops::Range<usize> {
    fn from(r: SelectionRange) -> Self {
        r.start..r.end
    }
}
