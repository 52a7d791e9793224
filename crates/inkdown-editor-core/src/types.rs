use std::ops::Range;

/// Char range the user has selected. A caret when both ends meet.
///
/// Always ordered: `start <= end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Selection between two offsets given in either order.
    pub fn new(anchor: usize, head: usize) -> Self {
        let (start, end) = if anchor <= head {
            (anchor, head)
        } else {
            (head, anchor)
        };
        Self { start, end }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Everything in a buffer of `len` chars.
    pub fn all(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn is_empty(&self) -> bool {
        self.is_caret()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Clip to a buffer of `len` chars. Selections that survive an undo may
    /// point past the restored text.
    pub fn clamp(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}
