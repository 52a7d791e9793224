//! Document storage.
//!
//! Buffers are treated as values: a mutation clones the live version and edits
//! the clone, and the history keeps whole versions. Cloning an [`EditorRope`]
//! shares the rope's tree, so old versions cost little.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// Character-addressed text storage.
///
/// Every offset here counts Unicode scalar values.
pub trait TextBuffer {
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    fn insert(&mut self, at: usize, text: &str);

    fn delete(&mut self, range: Range<usize>);

    fn push(&mut self, text: &str) {
        self.insert(self.len_chars(), text);
    }

    fn replace(&mut self, range: Range<usize>, text: &str) {
        let at = range.start;
        self.delete(range);
        self.insert(at, text);
    }

    /// Text in `range`, or `None` when the range is reversed or past the end.
    fn slice(&self, range: Range<usize>) -> Option<SmolStr>;

    fn char_at(&self, offset: usize) -> Option<char>;

    fn to_string(&self) -> String;
}

/// [`TextBuffer`] over a `ropey::Rope`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorRope(ropey::Rope);

impl EditorRope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(text: &str) -> Self {
        Self(ropey::Rope::from_str(text))
    }

    pub fn rope(&self) -> &ropey::Rope {
        &self.0
    }

    /// Number of lines, counting a trailing empty line after a final `\n`.
    pub fn line_count(&self) -> usize {
        self.0.len_lines()
    }

    fn in_bounds(&self, range: &Range<usize>) -> bool {
        range.start <= range.end && range.end <= self.0.len_chars()
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.0.len_chars()
    }

    fn insert(&mut self, at: usize, text: &str) {
        self.0.insert(at, text);
    }

    fn delete(&mut self, range: Range<usize>) {
        self.0.remove(range);
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.in_bounds(&range)
            .then(|| self.0.slice(range).to_smolstr())
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.0.get_char(offset)
    }

    fn to_string(&self) -> String {
        String::from(&self.0)
    }
}

impl From<&str> for EditorRope {
    fn from(text: &str) -> Self {
        Self::from_str(text)
    }
}

impl From<String> for EditorRope {
    fn from(text: String) -> Self {
        Self::from_str(&text)
    }
}
