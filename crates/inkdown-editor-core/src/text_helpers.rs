//! Line navigation and list-marker helpers.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::text::TextBuffer;
use crate::types::Selection;

/// `- `, `* `, `<n>. ` with an optional task box, plus leading indentation.
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*]|\d+\.)\s+(?:\[[ xX]\]\s+)?").expect("list marker pattern")
});

/// Find start of line containing offset.
pub fn find_line_start<B: TextBuffer + ?Sized>(buffer: &B, offset: usize) -> usize {
    let mut pos = offset.min(buffer.len_chars());
    while pos > 0 {
        if let Some('\n') = buffer.char_at(pos - 1) {
            return pos;
        }
        pos -= 1;
    }
    0
}

/// Find end of line containing offset (position of newline or end of doc).
pub fn find_line_end<B: TextBuffer + ?Sized>(buffer: &B, offset: usize) -> usize {
    let len = buffer.len_chars();
    let mut pos = offset;
    while pos < len {
        if let Some('\n') = buffer.char_at(pos) {
            return pos;
        }
        pos += 1;
    }
    len
}

/// Expand a selection to the full lines it touches.
///
/// The result never includes the trailing newline of the last line.
pub fn line_span<B: TextBuffer + ?Sized>(buffer: &B, selection: Selection) -> Range<usize> {
    let selection = selection.clamp(buffer.len_chars());
    find_line_start(buffer, selection.start)..find_line_end(buffer, selection.end)
}

/// Remove a leading list marker from a single line, if it has one.
pub fn strip_list_marker(line: &str) -> &str {
    match LIST_MARKER.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditorRope;

    #[test]
    fn test_find_line_start() {
        let rope = EditorRope::from_str("hello\nworld\ntest");

        assert_eq!(find_line_start(&rope, 0), 0);
        assert_eq!(find_line_start(&rope, 3), 0);
        assert_eq!(find_line_start(&rope, 5), 0); // at newline
        assert_eq!(find_line_start(&rope, 6), 6);
        assert_eq!(find_line_start(&rope, 8), 6);
        assert_eq!(find_line_start(&rope, 12), 12);
    }

    #[test]
    fn test_find_line_end() {
        let rope = EditorRope::from_str("hello\nworld\ntest");

        assert_eq!(find_line_end(&rope, 0), 5);
        assert_eq!(find_line_end(&rope, 3), 5);
        assert_eq!(find_line_end(&rope, 6), 11);
        assert_eq!(find_line_end(&rope, 12), 16);
        assert_eq!(find_line_end(&rope, 99), 16);
    }

    #[test]
    fn test_line_span_covers_partial_selection() {
        let rope = EditorRope::from_str("one\ntwo\nthree");
        assert_eq!(line_span(&rope, Selection::new(5, 9)), 4..13);
        assert_eq!(line_span(&rope, Selection::caret(1)), 0..3);
    }

    #[test]
    fn test_strip_list_marker() {
        assert_eq!(strip_list_marker("- a"), "a");
        assert_eq!(strip_list_marker("* a"), "a");
        assert_eq!(strip_list_marker("12. a"), "a");
        assert_eq!(strip_list_marker("  - [x] done"), "done");
        assert_eq!(strip_list_marker("plain"), "plain");
        assert_eq!(strip_list_marker("**bold**"), "**bold**");
        assert_eq!(strip_list_marker("-5 degrees"), "-5 degrees");
    }
}
