//! Core editor document trait and implementations.
//!
//! Defines the `EditorDocument` trait for abstracting editor state, so the
//! dispatch in [`crate::execute`] can run against a plain field-based editor
//! or a host's own reactive store.

use std::ops::Range;

use inkdown_common::config::HistoryConfig;
use smol_str::SmolStr;
use tokio::sync::watch;
use web_time::Instant;

use crate::headers::{HeaderRecord, extract_headers};
use crate::text::{EditorRope, TextBuffer};
use crate::transform::Edit;
use crate::types::Selection;
use crate::undo::{HistoryStack, UndoManager};

/// Core trait for editor documents.
///
/// Mutations arrive as whole [`Edit`]s, so the buffer/selection pair is
/// replaced in one step and never observed half-updated.
pub trait EditorDocument {
    /// The buffer type used for text storage.
    type Buffer: TextBuffer + Clone;

    // === Required ===

    /// The live buffer.
    fn buffer(&self) -> &Self::Buffer;

    fn selection(&self) -> Selection;

    fn set_selection(&mut self, selection: Selection);

    /// Install the result of a mutation. Goes through history.
    fn apply(&mut self, edit: Edit<Self::Buffer>);

    /// Step back one history entry. Returns true if the buffer changed.
    fn undo(&mut self) -> bool;

    // === Provided ===

    /// Current selection, pulled inside the buffer.
    fn clamped_selection(&self) -> Selection {
        self.selection().clamp(self.len_chars())
    }

    /// Get the full content as a String.
    fn content_string(&self) -> String {
        self.buffer().to_string()
    }

    /// Get length in characters.
    fn len_chars(&self) -> usize {
        self.buffer().len_chars()
    }

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.buffer().slice(range)
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.buffer().char_at(offset)
    }

    /// Get selected text, if the selection is not a caret.
    fn selected_text(&self) -> Option<SmolStr> {
        let selection = self.clamped_selection();
        if selection.is_caret() {
            return None;
        }
        self.slice(selection.to_range())
    }
}

/// Field-based editor session.
///
/// Owns the debounced history, the current selection, the derived heading
/// outline and a change notifier that always carries the latest buffer.
pub struct PlainEditor<T = EditorRope> {
    history: HistoryStack<T>,
    selection: Selection,
    headers: Vec<HeaderRecord>,
    notifier: watch::Sender<T>,
}

impl PlainEditor<EditorRope> {
    /// Start a session with `text` as the initial content.
    pub fn from_text(text: &str, config: &HistoryConfig) -> Self {
        Self::new(EditorRope::from_str(text), config)
    }
}

impl<T: TextBuffer + Clone + PartialEq> PlainEditor<T> {
    pub fn new(buffer: T, config: &HistoryConfig) -> Self {
        let headers = extract_headers(&buffer.to_string());
        let (notifier, _) = watch::channel(buffer.clone());
        Self {
            history: HistoryStack::new(buffer, config, Instant::now()),
            selection: Selection::default(),
            headers,
            notifier,
        }
    }

    /// Receiver that yields every new live buffer version.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.notifier.subscribe()
    }

    /// Heading outline of the live buffer.
    pub fn headers(&self) -> &[HeaderRecord] {
        &self.headers
    }

    pub fn history(&self) -> &HistoryStack<T> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Record an edit that happened at `now`.
    pub fn apply_at(&mut self, edit: Edit<T>, now: Instant) {
        self.history.record_change(edit.buffer, now);
        self.selection = edit.selection;
        self.live_changed();
    }

    /// Undo as of `now`.
    pub fn undo_at(&mut self, now: Instant) -> bool {
        if !self.history.undo_at(now) {
            return false;
        }
        self.selection = self.selection.clamp(self.history.live().len_chars());
        self.live_changed();
        true
    }

    /// Commit a pending history entry whose deadline has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.history.tick(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.history.next_deadline()
    }

    /// Wait out the debounce window and commit the pending entry, if any.
    pub async fn settle(&mut self) {
        if let Some(deadline) = self.history.next_deadline() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            tokio::time::sleep(remaining).await;
            self.history.tick(deadline);
        }
    }

    fn live_changed(&mut self) {
        let live = self.history.live();
        self.headers = extract_headers(&live.to_string());
        self.notifier.send_replace(live.clone());
    }
}

impl<T: TextBuffer + Clone + PartialEq> EditorDocument for PlainEditor<T> {
    type Buffer = T;

    fn buffer(&self) -> &T {
        self.history.live()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp(self.len_chars());
    }

    fn apply(&mut self, edit: Edit<T>) {
        self.apply_at(edit, Instant::now());
    }

    fn undo(&mut self) -> bool {
        self.undo_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::wrap_selection;
    use std::time::Duration;

    #[test]
    fn test_apply_updates_headers_and_notifier() {
        let mut editor = PlainEditor::from_text("intro", &HistoryConfig::default());
        let rx = editor.subscribe();
        assert!(editor.headers().is_empty());

        let edit = wrap_selection(editor.buffer(), Selection::caret(0), "# ", "");
        editor.apply(edit);

        assert_eq!(editor.content_string(), "# intro");
        assert_eq!(editor.headers()[0].id, "intro");
        assert_eq!(rx.borrow().to_string(), "# intro");
        assert_eq!(editor.selection(), Selection::caret(2));
    }

    #[test]
    fn test_undo_restores_buffer_and_clamps_selection() {
        let t0 = Instant::now();
        let mut editor = PlainEditor::from_text("a", &HistoryConfig::default());
        let edit = wrap_selection(editor.buffer(), Selection::new(0, 1), "**", "**");
        editor.apply_at(edit, t0);
        assert_eq!(editor.selection(), Selection::caret(5));

        assert!(editor.undo_at(t0 + Duration::from_millis(10)));
        assert_eq!(editor.content_string(), "a");
        assert_eq!(editor.selection(), Selection::caret(1));
        assert!(!editor.undo_at(t0 + Duration::from_millis(20)));
    }

    #[test]
    fn test_selected_text() {
        let mut editor = PlainEditor::from_text("hello world", &HistoryConfig::default());
        assert_eq!(editor.selected_text(), None);
        editor.set_selection(Selection::new(6, 99));
        assert_eq!(editor.selected_text().as_deref(), Some("world"));
    }
}
