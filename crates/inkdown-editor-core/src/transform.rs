//! Selection-aware text mutations.
//!
//! Every function here is pure: it reads a buffer version and a selection and
//! returns the next version with the selection the caller should reflect.
//! On error the input buffer is untouched, because nothing was ever written
//! to it.

use inkdown_common::error::ValidationError;

use crate::actions::{ImageInsertRequest, LinkInsertRequest};
use crate::format::{align_table, beautify_markdown, pretty_json};
use crate::text::TextBuffer;
use crate::text_helpers::{line_span, strip_list_marker};
use crate::types::Selection;

/// Result of a mutation: the next buffer version plus where the caret goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit<B> {
    pub buffer: B,
    pub selection: Selection,
}

impl<B: TextBuffer> Edit<B> {
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn selected<B: TextBuffer>(buffer: &B, selection: Selection) -> String {
    buffer
        .slice(selection.to_range())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Replace the selected range with `text`, caret after the inserted text.
pub fn replace_selection<B: TextBuffer + Clone>(
    buffer: &B,
    selection: Selection,
    text: &str,
) -> Edit<B> {
    let selection = selection.clamp(buffer.len_chars());
    let mut next = buffer.clone();
    next.replace(selection.to_range(), text);
    Edit {
        buffer: next,
        selection: Selection::caret(selection.start + char_len(text)),
    }
}

/// Insert `before` at the selection start and `after` at its end.
///
/// With a caret the new caret sits between the two markers; with a real
/// selection it lands just past `after`.
pub fn wrap_selection<B: TextBuffer + Clone>(
    buffer: &B,
    selection: Selection,
    before: &str,
    after: &str,
) -> Edit<B> {
    let selection = selection.clamp(buffer.len_chars());
    let mut next = buffer.clone();
    next.insert(selection.end, after);
    next.insert(selection.start, before);

    let caret = if selection.is_caret() {
        selection.start + char_len(before)
    } else {
        selection.end + char_len(before) + char_len(after)
    };
    Edit {
        buffer: next,
        selection: Selection::caret(caret),
    }
}

/// Turn every line touched by the selection into a list item.
///
/// Existing `- `, `* ` and `<n>. ` markers are replaced, so applying the same
/// transform twice gives the same text. Ordered lists are numbered from 1.
pub fn block_list_transform<B: TextBuffer + Clone>(
    buffer: &B,
    selection: Selection,
    prefix: &str,
    ordered: bool,
) -> Edit<B> {
    let span = line_span(buffer, selection);
    let block = buffer
        .slice(span.clone())
        .map(|s| s.to_string())
        .unwrap_or_default();

    let transformed = block
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let content = strip_list_marker(line);
            if ordered {
                format!("{}. {content}", i + 1)
            } else {
                format!("{prefix}{content}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut next = buffer.clone();
    next.replace(span.clone(), &transformed);
    Edit {
        buffer: next,
        selection: Selection::caret(span.start + char_len(&transformed)),
    }
}

/// Pretty-print the selected JSON in place.
pub fn format_json_selection<B: TextBuffer + Clone>(
    buffer: &B,
    selection: Selection,
) -> Result<Edit<B>, ValidationError> {
    let selection = selection.clamp(buffer.len_chars());
    if selection.is_caret() {
        return Err(ValidationError::EmptySelection {
            operation: "format JSON",
        });
    }
    let formatted = pretty_json(&selected(buffer, selection), "selection")?;
    Ok(replace_selection(buffer, selection, &formatted))
}

/// Align the selected pipe table in place.
pub fn format_table_selection<B: TextBuffer + Clone>(
    buffer: &B,
    selection: Selection,
) -> Result<Edit<B>, ValidationError> {
    let selection = selection.clamp(buffer.len_chars());
    if selection.is_caret() {
        return Err(ValidationError::EmptySelection {
            operation: "format table",
        });
    }
    let formatted = align_table(&selected(buffer, selection))?;
    Ok(replace_selection(buffer, selection, &formatted))
}

/// Clean up the whole document. The selection is only clamped.
pub fn beautify_document<B: TextBuffer + Clone>(buffer: &B, selection: Selection) -> Edit<B> {
    let original = buffer.to_string();
    let cleaned = beautify_markdown(&original);
    let mut next = buffer.clone();
    if cleaned != original {
        next.replace(0..buffer.len_chars(), &cleaned);
    }
    let selection = selection.clamp(next.len_chars());
    Edit {
        buffer: next,
        selection,
    }
}

/// Insert image markup in place of the selection.
pub fn insert_image<B: TextBuffer + Clone>(
    buffer: &B,
    selection: Selection,
    request: &ImageInsertRequest,
) -> Edit<B> {
    replace_selection(buffer, selection, &request.to_markup())
}

/// Insert link markup in place of the selection.
///
/// An empty label falls back to the selected text, then to the target.
pub fn insert_link<B: TextBuffer + Clone>(
    buffer: &B,
    selection: Selection,
    request: &LinkInsertRequest,
) -> Edit<B> {
    let selection = selection.clamp(buffer.len_chars());
    let label = if !request.label.trim().is_empty() {
        request.label.to_string()
    } else {
        let text = selected(buffer, selection);
        if text.trim().is_empty() {
            request.target.to_string()
        } else {
            text
        }
    };
    replace_selection(buffer, selection, &format!("[{label}]({})", request.target))
}
