//! Action execution for editor documents.
//!
//! `execute_action` applies an [`EditorAction`] to any [`EditorDocument`].
//! Each arm computes an [`crate::transform::Edit`] from the live buffer and
//! the clamped selection, then installs it in one step.

use inkdown_common::error::ValidationError;

use crate::actions::{EditorAction, TABLE_TEMPLATE, heading_prefix};
use crate::document::EditorDocument;
use crate::transform::{
    Edit, beautify_document, block_list_transform, format_json_selection,
    format_table_selection, insert_image, insert_link, wrap_selection,
};

/// Execute an editor action on a document.
///
/// Returns `Ok(true)` if the document was modified. Validation failures leave
/// the document exactly as it was. [`EditorAction::Assist`] needs the remote
/// service and fails with [`ValidationError::AsyncOnly`]; use
/// [`crate::assist::execute_assist`].
pub fn execute_action<D: EditorDocument>(
    doc: &mut D,
    action: &EditorAction,
) -> Result<bool, ValidationError> {
    let selection = doc.clamped_selection();
    let buffer = doc.buffer();

    let edit: Edit<D::Buffer> = match action {
        EditorAction::Bold => wrap_selection(buffer, selection, "**", "**"),
        EditorAction::Italic => wrap_selection(buffer, selection, "*", "*"),
        EditorAction::Strikethrough => wrap_selection(buffer, selection, "~~", "~~"),
        EditorAction::InlineCode => wrap_selection(buffer, selection, "`", "`"),
        EditorAction::Heading(level) => {
            wrap_selection(buffer, selection, &heading_prefix(*level), "")
        }
        EditorAction::Quote => wrap_selection(buffer, selection, "> ", ""),
        EditorAction::CodeBlock => wrap_selection(buffer, selection, "```\n", "\n```"),
        EditorAction::HorizontalRule => wrap_selection(buffer, selection, "\n---\n", ""),
        EditorAction::InsertTable => wrap_selection(buffer, selection, TABLE_TEMPLATE, ""),
        EditorAction::UnorderedList => block_list_transform(buffer, selection, "- ", false),
        EditorAction::OrderedList => block_list_transform(buffer, selection, "", true),
        EditorAction::TaskList => block_list_transform(buffer, selection, "- [ ] ", false),
        EditorAction::InsertImage(request) => insert_image(buffer, selection, request),
        EditorAction::InsertLink(request) => insert_link(buffer, selection, request),
        EditorAction::FormatJson => format_json_selection(buffer, selection)?,
        EditorAction::FormatTable => format_table_selection(buffer, selection)?,
        EditorAction::Beautify => beautify_document(buffer, selection),
        EditorAction::Undo => return Ok(execute_undo(doc)),
        EditorAction::Assist(_) => {
            return Err(ValidationError::AsyncOnly {
                operation: action.label(),
            });
        }
    };

    tracing::debug!(action = action.label(), "applying edit");
    doc.apply(edit);
    Ok(true)
}

fn execute_undo<D: EditorDocument>(doc: &mut D) -> bool {
    if doc.undo() {
        let selection = doc.clamped_selection();
        doc.set_selection(selection);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ImageInsertRequest, LinkInsertRequest};
    use crate::document::PlainEditor;
    use crate::types::Selection;
    use inkdown_common::assist::AssistAction;
    use inkdown_common::config::HistoryConfig;

    fn editor(text: &str, selection: Selection) -> PlainEditor {
        let mut editor = PlainEditor::from_text(text, &HistoryConfig::default());
        editor.set_selection(selection);
        editor
    }

    #[test]
    fn test_bold_via_dispatch() {
        let mut doc = editor("make it loud", Selection::new(8, 12));
        assert!(execute_action(&mut doc, &EditorAction::Bold).unwrap());
        assert_eq!(doc.content_string(), "make it **loud**");
        assert_eq!(doc.selection(), Selection::caret(16));
    }

    #[test]
    fn test_code_block_and_rule() {
        let mut doc = editor("fn main() {}", Selection::new(0, 12));
        execute_action(&mut doc, &EditorAction::CodeBlock).unwrap();
        assert_eq!(doc.content_string(), "```\nfn main() {}\n```");

        let mut doc = editor("above", Selection::caret(5));
        execute_action(&mut doc, &EditorAction::HorizontalRule).unwrap();
        assert_eq!(doc.content_string(), "above\n---\n");
        assert_eq!(doc.selection(), Selection::caret(10));
    }

    #[test]
    fn test_list_actions() {
        let mut doc = editor("one\ntwo", Selection::new(0, 7));
        execute_action(&mut doc, &EditorAction::OrderedList).unwrap();
        assert_eq!(doc.content_string(), "1. one\n2. two");

        doc.set_selection(Selection::new(0, doc.len_chars()));
        execute_action(&mut doc, &EditorAction::UnorderedList).unwrap();
        assert_eq!(doc.content_string(), "- one\n- two");

        doc.set_selection(Selection::caret(0));
        execute_action(&mut doc, &EditorAction::TaskList).unwrap();
        assert_eq!(doc.content_string(), "- [ ] one\n- two");
    }

    #[test]
    fn test_failed_format_keeps_document() {
        let mut doc = editor("{\"broken\": }", Selection::new(0, 12));
        let err = execute_action(&mut doc, &EditorAction::FormatJson).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidJson(_)));
        assert_eq!(doc.content_string(), "{\"broken\": }");
        assert!(!doc.can_undo());

        let mut doc = editor("no pipes", Selection::new(0, 8));
        let err = execute_action(&mut doc, &EditorAction::FormatTable).unwrap_err();
        assert!(matches!(err, ValidationError::NoTableDelimiter));
        assert_eq!(doc.content_string(), "no pipes");
    }

    #[test]
    fn test_insert_requests() {
        let mut doc = editor("", Selection::caret(0));
        let image = ImageInsertRequest::new("cat.png", "a cat");
        execute_action(&mut doc, &EditorAction::InsertImage(image)).unwrap();
        assert_eq!(doc.content_string(), "![a cat](cat.png)");

        doc.set_selection(Selection::caret(doc.len_chars()));
        let link = LinkInsertRequest::new("https://example.org", "site");
        execute_action(&mut doc, &EditorAction::InsertLink(link)).unwrap();
        assert_eq!(
            doc.content_string(),
            "![a cat](cat.png)[site](https://example.org)"
        );
    }

    #[test]
    fn test_undo_action() {
        let mut doc = editor("text", Selection::new(0, 4));
        execute_action(&mut doc, &EditorAction::Italic).unwrap();
        assert_eq!(doc.content_string(), "*text*");

        assert!(execute_action(&mut doc, &EditorAction::Undo).unwrap());
        assert_eq!(doc.content_string(), "text");
        assert!(doc.selection().end <= 4);
        assert!(!execute_action(&mut doc, &EditorAction::Undo).unwrap());
    }

    #[test]
    fn test_assist_is_rejected_synchronously() {
        let mut doc = editor("text", Selection::caret(0));
        let action = EditorAction::Assist(AssistAction::Summarize);
        let err = execute_action(&mut doc, &action).unwrap_err();
        assert!(matches!(err, ValidationError::AsyncOnly { operation: "assist" }));
        assert_eq!(doc.content_string(), "text");
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_every_wrap_action_edits() {
        let actions = [
            EditorAction::Strikethrough,
            EditorAction::InlineCode,
            EditorAction::Heading(2),
            EditorAction::Quote,
        ];
        let expected = ["~~word~~", "`word`", "## word", "> word"];
        for (action, want) in actions.iter().zip(expected) {
            let mut doc = editor("word", Selection::new(0, 4));
            assert!(execute_action(&mut doc, action).unwrap());
            assert_eq!(doc.content_string(), want);
        }

        let mut doc = editor("", Selection::caret(0));
        assert!(execute_action(&mut doc, &EditorAction::InsertTable).unwrap());
        assert_eq!(doc.content_string(), TABLE_TEMPLATE);
    }
}
