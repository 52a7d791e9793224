//! Applying remote text-assistant results to a document.

use inkdown_common::assist::{AssistAction, AssistDisposition, TextAssistant};
use inkdown_common::error::RemoteServiceError;

use crate::document::EditorDocument;
use crate::text::TextBuffer;
use crate::transform::Edit;
use crate::types::Selection;

/// Send the whole document to `assistant` and fold the answer back in.
///
/// Replacing actions swap the document for the answer; the others append it
/// after a blank line. On failure the document is left unchanged.
pub async fn execute_assist<D, A>(
    doc: &mut D,
    assistant: &A,
    action: AssistAction,
) -> Result<bool, RemoteServiceError>
where
    D: EditorDocument,
    A: TextAssistant,
{
    let text = doc.content_string();
    let answer = assistant.transform(&text, action).await?;

    let mut next = doc.buffer().clone();
    match action.disposition() {
        AssistDisposition::Replace => {
            if answer == text {
                return Ok(false);
            }
            next.replace(0..next.len_chars(), &answer);
        }
        AssistDisposition::Append => {
            let addition = answer.trim();
            if addition.is_empty() {
                return Ok(false);
            }
            let separator = if text.is_empty() || text.ends_with("\n\n") {
                ""
            } else if text.ends_with('\n') {
                "\n"
            } else {
                "\n\n"
            };
            next.push(&format!("{separator}{addition}"));
        }
    }

    tracing::debug!(%action, "applied assistant answer");
    let caret = next.len_chars();
    doc.apply(Edit {
        buffer: next,
        selection: Selection::caret(caret),
    });
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PlainEditor;
    use inkdown_common::config::HistoryConfig;

    /// Answers every request with a fixed string, or fails.
    struct CannedAssistant(Option<&'static str>);

    impl TextAssistant for CannedAssistant {
        async fn transform(
            &self,
            _text: &str,
            _action: AssistAction,
        ) -> Result<String, RemoteServiceError> {
            self.0
                .map(str::to_string)
                .ok_or(RemoteServiceError::MissingCredential)
        }
    }

    #[tokio::test]
    async fn test_replace_and_append() {
        let mut doc = PlainEditor::from_text("teh text", &HistoryConfig::default());

        let fixer = CannedAssistant(Some("the text"));
        assert!(execute_assist(&mut doc, &fixer, AssistAction::FixGrammar).await.unwrap());
        assert_eq!(doc.content_string(), "the text");

        let summarizer = CannedAssistant(Some("  A summary.\n"));
        assert!(execute_assist(&mut doc, &summarizer, AssistAction::Summarize).await.unwrap());
        assert_eq!(doc.content_string(), "the text\n\nA summary.");
        assert_eq!(doc.selection(), Selection::caret(doc.len_chars()));
    }

    #[tokio::test]
    async fn test_failure_leaves_document() {
        let mut doc = PlainEditor::from_text("draft", &HistoryConfig::default());
        let err = execute_assist(&mut doc, &CannedAssistant(None), AssistAction::Expand)
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteServiceError::MissingCredential));
        assert_eq!(doc.content_string(), "draft");
        assert!(!doc.can_undo());
    }
}
