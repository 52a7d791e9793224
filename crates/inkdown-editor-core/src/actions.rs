//! Editor actions and their parameter types.
//!
//! `EditorAction` is the closed set of operations a toolbar, keyboard
//! shortcut or command palette can trigger. Dispatch happens in
//! [`crate::execute::execute_action`] with an exhaustive match, so a new
//! variant does not compile until it is handled.

use inkdown_common::assist::AssistAction;
use smol_str::SmolStr;

/// Pipe-table skeleton inserted by [`EditorAction::InsertTable`].
pub const TABLE_TEMPLATE: &str =
    "\n| Column 1 | Column 2 |\n| -------- | -------- |\n| Cell     | Cell     |\n";

/// Parameters for inserting an image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInsertRequest {
    /// URL, path or `blob:` handle of the image.
    pub source: SmolStr,
    pub alt_text: SmolStr,
    /// Wrap the image in a link pointing at the same source.
    pub wrap_link: bool,
}

impl ImageInsertRequest {
    pub fn new(source: impl Into<SmolStr>, alt_text: impl Into<SmolStr>) -> Self {
        Self {
            source: source.into(),
            alt_text: alt_text.into(),
            wrap_link: false,
        }
    }

    pub fn to_markup(&self) -> String {
        let image = format!("![{}]({})", self.alt_text, self.source);
        if self.wrap_link {
            format!("[{image}]({})", self.source)
        } else {
            image
        }
    }
}

/// Parameters for inserting a hyperlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInsertRequest {
    pub target: SmolStr,
    /// Link text. Empty means "use the selection, or the target".
    pub label: SmolStr,
}

impl LinkInsertRequest {
    pub fn new(target: impl Into<SmolStr>, label: impl Into<SmolStr>) -> Self {
        Self {
            target: target.into(),
            label: label.into(),
        }
    }
}

/// Line prefix for a heading of `level`, clamped to 1..=6.
pub fn heading_prefix(level: u8) -> String {
    format!("{} ", "#".repeat(level.clamp(1, 6) as usize))
}

/// All editor actions.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    // === Inline formatting ===
    Bold,
    Italic,
    Strikethrough,
    InlineCode,

    // === Blocks ===
    /// Heading prefix. Levels outside 1..=6 are clamped.
    Heading(u8),
    Quote,
    CodeBlock,
    HorizontalRule,
    InsertTable,

    // === Lists ===
    UnorderedList,
    OrderedList,
    TaskList,

    // === Insertion ===
    InsertImage(ImageInsertRequest),
    InsertLink(LinkInsertRequest),

    // === Reformatting ===
    FormatJson,
    FormatTable,
    Beautify,

    // === History ===
    Undo,

    // === Remote ===
    /// Needs the remote assistant. Synchronous dispatch rejects it; run it
    /// through [`crate::assist::execute_assist`].
    Assist(AssistAction),
}

impl EditorAction {
    /// Short human-readable name, used in logs and the CLI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Strikethrough => "strikethrough",
            Self::InlineCode => "inline code",
            Self::Heading(_) => "heading",
            Self::Quote => "quote",
            Self::CodeBlock => "code block",
            Self::HorizontalRule => "horizontal rule",
            Self::InsertTable => "table",
            Self::UnorderedList => "unordered list",
            Self::OrderedList => "ordered list",
            Self::TaskList => "task list",
            Self::InsertImage(_) => "insert image",
            Self::InsertLink(_) => "insert link",
            Self::FormatJson => "format JSON",
            Self::FormatTable => "format table",
            Self::Beautify => "beautify",
            Self::Undo => "undo",
            Self::Assist(_) => "assist",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_markup() {
        let mut request = ImageInsertRequest::new("a.png", "chart");
        assert_eq!(request.to_markup(), "![chart](a.png)");
        request.wrap_link = true;
        assert_eq!(request.to_markup(), "[![chart](a.png)](a.png)");
    }

    #[test]
    fn test_heading_prefix_clamped() {
        assert_eq!(heading_prefix(3), "### ");
        assert_eq!(heading_prefix(9), "###### ");
        assert_eq!(heading_prefix(0), "# ");
    }
}
