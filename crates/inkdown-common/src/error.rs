//! Error types for inkdown.
//!
//! Every failure in the editor is classified into one of these kinds before it
//! reaches the user. None of them are fatal: callers recover and leave the
//! document either unchanged or cleanly updated.

use miette::{Diagnostic, NamedSource, SourceOffset, SourceSpan};
use std::path::PathBuf;

/// Main error type for inkdown operations
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum InkdownError {
    /// Selection was missing or did not hold what the operation needs
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    /// A local resource could not be read
    #[error(transparent)]
    #[diagnostic(transparent)]
    ResourceRead(#[from] ResourceReadError),

    /// Raster or PDF generation fault
    #[error(transparent)]
    #[diagnostic(transparent)]
    RenderCapture(#[from] RenderCaptureError),

    /// Remote text-transform service failure
    #[error(transparent)]
    #[diagnostic(transparent)]
    RemoteService(#[from] RemoteServiceError),

    /// Configuration could not be loaded or saved
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Selection-level validation failures. The buffer is never touched when
/// one of these is returned.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ValidationError {
    #[error("{operation} needs a non-empty selection")]
    #[diagnostic(
        code(inkdown::validation::empty_selection),
        help("select the text to format and try again")
    )]
    EmptySelection { operation: &'static str },

    #[error("{operation} needs the text assistant and cannot run synchronously")]
    #[diagnostic(
        code(inkdown::validation::async_only),
        help("dispatch it through the async assist path instead")
    )]
    AsyncOnly { operation: &'static str },

    #[error("selection does not look like a table: no `|` delimiter found")]
    #[diagnostic(code(inkdown::validation::format))]
    NoTableDelimiter,

    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidJson(#[from] ParseError),
}

/// Parse error with source code location information
#[derive(thiserror::Error, Debug, Diagnostic)]
#[error("parse error: {kind}")]
#[diagnostic(code(inkdown::parse))]
pub struct ParseError {
    #[source]
    kind: ParseErrorKind,
    #[source_code]
    src: NamedSource<String>,
    #[label("error")]
    err_location: SourceSpan,
    err_line_col: Option<(usize, usize)>,
    #[help]
    advice: Option<String>,
}

impl ParseError {
    /// Build a parse error for `text` from a serde_json failure, pointing the
    /// label at the line and column serde_json reported.
    pub fn json(err: serde_json::Error, name: &str, text: &str) -> Self {
        let line = err.line();
        let column = err.column();
        let err_line_col = (line > 0).then_some((line, column.max(1)));
        let offset = match err_line_col {
            Some((line, column)) => SourceOffset::from_location(text, line, column),
            None => SourceOffset::from(0),
        };
        Self {
            kind: ParseErrorKind::Json(err),
            src: NamedSource::new(name, text.to_string()),
            err_location: SourceSpan::new(offset, 0),
            err_line_col,
            advice: Some("the selection must be a single valid JSON value".to_string()),
        }
    }

    /// Line and column (both 1-based) of the failure, when known.
    pub fn line_col(&self) -> Option<(usize, usize)> {
        self.err_line_col
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failure to read a local file or session resource.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ResourceReadError {
    #[error("failed to read {}", path.display())]
    #[diagnostic(code(inkdown::resource::read))]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is empty", path.display())]
    #[diagnostic(code(inkdown::resource::empty))]
    EmptyFile { path: PathBuf },

    #[error("resource `{handle}` is not available in this session")]
    #[diagnostic(
        code(inkdown::resource::missing),
        help("ephemeral handles only live as long as the session that created them")
    )]
    UnknownHandle { handle: String },
}

/// Raster capture, image encoding or PDF assembly fault.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum RenderCaptureError {
    #[error("raster capture failed: {0}")]
    #[diagnostic(code(inkdown::capture))]
    Capture(String),

    #[error("failed to encode image: {0}")]
    #[diagnostic(code(inkdown::capture::encode))]
    Encode(String),

    #[error("failed to assemble pdf: {0}")]
    #[diagnostic(code(inkdown::capture::pdf))]
    Pdf(String),
}

/// Remote text-transform collaborator failure.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum RemoteServiceError {
    #[error("no API key configured for the text assistant")]
    #[diagnostic(
        code(inkdown::assist::credential),
        help("set INKDOWN_ASSIST_API_KEY or `assist.api_key` in the config file")
    )]
    MissingCredential,

    #[error("request to the text assistant failed")]
    #[diagnostic(code(inkdown::assist::network))]
    Network(#[from] reqwest::Error),

    #[error("text assistant answered with status {status}")]
    #[diagnostic(code(inkdown::assist::status))]
    Status { status: u16, body: String },

    #[error("text assistant returned no text")]
    #[diagnostic(code(inkdown::assist::empty))]
    EmptyResponse,
}

/// Configuration load/save failure.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("failed to access config file {}", path.display())]
    #[diagnostic(code(inkdown::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {message}", path.display())]
    #[diagnostic(code(inkdown::config::parse))]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config format for {}", path.display())]
    #[diagnostic(
        code(inkdown::config::format),
        help("use a .json or .toml file")
    )]
    UnsupportedFormat { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_parse_error_location() {
        let text = "{\n  \"a\": 1,\n  \"b\": \n}";
        let err = serde_json::from_str::<serde_json::Value>(text).unwrap_err();
        let parse = ParseError::json(err, "selection", text);

        let (line, _col) = parse.line_col().unwrap();
        assert_eq!(line, 4);
        assert!(matches!(parse.kind(), ParseErrorKind::Json(_)));
    }

    #[test]
    fn test_validation_wraps_parse_error() {
        let err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let validation = ValidationError::from(ParseError::json(err, "selection", "{oops"));
        let top = InkdownError::from(validation);

        assert!(top.to_string().starts_with("parse error:"));
        assert_eq!(
            top.code().map(|c| c.to_string()).as_deref(),
            Some("inkdown::parse")
        );
    }

    #[test]
    fn test_async_only_code() {
        let err = ValidationError::AsyncOnly { operation: "assist" };
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("inkdown::validation::async_only")
        );
    }

    #[test]
    fn test_empty_selection_message() {
        let err = ValidationError::EmptySelection {
            operation: "format table",
        };
        assert_eq!(err.to_string(), "format table needs a non-empty selection");
    }
}
