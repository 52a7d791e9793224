//! inkdown-editor-core: Markdown editing logic without UI dependencies.
//!
//! This crate provides:
//! - `TextBuffer` trait and the ropey-backed `EditorRope`
//! - pure selection-aware mutations (`transform`, `format`)
//! - `EditorAction` dispatch over any `EditorDocument`
//! - debounced undo history, heading outline and scroll synchronization
//! - `PlainEditor`, a complete session tying those together

pub mod actions;
pub mod assist;
pub mod document;
pub mod execute;
pub mod format;
pub mod headers;
pub mod media;
pub mod scroll;
pub mod text;
pub mod text_helpers;
pub mod transform;
pub mod types;
pub mod undo;

pub use actions::{EditorAction, ImageInsertRequest, LinkInsertRequest};
pub use assist::execute_assist;
pub use document::{EditorDocument, PlainEditor};
pub use execute::execute_action;
pub use headers::{HeaderRecord, extract_headers, slugify};
pub use media::insert_media_file;
pub use scroll::{Pane, PaneMetrics, ScrollSync, ScrollUpdate};
pub use smol_str::SmolStr;
pub use text::{EditorRope, TextBuffer};
pub use transform::Edit;
pub use types::Selection;
pub use undo::{HistoryEntry, HistoryStack, HistoryState, UndoManager};
