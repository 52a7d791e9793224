//! inkdown-export: turning the rendered preview into files.
//!
//! - `tree`: the visual tree the renderer hands over, and HTML serialization
//! - `html`: standalone documents with session images inlined
//! - `raster`: capture through the rendering collaborator, PNG encoding
//! - `pdf`: single-page layout of a capture
//! - `pipeline`: the export entry points and artifact sinks

pub mod css;
pub mod html;
pub mod pdf;
pub mod pipeline;
pub mod raster;
pub mod tree;

pub use css::{ExportTheme, generate_export_css};
pub use html::{export_html, inline_ephemeral_images};
pub use pdf::{MM_TO_PT, PageGeometry, PageKind, PageSize, paginate, render_pdf};
pub use pipeline::{
    ArtifactSink, DirectorySink, ExportArtifact, ExportError, ExportPipeline, Fallback,
};
pub use raster::{CaptureOptions, RenderedPreview, capture_png, encode_png};
pub use tree::{Element, VisualNode};
