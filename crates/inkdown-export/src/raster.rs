//! Raster capture of the rendered preview.

use std::future::Future;

use inkdown_common::error::RenderCaptureError;
use tiny_skia::Pixmap;

use crate::tree::VisualNode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Device pixels per CSS pixel.
    pub scale: f32,
    /// Capture the whole scrollable extent rather than the visible viewport.
    pub unclipped: bool,
}

impl CaptureOptions {
    /// Entire content at `scale`, height following the content.
    pub fn full_extent(scale: f32) -> Self {
        Self {
            scale,
            unclipped: true,
        }
    }
}

/// The rendering collaborator: owns the visual tree and can rasterize it.
pub trait RenderedPreview {
    fn root(&self) -> &VisualNode;

    fn capture(
        &self,
        root: &VisualNode,
        options: &CaptureOptions,
    ) -> impl Future<Output = Result<Pixmap, RenderCaptureError>> + Send;
}

/// Capture the preview and encode it as PNG.
pub async fn capture_png<P: RenderedPreview>(
    preview: &P,
    scale: f32,
) -> Result<Vec<u8>, RenderCaptureError> {
    let pixmap = preview
        .capture(preview.root(), &CaptureOptions::full_extent(scale))
        .await?;
    tracing::debug!(
        width = pixmap.width(),
        height = pixmap.height(),
        "captured preview"
    );
    encode_png(&pixmap)
}

pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderCaptureError> {
    pixmap
        .encode_png()
        .map_err(|e| RenderCaptureError::Encode(e.to_string()))
}
