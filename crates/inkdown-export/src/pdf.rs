//! Single-page PDF output from a captured raster.
//!
//! Content shorter than a standard page lands at the top of one standard
//! page. Anything taller gets one custom page exactly as tall as the content,
//! so nothing is ever split across pages.

use inkdown_common::config::ExportConfig;
use inkdown_common::error::RenderCaptureError;
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};
use tiny_skia::Pixmap;

/// Points per millimetre.
pub const MM_TO_PT: f32 = 72.0 / 25.4;

const IMAGE_NAME: Name<'static> = Name(b"Im1");

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width_mm: 210.0,
        height_mm: 297.0,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

impl From<&ExportConfig> for PageSize {
    fn from(config: &ExportConfig) -> Self {
        Self {
            width_mm: config.page_width_mm,
            height_mm: config.page_height_mm,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// The configured page size, image at the top.
    Standard,
    /// Page height equals the content height.
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub kind: PageKind,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// Height of the image once scaled to the page width.
    pub content_height_mm: f32,
}

/// Work out the page for a `raster_width` x `raster_height` capture.
pub fn paginate(
    raster_width: u32,
    raster_height: u32,
    page: PageSize,
) -> Result<PageGeometry, RenderCaptureError> {
    if raster_width == 0 || raster_height == 0 {
        return Err(RenderCaptureError::Pdf("capture is empty".into()));
    }
    if page.width_mm <= 0.0 || page.height_mm <= 0.0 {
        return Err(RenderCaptureError::Pdf(format!(
            "invalid page size {}x{}mm",
            page.width_mm, page.height_mm
        )));
    }

    let content_height_mm = raster_height as f32 * page.width_mm / raster_width as f32;
    let (kind, page_height_mm) = if content_height_mm > page.height_mm {
        (PageKind::Custom, content_height_mm)
    } else {
        (PageKind::Standard, page.height_mm)
    };
    Ok(PageGeometry {
        kind,
        page_width_mm: page.width_mm,
        page_height_mm,
        content_height_mm,
    })
}

/// Flatten premultiplied RGBA onto white, dropping alpha.
fn rgb_over_white(pixmap: &Pixmap) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(pixmap.width() as usize * pixmap.height() as usize * 3);
    for px in pixmap.pixels() {
        let inv = 255 - px.alpha();
        rgb.extend([px.red() + inv, px.green() + inv, px.blue() + inv]);
    }
    rgb
}

/// Lay `pixmap` out on a page and return the finished PDF bytes.
pub fn render_pdf(
    pixmap: &Pixmap,
    page: PageSize,
    title: Option<&str>,
) -> Result<(Vec<u8>, PageGeometry), RenderCaptureError> {
    let geometry = paginate(pixmap.width(), pixmap.height(), page)?;

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let content_id = Ref::new(5);
    let info_id = Ref::new(6);

    let page_w = geometry.page_width_mm * MM_TO_PT;
    let page_h = geometry.page_height_mm * MM_TO_PT;
    let content_h = geometry.content_height_mm * MM_TO_PT;

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut pdf_page = pdf.page(page_id);
    pdf_page.media_box(Rect::new(0.0, 0.0, page_w, page_h));
    pdf_page.parent(page_tree_id);
    pdf_page.contents(content_id);
    pdf_page.resources().x_objects().pair(IMAGE_NAME, image_id);
    pdf_page.finish();

    let compressed = compress_to_vec_zlib(&rgb_over_white(pixmap), 6);
    let mut image = pdf.image_xobject(image_id, &compressed);
    image.filter(Filter::FlateDecode);
    image.width(pixmap.width() as i32);
    image.height(pixmap.height() as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    // PDF space has its origin at the bottom left; pin the image to the top.
    let mut content = Content::new();
    content.save_state();
    content.transform([page_w, 0.0, 0.0, content_h, 0.0, page_h - content_h]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    if let Some(title) = title {
        pdf.document_info(info_id).title(TextStr(title));
    }

    tracing::debug!(
        kind = ?geometry.kind,
        page_height_mm = geometry.page_height_mm,
        "assembled pdf"
    );
    Ok((pdf.finish(), geometry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Color;

    #[test]
    fn test_short_content_uses_standard_page() {
        let geometry = paginate(1000, 1000, PageSize::A4).unwrap();
        assert_eq!(geometry.kind, PageKind::Standard);
        assert_eq!(geometry.page_height_mm, 297.0);
        assert!((geometry.content_height_mm - 210.0).abs() < 1e-3);
    }

    #[test]
    fn test_tall_content_gets_custom_page() {
        let geometry = paginate(1000, 2000, PageSize::A4).unwrap();
        assert_eq!(geometry.kind, PageKind::Custom);
        assert!((geometry.page_height_mm - 420.0).abs() < 1e-3);
        assert_eq!(geometry.page_height_mm, geometry.content_height_mm);
    }

    #[test]
    fn test_exactly_one_page_height_is_standard() {
        let geometry = paginate(210, 297, PageSize::A4).unwrap();
        assert_eq!(geometry.kind, PageKind::Standard);
    }

    #[test]
    fn test_empty_capture_rejected() {
        assert!(matches!(
            paginate(0, 10, PageSize::A4),
            Err(RenderCaptureError::Pdf(_))
        ));
    }

    #[test]
    fn test_composites_over_white() {
        let mut pixmap = Pixmap::new(2, 1).unwrap();
        pixmap.fill(Color::TRANSPARENT);
        assert_eq!(rgb_over_white(&pixmap), [255; 6]);

        pixmap.fill(Color::from_rgba8(10, 20, 30, 255));
        assert_eq!(rgb_over_white(&pixmap), [10, 20, 30, 10, 20, 30]);
    }

    #[test]
    fn test_render_pdf() {
        let mut pixmap = Pixmap::new(100, 300).unwrap();
        pixmap.fill(Color::from_rgba8(200, 0, 0, 255));

        let (bytes, geometry) = render_pdf(&pixmap, PageSize::A4, Some("Notes")).unwrap();
        assert_eq!(geometry.kind, PageKind::Custom);
        assert!(bytes.starts_with(b"%PDF-"));

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/FlateDecode"));
        assert!(text.contains("/DeviceRGB"));
        assert!(text.contains("(Notes)"));
    }
}
