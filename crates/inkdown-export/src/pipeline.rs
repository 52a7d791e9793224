//! Export entry points tying the preview, resources and output sink together.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use inkdown_common::config::ExportConfig;
use inkdown_common::error::RenderCaptureError;
use inkdown_common::resources::ResourceResolver;
use miette::Diagnostic;

use crate::css::{ExportTheme, generate_export_css};
use crate::html::export_html;
use crate::pdf::{PageGeometry, PageSize, render_pdf};
use crate::raster::{CaptureOptions, RenderedPreview, capture_png};

#[derive(Debug, Clone, PartialEq)]
pub enum ExportArtifact {
    Html(String),
    Image(Vec<u8>),
    Pdf { bytes: Vec<u8>, geometry: PageGeometry },
}

impl ExportArtifact {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportArtifact::Html(_) => "html",
            ExportArtifact::Image(_) => "png",
            ExportArtifact::Pdf { .. } => "pdf",
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            ExportArtifact::Html(html) => html.as_bytes(),
            ExportArtifact::Image(bytes) => bytes,
            ExportArtifact::Pdf { bytes, .. } => bytes,
        }
    }

    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension())
    }
}

/// Where finished artifacts go.
pub trait ArtifactSink {
    fn save(
        &self,
        file_name: &str,
        artifact: &ExportArtifact,
    ) -> impl Future<Output = std::io::Result<PathBuf>> + Send;
}

/// Writes artifacts as files into one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ArtifactSink for DirectorySink {
    async fn save(&self, file_name: &str, artifact: &ExportArtifact) -> std::io::Result<PathBuf> {
        let path = self.dir.join(file_name);
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, artifact.bytes()).await?;
        Ok(path)
    }
}

/// What the user can fall back to when PDF generation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    NativePrint,
}

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ExportError {
    #[error("an export is already running")]
    #[diagnostic(code(inkdown::export::busy))]
    Busy,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Capture(#[from] RenderCaptureError),

    #[error("pdf export failed")]
    #[diagnostic(
        code(inkdown::export::pdf),
        help("use the system print dialog to save as PDF instead")
    )]
    Pdf {
        #[source]
        source: RenderCaptureError,
        fallback: Fallback,
    },

    #[error("failed to write {file}")]
    #[diagnostic(code(inkdown::export::save))]
    Save {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

/// Clears the in-flight flag when an export finishes, however it finishes.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ExportError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| ExportError::Busy)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One session's exporter. At most one export runs at a time.
pub struct ExportPipeline<P, R, S> {
    preview: P,
    resolver: R,
    sink: S,
    config: ExportConfig,
    theme: ExportTheme,
    in_flight: AtomicBool,
}

impl<P, R, S> ExportPipeline<P, R, S>
where
    P: RenderedPreview,
    R: ResourceResolver,
    S: ArtifactSink,
{
    pub fn new(preview: P, resolver: R, sink: S, config: ExportConfig) -> Self {
        Self {
            preview,
            resolver,
            sink,
            config,
            theme: ExportTheme::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_theme(mut self, theme: ExportTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Standalone HTML document with all session images inlined.
    #[tracing::instrument(skip(self))]
    pub async fn export_html(&self, stem: &str) -> Result<PathBuf, ExportError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let title = self.config.document_title.as_deref().unwrap_or(stem);
        let css = generate_export_css(&self.theme);
        let html = export_html(self.preview.root(), &self.resolver, title, &css)
            .await
            .map_err(|source| ExportError::Save {
                file: stem.to_string(),
                source,
            })?;
        self.save(stem, ExportArtifact::Html(html)).await
    }

    /// PNG of the full preview.
    #[tracing::instrument(skip(self))]
    pub async fn export_image(&self, stem: &str) -> Result<PathBuf, ExportError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let png = capture_png(&self.preview, self.config.image_scale).await?;
        self.save(stem, ExportArtifact::Image(png)).await
    }

    /// Single-page PDF of the full preview.
    #[tracing::instrument(skip(self))]
    pub async fn export_pdf(&self, stem: &str) -> Result<PathBuf, ExportError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let pdf_failed = |source| ExportError::Pdf {
            source,
            fallback: Fallback::NativePrint,
        };

        let options = CaptureOptions::full_extent(self.config.pdf_scale);
        let pixmap = self
            .preview
            .capture(self.preview.root(), &options)
            .await
            .map_err(pdf_failed)?;
        let title = self.config.document_title.as_deref().unwrap_or(stem);
        let (bytes, geometry) =
            render_pdf(&pixmap, PageSize::from(&self.config), Some(title)).map_err(pdf_failed)?;
        self.save(stem, ExportArtifact::Pdf { bytes, geometry }).await
    }

    async fn save(&self, stem: &str, artifact: ExportArtifact) -> Result<PathBuf, ExportError> {
        let file = artifact.file_name(stem);
        let path = self
            .sink
            .save(&file, &artifact)
            .await
            .map_err(|source| ExportError::Save { file, source })?;
        tracing::info!(path = %path.display(), "exported");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PageKind;
    use crate::tree::{Element, VisualNode};
    use inkdown_common::resources::BlobStore;
    use std::sync::Mutex;
    use tiny_skia::{Color, Pixmap};

    struct FakePreview {
        root: VisualNode,
        size: (u32, u32),
        fail: bool,
    }

    impl FakePreview {
        fn new(root: VisualNode, size: (u32, u32)) -> Self {
            Self {
                root,
                size,
                fail: false,
            }
        }
    }

    impl RenderedPreview for FakePreview {
        fn root(&self) -> &VisualNode {
            &self.root
        }

        async fn capture(
            &self,
            _root: &VisualNode,
            options: &CaptureOptions,
        ) -> Result<Pixmap, RenderCaptureError> {
            tokio::task::yield_now().await;
            if self.fail {
                return Err(RenderCaptureError::Capture("preview not attached".into()));
            }
            let (w, h) = self.size;
            let mut pixmap = Pixmap::new(
                (w as f32 * options.scale) as u32,
                (h as f32 * options.scale) as u32,
            )
            .ok_or_else(|| RenderCaptureError::Capture("zero-sized".into()))?;
            pixmap.fill(Color::WHITE);
            Ok(pixmap)
        }
    }

    #[derive(Default)]
    struct MemorySink {
        saved: Mutex<Vec<(String, ExportArtifact)>>,
    }

    impl ArtifactSink for MemorySink {
        async fn save(&self, file_name: &str, artifact: &ExportArtifact) -> std::io::Result<PathBuf> {
            self.saved
                .lock()
                .unwrap()
                .push((file_name.to_string(), artifact.clone()));
            Ok(PathBuf::from(file_name))
        }
    }

    fn document(image_src: &str) -> VisualNode {
        Element::new("div")
            .with_child(Element::new("h1").with_attr("id", "notes").with_text("Notes"))
            .with_child(
                Element::new("p")
                    .with_child(Element::new("img").with_attr("src", image_src).with_attr("alt", "pic")),
            )
            .into()
    }

    #[tokio::test]
    async fn test_export_html_inlines_images() {
        let store = BlobStore::new();
        let handle = store.register(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec());
        let pipeline = ExportPipeline::new(
            FakePreview::new(document(&handle), (10, 10)),
            store,
            MemorySink::default(),
            ExportConfig::default(),
        );

        let path = pipeline.export_html("notes").await.unwrap();
        assert_eq!(path, PathBuf::from("notes.html"));

        let saved = pipeline.sink().saved.lock().unwrap();
        let ExportArtifact::Html(html) = &saved[0].1 else {
            panic!("expected html");
        };
        assert!(html.contains("<title>notes</title>"));
        assert!(html.contains("src=\"data:image/png;base64,"));
        assert!(pipeline.preview().root().to_html().contains(handle.as_str()));
    }

    #[tokio::test]
    async fn test_export_pdf_geometry() {
        let pipeline = ExportPipeline::new(
            FakePreview::new(document("https://example.com/a.png"), (100, 400)),
            BlobStore::new(),
            MemorySink::default(),
            ExportConfig::default(),
        );
        pipeline.export_pdf("long").await.unwrap();

        let saved = pipeline.sink().saved.lock().unwrap();
        assert_eq!(saved[0].0, "long.pdf");
        let ExportArtifact::Pdf { bytes, geometry } = &saved[0].1 else {
            panic!("expected pdf");
        };
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(geometry.kind, PageKind::Custom);
        assert!((geometry.page_height_mm - 840.0).abs() < 1e-2);
    }

    #[tokio::test]
    async fn test_pdf_failure_offers_print_fallback() {
        let mut preview = FakePreview::new(document("x.png"), (10, 10));
        preview.fail = true;
        let pipeline = ExportPipeline::new(
            preview,
            BlobStore::new(),
            MemorySink::default(),
            ExportConfig::default(),
        );

        let err = pipeline.export_pdf("doc").await.unwrap_err();
        assert!(matches!(
            err,
            ExportError::Pdf {
                fallback: Fallback::NativePrint,
                ..
            }
        ));
        assert!(pipeline.sink().saved.lock().unwrap().is_empty());
        assert!(!pipeline.is_busy());
    }

    #[tokio::test]
    async fn test_concurrent_export_is_rejected() {
        let pipeline = ExportPipeline::new(
            FakePreview::new(document("x.png"), (8, 8)),
            BlobStore::new(),
            MemorySink::default(),
            ExportConfig::default(),
        );

        let (first, second) = tokio::join!(pipeline.export_image("a"), pipeline.export_pdf("b"));
        assert!(first.is_ok());
        assert!(matches!(second, Err(ExportError::Busy)));

        // The flag is released once the first export completes.
        pipeline.export_pdf("b").await.unwrap();
        assert_eq!(pipeline.sink().saved.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_directory_sink_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ExportPipeline::new(
            FakePreview::new(document("x.png"), (4, 4)),
            BlobStore::new(),
            DirectorySink::new(dir.path().join("out")),
            ExportConfig::default(),
        );

        let path = pipeline.export_image("shot").await.unwrap();
        assert_eq!(path, dir.path().join("out").join("shot.png"));
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
