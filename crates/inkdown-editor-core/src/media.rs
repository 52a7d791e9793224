//! Inserting local media files into the document.

use std::path::Path;

use inkdown_common::error::ResourceReadError;
use inkdown_common::resources::BlobStore;

use crate::actions::ImageInsertRequest;
use crate::document::EditorDocument;
use crate::transform::insert_image;

/// Read `path` into the session store and insert an image referencing it.
///
/// The alt text defaults to the file stem. Nothing is inserted if the file
/// cannot be read. Returns the ephemeral handle the image points at.
pub async fn insert_media_file<D: EditorDocument>(
    doc: &mut D,
    store: &BlobStore,
    path: impl AsRef<Path>,
    alt_text: Option<&str>,
) -> Result<smol_str::SmolStr, ResourceReadError> {
    let path = path.as_ref();
    let handle = store.load_file(path).await?;

    let alt_text = match alt_text {
        Some(alt) => alt.to_string(),
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let request = ImageInsertRequest::new(handle.clone(), alt_text);
    let edit = insert_image(doc.buffer(), doc.clamped_selection(), &request);
    doc.apply(edit);
    Ok(handle)
}
