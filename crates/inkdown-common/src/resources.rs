//! Session-scoped media resources.
//!
//! Media inserted from local files is kept in memory for the lifetime of the
//! editing session and referenced from the document through ephemeral
//! `blob:` handles. The handles mean nothing outside the session, so anything
//! that leaves it (an exported HTML file, say) has to resolve them first via
//! [`ResourceResolver`].

use base64::{Engine, engine::general_purpose::STANDARD};
use dashmap::DashMap;
use mime_sniffer::MimeTypeSniffer;
use smol_str::{SmolStr, format_smolstr};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ResourceReadError;

/// Prefix shared by all ephemeral handles.
pub const BLOB_SCHEME: &str = "blob:";

/// Whether `src` points at a session-local resource.
pub fn is_ephemeral(src: &str) -> bool {
    src.starts_with(BLOB_SCHEME)
}

/// Bytes of a resolved resource plus its sniffed MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub mime_type: SmolStr,
    pub bytes: Arc<[u8]>,
}

impl Resource {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        let mime_type = sniff_mime(&bytes);
        Self { mime_type, bytes }
    }

    /// Self-contained `data:` URL for this resource.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

fn sniff_mime(bytes: &[u8]) -> SmolStr {
    bytes
        .sniff_mime_type()
        .map(SmolStr::new)
        .unwrap_or_else(|| SmolStr::new_static("application/octet-stream"))
}

/// Turns an ephemeral handle into durable bytes.
pub trait ResourceResolver {
    fn resolve(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Resource, ResourceReadError>> + Send;
}

/// In-memory store backing `blob:` handles for one session.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    blobs: Arc<DashMap<SmolStr, Resource>>,
    next_id: Arc<AtomicU64>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `bytes` for the session and hand back a fresh handle.
    pub fn register(&self, bytes: impl Into<Arc<[u8]>>) -> SmolStr {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = format_smolstr!("{BLOB_SCHEME}inkdown/{id}");
        self.blobs.insert(handle.clone(), Resource::new(bytes));
        handle
    }

    /// Read a local media file into the store.
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<SmolStr, ResourceReadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ResourceReadError::File {
                path: path.to_path_buf(),
                source,
            })?;
        if bytes.is_empty() {
            return Err(ResourceReadError::EmptyFile {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(path = %path.display(), len = bytes.len(), "registered media file");
        Ok(self.register(bytes))
    }

    pub fn get(&self, handle: &str) -> Option<Resource> {
        self.blobs.get(handle).map(|entry| entry.value().clone())
    }

    /// Drop a handle. Returns whether it existed.
    pub fn revoke(&self, handle: &str) -> bool {
        self.blobs.remove(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl ResourceResolver for BlobStore {
    async fn resolve(&self, handle: &str) -> Result<Resource, ResourceReadError> {
        self.get(handle)
            .ok_or_else(|| ResourceReadError::UnknownHandle {
                handle: handle.to_string(),
            })
    }
}
