//! Shared plumbing for inkdown: errors, configuration, session resources
//! and the remote text assistant client.

pub mod assist;
pub mod config;
pub mod error;
pub mod resources;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use crate::assist::{AssistAction, AssistDisposition, HttpAssistant, TextAssistant};
pub use crate::config::{FileStore, InkdownConfig};
pub use crate::error::{
    ConfigError, InkdownError, ParseError, RemoteServiceError, RenderCaptureError,
    ResourceReadError, ValidationError,
};
pub use crate::resources::{BlobStore, Resource, ResourceResolver};
