use serde::{Deserialize, Serialize};

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable consulted before `assist.api_key`.
pub const ASSIST_API_KEY_ENV: &str = "INKDOWN_ASSIST_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkdownConfig {
    /// Undo history behaviour.
    pub history: HistoryConfig,
    /// Editor/preview scroll coupling.
    pub scroll: ScrollConfig,
    /// Export geometry and capture fidelity.
    pub export: ExportConfig,
    /// Remote text assistant.
    pub assist: AssistConfig,
}

impl InkdownConfig {
    /// Loads the configuration from the provided loader.
    pub async fn load(loader: &impl Loader) -> Result<Self, ConfigError> {
        loader.load().await
    }

    /// Saves the configuration using the provided saver.
    pub async fn save(&self, saver: &impl Saver) -> Result<(), ConfigError> {
        saver.save(self).await
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Quiet period before a run of edits becomes one undo point.
    pub debounce_ms: u64,
    /// Oldest entries are evicted beyond this many.
    pub max_entries: usize,
}

impl HistoryConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 800,
            max_entries: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// How long the initiating pane keeps control after its last event.
    pub cooldown_ms: u64,
}

impl ScrollConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { cooldown_ms: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Physical page width used for PDF output (A4 by default).
    pub page_width_mm: f32,
    /// Standard page height; taller content gets a single custom page.
    pub page_height_mm: f32,
    /// Capture scale for PNG export.
    pub image_scale: f32,
    /// Capture scale for PDF export.
    pub pdf_scale: f32,
    /// `<title>` of exported HTML documents. Falls back to the file stem.
    pub document_title: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            image_scale: 1.0,
            pdf_scale: 2.0,
            document_title: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Base URL of the generate-content API.
    pub endpoint: String,
    pub model: String,
    /// API key. Prefer the environment variable over writing this to disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl AssistConfig {
    /// API key from the environment, then from the config file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(ASSIST_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_owned(),
            model: "gemini-2.0-flash".to_owned(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// The trait for loading configuration data.
pub trait Loader {
    /// Loads the configuration data.
    fn load(&self) -> impl Future<Output = Result<InkdownConfig, ConfigError>> + Send;
}

/// The trait for saving configuration data.
pub trait Saver {
    /// Saves the configuration data.
    fn save(&self, config: &InkdownConfig) -> impl Future<Output = Result<(), ConfigError>> + Send;
}

/// An implementation of [`Loader`] and [`Saver`] that reads and writes a configuration file.
pub struct FileStore {
    path: PathBuf,
}

enum Format {
    Json,
    Toml,
}

impl FileStore {
    /// Create a new [`FileStore`] with the given path.
    ///
    /// [`InkdownConfig`] data will be serialized and deserialized using the file extension.
    /// `.json` and `.toml` are supported.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Result<Format, ConfigError> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: self.path.clone(),
            }),
        }
    }

    fn parse_error(&self, message: impl ToString) -> ConfigError {
        ConfigError::Parse {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Loader for FileStore {
    async fn load(&self) -> Result<InkdownConfig, ConfigError> {
        let format = self.format()?;
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        let config = match format {
            Format::Json => serde_json::from_str(&raw).map_err(|e| self.parse_error(e))?,
            Format::Toml => toml::from_str(&raw).map_err(|e| self.parse_error(e))?,
        };
        tracing::debug!(path = %self.path.display(), "loaded config");
        Ok(config)
    }
}

impl Saver for FileStore {
    async fn save(&self, config: &InkdownConfig) -> Result<(), ConfigError> {
        let raw = match self.format()? {
            Format::Json => {
                serde_json::to_string_pretty(config).map_err(|e| self.parse_error(e))?
            }
            Format::Toml => toml::to_string_pretty(config).map_err(|e| self.parse_error(e))?,
        };
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| self.io_error(e))
    }
}
