//! Exporter Port - serializes a rendered document into one output format.
//!
//! Templates decide what a document says; exporters decide how it is
//! written. Exporters never fail by panicking or returning `Err`: any
//! internal error becomes [`ExportResult::Failure`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::document::{ExportFormat, RenderedDocument};
use crate::domain::foundation::Timestamp;

/// Per-request export options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Used to derive the output filename.
    pub case_name: String,
    /// Filename date; the document's export time when absent.
    pub timestamp: Option<Timestamp>,
}

impl ExportOptions {
    pub fn new(case_name: impl Into<String>) -> Self {
        Self {
            case_name: case_name.into(),
            timestamp: None,
        }
    }

    /// Options naming the output after the document's case.
    pub fn for_document(document: &RenderedDocument) -> Self {
        Self::new(document.metadata.case_name.clone())
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A file a text export refers to by relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportAsset {
    /// Name relative to the directory of the main output file.
    pub filename: String,
    pub data: Vec<u8>,
}

/// Outcome of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportResult {
    Binary {
        data: Vec<u8>,
        filename: String,
        mime_type: String,
    },
    Text {
        content: String,
        filename: String,
        mime_type: String,
        /// Sibling files referenced from `content`.
        assets: Vec<ExportAsset>,
    },
    Failure {
        error: String,
    },
}

impl ExportResult {
    /// Failure result whose message names the format.
    pub fn failure(format: ExportFormat, error: impl std::fmt::Display) -> Self {
        ExportResult::Failure {
            error: format!("{} export failed: {}", format.display_name(), error),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, ExportResult::Failure { .. })
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            ExportResult::Binary { filename, .. } | ExportResult::Text { filename, .. } => {
                Some(filename)
            }
            ExportResult::Failure { .. } => None,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            ExportResult::Binary { mime_type, .. } | ExportResult::Text { mime_type, .. } => {
                Some(mime_type)
            }
            ExportResult::Failure { .. } => None,
        }
    }

    /// Output bytes of a successful export.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            ExportResult::Binary { data, .. } => Some(data),
            ExportResult::Text { content, .. } => Some(content.as_bytes()),
            ExportResult::Failure { .. } => None,
        }
    }

    /// Files to be written beside the main output.
    pub fn assets(&self) -> &[ExportAsset] {
        match self {
            ExportResult::Text { assets, .. } => assets,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ExportResult::Failure { error } => Some(error),
            _ => None,
        }
    }

    /// Writes a successful result and its assets into `dir`, returning the
    /// path of the main file.
    ///
    /// Each file goes to a temporary sibling first and is renamed into place
    /// so a crash never leaves a truncated file under the final name. Assets
    /// are written before the main file.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let (Some(filename), Some(bytes)) = (self.filename(), self.bytes()) else {
            return Err(ExportError::failed(self.error().unwrap_or("no output")));
        };

        fs::create_dir_all(dir).await?;
        for asset in self.assets() {
            write_file(dir, &asset.filename, &asset.data).await?;
        }
        let path = write_file(dir, filename, bytes).await?;

        tracing::debug!(
            path = %path.display(),
            assets = self.assets().len(),
            "Export written"
        );
        Ok(path)
    }
}

async fn write_file(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    if Path::new(filename).file_name() != Some(std::ffi::OsStr::new(filename)) {
        return Err(ExportError::io(format!("invalid output filename: {}", filename)));
    }
    let path = dir.join(filename);
    let temp_path = dir.join(format!("{}.tmp", filename));

    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&temp_path, &path).await?;
    Ok(path)
}

/// Port for format exporters.
///
/// # Contract
///
/// Implementations must:
/// - Be deterministic: identical documents give identical bytes
/// - Derive filenames with the shared filename rule
/// - Report internal errors as [`ExportResult::Failure`]
///
/// # Usage
///
/// ```rust,ignore
/// let exporter = registry.get(ExportFormat::Pdf)?;
/// let result = exporter.export(&document, &ExportOptions::for_document(&document)).await;
/// ```
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Output format handled by this exporter.
    fn format(&self) -> ExportFormat;

    fn mime_type(&self) -> &'static str {
        self.format().mime_type()
    }

    fn file_extension(&self) -> &'static str {
        self.format().extension()
    }

    /// Serializes `document`. Never panics; failures are values.
    async fn export(&self, document: &RenderedDocument, options: &ExportOptions) -> ExportResult;
}

/// Errors raised inside an exporter before conversion to a result.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// An image could not be decoded or embedded.
    #[error("Image error: {0}")]
    Image(String),

    /// The output archive could not be written.
    #[error("Archive error: {0}")]
    Archive(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// Text could not be encoded for the target format.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Content could not be laid out.
    #[error("Layout error: {0}")]
    Layout(String),

    /// A failed result was asked to produce output.
    #[error("Export failed: {0}")]
    Failed(String),
}

impl ExportError {
    pub fn image(reason: impl Into<String>) -> Self {
        Self::Image(reason.into())
    }

    pub fn archive(reason: impl Into<String>) -> Self {
        Self::Archive(reason.into())
    }

    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }

    pub fn encoding(reason: impl Into<String>) -> Self {
        Self::Encoding(reason.into())
    }

    pub fn layout(reason: impl Into<String>) -> Self {
        Self::Layout(reason.into())
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
