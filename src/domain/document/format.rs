//! Export formats supported by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Output formats an exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PDF document.
    Pdf,
    /// Office Open XML word-processor document.
    Docx,
    /// Markdown text.
    Markdown,
}

impl ExportFormat {
    /// Returns all formats.
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Pdf, ExportFormat::Docx, ExportFormat::Markdown]
    }

    /// Get the MIME content type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Markdown => "text/markdown",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Markdown => "md",
        }
    }

    /// Returns the identifier used in configuration (e.g. `markdown`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Markdown => "markdown",
        }
    }

    /// Short display name used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "DOCX",
            ExportFormat::Markdown => "Markdown",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" | "word" => Ok(ExportFormat::Docx),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(ValidationError::invalid_format(
                "format",
                format!("unsupported export format '{}'", s),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_format_mime_types_are_correct() {
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(ExportFormat::Markdown.mime_type(), "text/markdown");
        assert!(ExportFormat::Docx.mime_type().contains("wordprocessingml"));
    }

    #[test]
    fn export_format_extensions_are_correct() {
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
        assert_eq!(ExportFormat::Docx.extension(), "docx");
        assert_eq!(ExportFormat::Markdown.extension(), "md");
    }

    #[test]
    fn export_format_parses_from_string() {
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("DOCX".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!("html".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn export_format_serializes_to_lowercase() {
        assert_eq!(serde_json::to_string(&ExportFormat::Markdown).unwrap(), "\"markdown\"");
        assert_eq!(serde_json::to_string(&ExportFormat::Docx).unwrap(), "\"docx\"");
    }
}
