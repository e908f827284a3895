//! ExporterRegistry - format-keyed lookup of exporters.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::{DocxExporter, MarkdownExporter, PdfExporter};
use crate::domain::document::ExportFormat;
use crate::ports::Exporter;

/// Errors resolving an exporter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("No exporter registered for {0}")]
    NotRegistered(ExportFormat),
}

/// Exporters keyed by format.
///
/// Built once at startup and shared behind `Arc`; lookups are read-only.
#[derive(Clone, Default)]
pub struct ExporterRegistry {
    exporters: BTreeMap<ExportFormat, Arc<dyn Exporter>>,
}

impl ExporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the Markdown, PDF and DOCX exporters.
    pub fn with_builtin_exporters() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(MarkdownExporter::new()));
        registry.register(Arc::new(PdfExporter::new()));
        registry.register(Arc::new(DocxExporter::new()));
        registry
    }

    /// Registers `exporter` under its format, returning any exporter it replaced.
    pub fn register(&mut self, exporter: Arc<dyn Exporter>) -> Option<Arc<dyn Exporter>> {
        let format = exporter.format();
        tracing::debug!(%format, "Registering exporter");
        self.exporters.insert(format, exporter)
    }

    pub fn get(&self, format: ExportFormat) -> Option<Arc<dyn Exporter>> {
        self.exporters.get(&format).cloned()
    }

    pub fn has(&self, format: ExportFormat) -> bool {
        self.exporters.contains_key(&format)
    }

    /// Registered formats in sorted order.
    pub fn formats(&self) -> Vec<ExportFormat> {
        self.exporters.keys().copied().collect()
    }

    /// Looks up an exporter by format identifier (`pdf`, `docx`, `markdown`, `md`).
    pub fn resolve(&self, identifier: &str) -> Result<Arc<dyn Exporter>, RegistryError> {
        let format: ExportFormat = identifier
            .trim()
            .parse()
            .map_err(|_| RegistryError::UnknownFormat(identifier.to_string()))?;
        self.get(format).ok_or(RegistryError::NotRegistered(format))
    }
}

impl fmt::Debug for ExporterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExporterRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_has_all_formats() {
        let registry = ExporterRegistry::with_builtin_exporters();
        assert_eq!(
            registry.formats(),
            vec![ExportFormat::Pdf, ExportFormat::Docx, ExportFormat::Markdown]
        );
        for format in ExportFormat::all() {
            assert!(registry.has(*format));
            assert_eq!(registry.get(*format).unwrap().format(), *format);
        }
    }

    #[test]
    fn resolve_accepts_aliases() {
        let registry = ExporterRegistry::with_builtin_exporters();
        assert_eq!(
            registry.resolve("md").unwrap().format(),
            ExportFormat::Markdown
        );
        assert_eq!(registry.resolve(" PDF ").unwrap().format(), ExportFormat::Pdf);
        assert!(matches!(
            registry.resolve("html"),
            Err(RegistryError::UnknownFormat(_))
        ));
    }

    #[test]
    fn empty_registry_reports_missing_exporter() {
        let registry = ExporterRegistry::new();
        assert!(registry.formats().is_empty());
        assert_eq!(
            registry.resolve("docx").err(),
            Some(RegistryError::NotRegistered(ExportFormat::Docx))
        );
    }

    #[test]
    fn register_replaces_existing_exporter() {
        let mut registry = ExporterRegistry::new();
        assert!(registry.register(Arc::new(MarkdownExporter::new())).is_none());
        assert!(registry.register(Arc::new(MarkdownExporter::new())).is_some());
        assert_eq!(registry.formats(), vec![ExportFormat::Markdown]);
    }
}
