//! DOCX exporter.
//!
//! Builds a WordprocessingML package in memory: the body is serialized
//! first, then wrapped in styles, numbering, footers and relationships and
//! zipped with fixed entry timestamps.

mod body;
mod package;
mod xml;

pub use body::element_color;

use async_trait::async_trait;

use self::body::BodyBuilder;
use self::package::{assemble, write_archive};
use super::filename::output_filename;
use crate::domain::document::{ExportFormat, RenderedDocument};
use crate::ports::{ExportError, ExportOptions, ExportResult, Exporter};

/// Exports documents as Word-compatible `.docx` packages.
#[derive(Debug, Clone, Default)]
pub struct DocxExporter;

impl DocxExporter {
    pub fn new() -> Self {
        Self
    }

    /// Renders the complete package bytes for `document`.
    pub fn render(&self, document: &RenderedDocument) -> Result<Vec<u8>, ExportError> {
        let body = BodyBuilder::new(&document.branding).build(&document.sections)?;
        tracing::debug!(
            relationships = body.relationships.len(),
            media = body.media.len(),
            "Document body built"
        );
        let parts = assemble(document, body)?;
        write_archive(&parts)
    }
}

#[async_trait]
impl Exporter for DocxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    async fn export(&self, document: &RenderedDocument, options: &ExportOptions) -> ExportResult {
        match self.render(document) {
            Ok(data) => {
                let filename = output_filename(document, options, self.format());
                tracing::info!(
                    format = %self.format(),
                    filename = %filename,
                    bytes = data.len(),
                    "Export complete"
                );
                ExportResult::Binary {
                    data,
                    filename,
                    mime_type: self.mime_type().to_string(),
                }
            }
            Err(e) => {
                tracing::error!(format = %self.format(), error = %e, "Export failed");
                ExportResult::failure(self.format(), e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::export::assets::fixtures::png_data_url;
    use crate::adapters::templates::{create_template_from_preset, test_support::sample_case};
    use crate::domain::template::TemplatePreset;
    use crate::ports::{RenderInput, Template};
    use std::io::{Cursor, Read};

    fn full_report(diagram: Option<String>) -> RenderedDocument {
        let case = sample_case();
        let template = create_template_from_preset(TemplatePreset::FullReport, None);
        let mut input = RenderInput::new(&case).with_format(ExportFormat::Docx);
        if let Some(diagram) = diagram {
            input = input.with_diagram(diagram);
        }
        template.render(&input)
    }

    fn entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut text = String::new();
        file.read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn document_contains_sections_and_hyperlinks() {
        let bytes = DocxExporter::new().render(&full_report(None)).unwrap();
        let document = entry(&bytes, "word/document.xml");
        let rels = entry(&bytes, "word/_rels/document.xml.rels");

        assert!(document.contains("<w:pStyle w:val=\"Title\"/>"));
        assert!(document.contains("Brake System"));
        assert!(document.contains("Executive Summary"));
        assert!(rels.contains("Target=\"https://example.com/brake-test\" TargetMode=\"External\""));
    }

    #[test]
    fn diagrams_are_stored_as_media() {
        let bytes = DocxExporter::new()
            .render(&full_report(Some(png_data_url(16, 9))))
            .unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        assert!(archive.file_names().any(|name| name == "word/media/image1.png"));
        assert!(entry(&bytes, "word/document.xml").contains("w:orient=\"landscape\""));
    }

    #[tokio::test]
    async fn export_is_deterministic_binary() {
        let document = full_report(Some(png_data_url(3, 3)));
        let options = ExportOptions::for_document(&document);
        let exporter = DocxExporter::new();

        let first = exporter.export(&document, &options).await;
        let second = exporter.export(&document, &options).await;

        assert_eq!(first.filename(), Some("brake-system-2024-06-15.docx"));
        assert_eq!(
            first.mime_type(),
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        );
        assert!(first.bytes().is_some());
        assert_eq!(first.bytes(), second.bytes());
    }
}
