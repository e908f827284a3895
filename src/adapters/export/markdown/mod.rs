//! Markdown exporter.
//!
//! Writes a front-matter header followed by each section. Free text is
//! escaped; URLs are not. Inline `data:` images are referenced as sibling
//! files (`./<alt>-<n>.<ext>`) so the text stays readable, and their decoded
//! bytes travel with the result as assets.

mod escape;

pub use escape::{escape_markdown, quote_scalar};

use async_trait::async_trait;
use std::fmt::Write;

use self::escape::{escape_cell, is_url};
use super::assets::{extension_for_mime, is_data_url, parse_data_url};
use super::filename::{output_filename, slugify};
use crate::domain::case::TreeNode;
use crate::domain::document::{
    ContentBlock, ExportFormat, HeadingLevel, RenderedDocument, RenderedSection, SectionType,
};
use crate::domain::tree::render_element_as_blocks;
use crate::ports::{ExportAsset, ExportError, ExportOptions, ExportResult, Exporter};

/// Exports documents as CommonMark text.
#[derive(Debug, Clone, Default)]
pub struct MarkdownExporter;

impl MarkdownExporter {
    pub fn new() -> Self {
        Self
    }

    /// Renders the full Markdown text of `document`.
    pub fn render(&self, document: &RenderedDocument) -> Result<String, ExportError> {
        self.render_with_assets(document).map(|(content, _)| content)
    }

    /// Renders the text plus the image files it links to.
    pub fn render_with_assets(
        &self,
        document: &RenderedDocument,
    ) -> Result<(String, Vec<ExportAsset>), ExportError> {
        let mut writer = MarkdownWriter::default();
        writer.front_matter(document)?;
        for section in &document.sections {
            writer.section(section)?;
        }
        Ok(writer.finish())
    }
}

#[async_trait]
impl Exporter for MarkdownExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    async fn export(&self, document: &RenderedDocument, options: &ExportOptions) -> ExportResult {
        match self.render_with_assets(document) {
            Ok((content, assets)) => {
                let filename = output_filename(document, options, self.format());
                tracing::info!(
                    format = %self.format(),
                    filename = %filename,
                    bytes = content.len(),
                    assets = assets.len(),
                    "Export complete"
                );
                ExportResult::Text {
                    content,
                    filename,
                    mime_type: self.mime_type().to_string(),
                    assets,
                }
            }
            Err(e) => ExportResult::failure(self.format(), e),
        }
    }
}

#[derive(Default)]
struct MarkdownWriter {
    out: String,
    assets: Vec<ExportAsset>,
}

impl MarkdownWriter {
    fn front_matter(&mut self, document: &RenderedDocument) -> Result<(), ExportError> {
        let meta = &document.metadata;
        let mut fields: Vec<(&str, String)> = vec![
            ("title", meta.case_name.clone()),
            ("description", meta.case_description.clone()),
            ("exported_at", meta.exported_at.to_rfc3339()),
        ];
        if let Some(by) = &meta.exported_by {
            fields.push(("exported_by", by.clone()));
        }
        if let Some(org) = &document.branding.organisation_name {
            fields.push(("organisation", org.clone()));
        }
        fields.push(("data_version", meta.data_version.clone()));
        fields.push(("element_count", meta.element_count.to_string()));
        if let Some(format) = meta.format {
            fields.push(("format", format.as_str().to_string()));
        }

        writeln!(self.out, "---").map_err(fmt_error)?;
        for (key, value) in fields {
            writeln!(self.out, "{}: {}", key, quote_scalar(&value)).map_err(fmt_error)?;
        }
        writeln!(self.out, "---").map_err(fmt_error)?;
        Ok(())
    }

    fn section(&mut self, section: &RenderedSection) -> Result<(), ExportError> {
        if section.section_type != SectionType::TitlePage {
            self.paragraph_break();
            writeln!(self.out, "# {}", escape_markdown(&section.title)).map_err(fmt_error)?;
        }
        for block in &section.blocks {
            self.block(block)?;
        }
        Ok(())
    }

    fn block(&mut self, block: &ContentBlock) -> Result<(), ExportError> {
        self.paragraph_break();
        match block {
            ContentBlock::Heading { level, text } => self.heading(*level, &escape_markdown(text)),
            ContentBlock::Paragraph { text } => {
                writeln!(self.out, "{}", escape_markdown(text)).map_err(fmt_error)
            }
            ContentBlock::List { ordered, items } => self.list(*ordered, items),
            ContentBlock::Table { headers, rows } => self.table(headers, rows),
            ContentBlock::Image { src, alt, caption } => self.image(src, alt, caption.as_deref()),
            ContentBlock::Divider => writeln!(self.out, "---").map_err(fmt_error),
            ContentBlock::Metadata { key, value } => {
                let value = if is_url(value) {
                    format!("<{}>", value.trim())
                } else {
                    escape_markdown(value)
                };
                writeln!(self.out, "**{}:** {}", escape_markdown(key), value).map_err(fmt_error)
            }
            ContentBlock::Element { node, depth } => self.element(node, *depth),
        }
    }

    fn heading(&mut self, level: HeadingLevel, text: &str) -> Result<(), ExportError> {
        let hashes = "#".repeat(usize::from(level.value()));
        writeln!(self.out, "{} {}", hashes, text).map_err(fmt_error)
    }

    fn list(&mut self, ordered: bool, items: &[String]) -> Result<(), ExportError> {
        for (i, item) in items.iter().enumerate() {
            let text = escape_markdown(item.trim());
            if ordered {
                writeln!(self.out, "{}. {}", i + 1, text).map_err(fmt_error)?;
            } else {
                writeln!(self.out, "- {}", text).map_err(fmt_error)?;
            }
        }
        Ok(())
    }

    fn table(&mut self, headers: &[String], rows: &[Vec<String>]) -> Result<(), ExportError> {
        let width = headers.len().max(1);
        let mut line = |cells: Vec<String>| -> Result<(), ExportError> {
            writeln!(self.out, "| {} |", cells.join(" | ")).map_err(fmt_error)
        };

        let mut header_cells: Vec<String> = headers.iter().map(|h| escape_cell(h)).collect();
        header_cells.resize(width, String::new());
        line(header_cells)?;
        line(vec!["---".to_string(); width])?;

        for row in rows {
            let mut cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
            if cells.len() < width {
                cells.resize(width, String::new());
            }
            line(cells)?;
        }
        Ok(())
    }

    fn image(&mut self, src: &str, alt: &str, caption: Option<&str>) -> Result<(), ExportError> {
        let alt_text = escape_markdown(alt);
        let src = src.trim();

        if src.is_empty() {
            writeln!(self.out, "*[Image: {}]*", alt_text).map_err(fmt_error)?;
        } else if is_data_url(src) {
            match parse_data_url(src) {
                Ok(data) => {
                    let stem = match slugify(alt) {
                        s if s.is_empty() => "image".to_string(),
                        s => s,
                    };
                    let filename = format!(
                        "{}-{}.{}",
                        stem,
                        self.assets.len() + 1,
                        extension_for_mime(&data.mime_type)
                    );
                    writeln!(self.out, "![{}](./{})", alt_text, filename).map_err(fmt_error)?;
                    self.assets.push(ExportAsset {
                        filename,
                        data: data.bytes,
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Rendering placeholder for unreadable image");
                    writeln!(self.out, "*[Image: {}]*", alt_text).map_err(fmt_error)?;
                }
            }
        } else {
            writeln!(self.out, "![{}]({})", alt_text, src).map_err(fmt_error)?;
        }

        if let Some(caption) = caption.map(str::trim).filter(|c| !c.is_empty()) {
            writeln!(self.out).map_err(fmt_error)?;
            writeln!(self.out, "*{}*", escape_markdown(caption)).map_err(fmt_error)?;
        }
        Ok(())
    }

    fn element(&mut self, node: &TreeNode, depth: usize) -> Result<(), ExportError> {
        let mut blocks = render_element_as_blocks(node, depth).into_iter();

        if let Some(ContentBlock::Heading { level, text }) = blocks.next() {
            let mut title = escape_markdown(&text);
            if node.in_sandbox {
                title.push_str(" *(Draft)*");
            }
            self.heading(level, &title)?;
        }
        for block in blocks {
            self.block(&block)?;
        }
        Ok(())
    }

    fn paragraph_break(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            if !self.out.ends_with('\n') {
                self.out.push('\n');
            }
            self.out.push('\n');
        }
    }

    fn finish(mut self) -> (String, Vec<ExportAsset>) {
        if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        (self.out, self.assets)
    }
}

fn fmt_error(e: std::fmt::Error) -> ExportError {
    ExportError::encoding(e.to_string())
}
