//! PDF exporter.
//!
//! A self-contained PDF 1.4 writer: Base-14 fonts with WinAnsi encoding,
//! uncompressed content streams, RGB image XObjects and URI link
//! annotations. Object numbering is fixed, so identical documents produce
//! identical bytes.

mod fonts;
mod layout;
mod writer;

use async_trait::async_trait;

use self::fonts::{literal, pdf_string, FontSet, FontStyle};
use self::layout::{image_resource_name, LaidOut, PageLayout, PAGE_HEIGHT, PAGE_WIDTH};
use self::writer::PdfWriter;
use super::filename::output_filename;
use crate::domain::document::{ExportFormat, RenderedDocument};
use crate::ports::{ExportError, ExportOptions, ExportResult, Exporter};

const PRODUCER: &str = concat!("case-export ", env!("CARGO_PKG_VERSION"));

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const INFO_ID: usize = 3;
const FIRST_FONT_ID: usize = 4;

/// Exports documents as paginated A4 PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter;

impl PdfExporter {
    pub fn new() -> Self {
        Self
    }

    /// Renders the complete PDF file for `document`.
    pub fn render(&self, document: &RenderedDocument) -> Result<Vec<u8>, ExportError> {
        let laid_out = PageLayout::new(&document.branding).lay_out(&document.sections);
        let fonts = FontSet::for_family(&document.branding.font_family);
        write_pdf(document, &laid_out, fonts)
    }
}

#[async_trait]
impl Exporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
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

/// Object layout: catalog, page tree, info, fonts, images, then for each
/// page its page object, content stream and link annotations.
fn write_pdf(
    document: &RenderedDocument,
    laid_out: &LaidOut,
    fonts: FontSet,
) -> Result<Vec<u8>, ExportError> {
    let first_image_id = FIRST_FONT_ID + FontStyle::ALL.len();
    let first_page_id = first_image_id + laid_out.images.len();

    let mut page_ids = Vec::with_capacity(laid_out.pages.len());
    let mut next_id = first_page_id;
    for page in &laid_out.pages {
        page_ids.push(next_id);
        next_id += 2 + page.links.len();
    }

    let mut pdf = PdfWriter::new(next_id - 1)?;

    pdf.object(
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID),
    )?;

    let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
    pdf.object(
        PAGES_ID,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_ids.len()
        ),
    )?;

    pdf.object(INFO_ID, &info_dictionary(document))?;

    for (offset, style) in FontStyle::ALL.iter().enumerate() {
        pdf.object(
            FIRST_FONT_ID + offset,
            &format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                fonts.base_font(*style)
            ),
        )?;
    }

    for (offset, image) in laid_out.images.iter().enumerate() {
        let expected = image.width as usize * image.height as usize * 3;
        if image.rgb.len() != expected {
            return Err(ExportError::image(format!(
                "image {} has {} samples, expected {}",
                offset,
                image.rgb.len(),
                expected
            )));
        }
        pdf.stream(
            first_image_id + offset,
            &format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /DeviceRGB /BitsPerComponent 8",
                image.width, image.height
            ),
            &image.rgb,
        )?;
    }

    let resources = resource_dictionary(laid_out, first_image_id);
    for (page, &page_id) in laid_out.pages.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        let annot_ids: Vec<usize> = (0..page.links.len()).map(|k| page_id + 2 + k).collect();
        let annots = if annot_ids.is_empty() {
            String::new()
        } else {
            let refs: Vec<String> = annot_ids.iter().map(|id| format!("{} 0 R", id)).collect();
            format!(" /Annots [{}]", refs.join(" "))
        };

        pdf.object(
            page_id,
            &format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources {} /Contents {} 0 R{} >>",
                PAGES_ID, PAGE_WIDTH, PAGE_HEIGHT, resources, content_id, annots
            ),
        )?;
        pdf.stream(content_id, "", page.content.as_bytes())?;

        for (link, annot_id) in page.links.iter().zip(annot_ids) {
            let [x1, y1, x2, y2] = link.rect;
            pdf.object(
                annot_id,
                &format!(
                    "<< /Type /Annot /Subtype /Link /Rect [{:.2} {:.2} {:.2} {:.2}] \
                     /Border [0 0 0] /A << /S /URI /URI {} >> >>",
                    x1,
                    y1,
                    x2,
                    y2,
                    literal(link.url.as_bytes())
                ),
            )?;
        }
    }

    pdf.finish(CATALOG_ID, INFO_ID)
}

fn resource_dictionary(laid_out: &LaidOut, first_image_id: usize) -> String {
    let fonts: Vec<String> = FontStyle::ALL
        .iter()
        .enumerate()
        .map(|(offset, style)| format!("/{} {} 0 R", style.resource(), FIRST_FONT_ID + offset))
        .collect();

    if laid_out.images.is_empty() {
        return format!("<< /Font << {} >> >>", fonts.join(" "));
    }

    let images: Vec<String> = (0..laid_out.images.len())
        .map(|index| format!("/{} {} 0 R", image_resource_name(index), first_image_id + index))
        .collect();
    format!(
        "<< /Font << {} >> /XObject << {} >> >>",
        fonts.join(" "),
        images.join(" ")
    )
}

fn info_dictionary(document: &RenderedDocument) -> String {
    let meta = &document.metadata;
    let mut entries = vec![format!("/Title {}", pdf_string(&meta.case_name))];

    let description = meta.case_description.trim();
    if !description.is_empty() {
        entries.push(format!("/Subject {}", pdf_string(description)));
    }

    let author = meta
        .exported_by
        .as_deref()
        .or(document.branding.organisation_name.as_deref());
    if let Some(author) = author {
        entries.push(format!("/Author {}", pdf_string(author)));
    }

    entries.push(format!("/Creator {}", pdf_string(PRODUCER)));
    entries.push(format!("/Producer {}", pdf_string(PRODUCER)));
    entries.push(format!(
        "/CreationDate {}",
        pdf_string(&meta.exported_at.pdf_date())
    ));
    format!("<< {} >>", entries.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::export::assets::fixtures::png_data_url;
    use crate::adapters::templates::{create_template_from_preset, test_support::sample_case};
    use crate::domain::template::TemplatePreset;
    use crate::ports::{RenderInput, Template};

    fn full_report(diagram: Option<String>) -> RenderedDocument {
        let case = sample_case();
        let template = create_template_from_preset(TemplatePreset::FullReport, None);
        let mut input = RenderInput::new(&case).with_format(ExportFormat::Pdf);
        if let Some(diagram) = diagram {
            input = input.with_diagram(diagram);
        }
        template.render(&input)
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn writes_a_complete_pdf() {
        let bytes = PdfExporter::new().render(&full_report(None)).unwrap();
        let pdf = text(&bytes);

        assert!(pdf.starts_with("%PDF-1.4"));
        assert!(pdf.ends_with("%%EOF\n"));
        assert!(pdf.contains("/Type /Catalog"));
        assert!(pdf.contains("/BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding"));
        assert!(pdf.contains("(Page 1 of "));
        assert!(pdf.contains("/Title (Brake System)"));
        assert!(pdf.contains("/CreationDate (D:20240615103000Z)"));
    }

    #[test]
    fn element_urls_become_link_annotations() {
        let pdf = text(&PdfExporter::new().render(&full_report(None)).unwrap());
        assert!(pdf.contains("/S /URI /URI (https://example.com/brake-test)"));
    }

    #[test]
    fn diagrams_are_embedded_as_rgb_images() {
        let pdf = text(
            &PdfExporter::new()
                .render(&full_report(Some(png_data_url(8, 4))))
                .unwrap(),
        );
        assert!(pdf.contains("/Subtype /Image /Width 8 /Height 4 /ColorSpace /DeviceRGB"));
        assert!(pdf.contains("/XObject << /Im0 "));
        assert!(pdf.contains("/Im0 Do"));
    }

    #[test]
    fn remote_diagrams_render_placeholders() {
        let pdf = text(
            &PdfExporter::new()
                .render(&full_report(Some("https://example.com/diagram.png".into())))
                .unwrap(),
        );
        assert!(!pdf.contains("/Subtype /Image"));
        assert!(pdf.contains("([Image: Brake System diagram])"));
    }

    #[test]
    fn serif_branding_selects_times() {
        let mut document = full_report(None);
        document.branding.font_family = "Georgia, serif".to_string();
        let pdf = text(&PdfExporter::new().render(&document).unwrap());
        assert!(pdf.contains("/BaseFont /Times-Roman"));
        assert!(!pdf.contains("/BaseFont /Helvetica"));
    }

    #[tokio::test]
    async fn export_is_deterministic_binary() {
        let document = full_report(Some(png_data_url(3, 3)));
        let options = ExportOptions::for_document(&document);
        let exporter = PdfExporter::new();

        let first = exporter.export(&document, &options).await;
        let second = exporter.export(&document, &options).await;

        assert_eq!(first.filename(), Some("brake-system-2024-06-15.pdf"));
        assert_eq!(first.mime_type(), Some("application/pdf"));
        assert!(first.bytes().is_some());
        assert_eq!(first.bytes(), second.bytes());
    }
}
