//! OOXML package parts and the ZIP container.

use std::io::{Cursor, Write};
use zip::result::ZipError;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use super::body::{
    DocumentBody, MediaPart, RelationshipKind, BULLET_NUM_ID, PAGE_FOOTER_REL,
    PORTRAIT_TEXT_WIDTH, TITLE_FOOTER_REL,
};
use super::xml::{
    escape_xml, field, half_points, paragraph, run, Picture, RunStyle, NS_A, NS_PIC, NS_R, NS_W,
    NS_WP, XML_DECLARATION,
};
use crate::adapters::export::assets::{load_image, ImageAsset};
use crate::domain::document::RenderedDocument;
use crate::ports::ExportError;

const APPLICATION: &str = "case-export";
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const TEXT_COLOR: &str = "1F2937";
/// Logo height in the title footer, in EMU (0.4 inch).
const LOGO_HEIGHT_EMU: u64 = 365_760;
const LOGO_MAX_WIDTH_EMU: u64 = 1_828_800;
const LOGO_DRAWING_ID: u32 = 4096;

/// One file inside the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub path: String,
    pub data: Vec<u8>,
}

impl Part {
    fn xml(path: impl Into<String>, content: String) -> Self {
        Self {
            path: path.into(),
            data: content.into_bytes(),
        }
    }
}

/// Assembles every package part for `document` around a built body.
pub fn assemble(document: &RenderedDocument, body: DocumentBody) -> Result<Vec<Part>, ExportError> {
    let logo = title_footer_logo(document)?;

    let mut parts = vec![
        Part::xml("[Content_Types].xml", content_types(&body, logo.as_ref())),
        Part::xml("_rels/.rels", package_relationships()),
        Part::xml("docProps/core.xml", core_properties(document)),
        Part::xml("docProps/app.xml", app_properties()),
        Part::xml("word/document.xml", document_xml(&body.xml)),
        Part::xml("word/_rels/document.xml.rels", document_relationships(&body)),
        Part::xml("word/styles.xml", styles(document)),
        Part::xml("word/numbering.xml", numbering(document, body.ordered_lists)),
        Part::xml("word/footer1.xml", title_footer(document, logo.as_ref())),
        Part::xml("word/footer2.xml", page_footer(document)),
    ];

    if let Some(logo) = &logo {
        parts.push(Part::xml(
            "word/_rels/footer1.xml.rels",
            relationships_xml(&[(
                "rId1".to_string(),
                format!("{}/image", REL_TYPE),
                format!("media/{}", logo.part.name),
                false,
            )]),
        ));
        parts.push(Part {
            path: format!("word/media/{}", logo.part.name),
            data: logo.part.data.clone(),
        });
    }

    for media in body.media {
        parts.push(Part {
            path: format!("word/media/{}", media.name),
            data: media.data,
        });
    }

    Ok(parts)
}

/// Writes the parts into a ZIP archive with fixed timestamps.
pub fn write_archive(parts: &[Part]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buffer);
        let options: FileOptions<'_, ()> = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(0o644);

        for part in parts {
            zip.start_file(part.path.as_str(), options)
                .map_err(archive_error)?;
            zip.write_all(&part.data)?;
        }
        zip.finish().map_err(archive_error)?;
    }
    Ok(buffer.into_inner())
}

fn archive_error(e: ZipError) -> ExportError {
    ExportError::archive(e.to_string())
}

// ═══════════════════════════════════════════════════════════════════════════
// Package-level parts
// ═══════════════════════════════════════════════════════════════════════════

fn content_types(body: &DocumentBody, logo: Option<&Logo>) -> String {
    let mut extensions: Vec<&str> = body
        .media
        .iter()
        .chain(logo.map(|l| &l.part))
        .filter_map(|m| m.name.rsplit_once('.').map(|(_, ext)| ext))
        .collect();
    extensions.sort_unstable();
    extensions.dedup();

    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>",
    );
    for extension in extensions {
        xml.push_str(&format!(
            "<Default Extension=\"{}\" ContentType=\"{}\"/>",
            extension,
            image_content_type(extension)
        ));
    }

    let wml = "application/vnd.openxmlformats-officedocument.wordprocessingml";
    for (part, content_type) in [
        ("/word/document.xml", format!("{}.document.main+xml", wml)),
        ("/word/styles.xml", format!("{}.styles+xml", wml)),
        ("/word/numbering.xml", format!("{}.numbering+xml", wml)),
        ("/word/footer1.xml", format!("{}.footer+xml", wml)),
        ("/word/footer2.xml", format!("{}.footer+xml", wml)),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml".to_string(),
        ),
    ] {
        xml.push_str(&format!(
            "<Override PartName=\"{}\" ContentType=\"{}\"/>",
            part, content_type
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn image_content_type(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpeg" | "jpg" => "image/jpeg",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// `(id, type, target, external)` tuples as a relationships part.
fn relationships_xml(entries: &[(String, String, String, bool)]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!("<Relationships xmlns=\"{}\">", REL_NS));
    for (id, kind, target, external) in entries {
        xml.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"{}/>",
            id,
            kind,
            escape_xml(target),
            if *external { " TargetMode=\"External\"" } else { "" }
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn package_relationships() -> String {
    relationships_xml(&[
        (
            "rId1".to_string(),
            format!("{}/officeDocument", REL_TYPE),
            "word/document.xml".to_string(),
            false,
        ),
        (
            "rId2".to_string(),
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties"
                .to_string(),
            "docProps/core.xml".to_string(),
            false,
        ),
        (
            "rId3".to_string(),
            format!("{}/extended-properties", REL_TYPE),
            "docProps/app.xml".to_string(),
            false,
        ),
    ])
}

fn core_properties(document: &RenderedDocument) -> String {
    let meta = &document.metadata;
    let creator = meta
        .exported_by
        .as_deref()
        .or(document.branding.organisation_name.as_deref())
        .unwrap_or(APPLICATION);
    let created = meta.exported_at.to_rfc3339();

    format!(
        "{}<cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
         <dc:title>{}</dc:title><dc:subject>{}</dc:subject><dc:creator>{}</dc:creator>\
         <dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>\
         <dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified>\
         </cp:coreProperties>",
        XML_DECLARATION,
        escape_xml(&meta.case_name),
        escape_xml(meta.case_description.trim()),
        escape_xml(creator),
        created,
        created
    )
}

fn app_properties() -> String {
    format!(
        "{}<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\">\
         <Application>{}</Application></Properties>",
        XML_DECLARATION, APPLICATION
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// Word parts
// ═══════════════════════════════════════════════════════════════════════════

fn document_xml(body: &str) -> String {
    format!(
        "{}<w:document xmlns:w=\"{}\" xmlns:r=\"{}\" xmlns:wp=\"{}\" xmlns:a=\"{}\" xmlns:pic=\"{}\">\
         <w:body>{}</w:body></w:document>",
        XML_DECLARATION, NS_W, NS_R, NS_WP, NS_A, NS_PIC, body
    )
}

fn document_relationships(body: &DocumentBody) -> String {
    let mut entries = vec![
        (
            "rId1".to_string(),
            format!("{}/styles", REL_TYPE),
            "styles.xml".to_string(),
            false,
        ),
        (
            "rId2".to_string(),
            format!("{}/numbering", REL_TYPE),
            "numbering.xml".to_string(),
            false,
        ),
        (
            TITLE_FOOTER_REL.to_string(),
            format!("{}/footer", REL_TYPE),
            "footer1.xml".to_string(),
            false,
        ),
        (
            PAGE_FOOTER_REL.to_string(),
            format!("{}/footer", REL_TYPE),
            "footer2.xml".to_string(),
            false,
        ),
    ];
    for relationship in &body.relationships {
        let (kind, external) = match relationship.kind {
            RelationshipKind::Image => ("image", false),
            RelationshipKind::Hyperlink => ("hyperlink", true),
        };
        entries.push((
            relationship.id.clone(),
            format!("{}/{}", REL_TYPE, kind),
            relationship.target.clone(),
            external,
        ));
    }
    relationships_xml(&entries)
}

fn styles(document: &RenderedDocument) -> String {
    let branding = &document.branding;
    let font = escape_xml(&branding.font_family);
    let primary = branding.primary_color.to_hex_digits();
    let secondary = branding.secondary_color.to_hex_digits();

    let mut xml = format!(
        "{}<w:styles xmlns:w=\"{}\">\
         <w:docDefaults><w:rPrDefault><w:rPr>\
         <w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\"/>\
         <w:color w:val=\"{text}\"/><w:sz w:val=\"21\"/><w:szCs w:val=\"21\"/>\
         </w:rPr></w:rPrDefault>\
         <w:pPrDefault><w:pPr><w:spacing w:after=\"120\" w:line=\"276\" w:lineRule=\"auto\"/></w:pPr></w:pPrDefault>\
         </w:docDefaults>\
         <w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/><w:qFormat/></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Title\"><w:name w:val=\"Title\"/><w:basedOn w:val=\"Normal\"/>\
         <w:next w:val=\"Normal\"/><w:qFormat/><w:pPr><w:spacing w:before=\"3600\" w:after=\"240\"/></w:pPr>\
         <w:rPr><w:b/><w:color w:val=\"{primary}\"/><w:sz w:val=\"56\"/><w:szCs w:val=\"56\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Subtitle\"><w:name w:val=\"Subtitle\"/><w:basedOn w:val=\"Normal\"/>\
         <w:next w:val=\"Normal\"/><w:qFormat/><w:pPr><w:spacing w:after=\"480\"/></w:pPr>\
         <w:rPr><w:color w:val=\"{secondary}\"/><w:sz w:val=\"28\"/><w:szCs w:val=\"28\"/></w:rPr></w:style>",
        XML_DECLARATION,
        NS_W,
        font = font,
        text = TEXT_COLOR,
        primary = primary,
        secondary = secondary,
    );

    for (level, size) in (1u8..=6).zip([20.0f32, 16.0, 14.0, 12.0, 11.0, 10.5]) {
        xml.push_str(&format!(
            "<w:style w:type=\"paragraph\" w:styleId=\"Heading{level}\">\
             <w:name w:val=\"heading {level}\"/><w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/>\
             <w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before=\"{before}\" w:after=\"120\"/>\
             <w:outlineLvl w:val=\"{outline}\"/></w:pPr>\
             <w:rPr><w:b/><w:color w:val=\"{primary}\"/><w:sz w:val=\"{sz}\"/><w:szCs w:val=\"{sz}\"/></w:rPr></w:style>",
            level = level,
            before = if level == 1 { 360 } else { 240 },
            outline = level - 1,
            primary = primary,
            sz = half_points(size),
        ));
    }

    xml.push_str(&format!(
        "<w:style w:type=\"paragraph\" w:styleId=\"Caption\"><w:name w:val=\"caption\"/>\
         <w:basedOn w:val=\"Normal\"/><w:qFormat/><w:pPr><w:jc w:val=\"center\"/></w:pPr>\
         <w:rPr><w:i/><w:color w:val=\"{secondary}\"/><w:sz w:val=\"18\"/><w:szCs w:val=\"18\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"ListParagraph\"><w:name w:val=\"List Paragraph\"/>\
         <w:basedOn w:val=\"Normal\"/><w:qFormat/><w:pPr><w:spacing w:after=\"60\"/><w:ind w:left=\"720\"/></w:pPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Footer\"><w:name w:val=\"footer\"/><w:basedOn w:val=\"Normal\"/>\
         <w:pPr><w:tabs><w:tab w:val=\"right\" w:pos=\"{width}\"/></w:tabs><w:spacing w:after=\"0\"/></w:pPr>\
         <w:rPr><w:color w:val=\"{secondary}\"/><w:sz w:val=\"16\"/><w:szCs w:val=\"16\"/></w:rPr></w:style>\
         <w:style w:type=\"character\" w:styleId=\"Hyperlink\"><w:name w:val=\"Hyperlink\"/>\
         <w:rPr><w:color w:val=\"{primary}\"/><w:u w:val=\"single\"/></w:rPr></w:style>\
         <w:style w:type=\"table\" w:styleId=\"TableGrid\"><w:name w:val=\"Table Grid\"/><w:tblPr>\
         <w:tblBorders>\
         <w:top w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"D1D5DB\"/>\
         <w:left w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"D1D5DB\"/>\
         <w:bottom w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"D1D5DB\"/>\
         <w:right w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"D1D5DB\"/>\
         <w:insideH w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"D1D5DB\"/>\
         <w:insideV w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"D1D5DB\"/>\
         </w:tblBorders>\
         <w:tblCellMar><w:left w:w=\"108\" w:type=\"dxa\"/><w:right w:w=\"108\" w:type=\"dxa\"/></w:tblCellMar>\
         </w:tblPr></w:style></w:styles>",
        secondary = secondary,
        primary = primary,
        width = PORTRAIT_TEXT_WIDTH,
    ));
    xml
}

/// Bullets share one instance; each ordered list restarts at 1.
fn numbering(document: &RenderedDocument, ordered_lists: usize) -> String {
    let primary = document.branding.primary_color.to_hex_digits();
    let mut xml = format!(
        "{}<w:numbering xmlns:w=\"{}\">\
         <w:abstractNum w:abstractNumId=\"0\"><w:multiLevelType w:val=\"singleLevel\"/>\
         <w:lvl w:ilvl=\"0\"><w:start w:val=\"1\"/><w:numFmt w:val=\"bullet\"/>\
         <w:lvlText w:val=\"\u{2022}\"/><w:lvlJc w:val=\"left\"/>\
         <w:pPr><w:ind w:left=\"720\" w:hanging=\"360\"/></w:pPr>\
         <w:rPr><w:color w:val=\"{primary}\"/></w:rPr></w:lvl></w:abstractNum>\
         <w:abstractNum w:abstractNumId=\"1\"><w:multiLevelType w:val=\"singleLevel\"/>\
         <w:lvl w:ilvl=\"0\"><w:start w:val=\"1\"/><w:numFmt w:val=\"decimal\"/>\
         <w:lvlText w:val=\"%1.\"/><w:lvlJc w:val=\"left\"/>\
         <w:pPr><w:ind w:left=\"720\" w:hanging=\"360\"/></w:pPr>\
         <w:rPr><w:color w:val=\"{primary}\"/></w:rPr></w:lvl></w:abstractNum>\
         <w:num w:numId=\"{bullet}\"><w:abstractNumId w:val=\"0\"/></w:num>",
        XML_DECLARATION,
        NS_W,
        primary = primary,
        bullet = BULLET_NUM_ID,
    );
    for offset in 1..=ordered_lists {
        xml.push_str(&format!(
            "<w:num w:numId=\"{}\"><w:abstractNumId w:val=\"1\"/>\
             <w:lvlOverride w:ilvl=\"0\"><w:startOverride w:val=\"1\"/></w:lvlOverride></w:num>",
            BULLET_NUM_ID + offset
        ));
    }
    xml.push_str("</w:numbering>");
    xml
}

// ═══════════════════════════════════════════════════════════════════════════
// Footers
// ═══════════════════════════════════════════════════════════════════════════

struct Logo {
    part: MediaPart,
    cx: u64,
    cy: u64,
}

/// The branding logo, when it is embedded and decodes.
fn title_footer_logo(document: &RenderedDocument) -> Result<Option<Logo>, ExportError> {
    let Some(source) = document.branding.logo.as_ref().filter(|l| l.is_embedded()) else {
        return Ok(None);
    };
    let ImageAsset::Embedded(image) = load_image(source.src()) else {
        return Ok(None);
    };

    let (data, extension) = image.portable()?;
    let aspect = image.aspect_ratio();
    let cx = ((LOGO_HEIGHT_EMU as f64 * aspect).round() as u64).min(LOGO_MAX_WIDTH_EMU);
    let cy = (cx as f64 / aspect).round() as u64;
    Ok(Some(Logo {
        part: MediaPart {
            name: format!("logo.{}", extension),
            data,
        },
        cx,
        cy,
    }))
}

fn footer_xml(content: &str) -> String {
    format!(
        "{}<w:ftr xmlns:w=\"{}\" xmlns:r=\"{}\" xmlns:wp=\"{}\" xmlns:a=\"{}\" xmlns:pic=\"{}\">{}</w:ftr>",
        XML_DECLARATION, NS_W, NS_R, NS_WP, NS_A, NS_PIC, content
    )
}

fn title_footer(document: &RenderedDocument, logo: Option<&Logo>) -> String {
    let mut runs = String::new();
    if let Some(logo) = logo {
        let picture = Picture {
            rel_id: "rId1",
            id: LOGO_DRAWING_ID,
            name: &logo.part.name,
            description: "Organisation logo",
            cx: logo.cx,
            cy: logo.cy,
        };
        runs.push_str(&picture.to_xml());
    }
    if let Some(organisation) = &document.branding.organisation_name {
        if logo.is_some() {
            runs.push_str(&run("\t", &RunStyle::plain()));
        }
        runs.push_str(&run(organisation, &RunStyle::bold()));
    }
    footer_xml(&paragraph("<w:pStyle w:val=\"Footer\"/>", &runs))
}

fn page_footer(document: &RenderedDocument) -> String {
    let style = RunStyle::plain().with_color(document.branding.secondary_color);
    let mut runs = run(&document.branding.footer_text, &style);
    runs.push_str(&run("\tPage ", &style));
    runs.push_str(&field("PAGE", "1", &style));
    runs.push_str(&run(" of ", &style));
    runs.push_str(&field("NUMPAGES", "1", &style));
    footer_xml(&paragraph("<w:pStyle w:val=\"Footer\"/>", &runs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::export::docx::body::BodyBuilder;
    use crate::domain::branding::{resolve_branding, Branding, LogoSource};
    use crate::domain::document::DocumentMetadata;
    use crate::domain::foundation::Timestamp;

    fn document(branding: Option<&Branding>) -> RenderedDocument {
        RenderedDocument {
            metadata: DocumentMetadata {
                case_name: "Brake & Steering".to_string(),
                case_description: "Safety case".to_string(),
                exported_at: Timestamp::parse_rfc3339("2024-06-15T10:30:00Z").unwrap(),
                exported_by: None,
                data_version: "1.0".to_string(),
                element_count: 0,
                format: None,
            },
            branding: resolve_branding(branding),
            sections: Vec::new(),
        }
    }

    fn parts_for(document: &RenderedDocument) -> Vec<Part> {
        let body = BodyBuilder::new(&document.branding)
            .build(&document.sections)
            .unwrap();
        assemble(document, body).unwrap()
    }

    fn part<'a>(parts: &'a [Part], path: &str) -> &'a str {
        let part = parts.iter().find(|p| p.path == path).unwrap();
        std::str::from_utf8(&part.data).unwrap()
    }

    #[test]
    fn package_has_required_parts() {
        let parts = parts_for(&document(None));
        let paths: Vec<&str> = parts.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/core.xml",
                "docProps/app.xml",
                "word/document.xml",
                "word/_rels/document.xml.rels",
                "word/styles.xml",
                "word/numbering.xml",
                "word/footer1.xml",
                "word/footer2.xml",
            ]
        );
        let core = part(&parts, "docProps/core.xml");
        assert!(core.contains("<dc:title>Brake &amp; Steering</dc:title>"));
        assert!(core.contains("2024-06-15T10:30:00Z"));
    }

    #[test]
    fn page_footer_carries_text_and_fields() {
        let parts = parts_for(&document(None));
        let footer = part(&parts, "word/footer2.xml");
        assert!(footer.contains("Generated from an assurance case export"));
        assert!(footer.contains(" PAGE "));
        assert!(footer.contains(" NUMPAGES "));
    }

    #[test]
    fn title_footer_embeds_logo_and_organisation() {
        let branding = Branding {
            logo: Some(LogoSource::new(
                crate::adapters::export::assets::fixtures::png_data_url(20, 10),
            )),
            organisation_name: Some("Acme Rail".to_string()),
            ..Branding::default()
        };
        let parts = parts_for(&document(Some(&branding)));

        let footer = part(&parts, "word/footer1.xml");
        assert!(footer.contains("Acme Rail"));
        assert!(footer.contains("r:embed=\"rId1\""));
        assert!(part(&parts, "word/_rels/footer1.xml.rels").contains("media/logo.png"));
        assert!(parts.iter().any(|p| p.path == "word/media/logo.png"));
        assert!(part(&parts, "[Content_Types].xml").contains("Extension=\"png\""));
    }

    #[test]
    fn archive_is_deterministic() {
        let parts = parts_for(&document(None));
        let first = write_archive(&parts).unwrap();
        let second = write_archive(&parts).unwrap();
        assert_eq!(first, second);
        assert_eq!(&first[..2], b"PK");
    }
}
