//! Document body: rendered sections as WordprocessingML.
//!
//! The body is split into physical sections: the title page (portrait),
//! one landscape section per embedded diagram image, then a final portrait
//! section holding everything else.

use super::xml::{hyperlink, paragraph, run, styled_paragraph, Picture, RunStyle};
use crate::adapters::export::assets::{load_image, DecodedImage, ImageAsset};
use crate::domain::branding::ResolvedBranding;
use crate::domain::case::TreeNode;
use crate::domain::document::{ContentBlock, HeadingLevel, RenderedSection, SectionType};
use crate::domain::foundation::{ElementType, HexColor};
use crate::domain::tree::render_element_as_blocks;
use crate::ports::ExportError;

/// Relationship id of the title-page footer.
pub const TITLE_FOOTER_REL: &str = "rId3";
/// Relationship id of the page-numbered footer.
pub const PAGE_FOOTER_REL: &str = "rId4";
/// First id handed out for images and hyperlinks.
const FIRST_DYNAMIC_REL: usize = 5;

/// Numbering instance shared by every bulleted list.
pub const BULLET_NUM_ID: usize = 1;

const MARGIN: u32 = 1440;
const A4_SHORT: u32 = 11906;
const A4_LONG: u32 = 16838;
/// Text width of a portrait page, in twips.
pub const PORTRAIT_TEXT_WIDTH: u32 = A4_SHORT - 2 * MARGIN;
const LANDSCAPE_TEXT_WIDTH: u32 = A4_LONG - 2 * MARGIN;
/// Height left for a landscape diagram after its heading and caption.
const LANDSCAPE_IMAGE_HEIGHT: u32 = 7200;
const PORTRAIT_IMAGE_HEIGHT: u32 = 11000;
const EMU_PER_TWIP: u64 = 635;
const ELEMENT_INDENT: u32 = 360;
const MAX_INDENT_DEPTH: usize = 8;
const DRAFT_COLOR: HexColor = HexColor::rgb(0x6B, 0x72, 0x80);

/// Accent colour for an element type; `None` falls back to the primary colour.
pub fn element_color(element_type: ElementType) -> Option<HexColor> {
    match element_type {
        ElementType::Goal => Some(HexColor::rgb(0x25, 0x63, 0xEB)),
        ElementType::Strategy => Some(HexColor::rgb(0x7C, 0x3A, 0xED)),
        ElementType::PropertyClaim => Some(HexColor::rgb(0x05, 0x96, 0x69)),
        ElementType::Evidence => Some(HexColor::rgb(0xD9, 0x77, 0x06)),
        ElementType::Context => Some(HexColor::rgb(0x08, 0x91, 0xB2)),
        ElementType::Assumption => Some(HexColor::rgb(0xDB, 0x27, 0x77)),
        ElementType::Justification => Some(HexColor::rgb(0x4B, 0x55, 0x63)),
        ElementType::Module | ElementType::AwayGoal | ElementType::Contract => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Portrait,
    Landscape,
}

/// `<w:sectPr>` for a section with the given footer.
fn section_properties(orientation: Orientation, footer_rel: &str) -> String {
    let (width, height, orient) = match orientation {
        Orientation::Portrait => (A4_SHORT, A4_LONG, ""),
        Orientation::Landscape => (A4_LONG, A4_SHORT, " w:orient=\"landscape\""),
    };
    format!(
        "<w:sectPr><w:footerReference w:type=\"default\" r:id=\"{footer}\"/>\
         <w:type w:val=\"nextPage\"/>\
         <w:pgSz w:w=\"{width}\" w:h=\"{height}\"{orient}/>\
         <w:pgMar w:top=\"{m}\" w:right=\"{m}\" w:bottom=\"{m}\" w:left=\"{m}\" \
         w:header=\"708\" w:footer=\"708\" w:gutter=\"0\"/>\
         <w:cols w:space=\"708\"/></w:sectPr>",
        footer = footer_rel,
        width = width,
        height = height,
        orient = orient,
        m = MARGIN,
    )
}

/// Kind of a body-level relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    Image,
    Hyperlink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub kind: RelationshipKind,
    /// Package-relative path for images, absolute URL for hyperlinks.
    pub target: String,
}

/// An image stored under `word/media/`.
#[derive(Debug, Clone)]
pub struct MediaPart {
    pub name: String,
    pub data: Vec<u8>,
}

/// Serialized body plus the parts it references.
#[derive(Debug, Clone)]
pub struct DocumentBody {
    /// Content of `<w:body>`.
    pub xml: String,
    pub relationships: Vec<Relationship>,
    pub media: Vec<MediaPart>,
    /// Ordered lists, numbered `BULLET_NUM_ID + 1 ..= BULLET_NUM_ID + n`.
    pub ordered_lists: usize,
}

pub struct BodyBuilder<'a> {
    branding: &'a ResolvedBranding,
    xml: String,
    relationships: Vec<Relationship>,
    media: Vec<MediaPart>,
    ordered_lists: usize,
    drawings: u32,
}

impl<'a> BodyBuilder<'a> {
    pub fn new(branding: &'a ResolvedBranding) -> Self {
        Self {
            branding,
            xml: String::new(),
            relationships: Vec::new(),
            media: Vec::new(),
            ordered_lists: 0,
            drawings: 0,
        }
    }

    pub fn build(mut self, sections: &[RenderedSection]) -> Result<DocumentBody, ExportError> {
        for section in sections
            .iter()
            .filter(|s| s.section_type == SectionType::TitlePage)
        {
            self.title_section(section)?;
        }

        let mut remaining: Vec<RenderedSection> = Vec::new();
        for section in sections
            .iter()
            .filter(|s| s.section_type != SectionType::TitlePage)
        {
            if section.section_type == SectionType::Diagram {
                if let Some(leftover) = self.diagram_sections(section)? {
                    remaining.push(leftover);
                }
            } else {
                remaining.push(section.clone());
            }
        }

        for section in &remaining {
            self.heading(1, &section.title);
            for block in &section.blocks {
                self.block(block, PORTRAIT_TEXT_WIDTH)?;
            }
        }
        self.xml
            .push_str(&section_properties(Orientation::Portrait, PAGE_FOOTER_REL));

        Ok(DocumentBody {
            xml: self.xml,
            relationships: self.relationships,
            media: self.media,
            ordered_lists: self.ordered_lists,
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Physical sections
    // ─────────────────────────────────────────────────────────────────────

    fn title_section(&mut self, section: &RenderedSection) -> Result<(), ExportError> {
        let mut titled = false;
        for block in &section.blocks {
            match block {
                ContentBlock::Heading { text, .. } if !titled => {
                    titled = true;
                    self.xml
                        .push_str(&styled_paragraph("Title", &run(text, &RunStyle::plain())));
                }
                ContentBlock::Paragraph { text } => {
                    self.xml
                        .push_str(&styled_paragraph("Subtitle", &run(text, &RunStyle::plain())));
                }
                other => self.block(other, PORTRAIT_TEXT_WIDTH)?,
            }
        }
        self.section_break(Orientation::Portrait, TITLE_FOOTER_REL);
        Ok(())
    }

    /// Emits a landscape section per embedded image.
    ///
    /// Blocks that cannot go on a landscape page are returned as a section
    /// for the final portrait part.
    fn diagram_sections(
        &mut self,
        section: &RenderedSection,
    ) -> Result<Option<RenderedSection>, ExportError> {
        let mut leftover = Vec::new();
        let mut placed = 0;

        for block in &section.blocks {
            let ContentBlock::Image { src, alt, caption } = block else {
                leftover.push(block.clone());
                continue;
            };
            let ImageAsset::Embedded(image) = load_image(src) else {
                leftover.push(block.clone());
                continue;
            };

            if placed == 0 {
                self.heading(1, &section.title);
            }
            self.picture(&image, alt, LANDSCAPE_TEXT_WIDTH, LANDSCAPE_IMAGE_HEIGHT)?;
            self.caption(caption.as_deref());
            self.section_break(Orientation::Landscape, PAGE_FOOTER_REL);
            placed += 1;
        }

        if leftover.is_empty() {
            return Ok(None);
        }
        Ok(Some(RenderedSection::new(
            section.section_type,
            section.title.clone(),
            leftover,
        )))
    }

    fn section_break(&mut self, orientation: Orientation, footer_rel: &str) {
        self.xml
            .push_str(&paragraph(&section_properties(orientation, footer_rel), ""));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Blocks
    // ─────────────────────────────────────────────────────────────────────

    fn block(&mut self, block: &ContentBlock, text_width: u32) -> Result<(), ExportError> {
        match block {
            ContentBlock::Heading { level, text } => self.heading(level.value(), text),
            ContentBlock::Paragraph { text } => {
                self.xml.push_str(&paragraph("", &run(text, &RunStyle::plain())));
            }
            ContentBlock::List { ordered, items } => self.list(*ordered, items),
            ContentBlock::Table { headers, rows } => self.table(headers, rows, text_width),
            ContentBlock::Image { src, alt, caption } => match load_image(src) {
                ImageAsset::Embedded(image) => {
                    self.picture(&image, alt, text_width, PORTRAIT_IMAGE_HEIGHT)?;
                    self.caption(caption.as_deref());
                }
                ImageAsset::Remote(_) | ImageAsset::Missing => {
                    self.placeholder(&format!("[Image: {}]", alt))
                }
                ImageAsset::Unreadable(_) => {
                    self.placeholder(&format!("[Unable to render image: {}]", alt))
                }
            },
            ContentBlock::Divider => {
                self.xml.push_str(&paragraph(
                    "<w:pBdr><w:bottom w:val=\"single\" w:sz=\"6\" w:space=\"1\" w:color=\"D1D5DB\"/></w:pBdr>",
                    "",
                ));
            }
            ContentBlock::Metadata { key, value } => {
                let runs = self.labelled_runs(key, value);
                self.xml.push_str(&paragraph("", &runs));
            }
            ContentBlock::Element { node, depth } => self.element(node, *depth)?,
        }
        Ok(())
    }

    fn heading(&mut self, level: u8, text: &str) {
        let level = HeadingLevel::new(level);
        self.xml.push_str(&styled_paragraph(
            &format!("Heading{}", level.value()),
            &run(text, &RunStyle::plain()),
        ));
    }

    fn list(&mut self, ordered: bool, items: &[String]) {
        let num_id = if ordered {
            self.ordered_lists += 1;
            BULLET_NUM_ID + self.ordered_lists
        } else {
            BULLET_NUM_ID
        };
        let properties = format!(
            "<w:pStyle w:val=\"ListParagraph\"/><w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"{}\"/></w:numPr>",
            num_id
        );
        for item in items {
            self.xml
                .push_str(&paragraph(&properties, &run(item, &RunStyle::plain())));
        }
    }

    fn table(&mut self, headers: &[String], rows: &[Vec<String>], text_width: u32) {
        let columns = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0)
            .max(1);
        let column_width = text_width / columns as u32;
        let primary = self.branding.primary_color.to_hex_digits();

        let mut xml = format!(
            "<w:tbl><w:tblPr><w:tblStyle w:val=\"TableGrid\"/><w:tblW w:w=\"{}\" w:type=\"dxa\"/>\
             <w:tblLook w:val=\"04A0\" w:firstRow=\"1\" w:lastRow=\"0\" w:firstColumn=\"0\" \
             w:lastColumn=\"0\" w:noHBand=\"0\" w:noVBand=\"1\"/></w:tblPr><w:tblGrid>",
            column_width * columns as u32
        );
        for _ in 0..columns {
            xml.push_str(&format!("<w:gridCol w:w=\"{}\"/>", column_width));
        }
        xml.push_str("</w:tblGrid>");

        if !headers.is_empty() {
            xml.push_str("<w:tr><w:trPr><w:tblHeader/></w:trPr>");
            for column in 0..columns {
                let text = headers.get(column).map(String::as_str).unwrap_or("");
                let style = RunStyle::bold().with_color(HexColor::WHITE);
                xml.push_str(&format!(
                    "<w:tc><w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/>\
                     <w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/></w:tcPr>{}</w:tc>",
                    column_width,
                    primary,
                    paragraph("", &run(text, &style))
                ));
            }
            xml.push_str("</w:tr>");
        }

        for row in rows {
            xml.push_str("<w:tr>");
            for column in 0..columns {
                let text = row.get(column).map(String::as_str).unwrap_or("");
                let content = if is_link(text) {
                    let rel_id = self.hyperlink_rel(text);
                    hyperlink(&rel_id, text.trim())
                } else {
                    run(text, &RunStyle::plain())
                };
                xml.push_str(&format!(
                    "<w:tc><w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/></w:tcPr>{}</w:tc>",
                    column_width,
                    paragraph("", &content)
                ));
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");

        self.xml.push_str(&xml);
        // a table must not be the last thing before a section break
        self.xml.push_str(&paragraph("", ""));
    }

    fn picture(
        &mut self,
        image: &DecodedImage,
        alt: &str,
        max_width: u32,
        max_height: u32,
    ) -> Result<(), ExportError> {
        let (data, extension) = image.portable()?;
        let name = format!("image{}.{}", self.media.len() + 1, extension);
        let rel_id = self.next_rel_id();
        self.relationships.push(Relationship {
            id: rel_id.clone(),
            kind: RelationshipKind::Image,
            target: format!("media/{}", name),
        });
        self.media.push(MediaPart {
            name: name.clone(),
            data,
        });

        let (cx, cy) = fit_emu(image.width, image.height, max_width, max_height);
        self.drawings += 1;
        let picture = Picture {
            rel_id: &rel_id,
            id: self.drawings,
            name: &name,
            description: alt,
            cx,
            cy,
        };
        self.xml
            .push_str(&paragraph("<w:jc w:val=\"center\"/>", &picture.to_xml()));
        Ok(())
    }

    fn caption(&mut self, caption: Option<&str>) {
        if let Some(caption) = caption.map(str::trim).filter(|c| !c.is_empty()) {
            self.xml
                .push_str(&styled_paragraph("Caption", &run(caption, &RunStyle::plain())));
        }
    }

    fn placeholder(&mut self, text: &str) {
        self.xml.push_str(&paragraph(
            "<w:jc w:val=\"center\"/>",
            &run(text, &RunStyle::italic().with_color(DRAFT_COLOR)),
        ));
    }

    fn labelled_runs(&mut self, label: &str, value: &str) -> String {
        let mut runs = run(&format!("{}: ", label), &RunStyle::bold());
        if is_link(value) {
            let rel_id = self.hyperlink_rel(value);
            runs.push_str(&hyperlink(&rel_id, value.trim()));
        } else {
            runs.push_str(&run(value, &RunStyle::plain()));
        }
        runs
    }

    fn element(&mut self, node: &TreeNode, depth: usize) -> Result<(), ExportError> {
        let color = element_color(node.element_type).unwrap_or(self.branding.primary_color);
        let indent = depth.min(MAX_INDENT_DEPTH) as u32 * ELEMENT_INDENT;
        let properties = |keep_next: bool, after: u32| {
            format!(
                "{}<w:pBdr><w:left w:val=\"single\" w:sz=\"24\" w:space=\"8\" w:color=\"{}\"/></w:pBdr>\
                 <w:spacing w:before=\"0\" w:after=\"{}\"/><w:ind w:left=\"{}\"/>",
                if keep_next { "<w:keepNext/>" } else { "" },
                color.to_hex_digits(),
                after,
                indent + 200
            )
        };

        let blocks = render_element_as_blocks(node, depth);
        let last = blocks.len().saturating_sub(1);
        for (index, block) in blocks.into_iter().enumerate() {
            let after = if index == last { 200 } else { 40 };
            match block {
                ContentBlock::Heading { level, text } => {
                    let style = RunStyle::bold()
                        .with_color(color)
                        .with_size(heading_size(level));
                    let mut runs = run(&text, &style);
                    if node.in_sandbox {
                        runs.push_str(&run(" [Draft]", &RunStyle::italic().with_color(DRAFT_COLOR)));
                    }
                    self.xml
                        .push_str(&paragraph(&properties(index != last, after), &runs));
                }
                ContentBlock::Paragraph { text } => {
                    self.xml.push_str(&paragraph(
                        &properties(false, after),
                        &run(&text, &RunStyle::plain()),
                    ));
                }
                ContentBlock::Metadata { key, value } => {
                    let label = if key == "Module Reference" { "Module" } else { key.as_str() };
                    let runs = self.labelled_runs(label, &value);
                    self.xml.push_str(&paragraph(&properties(false, after), &runs));
                }
                other => self.block(&other, PORTRAIT_TEXT_WIDTH)?,
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Relationships
    // ─────────────────────────────────────────────────────────────────────

    fn next_rel_id(&self) -> String {
        format!("rId{}", FIRST_DYNAMIC_REL + self.relationships.len())
    }

    fn hyperlink_rel(&mut self, url: &str) -> String {
        let id = self.next_rel_id();
        self.relationships.push(Relationship {
            id: id.clone(),
            kind: RelationshipKind::Hyperlink,
            target: url.trim().to_string(),
        });
        id
    }
}

fn heading_size(level: HeadingLevel) -> f32 {
    match level.value() {
        1 => 20.0,
        2 => 16.0,
        3 => 14.0,
        4 => 12.0,
        5 => 11.0,
        _ => 10.5,
    }
}

/// Scales a pixel size to fill the box (in twips) keeping its aspect ratio;
/// returns EMU.
fn fit_emu(width: u32, height: u32, max_width: u32, max_height: u32) -> (u64, u64) {
    let width = f64::from(width.max(1));
    let height = f64::from(height.max(1));
    let scale = (f64::from(max_width) / width).min(f64::from(max_height) / height);
    let cx = (width * scale).round() as u64 * EMU_PER_TWIP;
    let cy = (height * scale).round() as u64 * EMU_PER_TWIP;
    (cx, cy)
}

fn is_link(value: &str) -> bool {
    let value = value.trim();
    (value.starts_with("http://") || value.starts_with("https://"))
        && !value.contains(char::is_whitespace)
}
