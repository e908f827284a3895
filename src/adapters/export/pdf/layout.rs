//! Page layout: flows rendered sections onto A4 pages as content streams.
//!
//! The layout owns a cursor (`y`, in points from the page bottom) and starts
//! a new page whenever the next line would cross the bottom margin. Footers
//! are stamped on every page once the total page count is known.

use std::cell::Cell;
use std::ops::Range;

use super::fonts::{pdf_string, unencodable_count, FontSet, FontStyle};
use crate::adapters::export::assets::{load_image, DecodedImage, ImageAsset};
use crate::domain::branding::ResolvedBranding;
use crate::domain::case::TreeNode;
use crate::domain::document::{ContentBlock, HeadingLevel, RenderedSection, SectionType};
use crate::domain::foundation::HexColor;
use crate::domain::tree::render_element_as_blocks;

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

const MARGIN_X: f32 = 56.0;
const MARGIN_TOP: f32 = 64.0;
const MARGIN_BOTTOM: f32 = 72.0;
const FOOTER_Y: f32 = 40.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;
const CONTENT_TOP: f32 = PAGE_HEIGHT - MARGIN_TOP;

const BODY_SIZE: f32 = 10.5;
const TABLE_SIZE: f32 = 9.5;
const FOOTER_SIZE: f32 = 8.0;
const SECTION_TITLE_SIZE: f32 = 18.0;
const COVER_TITLE_SIZE: f32 = 26.0;
const HEADING_SIZES: [f32; 6] = [20.0, 16.0, 14.0, 12.0, 11.0, 10.0];

const TEXT_COLOR: HexColor = HexColor::rgb(0x1F, 0x29, 0x37);
const MUTED_COLOR: HexColor = HexColor::rgb(0x6B, 0x72, 0x80);
const RULE_COLOR: HexColor = HexColor::rgb(0xD1, 0xD5, 0xDB);

const ELEMENT_INDENT: f32 = 12.0;
const MAX_INDENT_DEPTH: usize = 8;
const ACCENT_WIDTH: f32 = 3.0;
const ACCENT_GAP: f32 = 8.0;
const CELL_PADDING: f32 = 4.0;
const LIST_INDENT: f32 = 18.0;

/// A clickable URI region on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// `[x1, y1, x2, y2]` in page space.
    pub rect: [f32; 4],
    pub url: String,
}

/// One finished page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub content: String,
    pub links: Vec<Link>,
}

/// An RGB raster referenced from page content as `/Im<n>`.
#[derive(Debug, Clone)]
pub struct ImageResource {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Pages plus the images they reference.
#[derive(Debug, Clone, Default)]
pub struct LaidOut {
    pub pages: Vec<Page>,
    pub images: Vec<ImageResource>,
    /// Characters drawn as `?` because WinAnsi has no code for them.
    pub substituted: usize,
}

/// Resource name of the image at `index`.
pub fn image_resource_name(index: usize) -> String {
    format!("Im{}", index)
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    font: FontStyle,
    size: f32,
    color: HexColor,
    leading: f32,
}

impl TextStyle {
    fn new(font: FontStyle, size: f32, color: HexColor) -> Self {
        Self {
            font,
            size,
            color,
            leading: 1.35,
        }
    }

    fn with_leading(mut self, leading: f32) -> Self {
        self.leading = leading;
        self
    }

    fn line_height(&self) -> f32 {
        self.size * self.leading
    }

    fn baseline(&self, bottom: f32) -> f32 {
        bottom + self.line_height() * 0.28
    }
}

/// Wrapped cells of one table row.
struct TableRow<'t> {
    lines: &'t [Vec<String>],
    cells: &'t [String],
    style: TextStyle,
    fill: Option<HexColor>,
}

/// Header row, redrawn on every page a table continues onto.
struct TableHeader<'t> {
    lines: Vec<Vec<String>>,
    cells: &'t [String],
    height: f32,
    style: TextStyle,
    fill: HexColor,
}

/// Accent bar drawn beside every line of an element block.
#[derive(Debug, Clone, Copy)]
struct Accent {
    x: f32,
    color: HexColor,
}

pub struct PageLayout<'a> {
    fonts: FontSet,
    branding: &'a ResolvedBranding,
    pages: Vec<Page>,
    current: Page,
    images: Vec<ImageResource>,
    y: f32,
    substituted: Cell<usize>,
}

impl<'a> PageLayout<'a> {
    pub fn new(branding: &'a ResolvedBranding) -> Self {
        Self {
            fonts: FontSet::for_family(&branding.font_family),
            branding,
            pages: Vec::new(),
            current: Page::default(),
            images: Vec::new(),
            y: CONTENT_TOP,
            substituted: Cell::new(0),
        }
    }

    /// Lays out every section and stamps the footers.
    pub fn lay_out(mut self, sections: &[RenderedSection]) -> LaidOut {
        for (index, section) in sections.iter().enumerate() {
            if section.section_type == SectionType::TitlePage {
                if !self.current.content.is_empty() {
                    self.new_page();
                }
                self.title_page(section);
                if index + 1 < sections.len() {
                    self.new_page();
                }
            } else {
                self.section(section);
            }
        }
        self.finish()
    }

    fn finish(mut self) -> LaidOut {
        let last = std::mem::take(&mut self.current);
        self.pages.push(last);

        let mut pages = std::mem::take(&mut self.pages);
        let total = pages.len();
        for (index, page) in pages.iter_mut().enumerate() {
            page.content.push_str(&self.footer(index + 1, total));
        }

        let substituted = self.substituted.get();
        if substituted > 0 {
            tracing::warn!(
                substituted,
                "Characters outside WinAnsi were replaced with '?'"
            );
        }

        LaidOut {
            pages,
            images: self.images,
            substituted,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Cursor
    // ─────────────────────────────────────────────────────────────────────

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.y = CONTENT_TOP;
    }

    fn at_page_top(&self) -> bool {
        self.y >= CONTENT_TOP
    }

    /// Breaks the page if `height` no longer fits above the bottom margin.
    fn ensure(&mut self, height: f32) {
        if self.y - height < MARGIN_BOTTOM && !self.at_page_top() {
            self.new_page();
        }
    }

    /// Vertical space, suppressed at the top of a page.
    fn gap(&mut self, height: f32) {
        if !self.at_page_top() {
            self.y -= height;
        }
    }

    /// Reserves one line and returns its bottom edge.
    fn advance(&mut self, line_height: f32, accent: Option<Accent>) -> f32 {
        self.ensure(line_height);
        self.y -= line_height;
        if let Some(accent) = accent {
            self.emit(fill_rect(accent.x, self.y, ACCENT_WIDTH, line_height, accent.color));
        }
        self.y
    }

    /// Text operator for `text`, tallying characters that cannot be encoded.
    fn set_text(&self, x: f32, y: f32, style: TextStyle, text: &str) -> String {
        let missing = unencodable_count(text);
        if missing > 0 {
            self.substituted.set(self.substituted.get() + missing);
        }
        text_op(x, y, style, text)
    }

    fn emit(&mut self, ops: String) {
        self.current.content.push_str(&ops);
    }

    fn link(&mut self, rect: [f32; 4], url: &str) {
        self.current.links.push(Link {
            rect,
            url: url.trim().to_string(),
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Text
    // ─────────────────────────────────────────────────────────────────────

    /// Greedy word wrap; words wider than `width` are broken by character.
    fn wrap(&self, text: &str, font: FontStyle, size: f32, width: f32) -> Vec<String> {
        let fits = |s: &str| self.fonts.text_width(s, font, size) <= width;
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if line.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", line, word)
                };
                if fits(&candidate) {
                    line = candidate;
                    continue;
                }
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                if fits(word) {
                    line = word.to_string();
                    continue;
                }
                for ch in word.chars() {
                    let mut next = line.clone();
                    next.push(ch);
                    if !line.is_empty() && !fits(&next) {
                        lines.push(std::mem::take(&mut line));
                        line.push(ch);
                    } else {
                        line = next;
                    }
                }
            }
            lines.push(line);
        }
        lines
    }

    fn body(&self) -> TextStyle {
        TextStyle::new(FontStyle::Regular, BODY_SIZE, TEXT_COLOR).with_leading(1.45)
    }

    /// Wrapped text at `x`; returns the rectangle of each line.
    fn text(
        &mut self,
        text: &str,
        x: f32,
        width: f32,
        style: TextStyle,
        accent: Option<Accent>,
    ) -> Vec<[f32; 4]> {
        let mut rects = Vec::new();
        for line in self.wrap(text, style.font, style.size, width) {
            let bottom = self.advance(style.line_height(), accent);
            let line_width = self.fonts.text_width(&line, style.font, style.size);
            self.emit(self.set_text(x, style.baseline(bottom), style, &line));
            rects.push([x, bottom, x + line_width, bottom + style.line_height()]);
        }
        rects
    }

    fn centered(&mut self, text: &str, style: TextStyle) {
        for line in self.wrap(text, style.font, style.size, CONTENT_WIDTH) {
            let bottom = self.advance(style.line_height(), None);
            let line_width = self.fonts.text_width(&line, style.font, style.size);
            let x = MARGIN_X + (CONTENT_WIDTH - line_width) / 2.0;
            self.emit(self.set_text(x, style.baseline(bottom), style, &line));
        }
    }

    /// `Label: value` with the value wrapped beside the bold label.
    fn labelled(&mut self, label: &str, value: &str, x: f32, width: f32, accent: Option<Accent>) {
        let style = self.body();
        let label_style = TextStyle {
            font: FontStyle::Bold,
            ..style
        };
        let label_width = self.fonts.text_width(label, FontStyle::Bold, style.size) + 4.0;
        let value_x = x + label_width;
        let value_width = (width - label_width).max(width * 0.5);
        let linked = is_link(value);

        for (index, line) in self
            .wrap(value, style.font, style.size, value_width)
            .into_iter()
            .enumerate()
        {
            let bottom = self.advance(style.line_height(), accent);
            let baseline = style.baseline(bottom);
            if index == 0 {
                self.emit(self.set_text(x, baseline, label_style, label));
            }
            self.emit(self.set_text(value_x, baseline, style, &line));
            if linked {
                let line_width = self.fonts.text_width(&line, style.font, style.size);
                self.link(
                    [value_x, bottom, value_x + line_width, bottom + style.line_height()],
                    value,
                );
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Sections
    // ─────────────────────────────────────────────────────────────────────

    fn title_page(&mut self, section: &RenderedSection) {
        let branding = self.branding;
        let primary = branding.primary_color;

        self.emit(fill_rect(0.0, PAGE_HEIGHT - 12.0, PAGE_WIDTH, 12.0, primary));

        if let Some(logo) = branding.logo.as_ref().filter(|logo| logo.is_embedded()) {
            if let ImageAsset::Embedded(image) = load_image(logo.src()) {
                let (width, height) = fit(image.width as f32, image.height as f32, 160.0, 64.0);
                let name = self.register_image(image);
                self.emit(image_op(&name, MARGIN_X, CONTENT_TOP - height, width, height));
            }
        }

        self.y = PAGE_HEIGHT * 0.62;
        let mut titled = false;
        for block in &section.blocks {
            match block {
                ContentBlock::Heading { text, .. } if !titled => {
                    titled = true;
                    let style = TextStyle::new(FontStyle::Bold, COVER_TITLE_SIZE, primary)
                        .with_leading(1.2);
                    self.text(text, MARGIN_X, CONTENT_WIDTH, style, None);
                    self.y -= 10.0;
                    self.emit(line_op(
                        MARGIN_X,
                        self.y,
                        MARGIN_X + 96.0,
                        self.y,
                        branding.secondary_color,
                        2.0,
                    ));
                    self.y -= 18.0;
                }
                ContentBlock::Paragraph { text } => {
                    let style = TextStyle::new(FontStyle::Regular, 13.0, branding.secondary_color)
                        .with_leading(1.4);
                    self.text(text, MARGIN_X, CONTENT_WIDTH, style, None);
                    self.y -= 24.0;
                }
                ContentBlock::Metadata { key, value } => {
                    self.labelled(&format!("{}:", key), value, MARGIN_X, CONTENT_WIDTH, None);
                    self.y -= 2.0;
                }
                other => self.block(other),
            }
        }
    }

    fn section(&mut self, section: &RenderedSection) {
        let primary = self.branding.primary_color;
        let style = TextStyle::new(FontStyle::Bold, SECTION_TITLE_SIZE, primary).with_leading(1.3);

        self.gap(20.0);
        // keep the title with at least two body lines
        self.ensure(style.line_height() + 14.0 + 2.0 * self.body().line_height());
        self.text(&section.title, MARGIN_X, CONTENT_WIDTH, style, None);
        self.y -= 4.0;
        self.emit(line_op(MARGIN_X, self.y, PAGE_WIDTH - MARGIN_X, self.y, primary, 1.0));
        self.y -= 10.0;

        for block in &section.blocks {
            self.block(block);
        }
    }

    fn block(&mut self, block: &ContentBlock) {
        match block {
            ContentBlock::Heading { level, text } => self.heading(*level, text),
            ContentBlock::Paragraph { text } => {
                let style = self.body();
                self.text(text, MARGIN_X, CONTENT_WIDTH, style, None);
                self.gap(6.0);
            }
            ContentBlock::List { ordered, items } => self.list(*ordered, items),
            ContentBlock::Table { headers, rows } => self.table(headers, rows),
            ContentBlock::Image { src, alt, caption } => self.image(src, alt, caption.as_deref()),
            ContentBlock::Divider => self.divider(),
            ContentBlock::Metadata { key, value } => {
                self.labelled(&format!("{}:", key), value, MARGIN_X, CONTENT_WIDTH, None);
                self.gap(2.0);
            }
            ContentBlock::Element { node, depth } => self.element(node, *depth),
        }
    }

    fn heading(&mut self, level: HeadingLevel, text: &str) {
        let style = TextStyle::new(FontStyle::Bold, heading_size(level), self.branding.primary_color)
            .with_leading(1.3);
        self.gap(8.0);
        self.ensure(style.line_height() + self.body().line_height());
        self.text(text, MARGIN_X, CONTENT_WIDTH, style, None);
        self.gap(4.0);
    }

    fn list(&mut self, ordered: bool, items: &[String]) {
        let style = self.body();
        let marker_style = TextStyle {
            font: if ordered { FontStyle::Bold } else { FontStyle::Regular },
            color: self.branding.primary_color,
            ..style
        };

        for (index, item) in items.iter().enumerate() {
            let marker = if ordered {
                format!("{}.", index + 1)
            } else {
                "\u{2022}".to_string()
            };
            let lines = self.wrap(item, style.font, style.size, CONTENT_WIDTH - LIST_INDENT);
            for (line_index, line) in lines.iter().enumerate() {
                let bottom = self.advance(style.line_height(), None);
                let baseline = style.baseline(bottom);
                if line_index == 0 {
                    self.emit(self.set_text(MARGIN_X + 4.0, baseline, marker_style, &marker));
                }
                self.emit(self.set_text(MARGIN_X + LIST_INDENT, baseline, style, line));
            }
            self.gap(2.0);
        }
        self.gap(4.0);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tables
    // ─────────────────────────────────────────────────────────────────────

    fn table(&mut self, headers: &[String], rows: &[Vec<String>]) {
        let columns = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0)
            .max(1);
        let column_width = CONTENT_WIDTH / columns as f32;
        let primary = self.branding.primary_color;
        let header_style = TextStyle::new(FontStyle::Bold, TABLE_SIZE, HexColor::WHITE);
        let cell_style = TextStyle::new(FontStyle::Regular, TABLE_SIZE, TEXT_COLOR);

        let header = (!headers.is_empty()).then(|| {
            let (lines, height) = self.wrap_cells(headers, columns, column_width, header_style);
            TableHeader {
                lines,
                cells: headers,
                height,
                style: header_style,
                fill: primary,
            }
        });
        let header_height = header.as_ref().map_or(0.0, |h| h.height);
        // a row taller than this is split across pages
        let page_room = CONTENT_TOP - MARGIN_BOTTOM - header_height;

        self.gap(4.0);
        if let Some(header) = &header {
            // keep the header with the first line of the first row
            self.ensure(header.height + cell_style.line_height() + 2.0 * CELL_PADDING);
            self.draw_header(header, column_width);
        }

        for (index, row) in rows.iter().enumerate() {
            let (lines, height) = self.wrap_cells(row, columns, column_width, cell_style);
            if self.y - height < MARGIN_BOTTOM && !self.at_page_top() && height <= page_room {
                self.continue_table(header.as_ref(), column_width);
            }
            let fill = (index % 2 == 1).then(|| primary.tint(0.92));
            let row = TableRow {
                lines: &lines,
                cells: row,
                style: cell_style,
                fill,
            };
            self.draw_row(&row, column_width, header.as_ref());
        }
        self.gap(8.0);
    }

    /// Wraps each cell, padding to `columns`; returns lines and row height.
    fn wrap_cells(
        &self,
        cells: &[String],
        columns: usize,
        column_width: f32,
        style: TextStyle,
    ) -> (Vec<Vec<String>>, f32) {
        let inner = column_width - 2.0 * CELL_PADDING;
        let wrapped: Vec<Vec<String>> = (0..columns)
            .map(|c| {
                let cell = cells.get(c).map(String::as_str).unwrap_or("");
                self.wrap(cell, style.font, style.size, inner)
            })
            .collect();
        let height = row_line_count(&wrapped) as f32 * style.line_height() + 2.0 * CELL_PADDING;
        (wrapped, height)
    }

    fn continue_table(&mut self, header: Option<&TableHeader<'_>>, column_width: f32) {
        self.new_page();
        if let Some(header) = header {
            self.draw_header(header, column_width);
        }
    }

    fn draw_header(&mut self, header: &TableHeader<'_>, column_width: f32) {
        let row = TableRow {
            lines: &header.lines,
            cells: header.cells,
            style: header.style,
            fill: Some(header.fill),
        };
        self.draw_row(&row, column_width, None);
    }

    /// Draws a row, continuing it on the next page line by line when it
    /// runs past the bottom margin.
    fn draw_row(
        &mut self,
        row: &TableRow<'_>,
        column_width: f32,
        header: Option<&TableHeader<'_>>,
    ) {
        let line_count = row_line_count(row.lines);
        let line_height = row.style.line_height();
        let mut start = 0;
        let mut fresh = self.at_page_top();

        while start < line_count {
            let room = self.y - MARGIN_BOTTOM - 2.0 * CELL_PADDING;
            let mut take = (room / line_height).floor().max(0.0) as usize;
            if take == 0 {
                if !fresh {
                    self.continue_table(header, column_width);
                    fresh = true;
                    continue;
                }
                take = 1;
            }
            let end = (start + take).min(line_count);
            self.draw_row_fragment(row, column_width, start..end);
            start = end;
            fresh = false;
        }
    }

    fn draw_row_fragment(&mut self, row: &TableRow<'_>, column_width: f32, lines: Range<usize>) {
        let line_height = row.style.line_height();
        let top = self.y;
        let height = lines.len() as f32 * line_height + 2.0 * CELL_PADDING;
        let bottom = top - height;
        if let Some(fill) = row.fill {
            self.emit(fill_rect(
                MARGIN_X,
                bottom,
                column_width * row.lines.len() as f32,
                height,
                fill,
            ));
        }

        for (column, cell_lines) in row.lines.iter().enumerate() {
            let x = MARGIN_X + column as f32 * column_width;
            self.emit(stroke_rect(x, bottom, column_width, height, RULE_COLOR, 0.5));
            let fragment = cell_lines.iter().skip(lines.start).take(lines.len());
            for (index, line) in fragment.enumerate() {
                let line_bottom = top - CELL_PADDING - (index + 1) as f32 * line_height;
                let baseline = row.style.baseline(line_bottom);
                self.emit(self.set_text(x + CELL_PADDING, baseline, row.style, line));
            }
            if let Some(url) = row.cells.get(column).filter(|cell| is_link(cell)) {
                self.link([x, bottom, x + column_width, top], url);
            }
        }
        self.y = bottom;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Images, dividers, elements
    // ─────────────────────────────────────────────────────────────────────

    fn register_image(&mut self, image: DecodedImage) -> String {
        let name = image_resource_name(self.images.len());
        self.images.push(ImageResource {
            width: image.width,
            height: image.height,
            rgb: image.rgb,
        });
        name
    }

    fn image(&mut self, src: &str, alt: &str, caption: Option<&str>) {
        match load_image(src) {
            ImageAsset::Embedded(image) => self.embedded_image(image, caption),
            ImageAsset::Remote(_) | ImageAsset::Missing => {
                self.placeholder(&format!("[Image: {}]", alt))
            }
            ImageAsset::Unreadable(_) => {
                self.placeholder(&format!("[Unable to render image: {}]", alt))
            }
        }
    }

    fn embedded_image(&mut self, image: DecodedImage, caption: Option<&str>) {
        let max_height = CONTENT_TOP - MARGIN_BOTTOM - 48.0;
        let (width, height) = fit(
            image.width as f32,
            image.height as f32,
            CONTENT_WIDTH,
            max_height,
        );

        self.gap(6.0);
        self.ensure(height);
        self.y -= height;
        let x = MARGIN_X + (CONTENT_WIDTH - width) / 2.0;
        let name = self.register_image(image);
        self.emit(image_op(&name, x, self.y, width, height));

        if let Some(caption) = caption.map(str::trim).filter(|c| !c.is_empty()) {
            self.y -= 4.0;
            self.centered(
                caption,
                TextStyle::new(FontStyle::Italic, 9.0, self.branding.secondary_color),
            );
        }
        self.gap(8.0);
    }

    fn placeholder(&mut self, text: &str) {
        let style = TextStyle::new(FontStyle::Italic, BODY_SIZE, MUTED_COLOR);
        let lines = self.wrap(text, style.font, style.size, CONTENT_WIDTH - 16.0);
        let height = lines.len() as f32 * style.line_height() + 12.0;

        self.gap(6.0);
        self.ensure(height);
        let top = self.y;
        self.emit(fill_rect(MARGIN_X, top - height, CONTENT_WIDTH, height, RULE_COLOR.tint(0.6)));
        self.emit(stroke_rect(MARGIN_X, top - height, CONTENT_WIDTH, height, RULE_COLOR, 0.5));
        for (index, line) in lines.iter().enumerate() {
            let bottom = top - 6.0 - (index + 1) as f32 * style.line_height();
            self.emit(self.set_text(MARGIN_X + 8.0, style.baseline(bottom), style, line));
        }
        self.y = top - height;
        self.gap(8.0);
    }

    fn divider(&mut self) {
        self.gap(6.0);
        self.ensure(12.0);
        let y = self.y - 4.0;
        self.emit(line_op(MARGIN_X, y, PAGE_WIDTH - MARGIN_X, y, RULE_COLOR, 0.75));
        self.y -= 12.0;
    }

    fn element(&mut self, node: &TreeNode, depth: usize) {
        let indent = depth.min(MAX_INDENT_DEPTH) as f32 * ELEMENT_INDENT;
        let accent = Accent {
            x: MARGIN_X + indent,
            color: self.branding.primary_color,
        };
        let x = accent.x + ACCENT_WIDTH + ACCENT_GAP;
        let width = CONTENT_WIDTH - indent - ACCENT_WIDTH - ACCENT_GAP;
        let body = self.body();

        self.gap(6.0);
        for block in render_element_as_blocks(node, depth) {
            match block {
                ContentBlock::Heading { level, text } => {
                    let title = if node.in_sandbox {
                        format!("{} [Draft]", text)
                    } else {
                        text
                    };
                    let style =
                        TextStyle::new(FontStyle::Bold, heading_size(level), accent.color);
                    self.ensure(style.line_height() + body.line_height());
                    self.text(&title, x, width, style, Some(accent));
                }
                ContentBlock::Paragraph { text } => {
                    self.text(&text, x, width, body, Some(accent));
                }
                ContentBlock::Metadata { key, value } => {
                    let label = match key.as_str() {
                        "Module Reference" => "Module",
                        other => other,
                    };
                    self.labelled(&format!("{}:", label), &value, x, width, Some(accent));
                }
                other => self.block(&other),
            }
        }
        self.gap(8.0);
    }

    fn footer(&self, number: usize, total: usize) -> String {
        let color = self.branding.secondary_color;
        let style = TextStyle::new(FontStyle::Regular, FOOTER_SIZE, color);
        let page_label = format!("Page {} of {}", number, total);
        let label_width = self.fonts.text_width(&page_label, style.font, style.size);
        let available = CONTENT_WIDTH - label_width - 24.0;

        let footer_text = self
            .wrap(&self.branding.footer_text, style.font, style.size, available)
            .into_iter()
            .next()
            .unwrap_or_default();

        let mut ops = line_op(
            MARGIN_X,
            FOOTER_Y + 12.0,
            PAGE_WIDTH - MARGIN_X,
            FOOTER_Y + 12.0,
            RULE_COLOR,
            0.5,
        );
        ops.push_str(&self.set_text(MARGIN_X, FOOTER_Y, style, &footer_text));
        ops.push_str(&self.set_text(
            PAGE_WIDTH - MARGIN_X - label_width,
            FOOTER_Y,
            style,
            &page_label,
        ));
        ops
    }
}

fn heading_size(level: HeadingLevel) -> f32 {
    HEADING_SIZES[usize::from(level.value().clamp(1, 6)) - 1]
}

/// Scales `width` x `height` to fit the box, keeping the aspect ratio.
fn fit(width: f32, height: f32, max_width: f32, max_height: f32) -> (f32, f32) {
    let width = width.max(1.0);
    let height = height.max(1.0);
    let scale = (max_width / width).min(max_height / height);
    (width * scale, height * scale)
}

fn row_line_count(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(1).max(1)
}

fn is_link(value: &str) -> bool {
    let value = value.trim();
    (value.starts_with("http://") || value.starts_with("https://"))
        && !value.contains(char::is_whitespace)
}

// ═══════════════════════════════════════════════════════════════════════════
// Content stream operators
// ═══════════════════════════════════════════════════════════════════════════

fn color_op(color: HexColor, operator: &str) -> String {
    let (r, g, b) = color.unit_components();
    format!("{:.3} {:.3} {:.3} {}\n", r, g, b, operator)
}

fn text_op(x: f32, y: f32, style: TextStyle, text: &str) -> String {
    format!(
        "BT\n{}/{} {:.2} Tf\n{:.2} {:.2} Td\n{} Tj\nET\n",
        color_op(style.color, "rg"),
        style.font.resource(),
        style.size,
        x,
        y,
        pdf_string(text)
    )
}

fn fill_rect(x: f32, y: f32, width: f32, height: f32, color: HexColor) -> String {
    format!(
        "{}{:.2} {:.2} {:.2} {:.2} re\nf\n",
        color_op(color, "rg"),
        x,
        y,
        width,
        height
    )
}

fn stroke_rect(x: f32, y: f32, width: f32, height: f32, color: HexColor, line: f32) -> String {
    format!(
        "{}{:.2} w\n{:.2} {:.2} {:.2} {:.2} re\nS\n",
        color_op(color, "RG"),
        line,
        x,
        y,
        width,
        height
    )
}

fn line_op(x1: f32, y1: f32, x2: f32, y2: f32, color: HexColor, width: f32) -> String {
    format!(
        "{}{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\n",
        color_op(color, "RG"),
        width,
        x1,
        y1,
        x2,
        y2
    )
}

fn image_op(name: &str, x: f32, y: f32, width: f32, height: f32) -> String {
    format!(
        "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/{} Do\nQ\n",
        width, height, x, y, name
    )
}
