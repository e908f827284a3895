//! WordprocessingML fragments: escaped runs, paragraphs, fields and pictures.

use quick_xml::escape::escape;

use crate::domain::foundation::HexColor;

pub const XML_DECLARATION: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

pub const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// Escapes text for element content or attribute values.
///
/// Characters XML 1.0 cannot carry (C0 controls other than tab, newline and
/// carriage return) are dropped.
pub fn escape_xml(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| matches!(c, '\t' | '\n' | '\r') || *c >= ' ')
        .filter(|c| !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
        .collect();
    escape(cleaned.as_str()).into_owned()
}

/// Character formatting for a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStyle {
    pub char_style: Option<&'static str>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<HexColor>,
    /// Point size; stored in the package as half-points.
    pub size: Option<f32>,
}

impl RunStyle {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: HexColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_size(mut self, points: f32) -> Self {
        self.size = Some(points);
        self
    }

    pub fn with_char_style(mut self, style: &'static str) -> Self {
        self.char_style = Some(style);
        self
    }

    /// `<w:rPr>` in schema order, or nothing for a plain run.
    pub fn properties(&self) -> String {
        let mut props = String::new();
        if let Some(style) = self.char_style {
            props.push_str(&format!("<w:rStyle w:val=\"{}\"/>", style));
        }
        if self.bold {
            props.push_str("<w:b/>");
        }
        if self.italic {
            props.push_str("<w:i/>");
        }
        if let Some(color) = self.color {
            props.push_str(&format!("<w:color w:val=\"{}\"/>", color.to_hex_digits()));
        }
        if let Some(size) = self.size {
            let half_points = half_points(size);
            props.push_str(&format!(
                "<w:sz w:val=\"{0}\"/><w:szCs w:val=\"{0}\"/>",
                half_points
            ));
        }
        if props.is_empty() {
            props
        } else {
            format!("<w:rPr>{}</w:rPr>", props)
        }
    }
}

pub fn half_points(points: f32) -> u32 {
    (points * 2.0).round().max(2.0) as u32
}

/// A run of text; newlines become breaks and tabs become tab characters.
pub fn run(text: &str, style: &RunStyle) -> String {
    let mut inner = String::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            inner.push_str("<w:br/>");
        }
        for (segment_index, segment) in line.split('\t').enumerate() {
            if segment_index > 0 {
                inner.push_str("<w:tab/>");
            }
            if !segment.is_empty() {
                inner.push_str(&format!(
                    "<w:t xml:space=\"preserve\">{}</w:t>",
                    escape_xml(segment.trim_end_matches('\r'))
                ));
            }
        }
    }
    format!("<w:r>{}{}</w:r>", style.properties(), inner)
}

/// A paragraph with optional `<w:pPr>` content.
pub fn paragraph(properties: &str, runs: &str) -> String {
    if properties.is_empty() {
        format!("<w:p>{}</w:p>", runs)
    } else {
        format!("<w:p><w:pPr>{}</w:pPr>{}</w:p>", properties, runs)
    }
}

/// A paragraph styled with the named paragraph style.
pub fn styled_paragraph(style: &str, runs: &str) -> String {
    paragraph(&format!("<w:pStyle w:val=\"{}\"/>", style), runs)
}

/// A hyperlink to an external relationship.
pub fn hyperlink(rel_id: &str, text: &str) -> String {
    format!(
        "<w:hyperlink r:id=\"{}\" w:history=\"1\">{}</w:hyperlink>",
        rel_id,
        run(text, &RunStyle::plain().with_char_style("Hyperlink"))
    )
}

/// A complex field (`PAGE`, `NUMPAGES`) with a placeholder result.
pub fn field(instruction: &str, placeholder: &str, style: &RunStyle) -> String {
    let props = style.properties();
    format!(
        "<w:r>{0}<w:fldChar w:fldCharType=\"begin\"/></w:r>\
         <w:r>{0}<w:instrText xml:space=\"preserve\"> {1} </w:instrText></w:r>\
         <w:r>{0}<w:fldChar w:fldCharType=\"separate\"/></w:r>\
         <w:r>{0}<w:t>{2}</w:t></w:r>\
         <w:r>{0}<w:fldChar w:fldCharType=\"end\"/></w:r>",
        props,
        instruction,
        escape_xml(placeholder)
    )
}

/// An inline picture referencing an image relationship.
#[derive(Debug, Clone)]
pub struct Picture<'a> {
    pub rel_id: &'a str,
    /// Drawing object id, unique within the part.
    pub id: u32,
    pub name: &'a str,
    pub description: &'a str,
    /// Extent in EMU.
    pub cx: u64,
    pub cy: u64,
}

impl Picture<'_> {
    pub fn to_xml(&self) -> String {
        let name = escape_xml(self.name);
        format!(
            "<w:r><w:drawing>\
             <wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">\
             <wp:extent cx=\"{cx}\" cy=\"{cy}\"/>\
             <wp:docPr id=\"{id}\" name=\"{name}\" descr=\"{descr}\"/>\
             <wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a=\"{ns_a}\" noChangeAspect=\"1\"/></wp:cNvGraphicFramePr>\
             <a:graphic xmlns:a=\"{ns_a}\"><a:graphicData uri=\"{ns_pic}\">\
             <pic:pic xmlns:pic=\"{ns_pic}\">\
             <pic:nvPicPr><pic:cNvPr id=\"{id}\" name=\"{name}\"/><pic:cNvPicPr/></pic:nvPicPr>\
             <pic:blipFill><a:blip r:embed=\"{rel}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>\
             <pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
             <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>\
             </pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>",
            cx = self.cx,
            cy = self.cy,
            id = self.id,
            name = name,
            descr = escape_xml(self.description),
            ns_a = NS_A,
            ns_pic = NS_PIC,
            rel = self.rel_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_drops_control_characters() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("bell\u{7}tab\t"), "belltab\t");
    }

    #[test]
    fn runs_split_lines_and_tabs() {
        let xml = run("one\ntwo\tthree", &RunStyle::bold());
        assert_eq!(
            xml,
            "<w:r><w:rPr><w:b/></w:rPr>\
             <w:t xml:space=\"preserve\">one</w:t><w:br/>\
             <w:t xml:space=\"preserve\">two</w:t><w:tab/>\
             <w:t xml:space=\"preserve\">three</w:t></w:r>"
        );
    }

    #[test]
    fn run_properties_follow_schema_order() {
        let style = RunStyle::italic()
            .with_char_style("Hyperlink")
            .with_color(HexColor::rgb(0x25, 0x63, 0xEB))
            .with_size(10.5);
        assert_eq!(
            style.properties(),
            "<w:rPr><w:rStyle w:val=\"Hyperlink\"/><w:i/><w:color w:val=\"2563EB\"/>\
             <w:sz w:val=\"21\"/><w:szCs w:val=\"21\"/></w:rPr>"
        );
        assert_eq!(RunStyle::plain().properties(), "");
    }

    #[test]
    fn fields_wrap_instructions() {
        let xml = field("PAGE", "1", &RunStyle::plain());
        assert!(xml.contains("<w:instrText xml:space=\"preserve\"> PAGE </w:instrText>"));
        assert_eq!(xml.matches("w:fldCharType").count(), 3);
    }
}
