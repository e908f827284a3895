//! Standard Type 1 fonts, WinAnsi encoding and glyph metrics.

/// Helvetica advance widths for codes 32..=126, in 1/1000 em.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 48-63
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 80-95
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 96-111
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 112-126
];

/// Helvetica-Bold advance widths for codes 32..=126.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 48-63
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 80-95
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 96-111
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 112-126
];

/// Width used for codes outside the ASCII table.
const DEFAULT_WIDTH: u16 = 556;

/// Text style within a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 3] = [FontStyle::Regular, FontStyle::Bold, FontStyle::Italic];

    /// Page resource name.
    pub fn resource(&self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Helvetica,
    Times,
    Courier,
}

/// The Base-14 family closest to a requested font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSet {
    family: Family,
}

impl FontSet {
    /// Serif requests map to Times, monospace to Courier, the rest to Helvetica.
    pub fn for_family(requested: &str) -> Self {
        let name = requested.to_ascii_lowercase();
        let family = if name.contains("courier") || name.contains("mono") {
            Family::Courier
        } else if name.contains("times")
            || name.contains("georgia")
            || name.contains("garamond")
            || (name.contains("serif") && !name.contains("sans"))
        {
            Family::Times
        } else {
            Family::Helvetica
        };
        Self { family }
    }

    /// PostScript name of the font used for `style`.
    pub fn base_font(&self, style: FontStyle) -> &'static str {
        match (self.family, style) {
            (Family::Helvetica, FontStyle::Regular) => "Helvetica",
            (Family::Helvetica, FontStyle::Bold) => "Helvetica-Bold",
            (Family::Helvetica, FontStyle::Italic) => "Helvetica-Oblique",
            (Family::Times, FontStyle::Regular) => "Times-Roman",
            (Family::Times, FontStyle::Bold) => "Times-Bold",
            (Family::Times, FontStyle::Italic) => "Times-Italic",
            (Family::Courier, FontStyle::Regular) => "Courier",
            (Family::Courier, FontStyle::Bold) => "Courier-Bold",
            (Family::Courier, FontStyle::Italic) => "Courier-Oblique",
        }
    }

    /// Advance width of one encoded byte, in 1/1000 em.
    ///
    /// Times uses Helvetica metrics, which are never narrower.
    fn glyph_width(&self, style: FontStyle, code: u8) -> u16 {
        if self.family == Family::Courier {
            return 600;
        }
        let table = match style {
            FontStyle::Bold => &HELVETICA_BOLD,
            FontStyle::Regular | FontStyle::Italic => &HELVETICA,
        };
        match code {
            32..=126 => table[usize::from(code - 32)],
            _ => DEFAULT_WIDTH,
        }
    }

    /// Width of `text` set at `size` points.
    pub fn text_width(&self, text: &str, style: FontStyle, size: f32) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .iter()
            .map(|b| u32::from(self.glyph_width(style, *b)))
            .sum();
        units as f32 * size / 1000.0
    }
}

/// Encodes `text` as WinAnsi; unencodable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

/// Number of characters in `text` that WinAnsi cannot encode.
pub fn unencodable_count(text: &str) -> usize {
    text.chars()
        .filter(|&ch| ch != '?' && win_ansi_byte(ch) == b'?')
        .count()
}

fn win_ansi_byte(ch: char) -> u8 {
    match ch {
        '\t' => b' ',
        ' '..='~' => ch as u8,
        '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

/// A PDF literal string, `(...)`, holding WinAnsi-encoded `text`.
pub fn pdf_string(text: &str) -> String {
    literal(&encode_win_ansi(text))
}

/// A PDF literal string from raw bytes.
pub fn literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('(');
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("\\{:03o}", b)),
        }
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_families_to_base_fonts() {
        assert_eq!(
            FontSet::for_family("Helvetica").base_font(FontStyle::Bold),
            "Helvetica-Bold"
        );
        assert_eq!(
            FontSet::for_family("Times New Roman").base_font(FontStyle::Regular),
            "Times-Roman"
        );
        assert_eq!(
            FontSet::for_family("JetBrains Mono").base_font(FontStyle::Italic),
            "Courier-Oblique"
        );
        assert_eq!(
            FontSet::for_family("Open Sans").base_font(FontStyle::Regular),
            "Helvetica"
        );
    }

    #[test]
    fn encodes_win_ansi_with_fallback() {
        assert_eq!(encode_win_ansi("Aé€–"), vec![b'A', 0xE9, 0x80, 0x96]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn counts_only_unencodable_characters() {
        assert_eq!(unencodable_count("Why? Aé€–"), 0);
        assert_eq!(unencodable_count("ブレーキ system"), 4);
    }

    #[test]
    fn escapes_literal_strings() {
        assert_eq!(pdf_string("a(b)\\c"), "(a\\(b\\)\\\\c)");
        assert_eq!(pdf_string("é"), "(\\351)");
    }

    #[test]
    fn measures_text() {
        let fonts = FontSet::for_family("Helvetica");
        let width = fonts.text_width("Hi", FontStyle::Regular, 10.0);
        assert!((width - (722.0 + 222.0) / 100.0).abs() < 0.001);

        let courier = FontSet::for_family("Courier");
        assert!((courier.text_width("abc", FontStyle::Bold, 10.0) - 18.0).abs() < 0.001);
    }
}
