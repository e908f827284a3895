//! Output filename derivation shared by every exporter.

use crate::domain::document::{ExportFormat, RenderedDocument};
use crate::domain::foundation::Timestamp;
use crate::ports::ExportOptions;

/// Stem used when the case name has no usable characters.
pub const FALLBACK_STEM: &str = "assurance-case";

/// Lower-cases `text` and collapses every run outside `[a-z0-9]` to one `-`,
/// trimming hyphens at both ends.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// `<slug>-YYYY-MM-DD.<extension>`, falling back to `assurance-case`.
pub fn generate_filename(case_name: &str, date: &Timestamp, extension: &str) -> String {
    let slug = slugify(case_name);
    let stem = if slug.is_empty() { FALLBACK_STEM } else { &slug };
    format!("{}-{}.{}", stem, date.date_string(), extension)
}

/// Filename for `document` in `format`, dated by the options or the
/// document's export time.
pub fn output_filename(
    document: &RenderedDocument,
    options: &ExportOptions,
    format: ExportFormat,
) -> String {
    let date = options.timestamp.unwrap_or(document.metadata.exported_at);
    generate_filename(&options.case_name, &date, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date() -> Timestamp {
        Timestamp::parse_rfc3339("2024-06-15T10:30:00Z").unwrap()
    }

    #[test]
    fn sanitises_case_names() {
        assert_eq!(
            generate_filename("Brake System: v2 (Draft)", &date(), "pdf"),
            "brake-system-v2-draft-2024-06-15.pdf"
        );
        assert_eq!(
            generate_filename("--Already--Hyphenated--", &date(), "md"),
            "already-hyphenated-2024-06-15.md"
        );
    }

    #[test]
    fn empty_stem_falls_back() {
        assert_eq!(
            generate_filename("", &date(), "docx"),
            "assurance-case-2024-06-15.docx"
        );
        assert_eq!(
            generate_filename("***", &date(), "docx"),
            "assurance-case-2024-06-15.docx"
        );
        assert_eq!(
            generate_filename("Ωμέγα", &date(), "md"),
            "assurance-case-2024-06-15.md"
        );
    }

    proptest! {
        #[test]
        fn filenames_are_always_safe(name in "\\PC{0,40}") {
            let filename = generate_filename(&name, &date(), "pdf");
            let stem = filename
                .strip_suffix("-2024-06-15.pdf")
                .expect("date suffix");

            prop_assert!(!stem.is_empty());
            prop_assert!(!stem.starts_with('-'));
            prop_assert!(!stem.ends_with('-'));
            prop_assert!(!stem.contains("--"));
            prop_assert!(stem
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
}
