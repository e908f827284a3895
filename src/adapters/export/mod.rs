//! Exporters - RenderedDocument to bytes.
//!
//! - `MarkdownExporter` - CommonMark text with a front-matter header
//! - `PdfExporter` - Self-contained paginated PDF 1.4
//! - `DocxExporter` - OOXML word-processing package
//!
//! `ExporterRegistry` maps formats to exporters.

pub mod assets;
mod docx;
mod filename;
mod markdown;
mod pdf;
mod registry;

pub use docx::{element_color, DocxExporter};
pub use filename::{generate_filename, slugify, FALLBACK_STEM};
pub use markdown::{escape_markdown, MarkdownExporter};
pub use pdf::PdfExporter;
pub use registry::{ExporterRegistry, RegistryError};
