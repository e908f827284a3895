//! Document module - the format-agnostic intermediate representation.
//!
//! Templates produce a [`RenderedDocument`]; exporters consume it without
//! looking at the source tree (except inside element blocks).

mod content_block;
mod format;
mod rendered;
mod section;

pub use content_block::{ContentBlock, HeadingLevel};
pub use format::ExportFormat;
pub use rendered::{DocumentMetadata, RenderedDocument};
pub use section::{RenderedSection, SectionType};
