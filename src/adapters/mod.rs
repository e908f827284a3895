//! Adapters - Implementations of port interfaces.
//!
//! - `templates` - The built-in presets (`Template` implementations)
//! - `export` - Markdown, PDF and DOCX exporters and their registry

pub mod export;
pub mod templates;
