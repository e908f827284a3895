//! Ports - Interfaces between the export domain and its implementations.
//!
//! Following hexagonal architecture, ports define the contracts that
//! adapters implement.
//!
//! - `Template` - Decides which content a document contains
//! - `Exporter` - Serializes a rendered document into one output format

mod exporter;
mod template;

pub use exporter::{ExportAsset, ExportError, ExportOptions, ExportResult, Exporter};
pub use template::{RenderContext, RenderInput, Template};
