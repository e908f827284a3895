//! Application layer - Commands and Handlers.
//!
//! This layer coordinates the domain, the template presets and the
//! exporter registry.

pub mod handlers;

pub use handlers::{ExportCaseCommand, ExportCaseError, ExportCaseHandler};
