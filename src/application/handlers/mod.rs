//! Application handlers.
//!
//! Command handlers that orchestrate templates and exporters.

pub mod export;

pub use export::{ExportCaseCommand, ExportCaseError, ExportCaseHandler};
