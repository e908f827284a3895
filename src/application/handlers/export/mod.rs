//! Export command handlers.

mod export_case;

pub use export_case::{ExportCaseCommand, ExportCaseError, ExportCaseHandler};
