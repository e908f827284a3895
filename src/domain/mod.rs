//! Domain layer containing the export model and its pure operations.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `case` - The assurance case snapshot being exported
//! - `document` - Format-agnostic content blocks and rendered documents
//! - `branding` - Visual identity and its resolution against defaults
//! - `tree` - Filtering, counting and block rendering over the case tree
//! - `template` - Template presets, configuration and validation

pub mod branding;
pub mod case;
pub mod document;
pub mod foundation;
pub mod template;
pub mod tree;
