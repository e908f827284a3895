//! Template configuration - presets, per-section settings and validation.

mod config;
mod preset;
mod validation;

pub use config::{SectionConfig, TemplateConfig};
pub use preset::TemplatePreset;
pub use validation::{validate_template_config, ConfigValidationError};
