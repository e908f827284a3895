//! Export defaults

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::document::ExportFormat;
use crate::domain::template::TemplatePreset;

/// Export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory results are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Format used when a request names none
    #[serde(default = "default_format")]
    pub default_format: String,

    /// Preset used when a request supplies no template
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Deepest case tree accepted for export
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: usize,
}

impl ExportConfig {
    /// Parsed default format
    pub fn format(&self) -> Result<ExportFormat, ValidationError> {
        self.default_format
            .parse()
            .map_err(|_| ValidationError::UnknownFormat(self.default_format.clone()))
    }

    /// Parsed default preset
    pub fn preset(&self) -> Result<TemplatePreset, ValidationError> {
        self.default_preset
            .parse()
            .map_err(|_| ValidationError::UnknownPreset(self.default_preset.clone()))
    }

    /// Validate export configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("export.output_dir"));
        }
        self.format()?;
        self.preset()?;
        if self.max_tree_depth == 0 {
            return Err(ValidationError::InvalidTreeDepth);
        }
        if self.log_level.trim().is_empty() {
            return Err(ValidationError::InvalidLogLevel(self.log_level.clone()));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_format: default_format(),
            default_preset: default_preset(),
            log_level: default_log_level(),
            max_tree_depth: default_max_tree_depth(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_format() -> String {
    "pdf".to_string()
}

fn default_preset() -> String {
    "full-report".to_string()
}

fn default_log_level() -> String {
    "info,case_export=debug".to_string()
}

fn default_max_tree_depth() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_config_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.format(), Ok(ExportFormat::Pdf));
        assert_eq!(config.preset(), Ok(TemplatePreset::FullReport));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_format_aliases_are_accepted() {
        let config = ExportConfig {
            default_format: "md".to_string(),
            ..Default::default()
        };
        assert_eq!(config.format(), Ok(ExportFormat::Markdown));
    }

    #[test]
    fn test_unknown_format_fails() {
        let config = ExportConfig {
            default_format: "html".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::UnknownFormat("html".to_string()))
        );
    }

    #[test]
    fn test_unknown_preset_fails() {
        let config = ExportConfig {
            default_preset: "poster".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_zero_depth_fails() {
        let config = ExportConfig {
            max_tree_depth: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTreeDepth));
    }

    #[test]
    fn test_empty_output_dir_fails() {
        let config = ExportConfig {
            output_dir: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("export.output_dir"))
        );
    }
}
