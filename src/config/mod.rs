//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! and an optional settings file using the `config` and `dotenvy` crates.
//! Configuration is loaded with the `CASE_EXPORT` prefix and nested values use
//! double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use case_export::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Writing exports to {}", config.export.output_dir.display());
//! ```

mod error;
mod export;

pub use error::{ConfigError, ValidationError};
pub use export::ExportConfig;

use serde::Deserialize;
use std::path::Path;

use crate::domain::branding::Branding;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Export defaults (output directory, format, preset, limits)
    #[serde(default)]
    pub export: ExportConfig,

    /// Organisation branding applied under every request's overrides
    #[serde(default)]
    pub branding: Branding,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present
    /// 2. Reads environment variables with `CASE_EXPORT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CASE_EXPORT__EXPORT__DEFAULT_FORMAT=docx` -> `export.default_format = "docx"`
    /// - `CASE_EXPORT__BRANDING__PRIMARY_COLOR=#0F766E` -> `branding.primary_color`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types,
    /// including malformed colours.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a TOML or YAML file, with environment
    /// variables layered on top.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an empty output directory, an unknown
    /// default format or preset, or a zero depth limit.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.export.validate()?;
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("CASE_EXPORT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::ExportFormat;
    use crate::domain::foundation::HexColor;
    use std::env;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("CASE_EXPORT__EXPORT__DEFAULT_FORMAT");
        env::remove_var("CASE_EXPORT__EXPORT__MAX_TREE_DEPTH");
        env::remove_var("CASE_EXPORT__BRANDING__ORGANISATION_NAME");
        env::remove_var("CASE_EXPORT__BRANDING__PRIMARY_COLOR");
    }

    #[test]
    fn test_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = AppConfig::load().unwrap();
        assert_eq!(config.export.format(), Ok(ExportFormat::Pdf));
        assert_eq!(config.export.max_tree_depth, 64);
        assert!(config.branding.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CASE_EXPORT__EXPORT__DEFAULT_FORMAT", "docx");
        env::set_var("CASE_EXPORT__EXPORT__MAX_TREE_DEPTH", "12");
        env::set_var("CASE_EXPORT__BRANDING__ORGANISATION_NAME", "Acme Safety");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.export.format(), Ok(ExportFormat::Docx));
        assert_eq!(config.export.max_tree_depth, 12);
        assert_eq!(
            config.branding.organisation_name.as_deref(),
            Some("Acme Safety")
        );
    }

    #[test]
    fn test_invalid_colour_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CASE_EXPORT__BRANDING__PRIMARY_COLOR", "teal");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_load_from_toml_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[export]\noutput_dir = \"reports\"\ndefault_preset = \"summary\"\n\n\
             [branding]\nprimary_color = \"#0F766E\"\nfooter_text = \"Internal\""
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.export.output_dir, PathBuf::from("reports"));
        assert_eq!(config.export.default_preset, "summary");
        assert_eq!(
            config.branding.primary_color,
            Some(HexColor::rgb(0x0F, 0x76, 0x6E))
        );
        assert_eq!(config.branding.footer_text.as_deref(), Some("Internal"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_defaults() {
        let mut config = AppConfig::default();
        config.export.default_preset = "poster".to_string();
        assert!(config.validate().is_err());
    }
}
