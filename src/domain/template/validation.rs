//! Template configuration validation.
//!
//! Validates untrusted JSON before it becomes a [`TemplateConfig`]. Every
//! problem is reported with its path; nothing is partially applied.

use serde_json::{Map, Value};
use thiserror::Error;

use super::{TemplateConfig, TemplatePreset};
use crate::domain::document::{ExportFormat, SectionType};
use crate::domain::foundation::ElementType;

/// One problem found in a template configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct ConfigValidationError {
    /// Location of the problem, e.g. `sections.goals.enabled`.
    pub path: String,
    pub message: String,
}

impl ConfigValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Validates `value` as a template configuration.
///
/// Returns the typed configuration (with defaults filled) or every error
/// found.
pub fn validate_template_config(
    value: &Value,
) -> Result<TemplateConfig, Vec<ConfigValidationError>> {
    let mut validator = ConfigValidator::default();
    validator.validate_root(value);

    if !validator.errors.is_empty() {
        tracing::warn!(
            error_count = validator.errors.len(),
            "Rejected template configuration"
        );
        return Err(validator.errors);
    }

    serde_json::from_value(value.clone())
        .map_err(|e| vec![ConfigValidationError::new("root", e.to_string())])
}

#[derive(Default)]
struct ConfigValidator {
    errors: Vec<ConfigValidationError>,
}

impl ConfigValidator {
    fn validate_root(&mut self, value: &Value) {
        let Some(obj) = self.require_object(value, "root") else {
            return;
        };

        match obj.get("name") {
            None => self.push("name", "is required"),
            Some(Value::String(s)) if s.trim().is_empty() => self.push("name", "must not be empty"),
            Some(Value::String(_)) => {}
            Some(other) => self.invalid_type("name", "string", other),
        }

        if let Some(description) = obj.get("description") {
            if !description.is_string() && !description.is_null() {
                self.invalid_type("description", "string", description);
            }
        }

        if let Some(preset) = obj.get("preset") {
            let valid: Vec<&str> = TemplatePreset::all().iter().map(|p| p.as_str()).collect();
            self.validate_enum(preset, &valid, "preset");
        }

        if let Some(format) = obj.get("format") {
            let valid: Vec<&str> = ExportFormat::all().iter().map(|f| f.as_str()).collect();
            self.validate_enum(format, &valid, "format");
        }

        if let Some(sections) = obj.get("sections") {
            self.validate_sections(sections);
        }

        if let Some(filter) = obj.get("elementFilter") {
            if !filter.is_null() {
                self.validate_element_filter(filter);
            }
        }
    }

    fn validate_sections(&mut self, value: &Value) {
        let Some(sections) = self.require_object(value, "sections") else {
            return;
        };

        for (key, section) in sections {
            let path = format!("sections.{}", key);
            if key.parse::<SectionType>().is_err() {
                self.push(&path, "unknown section");
                continue;
            }

            let Some(obj) = self.require_object(section, &path) else {
                continue;
            };

            if let Some(enabled) = obj.get("enabled") {
                if !enabled.is_boolean() {
                    self.invalid_type(&format!("{}.enabled", path), "boolean", enabled);
                }
            }
            if let Some(title) = obj.get("title") {
                if !title.is_string() && !title.is_null() {
                    self.invalid_type(&format!("{}.title", path), "string", title);
                }
            }
            if let Some(options) = obj.get("options") {
                self.require_object(options, &format!("{}.options", path));
            }
        }
    }

    fn validate_element_filter(&mut self, value: &Value) {
        let Some(obj) = self.require_object(value, "elementFilter") else {
            return;
        };

        for field in ["includeTypes", "excludeTypes"] {
            if let Some(list) = obj.get(field) {
                self.validate_type_list(list, &format!("elementFilter.{}", field));
            }
        }

        if let Some(sandbox) = obj.get("includeSandbox") {
            if !sandbox.is_boolean() {
                self.invalid_type("elementFilter.includeSandbox", "boolean", sandbox);
            }
        }

        if let Some(depth) = obj.get("maxDepth") {
            if depth.as_u64().is_none() {
                self.push(
                    "elementFilter.maxDepth",
                    format!("must be a non-negative integer, got {}", depth),
                );
            }
        }
    }

    fn validate_type_list(&mut self, value: &Value, path: &str) {
        let Some(items) = value.as_array() else {
            self.invalid_type(path, "array", value);
            return;
        };

        let valid: Vec<&str> = ElementType::all().iter().map(|t| t.as_str()).collect();
        for (i, item) in items.iter().enumerate() {
            self.validate_enum(item, &valid, &format!("{}[{}]", path, i));
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
        let obj = value.as_object();
        if obj.is_none() {
            self.invalid_type(path, "object", value);
        }
        obj
    }

    fn validate_enum(&mut self, value: &Value, valid_values: &[&str], path: &str) {
        match value.as_str() {
            Some(s) if valid_values.contains(&s) => {}
            Some(s) => self.push(
                path,
                format!("must be one of: {}, got '{}'", valid_values.join(", "), s),
            ),
            None => self.invalid_type(path, "string", value),
        }
    }

    fn invalid_type(&mut self, path: &str, expected: &str, actual: &Value) {
        self.push(
            path,
            format!("expected {}, got {}", expected, type_name(actual)),
        );
    }

    fn push(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ConfigValidationError::new(path, message));
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
