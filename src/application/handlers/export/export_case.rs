//! ExportCaseHandler - Command handler for exporting an assurance case.
//!
//! Turns case data plus a template choice into a finished document in one
//! of the registered formats.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::adapters::export::{ExporterRegistry, RegistryError};
use crate::adapters::templates::{create_template_from_config, create_template_from_preset};
use crate::domain::branding::Branding;
use crate::domain::case::CaseExport;
use crate::domain::document::{ExportFormat, SectionType};
use crate::domain::template::{validate_template_config, ConfigValidationError, TemplatePreset};
use crate::domain::tree::tree_depth;
use crate::ports::{ExportOptions, ExportResult, RenderInput, Template};

/// Command to export a case.
#[derive(Debug, Clone)]
pub struct ExportCaseCommand {
    pub case_data: CaseExport,
    /// Preset used when no template configuration is supplied.
    pub preset: TemplatePreset,
    /// Raw template configuration, validated before use.
    pub template_config: Option<Value>,
    /// Format identifier; falls back to the config's format, then the
    /// handler default.
    pub format: Option<String>,
    pub diagram_image: Option<String>,
    pub exported_by: Option<String>,
    pub section_overrides: BTreeMap<SectionType, bool>,
    /// Request branding, layered over the handler's defaults.
    pub branding: Option<Branding>,
}

impl ExportCaseCommand {
    pub fn new(case_data: CaseExport) -> Self {
        Self {
            case_data,
            preset: TemplatePreset::default(),
            template_config: None,
            format: None,
            diagram_image: None,
            exported_by: None,
            section_overrides: BTreeMap::new(),
            branding: None,
        }
    }

    /// Parses case JSON into a command.
    pub fn from_json(json: &str) -> Result<Self, ExportCaseError> {
        let case_data =
            CaseExport::from_json(json).map_err(|e| ExportCaseError::InvalidInput(e.to_string()))?;
        Ok(Self::new(case_data))
    }

    pub fn with_preset(mut self, preset: TemplatePreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn with_template_config(mut self, config: Value) -> Self {
        self.template_config = Some(config);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_diagram(mut self, image: impl Into<String>) -> Self {
        self.diagram_image = Some(image.into());
        self
    }

    pub fn with_exported_by(mut self, who: impl Into<String>) -> Self {
        self.exported_by = Some(who.into());
        self
    }

    pub fn with_section(mut self, section: SectionType, enabled: bool) -> Self {
        self.section_overrides.insert(section, enabled);
        self
    }

    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = Some(branding);
        self
    }
}

/// Errors that stop an export before any exporter runs.
///
/// Failures inside an exporter are not errors here; they come back as
/// [`ExportResult::Failure`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportCaseError {
    #[error("Invalid template configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ConfigValidationError>),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid case data: {0}")]
    InvalidInput(String),

    #[error("Case tree depth {depth} exceeds the limit of {limit}")]
    TreeTooDeep { depth: usize, limit: usize },
}

fn join_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<RegistryError> for ExportCaseError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownFormat(identifier) => Self::UnsupportedFormat(identifier),
            RegistryError::NotRegistered(format) => Self::UnsupportedFormat(format.to_string()),
        }
    }
}

impl From<Vec<ConfigValidationError>> for ExportCaseError {
    fn from(errors: Vec<ConfigValidationError>) -> Self {
        Self::InvalidConfig(errors)
    }
}

/// Handler for exporting cases.
pub struct ExportCaseHandler {
    registry: Arc<ExporterRegistry>,
    branding: Branding,
    default_format: ExportFormat,
    max_tree_depth: Option<usize>,
}

impl ExportCaseHandler {
    pub fn new(registry: Arc<ExporterRegistry>, branding: Branding) -> Self {
        Self {
            registry,
            branding,
            default_format: ExportFormat::Pdf,
            max_tree_depth: None,
        }
    }

    /// Format used when neither the command nor its config names one.
    pub fn with_default_format(mut self, format: ExportFormat) -> Self {
        self.default_format = format;
        self
    }

    /// Rejects cases whose tree is deeper than `limit`.
    pub fn with_max_tree_depth(mut self, limit: usize) -> Self {
        self.max_tree_depth = Some(limit);
        self
    }

    pub async fn handle(&self, cmd: ExportCaseCommand) -> Result<ExportResult, ExportCaseError> {
        // 1. Check the input and validate the template configuration, if any
        if let Some(limit) = self.max_tree_depth {
            let depth = tree_depth(&cmd.case_data.tree);
            if depth > limit {
                return Err(ExportCaseError::TreeTooDeep { depth, limit });
            }
        }

        let config = match &cmd.template_config {
            Some(value) => {
                let mut config = validate_template_config(value)?;
                if config.preset.is_none() {
                    config.preset = Some(cmd.preset);
                }
                Some(config)
            }
            None => None,
        };

        // 2. Resolve the exporter
        let identifier = match (&cmd.format, config.as_ref().and_then(|c| c.format)) {
            (Some(format), _) => format.clone(),
            (None, Some(format)) => format.as_str().to_string(),
            (None, None) => self.default_format.as_str().to_string(),
        };
        let exporter = self.registry.resolve(&identifier)?;

        // 3. Merge branding layers and build the template
        let branding = match &cmd.branding {
            Some(overrides) => self.branding.merged_with(overrides),
            None => self.branding.clone(),
        };
        let template: Box<dyn Template> = match &config {
            Some(config) => create_template_from_config(config, Some(&branding)),
            None => create_template_from_preset(cmd.preset, Some(&branding)),
        };

        // 4. Render
        let mut input = RenderInput::new(&cmd.case_data).with_format(exporter.format());
        input.diagram_image = cmd.diagram_image.clone();
        input.exported_by = cmd.exported_by.clone();
        input.section_overrides = cmd.section_overrides.clone();
        let document = template.render(&input);

        tracing::debug!(
            preset = %template.preset(),
            sections = document.sections.len(),
            format = %exporter.format(),
            "Case rendered"
        );

        // 5. Export
        let options = ExportOptions::for_document(&document);
        Ok(exporter.export(&document, &options).await)
    }
}
