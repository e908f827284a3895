//! TemplateConfig - what a template includes and how it filters the tree.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::TemplatePreset;
use crate::domain::document::{ExportFormat, SectionType};
use crate::domain::tree::ElementFilter;

/// Per-section configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionConfig {
    /// `Some(false)` disables the section; absent means enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Replaces the preset's default title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Format-specific options, passed through untouched.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl SectionConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: Some(true),
            ..Default::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: Some(false),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Layers `overrides` on top of `self`, field by field.
    pub fn merged_with(&self, overrides: &SectionConfig) -> SectionConfig {
        let mut options = self.options.clone();
        for (key, value) in &overrides.options {
            options.insert(key.clone(), value.clone());
        }
        SectionConfig {
            enabled: overrides.enabled.or(self.enabled),
            title: overrides.title.clone().or_else(|| self.title.clone()),
            options,
        }
    }
}

/// Configuration of one template instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<TemplatePreset>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,

    #[serde(default)]
    pub sections: BTreeMap<SectionType, SectionConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_filter: Option<ElementFilter>,
}

impl TemplateConfig {
    /// Creates an empty configuration with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            preset: None,
            format: None,
            sections: BTreeMap::new(),
            element_filter: None,
        }
    }

    pub fn with_preset(mut self, preset: TemplatePreset) -> Self {
        self.preset = Some(preset);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_section(mut self, section: SectionType, config: SectionConfig) -> Self {
        self.sections.insert(section, config);
        self
    }

    pub fn with_filter(mut self, filter: ElementFilter) -> Self {
        self.element_filter = Some(filter);
        self
    }

    /// Static enablement: true unless the section is explicitly disabled.
    pub fn is_section_enabled(&self, section: SectionType) -> bool {
        self.sections
            .get(&section)
            .and_then(|c| c.enabled)
            .unwrap_or(true)
    }

    /// Configured title override for a section, if any.
    pub fn section_title(&self, section: SectionType) -> Option<&str> {
        self.sections
            .get(&section)
            .and_then(|c| c.title.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    /// Format-specific options for a section.
    pub fn section_options(&self, section: SectionType) -> Option<&Map<String, Value>> {
        self.sections.get(&section).map(|c| &c.options)
    }

    /// The element filter, or the permissive default.
    pub fn filter(&self) -> ElementFilter {
        self.element_filter.clone().unwrap_or_default()
    }

    /// Layers a user-authored configuration over `self` (typically preset defaults).
    ///
    /// Identity fields come from `overrides`; sections merge per key and
    /// per field; the element filter is replaced wholesale when supplied.
    pub fn overlaid_with(&self, overrides: &TemplateConfig) -> TemplateConfig {
        let mut sections = self.sections.clone();
        for (key, section) in &overrides.sections {
            let merged = match sections.get(key) {
                Some(base) => base.merged_with(section),
                None => section.clone(),
            };
            sections.insert(*key, merged);
        }

        TemplateConfig {
            name: overrides.name.clone(),
            description: overrides
                .description
                .clone()
                .or_else(|| self.description.clone()),
            preset: overrides.preset.or(self.preset),
            format: overrides.format.or(self.format),
            sections,
            element_filter: overrides
                .element_filter
                .clone()
                .or_else(|| self.element_filter.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_enabled_unless_explicitly_disabled() {
        let config = TemplateConfig::new("Report")
            .with_section(SectionType::Comments, SectionConfig::disabled())
            .with_section(SectionType::Goals, SectionConfig::default().with_title("Aims"));

        assert!(!config.is_section_enabled(SectionType::Comments));
        assert!(config.is_section_enabled(SectionType::Goals));
        assert!(config.is_section_enabled(SectionType::Diagram));
        assert_eq!(config.section_title(SectionType::Goals), Some("Aims"));
        assert_eq!(config.section_title(SectionType::Diagram), None);
    }

    #[test]
    fn blank_titles_are_ignored() {
        let config = TemplateConfig::new("Report")
            .with_section(SectionType::Goals, SectionConfig::default().with_title("  "));
        assert_eq!(config.section_title(SectionType::Goals), None);
    }

    #[test]
    fn overlay_merges_sections_field_by_field() {
        let base = TemplateConfig::new("Preset")
            .with_preset(TemplatePreset::Summary)
            .with_section(SectionType::Goals, SectionConfig::enabled().with_title("Goals"))
            .with_filter(ElementFilter::default().with_max_depth(3));

        let user = TemplateConfig::new("Mine").with_section(
            SectionType::Goals,
            SectionConfig {
                title: Some("Top-level goals".to_string()),
                ..Default::default()
            },
        );

        let merged = base.overlaid_with(&user);
        assert_eq!(merged.name, "Mine");
        assert_eq!(merged.preset, Some(TemplatePreset::Summary));
        assert!(merged.is_section_enabled(SectionType::Goals));
        assert_eq!(merged.section_title(SectionType::Goals), Some("Top-level goals"));
        assert_eq!(merged.filter().max_depth, Some(3));
    }

    #[test]
    fn deserializes_camel_case_with_section_keys() {
        let json = serde_json::json!({
            "name": "Custom",
            "preset": "summary",
            "sections": {
                "executive-summary": {"enabled": false},
                "goals": {"title": "Aims", "options": {"pageBreakBefore": true}}
            },
            "elementFilter": {"includeSandbox": true, "maxDepth": 2}
        });

        let config: TemplateConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.preset, Some(TemplatePreset::Summary));
        assert!(!config.is_section_enabled(SectionType::ExecutiveSummary));
        assert_eq!(
            config.section_options(SectionType::Goals).unwrap()["pageBreakBefore"],
            Value::Bool(true)
        );
        assert_eq!(config.filter().include_sandbox, Some(true));
    }
}
