//! TemplatePreset - the named, pre-configured templates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Built-in template presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplatePreset {
    /// Everything: contents, diagram, nested tree, comments, metadata.
    FullReport,
    /// Overview with a depth-limited view of goals and evidence.
    Summary,
    /// Title page and an evidence register only.
    EvidenceList,
}

impl TemplatePreset {
    /// Returns all presets in display order.
    pub fn all() -> &'static [TemplatePreset] {
        &[
            TemplatePreset::FullReport,
            TemplatePreset::Summary,
            TemplatePreset::EvidenceList,
        ]
    }

    /// Returns the preset identifier (e.g. `full-report`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplatePreset::FullReport => "full-report",
            TemplatePreset::Summary => "summary",
            TemplatePreset::EvidenceList => "evidence-list",
        }
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TemplatePreset::FullReport => "Full Report",
            TemplatePreset::Summary => "Summary",
            TemplatePreset::EvidenceList => "Evidence List",
        }
    }

    /// One-line description for preset pickers.
    pub fn description(&self) -> &'static str {
        match self {
            TemplatePreset::FullReport => {
                "Complete report with contents, diagram, full argument structure and comments"
            }
            TemplatePreset::Summary => {
                "Condensed overview of the top-level goals and supporting evidence"
            }
            TemplatePreset::EvidenceList => "Register of all evidence referenced by the case",
        }
    }
}

impl Default for TemplatePreset {
    fn default() -> Self {
        TemplatePreset::FullReport
    }
}

impl fmt::Display for TemplatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemplatePreset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplatePreset::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("preset", format!("unknown preset '{}'", s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_identifiers_round_trip() {
        for preset in TemplatePreset::all() {
            assert_eq!(preset.as_str().parse::<TemplatePreset>().unwrap(), *preset);
            let json = serde_json::to_string(preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.as_str()));
        }
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!("appendix".parse::<TemplatePreset>().is_err());
        assert!("Full-Report".parse::<TemplatePreset>().is_err());
    }
}
