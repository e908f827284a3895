//! Rendered sections and the closed set of section types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ContentBlock;
use crate::domain::foundation::ValidationError;

/// The kinds of section a template can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    TitlePage,
    TableOfContents,
    Diagram,
    ExecutiveSummary,
    /// Nested rendering of the whole argument tree.
    Elements,
    Goals,
    Strategies,
    Claims,
    Evidence,
    Comments,
    Metadata,
    Custom,
}

impl SectionType {
    /// Returns all section types.
    pub fn all() -> &'static [SectionType] {
        &[
            SectionType::TitlePage,
            SectionType::TableOfContents,
            SectionType::Diagram,
            SectionType::ExecutiveSummary,
            SectionType::Elements,
            SectionType::Goals,
            SectionType::Strategies,
            SectionType::Claims,
            SectionType::Evidence,
            SectionType::Comments,
            SectionType::Metadata,
            SectionType::Custom,
        ]
    }

    /// Returns the configuration key (e.g. `title-page`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::TitlePage => "title-page",
            SectionType::TableOfContents => "table-of-contents",
            SectionType::Diagram => "diagram",
            SectionType::ExecutiveSummary => "executive-summary",
            SectionType::Elements => "elements",
            SectionType::Goals => "goals",
            SectionType::Strategies => "strategies",
            SectionType::Claims => "claims",
            SectionType::Evidence => "evidence",
            SectionType::Comments => "comments",
            SectionType::Metadata => "metadata",
            SectionType::Custom => "custom",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("section", format!("unknown section '{}'", s))
            })
    }
}

/// A titled, ordered run of content blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSection {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
    pub blocks: Vec<ContentBlock>,
}

impl RenderedSection {
    pub fn new(section_type: SectionType, title: impl Into<String>, blocks: Vec<ContentBlock>) -> Self {
        Self {
            section_type,
            title: title.into(),
            blocks,
        }
    }
}
