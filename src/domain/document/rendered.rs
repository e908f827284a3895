//! RenderedDocument - the complete output of a template, input of every exporter.

use serde::{Deserialize, Serialize};

use super::{ExportFormat, RenderedSection, SectionType};
use crate::domain::branding::ResolvedBranding;
use crate::domain::foundation::Timestamp;

/// Document-level facts shown on title pages and metadata blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub case_name: String,
    pub case_description: String,
    pub exported_at: Timestamp,
    pub exported_by: Option<String>,
    /// Version of the case export data the document was built from.
    pub data_version: String,
    /// Number of elements that passed the template's filter.
    pub element_count: usize,
    pub format: Option<ExportFormat>,
}

/// Format-agnostic document: metadata, branding, and ordered sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    pub metadata: DocumentMetadata,
    pub branding: ResolvedBranding,
    pub sections: Vec<RenderedSection>,
}

impl RenderedDocument {
    /// Section types in document order.
    pub fn section_types(&self) -> Vec<SectionType> {
        self.sections.iter().map(|s| s.section_type).collect()
    }

    /// First section of the given type, if present.
    pub fn section(&self, section_type: SectionType) -> Option<&RenderedSection> {
        self.sections.iter().find(|s| s.section_type == section_type)
    }

    /// Returns true if a section of the given type is present.
    pub fn has_section(&self, section_type: SectionType) -> bool {
        self.section(section_type).is_some()
    }
}
