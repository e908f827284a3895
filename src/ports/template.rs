//! Template Port - decides what content a document contains.
//!
//! A template turns case data into a [`RenderedDocument`]. Presets share the
//! provided [`Template::render`] step and differ only in
//! [`Template::assemble_sections`].

use std::collections::BTreeMap;

use crate::domain::branding::ResolvedBranding;
use crate::domain::case::{CaseExport, TreeNode};
use crate::domain::document::{
    DocumentMetadata, ExportFormat, RenderedDocument, RenderedSection, SectionType,
};
use crate::domain::template::{TemplateConfig, TemplatePreset};
use crate::domain::tree::{total_element_count, ElementFilter};

/// Per-request render input.
#[derive(Debug, Clone)]
pub struct RenderInput<'a> {
    pub case_data: &'a CaseExport,
    /// Pre-rendered diagram, as a `data:` URL or network URL.
    pub diagram_image: Option<String>,
    pub exported_by: Option<String>,
    /// Request-level section switches; these win over the template config.
    pub section_overrides: BTreeMap<SectionType, bool>,
    pub format: Option<ExportFormat>,
}

impl<'a> RenderInput<'a> {
    pub fn new(case_data: &'a CaseExport) -> Self {
        Self {
            case_data,
            diagram_image: None,
            exported_by: None,
            section_overrides: BTreeMap::new(),
            format: None,
        }
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

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// Everything a preset needs while assembling sections.
#[derive(Debug)]
pub struct RenderContext<'a> {
    pub case_data: &'a CaseExport,
    pub config: &'a TemplateConfig,
    pub metadata: &'a DocumentMetadata,
    pub branding: &'a ResolvedBranding,
    pub filter: ElementFilter,
    pub diagram_image: Option<&'a str>,
    pub section_overrides: &'a BTreeMap<SectionType, bool>,
}

impl<'a> RenderContext<'a> {
    /// Root of the case tree.
    pub fn tree(&self) -> &'a TreeNode {
        &self.case_data.tree
    }

    /// A request override wins; otherwise the section is on unless the
    /// config disables it.
    pub fn is_section_enabled(&self, section: SectionType) -> bool {
        match self.section_overrides.get(&section) {
            Some(enabled) => *enabled,
            None => self.config.is_section_enabled(section),
        }
    }

    /// Configured title, else `default`.
    pub fn section_title(&self, section: SectionType, default: &str) -> String {
        self.config
            .section_title(section)
            .unwrap_or(default)
            .to_string()
    }

    /// The diagram image, ignoring blank values.
    pub fn diagram(&self) -> Option<&'a str> {
        self.diagram_image.filter(|src| !src.trim().is_empty())
    }
}

/// Port for document templates.
///
/// # Contract
///
/// Implementations must:
/// - Be pure: identical inputs give identical documents
/// - Emit sections in a fixed, documented order
/// - Honour request overrides before config switches
///
/// # Usage
///
/// ```rust,ignore
/// let template = create_template_from_preset(TemplatePreset::Summary, None);
/// let document = template.render(&RenderInput::new(&case));
/// ```
pub trait Template: Send + Sync {
    /// The preset this template implements.
    fn preset(&self) -> TemplatePreset;

    /// Effective configuration (preset defaults with overrides applied).
    fn config(&self) -> &TemplateConfig;

    /// Branding resolved when the template was built.
    fn branding(&self) -> &ResolvedBranding;

    /// Preset-specific section assembly.
    fn assemble_sections(&self, ctx: &RenderContext<'_>) -> Vec<RenderedSection>;

    /// Renders case data into a format-agnostic document.
    fn render(&self, input: &RenderInput<'_>) -> RenderedDocument {
        let config = self.config();
        let filter = config.filter();
        let case = input.case_data;

        let metadata = DocumentMetadata {
            case_name: case.case.name.clone(),
            case_description: case.case.description.clone(),
            exported_at: case.exported_at,
            exported_by: input.exported_by.clone(),
            data_version: case.version.clone(),
            element_count: total_element_count(&case.tree, &filter),
            format: input.format.or(config.format),
        };

        let ctx = RenderContext {
            case_data: case,
            config,
            metadata: &metadata,
            branding: self.branding(),
            filter,
            diagram_image: input.diagram_image.as_deref(),
            section_overrides: &input.section_overrides,
        };
        let sections = self.assemble_sections(&ctx);

        tracing::debug!(
            preset = %self.preset(),
            sections = sections.len(),
            elements = metadata.element_count,
            "Rendered document"
        );

        RenderedDocument {
            metadata,
            branding: self.branding().clone(),
            sections,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::branding::resolve_branding;
    use crate::domain::foundation::{ElementType, Timestamp};
    use crate::domain::template::SectionConfig;

    struct EchoTemplate {
        config: TemplateConfig,
        branding: ResolvedBranding,
    }

    impl Template for EchoTemplate {
        fn preset(&self) -> TemplatePreset {
            TemplatePreset::FullReport
        }

        fn config(&self) -> &TemplateConfig {
            &self.config
        }

        fn branding(&self) -> &ResolvedBranding {
            &self.branding
        }

        fn assemble_sections(&self, ctx: &RenderContext<'_>) -> Vec<RenderedSection> {
            SectionType::all()
                .iter()
                .filter(|s| ctx.is_section_enabled(**s))
                .map(|s| RenderedSection::new(*s, ctx.section_title(*s, s.as_str()), Vec::new()))
                .collect()
        }
    }

    fn case() -> CaseExport {
        CaseExport::new(
            "Braking",
            "Brake system case",
            Timestamp::parse_rfc3339("2024-05-01T12:00:00Z").unwrap(),
            TreeNode::new(1, ElementType::Goal)
                .with_child(TreeNode::new(2, ElementType::Evidence).in_sandbox()),
        )
    }

    fn template(config: TemplateConfig) -> EchoTemplate {
        EchoTemplate {
            config,
            branding: resolve_branding(None),
        }
    }

    #[test]
    fn render_builds_metadata_from_case_data() {
        let case = case();
        let doc = template(TemplateConfig::new("t"))
            .render(&RenderInput::new(&case).with_exported_by("alice"));

        assert_eq!(doc.metadata.case_name, "Braking");
        assert_eq!(doc.metadata.exported_at, case.exported_at);
        assert_eq!(doc.metadata.exported_by.as_deref(), Some("alice"));
        assert_eq!(doc.metadata.element_count, 1);
        assert_eq!(doc.metadata.data_version, "1.0");
    }

    #[test]
    fn request_overrides_win_over_config() {
        let case = case();
        let config = TemplateConfig::new("t")
            .with_section(SectionType::Comments, SectionConfig::disabled());
        let tpl = template(config);

        let doc = tpl.render(&RenderInput::new(&case));
        assert!(!doc.has_section(SectionType::Comments));

        let doc = tpl.render(
            &RenderInput::new(&case)
                .with_section(SectionType::Comments, true)
                .with_section(SectionType::Metadata, false),
        );
        assert!(doc.has_section(SectionType::Comments));
        assert!(!doc.has_section(SectionType::Metadata));
    }

    #[test]
    fn request_format_wins_over_config_format() {
        let case = case();
        let mut config = TemplateConfig::new("t");
        config.format = Some(ExportFormat::Docx);
        let tpl = template(config);

        assert_eq!(
            tpl.render(&RenderInput::new(&case)).metadata.format,
            Some(ExportFormat::Docx)
        );
        assert_eq!(
            tpl.render(&RenderInput::new(&case).with_format(ExportFormat::Pdf))
                .metadata
                .format,
            Some(ExportFormat::Pdf)
        );
    }

    #[test]
    fn template_is_object_safe() {
        fn check<T: Template + ?Sized>() {}
        check::<dyn Template>();
    }
}
