//! Full Report template - every section, nested argument structure.

use super::blocks;
use crate::domain::branding::ResolvedBranding;
use crate::domain::document::{RenderedSection, SectionType};
use crate::domain::foundation::ElementType;
use crate::domain::template::{SectionConfig, TemplateConfig, TemplatePreset};
use crate::ports::{RenderContext, Template};

/// Legacy flat sections, off unless enabled.
const FLAT_SECTIONS: [(SectionType, ElementType); 4] = [
    (SectionType::Goals, ElementType::Goal),
    (SectionType::Strategies, ElementType::Strategy),
    (SectionType::Claims, ElementType::PropertyClaim),
    (SectionType::Evidence, ElementType::Evidence),
];

/// Complete report.
///
/// Section order: title page, contents, diagram, executive summary,
/// argument structure, flat type sections, comments, custom notes,
/// document information.
#[derive(Debug, Clone)]
pub struct FullReportTemplate {
    config: TemplateConfig,
    branding: ResolvedBranding,
}

impl FullReportTemplate {
    pub fn new(branding: ResolvedBranding) -> Self {
        Self::with_config(Self::default_config(), branding)
    }

    pub fn with_config(config: TemplateConfig, branding: ResolvedBranding) -> Self {
        Self { config, branding }
    }

    /// Preset defaults.
    pub fn default_config() -> TemplateConfig {
        let preset = TemplatePreset::FullReport;
        let mut config = TemplateConfig::new(preset.display_name())
            .with_description(preset.description())
            .with_preset(preset);

        for section in [
            SectionType::TitlePage,
            SectionType::TableOfContents,
            SectionType::Diagram,
            SectionType::ExecutiveSummary,
            SectionType::Elements,
            SectionType::Comments,
            SectionType::Metadata,
        ] {
            config = config.with_section(section, SectionConfig::enabled());
        }
        for (section, _) in FLAT_SECTIONS {
            config = config.with_section(section, SectionConfig::disabled());
        }
        config
    }
}

impl Template for FullReportTemplate {
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
        let mut body = Vec::new();

        if ctx.is_section_enabled(SectionType::Diagram) {
            body.extend(blocks::diagram(ctx));
        }
        if ctx.is_section_enabled(SectionType::ExecutiveSummary) {
            body.push(blocks::executive_summary(ctx));
        }
        if ctx.is_section_enabled(SectionType::Elements) {
            body.push(blocks::elements(ctx));
        }
        for (section, element_type) in FLAT_SECTIONS {
            if !ctx.is_section_enabled(section) {
                continue;
            }
            let flat = blocks::elements_of_type(ctx, section, element_type, &ctx.filter);
            if flat.blocks.len() > 1 {
                body.push(flat);
            }
        }
        if ctx.is_section_enabled(SectionType::Comments) {
            body.push(blocks::comments(ctx));
        }
        body.extend(blocks::custom(ctx));
        if ctx.is_section_enabled(SectionType::Metadata) {
            body.push(blocks::metadata(ctx));
        }

        let mut sections = Vec::with_capacity(body.len() + 2);
        if ctx.is_section_enabled(SectionType::TitlePage) {
            sections.push(blocks::title_page(ctx));
        }
        if ctx.is_section_enabled(SectionType::TableOfContents) {
            sections.push(blocks::table_of_contents(ctx, &body));
        }
        sections.extend(body);

        tracing::debug!(sections = sections.len(), "Assembled full report");
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::templates::test_support::sample_case;
    use crate::domain::branding::resolve_branding;
    use crate::domain::document::ContentBlock;
    use crate::ports::RenderInput;

    fn template() -> FullReportTemplate {
        FullReportTemplate::new(resolve_branding(None))
    }

    #[test]
    fn default_section_order_without_diagram() {
        let case = sample_case();
        let doc = template().render(&RenderInput::new(&case));

        assert_eq!(
            doc.section_types(),
            vec![
                SectionType::TitlePage,
                SectionType::TableOfContents,
                SectionType::ExecutiveSummary,
                SectionType::Elements,
                SectionType::Comments,
                SectionType::Metadata,
            ]
        );
    }

    #[test]
    fn diagram_section_follows_contents_when_image_supplied() {
        let case = sample_case();
        let doc = template()
            .render(&RenderInput::new(&case).with_diagram("https://example.com/d.png"));
        assert_eq!(doc.section_types()[2], SectionType::Diagram);
    }

    #[test]
    fn contents_lists_following_titles() {
        let case = sample_case();
        let doc = template().render(&RenderInput::new(&case));
        let toc = doc.section(SectionType::TableOfContents).unwrap();

        let expected: Vec<String> = doc.sections[2..].iter().map(|s| s.title.clone()).collect();
        assert_eq!(
            toc.blocks,
            vec![ContentBlock::List {
                ordered: true,
                items: expected
            }]
        );
    }

    #[test]
    fn flat_sections_need_enabling_and_content() {
        let case = sample_case();
        let doc = template().render(
            &RenderInput::new(&case)
                .with_section(SectionType::Goals, true)
                .with_section(SectionType::Strategies, true),
        );

        // The sample tree has goals but no strategies.
        assert!(doc.has_section(SectionType::Goals));
        assert!(!doc.has_section(SectionType::Strategies));
        assert!(!doc.has_section(SectionType::Claims));
    }

    #[test]
    fn elements_section_uses_element_blocks() {
        let case = sample_case();
        let doc = template().render(&RenderInput::new(&case));
        let elements = doc.section(SectionType::Elements).unwrap();
        assert!(!elements.blocks.is_empty());
        assert!(elements
            .blocks
            .iter()
            .all(|b| matches!(b, ContentBlock::Element { .. })));
    }

    #[test]
    fn comment_threads_use_author_date_content() {
        let case = sample_case();
        let doc = template().render(&RenderInput::new(&case));
        let comments = doc.section(SectionType::Comments).unwrap();
        match &comments.blocks[1] {
            ContentBlock::List { items, .. } => {
                assert_eq!(items[0], "alice (2024-03-01): Add operating context");
            }
            other => panic!("unexpected block {:?}", other),
        }
    }
}
