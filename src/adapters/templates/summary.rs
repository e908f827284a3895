//! Summary template - condensed overview for readers short on time.

use super::blocks;
use crate::domain::branding::ResolvedBranding;
use crate::domain::document::{RenderedSection, SectionType};
use crate::domain::foundation::ElementType;
use crate::domain::template::{SectionConfig, TemplateConfig, TemplatePreset};
use crate::domain::tree::ElementFilter;
use crate::ports::{RenderContext, Template};

/// Deepest goal shown in the goals section.
const GOAL_DEPTH_LIMIT: usize = 2;

/// Default depth cutoff for the whole summary.
const DEFAULT_MAX_DEPTH: usize = 3;

/// Summary report: title page, diagram, executive summary, top-level
/// goals and evidence. No contents page and no comments.
#[derive(Debug, Clone)]
pub struct SummaryTemplate {
    config: TemplateConfig,
    branding: ResolvedBranding,
}

impl SummaryTemplate {
    pub fn new(branding: ResolvedBranding) -> Self {
        Self::with_config(Self::default_config(), branding)
    }

    pub fn with_config(config: TemplateConfig, branding: ResolvedBranding) -> Self {
        Self { config, branding }
    }

    pub fn default_config() -> TemplateConfig {
        let preset = TemplatePreset::Summary;
        TemplateConfig::new(preset.display_name())
            .with_description(preset.description())
            .with_preset(preset)
            .with_section(SectionType::TitlePage, SectionConfig::enabled())
            .with_section(SectionType::Diagram, SectionConfig::enabled())
            .with_section(SectionType::ExecutiveSummary, SectionConfig::enabled())
            .with_section(
                SectionType::Goals,
                SectionConfig::enabled().with_title("Key Goals"),
            )
            .with_section(
                SectionType::Evidence,
                SectionConfig::enabled().with_title("Supporting Evidence"),
            )
            .with_filter(ElementFilter::default().with_max_depth(DEFAULT_MAX_DEPTH))
    }

    fn goal_filter(filter: &ElementFilter) -> ElementFilter {
        let depth = filter
            .max_depth
            .map_or(GOAL_DEPTH_LIMIT, |d| d.min(GOAL_DEPTH_LIMIT));
        filter.clone().with_max_depth(depth)
    }
}

impl Template for SummaryTemplate {
    fn preset(&self) -> TemplatePreset {
        TemplatePreset::Summary
    }

    fn config(&self) -> &TemplateConfig {
        &self.config
    }

    fn branding(&self) -> &ResolvedBranding {
        &self.branding
    }

    fn assemble_sections(&self, ctx: &RenderContext<'_>) -> Vec<RenderedSection> {
        let mut sections = Vec::new();

        if ctx.is_section_enabled(SectionType::TitlePage) {
            sections.push(blocks::title_page(ctx));
        }
        if ctx.is_section_enabled(SectionType::Diagram) {
            sections.extend(blocks::diagram(ctx));
        }
        if ctx.is_section_enabled(SectionType::ExecutiveSummary) {
            sections.push(blocks::executive_summary(ctx));
        }
        if ctx.is_section_enabled(SectionType::Goals) {
            let filter = Self::goal_filter(&ctx.filter);
            sections.push(blocks::elements_of_type(
                ctx,
                SectionType::Goals,
                ElementType::Goal,
                &filter,
            ));
        }
        if ctx.is_section_enabled(SectionType::Evidence) {
            sections.push(blocks::elements_of_type(
                ctx,
                SectionType::Evidence,
                ElementType::Evidence,
                &ctx.filter,
            ));
        }
        sections.extend(blocks::custom(ctx));

        tracing::debug!(sections = sections.len(), "Assembled summary");
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

    fn template() -> SummaryTemplate {
        SummaryTemplate::new(resolve_branding(None))
    }

    #[test]
    fn emits_summary_sections_in_order() {
        let case = sample_case();
        let doc = template().render(&RenderInput::new(&case));
        assert_eq!(
            doc.section_types(),
            vec![
                SectionType::TitlePage,
                SectionType::ExecutiveSummary,
                SectionType::Goals,
                SectionType::Evidence,
            ]
        );
        assert_eq!(doc.section(SectionType::Goals).unwrap().title, "Key Goals");
    }

    #[test]
    fn comments_cannot_be_forced_in() {
        let case = sample_case();
        let doc = template().render(&RenderInput::new(&case).with_section(SectionType::Comments, true));
        assert!(!doc.has_section(SectionType::Comments));
        assert!(!doc.has_section(SectionType::TableOfContents));
    }

    #[test]
    fn goal_depth_is_limited() {
        assert_eq!(
            SummaryTemplate::goal_filter(&ElementFilter::default()).max_depth,
            Some(2)
        );
        assert_eq!(
            SummaryTemplate::goal_filter(&ElementFilter::default().with_max_depth(1)).max_depth,
            Some(1)
        );

        let case = sample_case();
        let doc = template().render(&RenderInput::new(&case));
        let goals = doc.section(SectionType::Goals).unwrap();
        let deepest = goals
            .blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Heading { level, .. } => Some(level.value()),
                _ => None,
            })
            .max()
            .unwrap();
        // Depth 2 renders at heading level 4.
        assert!(deepest <= 4);
    }

    #[test]
    fn default_filter_stops_at_depth_three() {
        let filter = template().config().filter();
        assert_eq!(filter.max_depth, Some(3));
    }
}
