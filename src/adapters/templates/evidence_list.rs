//! Evidence List template - an evidence register and nothing else.

use super::blocks;
use crate::domain::branding::ResolvedBranding;
use crate::domain::document::{RenderedSection, SectionType};
use crate::domain::template::{SectionConfig, TemplateConfig, TemplatePreset};
use crate::ports::{RenderContext, Template};

/// Title page followed by the evidence register.
#[derive(Debug, Clone)]
pub struct EvidenceListTemplate {
    config: TemplateConfig,
    branding: ResolvedBranding,
}

impl EvidenceListTemplate {
    pub fn new(branding: ResolvedBranding) -> Self {
        Self::with_config(Self::default_config(), branding)
    }

    pub fn with_config(config: TemplateConfig, branding: ResolvedBranding) -> Self {
        Self { config, branding }
    }

    pub fn default_config() -> TemplateConfig {
        let preset = TemplatePreset::EvidenceList;
        TemplateConfig::new(preset.display_name())
            .with_description(preset.description())
            .with_preset(preset)
            .with_section(SectionType::TitlePage, SectionConfig::enabled())
            .with_section(
                SectionType::Evidence,
                SectionConfig::enabled().with_title(blocks::EVIDENCE_REGISTER_TITLE),
            )
    }
}

impl Template for EvidenceListTemplate {
    fn preset(&self) -> TemplatePreset {
        TemplatePreset::EvidenceList
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
        if ctx.is_section_enabled(SectionType::Evidence) {
            sections.push(blocks::evidence_register(ctx));
        }
        sections.extend(blocks::custom(ctx));
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

    #[test]
    fn register_lists_evidence_in_a_table() {
        let case = sample_case();
        let doc = EvidenceListTemplate::new(resolve_branding(None))
            .render(&RenderInput::new(&case).with_diagram("https://example.com/d.png"));

        assert_eq!(
            doc.section_types(),
            vec![SectionType::TitlePage, SectionType::Evidence]
        );

        let register = doc.section(SectionType::Evidence).unwrap();
        assert_eq!(register.title, "Evidence Register");
        match &register.blocks[0] {
            ContentBlock::Table { headers, rows } => {
                assert_eq!(headers, &["#", "Evidence", "Description", "URL"]);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0][0], "1");
                assert_eq!(rows[0][1], "Brake test report");
                assert_eq!(rows[0][3], "https://example.com/brake-test");
            }
            other => panic!("unexpected block {:?}", other),
        }
        assert_eq!(register.blocks.len(), 3);
    }
}
