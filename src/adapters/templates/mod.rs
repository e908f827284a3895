//! Template adapters - the built-in presets.
//!
//! - `FullReportTemplate` - Every section with the nested argument structure
//! - `SummaryTemplate` - Depth-limited overview without comments
//! - `EvidenceListTemplate` - Evidence register only

pub mod blocks;
mod evidence_list;
mod full_report;
mod summary;

pub use evidence_list::EvidenceListTemplate;
pub use full_report::FullReportTemplate;
pub use summary::SummaryTemplate;

use serde::Serialize;

use crate::domain::branding::{resolve_branding, Branding};
use crate::domain::template::{TemplateConfig, TemplatePreset};
use crate::ports::Template;

/// Preset entry for pickers and `--list-presets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetDescriptor {
    pub preset: TemplatePreset,
    pub name: &'static str,
    pub description: &'static str,
}

/// All built-in presets in display order.
pub fn get_available_presets() -> Vec<PresetDescriptor> {
    TemplatePreset::all()
        .iter()
        .map(|preset| PresetDescriptor {
            preset: *preset,
            name: preset.display_name(),
            description: preset.description(),
        })
        .collect()
}

/// Default configuration of a preset.
pub fn default_config_for(preset: TemplatePreset) -> TemplateConfig {
    match preset {
        TemplatePreset::FullReport => FullReportTemplate::default_config(),
        TemplatePreset::Summary => SummaryTemplate::default_config(),
        TemplatePreset::EvidenceList => EvidenceListTemplate::default_config(),
    }
}

/// Builds a preset with its default configuration.
pub fn create_template_from_preset(
    preset: TemplatePreset,
    branding: Option<&Branding>,
) -> Box<dyn Template> {
    build(preset, default_config_for(preset), branding)
}

/// Builds the template named by `config.preset` (full report when absent),
/// overlaying the config on that preset's defaults.
pub fn create_template_from_config(
    config: &TemplateConfig,
    branding: Option<&Branding>,
) -> Box<dyn Template> {
    let preset = config.preset.unwrap_or_default();
    let merged = default_config_for(preset).overlaid_with(config);
    build(preset, merged, branding)
}

fn build(
    preset: TemplatePreset,
    config: TemplateConfig,
    branding: Option<&Branding>,
) -> Box<dyn Template> {
    let branding = resolve_branding(branding);
    match preset {
        TemplatePreset::FullReport => Box::new(FullReportTemplate::with_config(config, branding)),
        TemplatePreset::Summary => Box::new(SummaryTemplate::with_config(config, branding)),
        TemplatePreset::EvidenceList => {
            Box::new(EvidenceListTemplate::with_config(config, branding))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::sample_case;
    use super::*;
    use crate::domain::document::SectionType;
    use crate::domain::foundation::HexColor;
    use crate::domain::template::SectionConfig;
    use crate::ports::RenderInput;

    #[test]
    fn every_preset_reports_its_identity() {
        for preset in TemplatePreset::all() {
            let template = create_template_from_preset(*preset, None);
            assert_eq!(template.preset(), *preset);
            assert_eq!(template.config().preset, Some(*preset));
        }
    }

    #[test]
    fn available_presets_are_described() {
        let presets = get_available_presets();
        assert_eq!(presets.len(), 3);
        assert_eq!(presets[0].preset, TemplatePreset::FullReport);
        assert_eq!(presets[0].name, "Full Report");
        assert!(presets.iter().all(|p| !p.description.is_empty()));
    }

    #[test]
    fn summary_is_never_larger_than_full_report() {
        let case = sample_case();
        let input = RenderInput::new(&case);
        let full = create_template_from_preset(TemplatePreset::FullReport, None).render(&input);
        let summary = create_template_from_preset(TemplatePreset::Summary, None).render(&input);

        assert!(full.has_section(SectionType::TitlePage));
        assert!(full.has_section(SectionType::ExecutiveSummary));
        assert!(!summary.has_section(SectionType::Comments));
        assert!(summary.sections.len() <= full.sections.len());
    }

    #[test]
    fn config_overlays_preset_defaults() {
        let config = TemplateConfig::new("Board pack")
            .with_preset(TemplatePreset::Summary)
            .with_section(SectionType::Diagram, SectionConfig::disabled());

        let template = create_template_from_config(&config, None);
        assert_eq!(template.preset(), TemplatePreset::Summary);
        assert_eq!(template.config().name, "Board pack");
        assert_eq!(template.config().filter().max_depth, Some(3));

        let case = sample_case();
        let doc = template.render(&RenderInput::new(&case).with_diagram("https://x/d.png"));
        assert!(!doc.has_section(SectionType::Diagram));
        assert_eq!(doc.section(SectionType::Goals).unwrap().title, "Key Goals");
    }

    #[test]
    fn config_without_preset_is_full_report() {
        let template = create_template_from_config(&TemplateConfig::new("Plain"), None);
        assert_eq!(template.preset(), TemplatePreset::FullReport);
    }

    #[test]
    fn branding_is_resolved_once_at_construction() {
        let branding = Branding {
            primary_color: Some(HexColor::rgb(0x11, 0x22, 0x33)),
            ..Default::default()
        };
        let template = create_template_from_preset(TemplatePreset::EvidenceList, Some(&branding));
        let case = sample_case();
        let doc = template.render(&RenderInput::new(&case));
        assert_eq!(doc.branding.primary_color, HexColor::rgb(0x11, 0x22, 0x33));
        assert_eq!(doc.branding.footer_text, template.branding().footer_text);
    }

    #[test]
    fn custom_section_renders_configured_content() {
        let mut custom = SectionConfig::enabled().with_title("Scope");
        custom.options.insert(
            "content".to_string(),
            serde_json::json!("First paragraph.\n\nSecond paragraph."),
        );
        let config = TemplateConfig::new("With notes").with_section(SectionType::Custom, custom);

        let case = sample_case();
        let doc = create_template_from_config(&config, None).render(&RenderInput::new(&case));
        let section = doc.section(SectionType::Custom).unwrap();
        assert_eq!(section.title, "Scope");
        assert_eq!(section.blocks.len(), 2);

        let types = doc.section_types();
        assert_eq!(types[types.len() - 1], SectionType::Metadata);
    }

    #[test]
    fn rendering_is_deterministic() {
        let case = sample_case();
        let template = create_template_from_preset(TemplatePreset::FullReport, None);
        let input = RenderInput::new(&case).with_exported_by("bob");
        assert_eq!(template.render(&input), template.render(&input));
    }
}
