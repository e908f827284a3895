//! Section builders shared by the presets.
//!
//! Each builder reads the render context and returns a finished section.
//! Presets compose them in their own order.

use crate::domain::document::{ContentBlock, RenderedSection, SectionType};
use crate::domain::foundation::ElementType;
use crate::domain::tree::{
    collect_all_comments, collect_elements_by_type, count_elements_by_type,
    render_element_as_blocks, render_tree_hierarchical, total_element_count, tree_depth,
    ElementFilter,
};
use crate::ports::RenderContext;

pub const CONTENTS_TITLE: &str = "Table of Contents";
pub const DIAGRAM_TITLE: &str = "Assurance Case Diagram";
pub const EXECUTIVE_SUMMARY_TITLE: &str = "Executive Summary";
pub const ELEMENTS_TITLE: &str = "Argument Structure";
pub const COMMENTS_TITLE: &str = "Comments";
pub const METADATA_TITLE: &str = "Document Information";
pub const EVIDENCE_REGISTER_TITLE: &str = "Evidence Register";

/// Title page: case name, description and export facts.
pub fn title_page(ctx: &RenderContext<'_>) -> RenderedSection {
    let meta = ctx.metadata;
    let mut blocks = vec![ContentBlock::heading(1, meta.case_name.clone())];

    if !meta.case_description.trim().is_empty() {
        blocks.push(ContentBlock::paragraph(meta.case_description.trim()));
    }
    blocks.push(ContentBlock::metadata("Exported", meta.exported_at.long_date()));
    if let Some(by) = &meta.exported_by {
        blocks.push(ContentBlock::metadata("Exported by", by.clone()));
    }
    if let Some(org) = &ctx.branding.organisation_name {
        blocks.push(ContentBlock::metadata("Organisation", org.clone()));
    }

    RenderedSection::new(
        SectionType::TitlePage,
        ctx.section_title(SectionType::TitlePage, &meta.case_name),
        blocks,
    )
}

/// Contents list naming the titles of `following` in order.
pub fn table_of_contents(ctx: &RenderContext<'_>, following: &[RenderedSection]) -> RenderedSection {
    let titles = following.iter().map(|s| s.title.clone());
    RenderedSection::new(
        SectionType::TableOfContents,
        ctx.section_title(SectionType::TableOfContents, CONTENTS_TITLE),
        vec![ContentBlock::ordered_list(titles)],
    )
}

/// Diagram section; absent without an image.
pub fn diagram(ctx: &RenderContext<'_>) -> Option<RenderedSection> {
    let src = ctx.diagram()?;
    let alt = format!("{} diagram", ctx.metadata.case_name);
    Some(RenderedSection::new(
        SectionType::Diagram,
        ctx.section_title(SectionType::Diagram, DIAGRAM_TITLE),
        vec![ContentBlock::image(
            src,
            alt,
            Some(format!("Goal structure of {}", ctx.metadata.case_name)),
        )],
    ))
}

/// Overview paragraph, per-type count table, total and depth.
pub fn executive_summary(ctx: &RenderContext<'_>) -> RenderedSection {
    let tree = ctx.tree();
    let counts = count_elements_by_type(tree, &ctx.filter);
    let total = total_element_count(tree, &ctx.filter);
    let depth = tree_depth(tree);

    let mut rows: Vec<Vec<String>> = counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(t, count)| vec![t.label().to_string(), count.to_string()])
        .collect();
    rows.push(vec!["Total".to_string(), total.to_string()]);

    let overview = format!(
        "This document presents the assurance case \"{}\". The argument contains {} {} across {} {}.",
        ctx.metadata.case_name,
        total,
        if total == 1 { "element" } else { "elements" },
        depth + 1,
        if depth == 0 { "level" } else { "levels" },
    );

    RenderedSection::new(
        SectionType::ExecutiveSummary,
        ctx.section_title(SectionType::ExecutiveSummary, EXECUTIVE_SUMMARY_TITLE),
        vec![
            ContentBlock::paragraph(overview),
            ContentBlock::table(
                vec!["Element Type".to_string(), "Count".to_string()],
                rows,
            ),
            ContentBlock::metadata("Tree Depth", depth.to_string()),
        ],
    )
}

/// The filtered tree as nested element blocks.
pub fn elements(ctx: &RenderContext<'_>) -> RenderedSection {
    RenderedSection::new(
        SectionType::Elements,
        ctx.section_title(SectionType::Elements, ELEMENTS_TITLE),
        render_tree_hierarchical(ctx.tree(), &ctx.filter),
    )
}

/// Flat list of one element type.
///
/// The first block is an introduction, so a section with no matching
/// elements has exactly one block; callers drop those.
pub fn elements_of_type(
    ctx: &RenderContext<'_>,
    section: SectionType,
    element_type: ElementType,
    filter: &ElementFilter,
) -> RenderedSection {
    let found = collect_elements_by_type(ctx.tree(), element_type, 0, filter);
    let mut blocks = vec![ContentBlock::paragraph(format!(
        "{} {} in this case.",
        found.len(),
        if found.len() == 1 {
            element_type.label().to_lowercase()
        } else {
            element_type.plural_label().to_lowercase()
        }
    ))];
    for (node, depth) in found {
        blocks.extend(render_element_as_blocks(node, depth));
    }

    RenderedSection::new(
        section,
        ctx.section_title(section, element_type.plural_label()),
        blocks,
    )
}

/// Comment threads, one heading per commented element.
pub fn comments(ctx: &RenderContext<'_>) -> RenderedSection {
    let threads = collect_all_comments(ctx.tree(), 0, &ctx.filter);
    let mut blocks = Vec::new();

    if threads.is_empty() {
        blocks.push(ContentBlock::paragraph("No comments have been recorded."));
    }
    for thread in threads {
        blocks.push(ContentBlock::heading(
            2,
            format!("{}: {}", thread.element_type.label(), thread.element_name),
        ));
        blocks.push(ContentBlock::bullet_list(thread.comments.iter().map(|c| {
            format!(
                "{} ({}): {}",
                c.author,
                c.created_at.date_string(),
                c.content.trim()
            )
        })));
    }

    RenderedSection::new(
        SectionType::Comments,
        ctx.section_title(SectionType::Comments, COMMENTS_TITLE),
        blocks,
    )
}

/// Closing block of document facts.
pub fn metadata(ctx: &RenderContext<'_>) -> RenderedSection {
    let meta = ctx.metadata;
    let mut blocks = vec![
        ContentBlock::Divider,
        ContentBlock::metadata("Case", meta.case_name.clone()),
        ContentBlock::metadata("Exported At", meta.exported_at.display_datetime()),
    ];
    if let Some(by) = &meta.exported_by {
        blocks.push(ContentBlock::metadata("Exported By", by.clone()));
    }
    blocks.push(ContentBlock::metadata("Data Version", meta.data_version.clone()));
    blocks.push(ContentBlock::metadata(
        "Element Count",
        meta.element_count.to_string(),
    ));
    blocks.push(ContentBlock::metadata("Template", ctx.config.name.clone()));
    if let Some(format) = meta.format {
        blocks.push(ContentBlock::metadata("Format", format.display_name()));
    }

    RenderedSection::new(
        SectionType::Metadata,
        ctx.section_title(SectionType::Metadata, METADATA_TITLE),
        blocks,
    )
}

/// Evidence table followed by each evidence element.
pub fn evidence_register(ctx: &RenderContext<'_>) -> RenderedSection {
    let found = collect_elements_by_type(ctx.tree(), ElementType::Evidence, 0, &ctx.filter);

    let rows = found
        .iter()
        .enumerate()
        .map(|(i, (node, _))| {
            vec![
                (i + 1).to_string(),
                node.display_name()
                    .unwrap_or_else(|| node.element_type.label())
                    .to_string(),
                node.description.trim().to_string(),
                node.url.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut blocks = vec![ContentBlock::table(
        ["#", "Evidence", "Description", "URL"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows,
    )];
    blocks.extend(
        found
            .into_iter()
            .map(|(node, depth)| ContentBlock::element(node, depth)),
    );

    RenderedSection::new(
        SectionType::Evidence,
        ctx.section_title(SectionType::Evidence, EVIDENCE_REGISTER_TITLE),
        blocks,
    )
}

/// Free-form section from `sections.custom.options.content`.
///
/// Only emitted when the config declares the section; blank lines split
/// paragraphs.
pub fn custom(ctx: &RenderContext<'_>) -> Option<RenderedSection> {
    if !ctx.is_section_enabled(SectionType::Custom) {
        return None;
    }
    let content = ctx
        .config
        .section_options(SectionType::Custom)?
        .get("content")?
        .as_str()?;

    let blocks: Vec<ContentBlock> = content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ContentBlock::paragraph)
        .collect();
    if blocks.is_empty() {
        return None;
    }

    Some(RenderedSection::new(
        SectionType::Custom,
        ctx.section_title(SectionType::Custom, "Notes"),
        blocks,
    ))
}
