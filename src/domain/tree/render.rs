//! Tree to content-block rendering.

use super::{should_include_element, ElementFilter, PreOrder};
use crate::domain::case::TreeNode;
use crate::domain::document::{ContentBlock, HeadingLevel};

/// Renders one element as plain blocks.
///
/// Order: heading, description, then Assumption, Justification, Context,
/// URL, Module Reference and Defeater metadata, each only when present.
pub fn render_element_as_blocks(node: &TreeNode, depth: usize) -> Vec<ContentBlock> {
    let mut blocks = vec![ContentBlock::Heading {
        level: HeadingLevel::for_depth(depth),
        text: node.title(),
    }];

    if !node.description.trim().is_empty() {
        blocks.push(ContentBlock::paragraph(node.description.trim()));
    }

    if let Some(assumption) = non_blank(&node.assumption) {
        blocks.push(ContentBlock::metadata("Assumption", assumption));
    }
    if let Some(justification) = non_blank(&node.justification) {
        blocks.push(ContentBlock::metadata("Justification", justification));
    }

    let context: Vec<&str> = node
        .context
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if !context.is_empty() {
        blocks.push(ContentBlock::metadata("Context", context.join("; ")));
    }

    if let Some(url) = non_blank(&node.url) {
        blocks.push(ContentBlock::metadata("URL", url));
    }
    if let Some(module) = non_blank(&node.module_reference_id) {
        blocks.push(ContentBlock::metadata("Module Reference", module));
    }
    if let Some(defeater) = node.defeater_summary() {
        blocks.push(ContentBlock::metadata("Defeater", defeater));
    }

    blocks
}

/// Flattens the filtered tree into plain blocks, parents first.
pub fn render_tree_as_blocks(node: &TreeNode, filter: &ElementFilter) -> Vec<ContentBlock> {
    PreOrder::new(node, 0)
        .filter(|(n, d)| should_include_element(n, *d, filter))
        .flat_map(|(n, d)| render_element_as_blocks(n, d))
        .collect()
}

/// Flattens the filtered tree into `Element` blocks, parents first.
pub fn render_tree_hierarchical(node: &TreeNode, filter: &ElementFilter) -> Vec<ContentBlock> {
    PreOrder::new(node, 0)
        .filter(|(n, d)| should_include_element(n, *d, filter))
        .map(|(n, d)| ContentBlock::element(n, d))
        .collect()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
