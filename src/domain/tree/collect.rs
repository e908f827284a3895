//! Collection and counting over the filtered tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{should_include_element, ElementFilter, PreOrder};
use crate::domain::case::{Comment, TreeNode};
use crate::domain::foundation::{ElementId, ElementType};

/// The comments attached to one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementComments {
    pub element_id: ElementId,
    pub element_name: String,
    pub element_type: ElementType,
    pub comments: Vec<Comment>,
}

/// Collects every element of `element_type` passing `filter`, with its depth.
///
/// `depth` is the depth reported for `node` itself. Children of rejected
/// nodes are still visited.
pub fn collect_elements_by_type<'a>(
    node: &'a TreeNode,
    element_type: ElementType,
    depth: usize,
    filter: &ElementFilter,
) -> Vec<(&'a TreeNode, usize)> {
    PreOrder::new(node, depth)
        .filter(|(n, _)| n.element_type == element_type)
        .filter(|(n, d)| should_include_element(n, *d, filter))
        .collect()
}

/// Collects the comments of every filtered element that has at least one.
pub fn collect_all_comments(
    node: &TreeNode,
    depth: usize,
    filter: &ElementFilter,
) -> Vec<ElementComments> {
    PreOrder::new(node, depth)
        .filter(|(n, _)| !n.comments.is_empty())
        .filter(|(n, d)| should_include_element(n, *d, filter))
        .map(|(n, _)| ElementComments {
            element_id: n.id.clone(),
            element_name: n
                .display_name()
                .unwrap_or_else(|| n.element_type.label())
                .to_string(),
            element_type: n.element_type,
            comments: n.comments.clone(),
        })
        .collect()
}

/// Counts filtered elements per type. Every type is present, possibly zero.
pub fn count_elements_by_type(
    node: &TreeNode,
    filter: &ElementFilter,
) -> BTreeMap<ElementType, usize> {
    let mut counts: BTreeMap<ElementType, usize> =
        ElementType::all().iter().map(|t| (*t, 0)).collect();

    for (n, _) in PreOrder::new(node, 0).filter(|(n, d)| should_include_element(n, *d, filter)) {
        *counts.entry(n.element_type).or_insert(0) += 1;
    }

    counts
}

/// Number of elements passing `filter`.
pub fn total_element_count(node: &TreeNode, filter: &ElementFilter) -> usize {
    PreOrder::new(node, 0)
        .filter(|(n, d)| should_include_element(n, *d, filter))
        .count()
}

/// Maximum depth of the unfiltered tree; a lone root has depth 0.
pub fn tree_depth(node: &TreeNode) -> usize {
    PreOrder::new(node, 0).map(|(_, d)| d).max().unwrap_or(0)
}
