//! ElementFilter - per-node inclusion rules for tree walks.

use serde::{Deserialize, Serialize};

use crate::domain::case::TreeNode;
use crate::domain::foundation::ElementType;

/// Element inclusion criteria.
///
/// All fields are optional; the default filter admits every non-sandboxed
/// element at any depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementFilter {
    /// Allow-list of element types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_types: Option<Vec<ElementType>>,

    /// Deny-list of element types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_types: Option<Vec<ElementType>>,

    /// Sandboxed elements are only included when this is `Some(true)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_sandbox: Option<bool>,

    /// Deepest included depth, root at 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl ElementFilter {
    pub fn with_include_types(mut self, types: impl IntoIterator<Item = ElementType>) -> Self {
        self.include_types = Some(types.into_iter().collect());
        self
    }

    pub fn with_exclude_types(mut self, types: impl IntoIterator<Item = ElementType>) -> Self {
        self.exclude_types = Some(types.into_iter().collect());
        self
    }

    pub fn with_sandbox(mut self, include: bool) -> Self {
        self.include_sandbox = Some(include);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// True when sandboxed elements pass.
    pub fn includes_sandbox(&self) -> bool {
        self.include_sandbox == Some(true)
    }
}

/// Decides whether `node` at `depth` passes `filter`.
pub fn should_include_element(node: &TreeNode, depth: usize, filter: &ElementFilter) -> bool {
    if node.in_sandbox && !filter.includes_sandbox() {
        return false;
    }

    if filter.max_depth.is_some_and(|max| depth > max) {
        return false;
    }

    if let Some(allowed) = &filter.include_types {
        if !allowed.contains(&node.element_type) {
            return false;
        }
    }

    if let Some(denied) = &filter.exclude_types {
        if denied.contains(&node.element_type) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal() -> TreeNode {
        TreeNode::new(1, ElementType::Goal)
    }

    #[test]
    fn default_filter_admits_live_elements() {
        assert!(should_include_element(&goal(), 0, &ElementFilter::default()));
        assert!(should_include_element(&goal(), 50, &ElementFilter::default()));
    }

    #[test]
    fn sandboxed_elements_need_explicit_opt_in() {
        let draft = goal().in_sandbox();
        assert!(!should_include_element(&draft, 0, &ElementFilter::default()));
        assert!(!should_include_element(
            &draft,
            0,
            &ElementFilter::default().with_sandbox(false)
        ));
        assert!(should_include_element(
            &draft,
            0,
            &ElementFilter::default().with_sandbox(true)
        ));
    }

    #[test]
    fn max_depth_is_inclusive() {
        let filter = ElementFilter::default().with_max_depth(2);
        assert!(should_include_element(&goal(), 2, &filter));
        assert!(!should_include_element(&goal(), 3, &filter));
    }

    #[test]
    fn type_lists_apply_together() {
        let filter = ElementFilter::default()
            .with_include_types([ElementType::Goal, ElementType::Evidence])
            .with_exclude_types([ElementType::Evidence]);

        assert!(should_include_element(&goal(), 0, &filter));
        assert!(!should_include_element(
            &TreeNode::new(2, ElementType::Evidence),
            1,
            &filter
        ));
        assert!(!should_include_element(
            &TreeNode::new(3, ElementType::Strategy),
            1,
            &filter
        ));
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let json = r#"{"includeTypes": ["GOAL"], "includeSandbox": true, "maxDepth": 4}"#;
        let filter: ElementFilter = serde_json::from_str(json).unwrap();
        assert_eq!(filter.include_types, Some(vec![ElementType::Goal]));
        assert!(filter.includes_sandbox());
        assert_eq!(filter.max_depth, Some(4));
        assert!(filter.exclude_types.is_none());
    }
}
