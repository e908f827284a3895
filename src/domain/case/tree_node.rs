//! TreeNode - one element of an assurance case argument tree.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ElementId, ElementType, Timestamp};

/// A comment attached to a case element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Display name of the comment author.
    pub author: String,
    /// Comment body.
    pub content: String,
    /// When the comment was written.
    pub created_at: Timestamp,
}

/// One node of the case tree.
///
/// Children are owned, so the structure is a finite rooted tree by
/// construction. The root is conventionally a [`ElementType::Goal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: ElementId,

    #[serde(rename = "type")]
    pub element_type: ElementType,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub assumption: Option<String>,

    #[serde(default)]
    pub justification: Option<String>,

    /// Context statements attached to the element.
    #[serde(default)]
    pub context: Vec<String>,

    #[serde(default)]
    pub url: Option<String>,

    /// Reference to an external argument module.
    #[serde(default)]
    pub module_reference_id: Option<String>,

    /// True when the element argues against another element.
    #[serde(default)]
    pub is_defeater: bool,

    /// The element this defeater challenges.
    #[serde(default)]
    pub defeats_element_id: Option<ElementId>,

    /// Draft element not yet attached to the main argument.
    #[serde(default)]
    pub in_sandbox: bool,

    #[serde(default)]
    pub comments: Vec<Comment>,

    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Creates a bare node with no optional fields and no children.
    pub fn new(id: impl Into<ElementId>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
            name: None,
            description: String::new(),
            assumption: None,
            justification: None,
            context: Vec::new(),
            url: None,
            module_reference_id: None,
            is_defeater: false,
            defeats_element_id: None,
            in_sandbox: false,
            comments: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn in_sandbox(mut self) -> Self {
        self.in_sandbox = true;
        self
    }

    /// Returns the trimmed name, treating blank names as absent.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Element title: `"<Type Label>: <name>"`, or the bare label when unnamed.
    pub fn title(&self) -> String {
        match self.display_name() {
            Some(name) => format!("{}: {}", self.element_type.label(), name),
            None => self.element_type.label().to_string(),
        }
    }

    /// Human-readable defeater description, if this node is a defeater.
    pub fn defeater_summary(&self) -> Option<String> {
        if !self.is_defeater {
            return None;
        }
        Some(match &self.defeats_element_id {
            Some(target) => format!("Challenges element {}", target),
            None => "Challenges its parent element".to_string(),
        })
    }

    /// A copy of this node without its children.
    ///
    /// Element content blocks carry detached nodes; the flattened block
    /// sequence already encodes the tree shape.
    pub fn detached(&self) -> TreeNode {
        TreeNode {
            children: Vec::new(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_uses_label_and_name() {
        let node = TreeNode::new(1, ElementType::PropertyClaim).with_name("P1");
        assert_eq!(node.title(), "Property Claim: P1");
    }

    #[test]
    fn title_without_name_is_bare_label() {
        let node = TreeNode::new(1, ElementType::Evidence);
        assert_eq!(node.title(), "Evidence");

        let blank = TreeNode::new(2, ElementType::Evidence).with_name("   ");
        assert_eq!(blank.title(), "Evidence");
    }

    #[test]
    fn deserializes_camel_case_input() {
        let json = r#"{
            "id": 12,
            "type": "PROPERTY_CLAIM",
            "name": "P1",
            "description": "Claim text",
            "inSandbox": true,
            "moduleReferenceId": "mod-7",
            "isDefeater": true,
            "defeatsElementId": 3,
            "context": ["Operating environment"],
            "comments": [
                {"author": "alice", "content": "Check this", "createdAt": "2024-01-15T10:30:00Z"}
            ],
            "children": [{"id": 13, "type": "EVIDENCE"}]
        }"#;

        let node: TreeNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.id.as_str(), "12");
        assert_eq!(node.element_type, ElementType::PropertyClaim);
        assert!(node.in_sandbox);
        assert_eq!(node.module_reference_id.as_deref(), Some("mod-7"));
        assert_eq!(node.defeats_element_id, Some(ElementId::from(3)));
        assert_eq!(node.comments.len(), 1);
        assert_eq!(node.children[0].element_type, ElementType::Evidence);
        assert!(node.children[0].description.is_empty());
    }

    #[test]
    fn defeater_summary_mentions_target() {
        let mut node = TreeNode::new(5, ElementType::PropertyClaim);
        assert_eq!(node.defeater_summary(), None);

        node.is_defeater = true;
        node.defeats_element_id = Some(ElementId::from(2));
        assert_eq!(node.defeater_summary().unwrap(), "Challenges element 2");
    }

    #[test]
    fn detached_drops_children_only() {
        let node = TreeNode::new(1, ElementType::Goal)
            .with_name("G1")
            .with_child(TreeNode::new(2, ElementType::Strategy));
        let detached = node.detached();

        assert!(detached.children.is_empty());
        assert_eq!(detached.name, node.name);
        assert_eq!(detached.id, node.id);
    }
}
