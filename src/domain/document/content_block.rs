//! ContentBlock - the closed set of format-agnostic document blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::case::TreeNode;
use crate::domain::foundation::ValidationError;

/// Heading depth, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Creates a HeadingLevel, clamping into `1..=6`.
    pub fn new(level: u8) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    /// Creates a HeadingLevel, returning an error if out of range.
    pub fn try_new(level: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&level) {
            return Err(ValidationError::out_of_range(
                "heading level",
                i64::from(Self::MIN),
                i64::from(Self::MAX),
                i64::from(level),
            ));
        }
        Ok(Self(level))
    }

    /// Heading level for a tree element at `depth`: `min(depth + 2, 6)`.
    ///
    /// The root goal (depth 0) renders at level 2, leaving level 1 for
    /// section titles. Every renderer and exporter goes through here.
    pub fn for_depth(depth: usize) -> Self {
        Self(depth.saturating_add(2).min(usize::from(Self::MAX)) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of format-agnostic document content.
///
/// The set is closed: exporters match on it exhaustively so that a new
/// variant is a compile error at every dispatch site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentBlock {
    Heading {
        level: HeadingLevel,
        text: String,
    },
    Paragraph {
        text: String,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Image {
        src: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Divider,
    Metadata {
        key: String,
        value: String,
    },
    /// A case element rendered as a styled block at its tree depth.
    Element {
        node: TreeNode,
        depth: usize,
    },
}

impl ContentBlock {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        ContentBlock::Heading {
            level: HeadingLevel::new(level),
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph { text: text.into() }
    }

    pub fn bullet_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContentBlock::List {
            ordered: false,
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ordered_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContentBlock::List {
            ordered: true,
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        ContentBlock::Table { headers, rows }
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>, caption: Option<String>) -> Self {
        ContentBlock::Image {
            src: src.into(),
            alt: alt.into(),
            caption,
        }
    }

    pub fn metadata(key: impl Into<String>, value: impl Into<String>) -> Self {
        ContentBlock::Metadata {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Element block for `node`; the node is detached from its children.
    pub fn element(node: &TreeNode, depth: usize) -> Self {
        ContentBlock::Element {
            node: node.detached(),
            depth,
        }
    }

    /// Returns true for heading blocks.
    pub fn is_heading(&self) -> bool {
        matches!(self, ContentBlock::Heading { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ElementType;

    #[test]
    fn heading_level_for_depth_is_offset_and_clamped() {
        assert_eq!(HeadingLevel::for_depth(0).value(), 2);
        assert_eq!(HeadingLevel::for_depth(3).value(), 5);
        assert_eq!(HeadingLevel::for_depth(4).value(), 6);
        assert_eq!(HeadingLevel::for_depth(40).value(), 6);
        assert_eq!(HeadingLevel::for_depth(usize::MAX).value(), 6);
    }

    #[test]
    fn heading_level_new_clamps() {
        assert_eq!(HeadingLevel::new(0).value(), 1);
        assert_eq!(HeadingLevel::new(9).value(), 6);
        assert!(HeadingLevel::try_new(7).is_err());
        assert!(HeadingLevel::try_new(1).is_ok());
    }

    #[test]
    fn heading_level_deserialization_validates() {
        assert!(serde_json::from_str::<HeadingLevel>("3").is_ok());
        assert!(serde_json::from_str::<HeadingLevel>("0").is_err());
    }

    #[test]
    fn blocks_serialize_with_kebab_case_tag() {
        let json = serde_json::to_value(ContentBlock::heading(2, "Intro")).unwrap();
        assert_eq!(json["type"], "heading");
        assert_eq!(json["level"], 2);

        let json = serde_json::to_value(ContentBlock::Divider).unwrap();
        assert_eq!(json["type"], "divider");
    }

    #[test]
    fn element_block_carries_detached_node() {
        let node = TreeNode::new(1, ElementType::Goal)
            .with_child(TreeNode::new(2, ElementType::Strategy));
        match ContentBlock::element(&node, 0) {
            ContentBlock::Element { node, depth } => {
                assert!(node.children.is_empty());
                assert_eq!(depth, 0);
            }
            other => panic!("unexpected block {:?}", other),
        }
    }
}
