//! CaseExport - the input contract produced by the case-export endpoint.

use serde::{Deserialize, Serialize};

use super::TreeNode;
use crate::domain::foundation::Timestamp;

/// Case-level information carried alongside the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// An immutable snapshot of an assurance case, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseExport {
    /// Version of the export data format.
    pub version: String,
    /// When the snapshot was taken.
    pub exported_at: Timestamp,
    pub case: CaseInfo,
    pub tree: TreeNode,
}

impl CaseExport {
    /// Creates a snapshot from its parts.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        exported_at: Timestamp,
        tree: TreeNode,
    ) -> Self {
        Self {
            version: "1.0".to_string(),
            exported_at,
            case: CaseInfo {
                name: name.into(),
                description: description.into(),
            },
            tree,
        }
    }

    /// Parses a snapshot from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
