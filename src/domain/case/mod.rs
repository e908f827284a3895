//! Case module - the assurance case snapshot consumed by templates.

mod case_export;
mod tree_node;

pub use case_export::{CaseExport, CaseInfo};
pub use tree_node::{Comment, TreeNode};
