//! Tree utilities - filtering, collection, counting and block rendering
//! over the case tree.
//!
//! Every walk is depth-first pre-order on an explicit stack, so arbitrarily
//! deep inputs cannot exhaust the call stack. Filters decide inclusion per
//! node and never prune: children of a rejected node are still visited.

mod collect;
mod filter;
mod render;
mod walk;

pub use collect::{
    collect_all_comments, collect_elements_by_type, count_elements_by_type, total_element_count,
    tree_depth, ElementComments,
};
pub use filter::{should_include_element, ElementFilter};
pub use render::{render_element_as_blocks, render_tree_as_blocks, render_tree_hierarchical};
pub use walk::PreOrder;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::case::{Comment, TreeNode};
    use crate::domain::foundation::{ElementType, Timestamp};

    /// Goal -> Strategy -> [PropertyClaim -> Evidence, PropertyClaim (sandbox)]
    pub fn sample_tree() -> TreeNode {
        let evidence = TreeNode::new(4, ElementType::Evidence)
            .with_name("E1")
            .with_description("Test report");
        let claim = TreeNode::new(3, ElementType::PropertyClaim)
            .with_name("P1")
            .with_child(evidence);
        let draft = TreeNode::new(5, ElementType::PropertyClaim)
            .with_name("P2")
            .in_sandbox();
        let strategy = TreeNode::new(2, ElementType::Strategy)
            .with_name("S1")
            .with_child(claim)
            .with_child(draft);

        let mut goal = TreeNode::new(1, ElementType::Goal)
            .with_name("G1")
            .with_description("The system is acceptably safe")
            .with_child(strategy);
        goal.comments.push(Comment {
            author: "alice".to_string(),
            content: "Needs a context element".to_string(),
            created_at: Timestamp::parse_rfc3339("2024-03-01T09:00:00Z")
                .expect("valid timestamp"),
        });
        goal
    }
}
