//! Synthetic container used to anchor a composition run.

use sw_markup::{Element, Node};

/// Reserved tag of the ghost root. Never appears in composed output.
pub const GHOST_ROOT_TAG: &str = "sw-ghost-root";

/// Per-call parent for the top-level composed nodes.
#[derive(Debug)]
pub(crate) struct GhostRoot(Element);

impl GhostRoot {
    pub(crate) fn new() -> Self {
        Self(Element::new(GHOST_ROOT_TAG))
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.0.children
    }

    /// Strip the ghost root and return what it accumulated.
    pub(crate) fn into_children(self) -> Vec<Node> {
        self.0.children
    }

    /// Strip the ghost root from a run that composed exactly one node.
    pub(crate) fn into_single(self) -> Node {
        let mut children = self.into_children();
        debug_assert_eq!(children.len(), 1, "ghost root must hold one node");
        children
            .pop()
            .unwrap_or_else(|| unreachable!("every composed node is attached to its parent"))
    }
}
