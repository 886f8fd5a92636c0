//! Element claim tracking.
//!
//! A `ClaimRegistry` records which document elements have already been
//! assigned to a section during one extraction call, so later passes never
//! double-extract nested content. Claims are keyed by `NodeId`, the stable
//! in-memory element identity, and the registry lives for exactly one
//! extraction call.

use std::collections::HashSet;

use dom_query::{NodeId, NodeRef};

/// Single-owner set of claimed elements, scoped to one extraction call.
#[derive(Debug, Default)]
pub struct ClaimRegistry {
    claimed: HashSet<NodeId>,
}

impl ClaimRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an element as owned by a section.
    pub fn claim(&mut self, node_id: NodeId) {
        self.claimed.insert(node_id);
    }

    /// Check whether the element itself is claimed.
    #[must_use]
    pub fn is_claimed(&self, node_id: NodeId) -> bool {
        self.claimed.contains(&node_id)
    }

    /// Check whether any ancestor of the node is claimed.
    #[must_use]
    pub fn is_inside_claimed(&self, node: &NodeRef) -> bool {
        let mut current = node.parent();
        while let Some(parent) = current {
            if self.claimed.contains(&parent.id) {
                return true;
            }
            current = parent.parent();
        }
        false
    }

    /// Check whether any ancestor strictly between the node and the given
    /// section element is claimed. Used by the field extractor to exclude
    /// subtrees owned by nested claimed elements.
    #[must_use]
    pub fn is_owned_below(&self, node: &NodeRef, section_id: NodeId) -> bool {
        let mut current = node.parent();
        while let Some(parent) = current {
            if parent.id == section_id {
                return false;
            }
            if self.claimed.contains(&parent.id) {
                return true;
            }
            current = parent.parent();
        }
        false
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
