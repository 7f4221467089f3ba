//! Arena slot management for the trie index.
//!
//! All nodes live in one flat `Vec<Node>` addressed by `NodeId`. Freed slots
//! are threaded into an intrusive LIFO free list through `Node::Free::next`
//! and are always reused before the arena grows, so positions handed out
//! earlier keep their meaning until explicitly freed and overwritten.

use crate::types::{Edge, Index, Node, NodeId, NULL_NODE};

impl Index {
    // ========================================================================
    // SLOT ACCESS
    // ========================================================================

    /// Read the node at `slot`. Nodes are small and `Copy`; reads hand out
    /// a value so traversals never hold a borrow across a mutation.
    #[inline]
    pub(crate) fn node(&self, slot: NodeId) -> Node {
        self.nodes[slot as usize]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, slot: NodeId) -> &mut Node {
        &mut self.nodes[slot as usize]
    }

    // ========================================================================
    // ALLOCATION
    // ========================================================================

    /// Allocate a slot for `node`, reusing the free-list head before
    /// growing the arena.
    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        if self.free_head != NULL_NODE {
            let slot = self.free_head;
            self.free_head = match self.nodes[slot as usize] {
                Node::Free { next } => next,
                _ => unreachable!("free list head points at a live node"),
            };
            self.nodes[slot as usize] = node;
            slot
        } else {
            let slot = NodeId::try_from(self.nodes.len()).expect("arena exceeds NodeId range");
            self.nodes.push(node);
            slot
        }
    }

    /// Return `slot` to the free list. LIFO: the slot becomes the new head
    /// and its `next` threads to the previous head. Contents are don't-care
    /// until the slot is reused.
    pub(crate) fn release(&mut self, slot: NodeId) {
        self.nodes[slot as usize] = Node::Free { next: self.free_head };
        self.free_head = slot;
    }

    // ========================================================================
    // PARENT RELINKING
    // ========================================================================

    /// Point `edge` of `parent` at `target`. A `NULL_NODE` parent means the
    /// edge is the tree root itself. Used by insert (threading a new decision
    /// fork in) and delete (splicing a node out); the trie has no back
    /// pointers, so callers record the parent and edge while traversing.
    pub(crate) fn set_edge(&mut self, parent: NodeId, edge: Edge, target: NodeId) {
        if parent == NULL_NODE {
            self.root = target;
            return;
        }
        match (self.node_mut(parent), edge) {
            (Node::Decision { left, .. }, Edge::Left) => *left = target,
            (Node::Decision { right, .. }, Edge::Right) => *right = target,
            (Node::Chain { next, .. }, Edge::Next)
            | (Node::Branch { next, .. }, Edge::Next)
            | (Node::DupBranch { next, .. }, Edge::Next) => *next = target,
            (Node::DupLeaf { dups, .. }, Edge::Dups)
            | (Node::DupBranch { dups, .. }, Edge::Dups) => *dups = target,
            (node, edge) => unreachable!("node {:?} has no {:?} edge", node, edge),
        }
    }
}
