//! Structural diagnostics and invariant checking for the trie index.
//!
//! The trie carries no parent or back pointers, so both scans here use an
//! explicit stack to remember ancestors. Diagnostics are read-only and safe
//! to run alongside other reads, but not alongside mutation.

use crate::types::{Index, IndexStats, Node, NodeId, NULL_NODE};

impl Index {
    // ========================================================================
    // STATISTICS
    // ========================================================================

    /// Scan the whole structure and report per-kind node counts, the active
    /// and free slot totals, and the deepest root-to-leaf path. Visits every
    /// active node exactly once (duplicate tries included), then walks the
    /// free list from its head.
    ///
    /// # Examples
    ///
    /// ```
    /// use triedex::Index;
    ///
    /// let mut index = Index::new();
    /// index.insert("cat", 1);
    /// index.remove("cat", 1);
    ///
    /// let stats = index.stats();
    /// assert_eq!(stats.active, 0);
    /// assert_eq!(stats.free, 3);
    /// assert_eq!(stats.active + stats.free, stats.total_slots);
    /// ```
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats::default();

        if self.root != NULL_NODE {
            let mut stack: Vec<(NodeId, usize)> = vec![(self.root, 1)];
            while let Some((slot, depth)) = stack.pop() {
                stats.depth = stats.depth.max(depth);
                match self.node(slot) {
                    Node::Decision { left, right, .. } => {
                        stats.decisions += 1;
                        stack.push((right, depth + 1));
                        stack.push((left, depth + 1));
                    }
                    Node::Chain { next, .. } => {
                        stats.chains += 1;
                        stack.push((next, depth + 1));
                    }
                    Node::Leaf { .. } => stats.leaves += 1,
                    Node::Branch { next, .. } => {
                        stats.branches += 1;
                        stack.push((next, depth + 1));
                    }
                    Node::DupLeaf { dups, .. } => {
                        stats.dup_leaves += 1;
                        stack.push((dups, depth + 1));
                    }
                    Node::DupBranch { dups, next, .. } => {
                        stats.dup_branches += 1;
                        stack.push((next, depth + 1));
                        stack.push((dups, depth + 1));
                    }
                    Node::Free { .. } => unreachable!("active path reached a free slot"),
                }
            }
        }
        stats.active = stats.decisions
            + stats.chains
            + stats.leaves
            + stats.branches
            + stats.dup_leaves
            + stats.dup_branches;

        let mut cur = self.free_head;
        while cur != NULL_NODE {
            stats.free += 1;
            cur = match self.node(cur) {
                Node::Free { next } => next,
                node => unreachable!("free list reached a live node {:?}", node),
            };
        }
        stats.total_slots = self.nodes.len();
        stats
    }

    // ========================================================================
    // INVARIANT CHECKING
    // ========================================================================

    /// Check that the index maintains its structural invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting:
    /// every slot is reachable exactly once, either from the active root or
    /// from the free-list head; active paths never touch a free slot and the
    /// free list holds only free slots; the in-order walk yields strictly
    /// ascending keys.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        let mut seen = vec![false; self.nodes.len()];

        // Active reachability.
        if self.root != NULL_NODE {
            let mut stack = vec![self.root];
            while let Some(slot) = stack.pop() {
                let at = slot as usize;
                if at >= seen.len() {
                    return Err(format!("slot {} out of arena bounds", slot));
                }
                if seen[at] {
                    return Err(format!("slot {} reached twice from the root", slot));
                }
                seen[at] = true;
                match self.node(slot) {
                    Node::Decision { left, right, .. } => {
                        stack.push(left);
                        stack.push(right);
                    }
                    Node::Chain { next, .. } | Node::Branch { next, .. } => stack.push(next),
                    Node::Leaf { .. } => {}
                    Node::DupLeaf { dups, .. } => stack.push(dups),
                    Node::DupBranch { dups, next, .. } => {
                        stack.push(dups);
                        stack.push(next);
                    }
                    Node::Free { .. } => {
                        return Err(format!("active path reached free slot {}", slot));
                    }
                }
            }
        }

        // Free-list reachability.
        let mut cur = self.free_head;
        while cur != NULL_NODE {
            let at = cur as usize;
            if at >= seen.len() {
                return Err(format!("free slot {} out of arena bounds", cur));
            }
            if seen[at] {
                return Err(format!("slot {} is both active and free, or listed twice", cur));
            }
            seen[at] = true;
            cur = match self.node(cur) {
                Node::Free { next } => next,
                node => return Err(format!("free list holds live node {:?} at slot {}", node, cur)),
            };
        }

        if let Some(slot) = seen.iter().position(|&s| !s) {
            return Err(format!("slot {} leaked: reachable from neither root", slot));
        }

        // Ordering: the in-order walk must produce strictly ascending keys.
        let keys = self.collect_keys();
        for pair in keys.windows(2) {
            if pair[0] >= pair[1] {
                return Err(format!(
                    "keys out of order: {:?} before {:?}",
                    String::from_utf8_lossy(&pair[0]),
                    String::from_utf8_lossy(&pair[1]),
                ));
            }
        }
        Ok(())
    }

    /// Every stored key, reconstructed by an in-order walk. Duplicate tries
    /// are not descended: a duplicate terminal is still one key.
    pub(crate) fn collect_keys(&self) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        if self.root == NULL_NODE {
            return out;
        }
        let mut pending: Vec<(NodeId, Vec<u8>)> = Vec::new();
        let mut prefix: Vec<u8> = Vec::new();
        let mut cur = self.root;
        loop {
            match self.node(cur) {
                Node::Decision { left, right, .. } => {
                    pending.push((right, prefix.clone()));
                    cur = left;
                }
                Node::Chain { ch, next } => {
                    prefix.push(ch);
                    cur = next;
                }
                Node::Leaf { ch, .. } | Node::DupLeaf { ch, .. } => {
                    prefix.push(ch);
                    out.push(prefix);
                    match pending.pop() {
                        Some((slot, saved)) => {
                            cur = slot;
                            prefix = saved;
                        }
                        None => return out,
                    }
                }
                Node::Branch { ch, next, .. } | Node::DupBranch { ch, next, .. } => {
                    prefix.push(ch);
                    out.push(prefix.clone());
                    cur = next;
                }
                Node::Free { .. } => unreachable!("active path reached a free slot"),
            }
        }
    }
}
