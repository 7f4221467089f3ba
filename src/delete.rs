//! Delete operations for the trie index.
//!
//! Deletion traverses to the exact terminal for the `(key, record)` pair,
//! recording every slot and edge taken. Because the trie has no back
//! pointers, that recorded path is what allows the nearest fork or terminal
//! ancestor to be relinked and the exclusively-owned chain below it to be
//! recycled. The path length is bounded by the 32-byte key cap plus the
//! decision nodes met along the way, so the recording stays small.
//!
//! Every early return happens before the first mutation: a delete either
//! fully applies or leaves the index untouched.

use crate::key::{canonical, KeyBuf};
use crate::types::{Edge, Index, Node, NodeId, RecordId, NULL_NODE};

impl Index {
    // ========================================================================
    // PUBLIC DELETE
    // ========================================================================

    /// Remove a `(key, record)` pair.
    ///
    /// A no-op when the canonical key is empty, the index is empty, or the
    /// matched path does not end at a terminal carrying exactly this record.
    /// Freed slots go to the front of the free list; no other slot moves or
    /// is renumbered. A duplicate group that shrinks to one record demotes
    /// back to a plain terminal and its entire digit trie is recycled.
    ///
    /// # Examples
    ///
    /// ```
    /// use triedex::Index;
    ///
    /// let mut index = Index::new();
    /// index.insert("pin", 1);
    /// index.insert("pine", 2);
    ///
    /// index.remove("pine", 2);
    /// assert_eq!(index.search("pine", true), None);
    /// assert_eq!(index.search("pin", true), Some(vec![1]));
    ///
    /// index.remove("pin", 99); // wrong record: nothing happens
    /// assert_eq!(index.search("pin", true), Some(vec![1]));
    /// ```
    pub fn remove(&mut self, key: &str, record: RecordId) {
        let key = canonical(key);
        if key.is_empty() || self.root == NULL_NODE {
            return;
        }

        let mut kb = KeyBuf::from_canonical(key);
        // Slots visited and the edge taken out of each; `dup_at` marks the
        // entry where the walk crossed into a duplicate digit trie.
        let mut path: Vec<(NodeId, Edge)> = Vec::new();
        let mut dup_at: Option<usize> = None;
        let mut cur = self.root;
        let mut i = 0;

        let terminal = loop {
            match self.node(cur) {
                Node::Decision { pivot, left, right } => {
                    if kb.byte(i) <= pivot {
                        path.push((cur, Edge::Left));
                        cur = left;
                    } else {
                        path.push((cur, Edge::Right));
                        cur = right;
                    }
                }
                Node::Chain { ch, next } => {
                    // An interior character cannot terminate a stored key.
                    if kb.byte(i) != ch || i + 1 == kb.len() {
                        return;
                    }
                    path.push((cur, Edge::Next));
                    cur = next;
                    i += 1;
                }
                Node::Leaf { ch, record: found } => {
                    if kb.byte(i) != ch || i + 1 != kb.len() || found != record {
                        return;
                    }
                    break cur;
                }
                Node::Branch { ch, record: found, next } => {
                    if kb.byte(i) != ch {
                        return;
                    }
                    if i + 1 == kb.len() {
                        if found != record {
                            return;
                        }
                        break cur;
                    }
                    path.push((cur, Edge::Next));
                    cur = next;
                    i += 1;
                }
                Node::DupLeaf { ch, dups } => {
                    if kb.byte(i) != ch || i + 1 != kb.len() {
                        return;
                    }
                    // Re-key the walk on the record's decimal digits and
                    // continue inside the duplicate trie.
                    dup_at = Some(path.len());
                    path.push((cur, Edge::Dups));
                    kb.load_digits(record);
                    i = 0;
                    cur = dups;
                }
                Node::DupBranch { ch, dups, next } => {
                    if kb.byte(i) != ch {
                        return;
                    }
                    if i + 1 == kb.len() {
                        dup_at = Some(path.len());
                        path.push((cur, Edge::Dups));
                        kb.load_digits(record);
                        i = 0;
                        cur = dups;
                    } else {
                        path.push((cur, Edge::Next));
                        cur = next;
                        i += 1;
                    }
                }
                Node::Free { .. } => unreachable!("active path reached a free slot"),
            }
        };

        // The pair is present. Remove the terminal from its containing
        // subtree (the main trie, or the digit trie entered at `dup_at`).
        let subtree_start = dup_at.map_or(0, |d| d + 1);
        self.splice_terminal(&path, subtree_start, terminal);

        // A duplicate group left with a single record demotes back to a
        // plain terminal carrying that record directly.
        if let Some(d) = dup_at {
            self.demote_if_sole(path[d].0);
        }
    }

    // ========================================================================
    // SPLICING
    // ========================================================================

    /// Unlink `terminal` from the subtree whose path entries start at
    /// `subtree_start`, recycling every slot that served only the deleted
    /// key. Freed runs enter the free list deepest slot first, leaving the
    /// chain's top node at the head.
    fn splice_terminal(&mut self, path: &[(NodeId, Edge)], subtree_start: usize, terminal: NodeId) {
        // A terminal with a continuation keeps its chain: it just stops
        // being a terminal.
        if let Node::Branch { ch, next, .. } = self.node(terminal) {
            *self.node_mut(terminal) = Node::Chain { ch, next };
            return;
        }

        // Nearest ancestor with an alternative: a decision fork, or a
        // terminal the deleted key continued past. Everything below it on
        // the path is a chain serving only the deleted key.
        let mut unlink = None;
        for j in (subtree_start..path.len()).rev() {
            if !matches!(self.node(path[j].0), Node::Chain { .. }) {
                unlink = Some(j);
                break;
            }
        }

        match unlink {
            Some(j) => {
                let (slot, edge) = path[j];
                match self.node(slot) {
                    Node::Branch { ch, record, .. } => {
                        self.release_path(terminal, &path[j + 1..]);
                        *self.node_mut(slot) = Node::Leaf { ch, record };
                    }
                    Node::DupBranch { ch, dups, .. } => {
                        self.release_path(terminal, &path[j + 1..]);
                        *self.node_mut(slot) = Node::DupLeaf { ch, dups };
                    }
                    Node::Decision { left, right, .. } => {
                        // The fork loses one side and is spliced out: its
                        // parent adopts the surviving side. The surviving
                        // keys stay within the parent pivot's range, so no
                        // pivot needs rewriting.
                        let survivor = if edge == Edge::Left { right } else { left };
                        let (p, pe) = Self::parent_of(path, j);
                        self.set_edge(p, pe, survivor);
                        self.release_path(terminal, &path[j + 1..]);
                        self.release(slot);
                    }
                    node => unreachable!("unexpected unlink ancestor {:?}", node),
                }
            }
            None => {
                // The whole subtree was one chain for this key. Only the
                // main trie can empty out this way: a duplicate trie always
                // holds at least two records when a delete reaches it.
                debug_assert_eq!(subtree_start, 0);
                let (p, pe) = Self::parent_of(path, subtree_start);
                self.set_edge(p, pe, NULL_NODE);
                self.release_path(terminal, &path[subtree_start..]);
            }
        }
    }

    /// The slot and edge that point at path entry `j`; `NULL_NODE` when the
    /// entry is the tree root.
    fn parent_of(path: &[(NodeId, Edge)], j: usize) -> (NodeId, Edge) {
        if j == 0 {
            (NULL_NODE, Edge::Next)
        } else {
            path[j - 1]
        }
    }

    /// Recycle `terminal` plus the chain entries above it, deepest first.
    fn release_path(&mut self, terminal: NodeId, chain: &[(NodeId, Edge)]) {
        self.release(terminal);
        for &(slot, _) in chain.iter().rev() {
            self.release(slot);
        }
    }

    // ========================================================================
    // DUPLICATE DEMOTION
    // ========================================================================

    /// If the duplicate node at `slot` has exactly one record left, demote
    /// it to a plain `Leaf`/`Branch` and recycle the whole digit trie.
    fn demote_if_sole(&mut self, slot: NodeId) {
        let dups = match self.node(slot) {
            Node::DupLeaf { dups, .. } | Node::DupBranch { dups, .. } => dups,
            node => unreachable!("demotion check on non-duplicate node {:?}", node),
        };
        let survivor = match self.sole_record(dups) {
            Some(record) => record,
            None => return,
        };
        self.release_run(dups);
        match self.node(slot) {
            Node::DupLeaf { ch, .. } => {
                *self.node_mut(slot) = Node::Leaf { ch, record: survivor };
            }
            Node::DupBranch { ch, next, .. } => {
                *self.node_mut(slot) = Node::Branch { ch, record: survivor, next };
            }
            _ => unreachable!(),
        }
    }

    /// A digit trie holds exactly one record iff it is a pure chain ending
    /// in a leaf; any fork or branch terminal means several remain. Cost is
    /// bounded by the digit count, not the trie size.
    fn sole_record(&self, start: NodeId) -> Option<RecordId> {
        let mut cur = start;
        loop {
            match self.node(cur) {
                Node::Chain { next, .. } => cur = next,
                Node::Leaf { record, .. } => return Some(record),
                _ => return None,
            }
        }
    }

    /// Recycle a pure chain run starting at `start`, deepest slot first so
    /// the run's head ends up at the front of the free list.
    fn release_run(&mut self, start: NodeId) {
        let mut run = Vec::new();
        let mut cur = start;
        loop {
            run.push(cur);
            match self.node(cur) {
                Node::Chain { next, .. } => cur = next,
                Node::Leaf { .. } => break,
                node => unreachable!("release run hit {:?}", node),
            }
        }
        for &slot in run.iter().rev() {
            self.release(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Index;

    #[test]
    fn remove_sole_key_empties_the_index() {
        let mut index = Index::new();
        index.insert("cat", 1);
        index.remove("cat", 1);
        assert!(index.is_empty());
        assert_eq!(index.search("cat", true), None);
        // Nothing leaked: all three chain slots are on the free list.
        let stats = index.stats();
        assert_eq!(stats.active, 0);
        assert_eq!(stats.free, 3);
    }

    #[test]
    fn remove_is_a_no_op_for_absent_pairs() {
        let mut index = Index::new();
        index.insert("cat", 1);
        let before = index.stats();

        index.remove("cat", 2); // wrong record
        index.remove("ca", 1); // ends mid-chain
        index.remove("cats", 1); // runs past the terminal
        index.remove("dog", 1); // diverges immediately
        index.remove("", 1); // empty key
        assert_eq!(index.stats(), before);
        assert_eq!(index.search("cat", true), Some(vec![1]));
    }

    #[test]
    fn remove_on_empty_index_is_a_no_op() {
        let mut index = Index::new();
        index.remove("cat", 1);
        assert!(index.is_empty());
    }

    #[test]
    fn remove_branch_terminal_demotes_to_chain() {
        let mut index = Index::new();
        index.insert("car", 2);
        index.insert("cart", 3);
        index.remove("car", 2);
        assert_eq!(index.search("car", true), None);
        assert_eq!(index.search("cart", true), Some(vec![3]));
        // The 'r' slot was kept as a chain node, nothing was freed.
        let stats = index.stats();
        assert_eq!(stats.free, 0);
        assert_eq!(stats.branches, 0);
    }

    #[test]
    fn remove_leaf_below_branch_demotes_the_branch() {
        let mut index = Index::new();
        index.insert("car", 2);
        index.insert("cart", 3);
        index.remove("cart", 3);
        assert_eq!(index.search("cart", true), None);
        assert_eq!(index.search("car", true), Some(vec![2]));
        let stats = index.stats();
        assert_eq!(stats.free, 1); // the 't' leaf
        assert_eq!(stats.leaves, 1);
        assert_eq!(stats.branches, 0);
    }

    #[test]
    fn remove_splices_decision_forks_out() {
        let mut index = Index::new();
        index.insert("cat", 1);
        index.insert("car", 2);
        index.remove("car", 2);
        assert_eq!(index.search("car", true), None);
        assert_eq!(index.search("cat", true), Some(vec![1]));
        // The fork and the 'r' leaf were both recycled.
        let stats = index.stats();
        assert_eq!(stats.decisions, 0);
        assert_eq!(stats.free, 2);
    }

    #[test]
    fn remove_right_side_of_a_fork() {
        let mut index = Index::new();
        index.insert("cat", 1);
        index.insert("car", 2);
        index.remove("cat", 1);
        assert_eq!(index.search("cat", true), None);
        assert_eq!(index.search("car", true), Some(vec![2]));
        assert_eq!(index.stats().decisions, 0);
    }

    #[test]
    fn remove_fork_at_the_root() {
        let mut index = Index::new();
        index.insert("a", 1);
        index.insert("b", 2);
        index.remove("a", 1);
        assert_eq!(index.search("", false), Some(vec![2]));
        index.remove("b", 2);
        assert!(index.is_empty());
        assert_eq!(index.stats().free, index.stats().total_slots);
    }

    #[test]
    fn remove_one_duplicate_keeps_the_rest() {
        let mut index = Index::new();
        index.insert("k", 5);
        index.insert("k", 6);
        index.insert("k", 7);
        index.remove("k", 6);
        assert_eq!(index.search("k", true), Some(vec![5, 7]));
        // Still a duplicate group.
        assert_eq!(index.stats().dup_leaves, 1);
    }

    #[test]
    fn duplicate_group_demotes_at_one_record() {
        let mut index = Index::new();
        index.insert("k", 5);
        index.insert("k", 6);
        index.remove("k", 6);
        assert_eq!(index.search("k", true), Some(vec![5]));
        let stats = index.stats();
        assert_eq!(stats.dup_leaves, 0);
        assert_eq!(stats.leaves, 1);
        assert_eq!(stats.active, 1);
    }

    #[test]
    fn duplicate_demotion_with_prefix_digits() {
        // Digit keys where one is a prefix of the other ("1" / "12").
        let mut index = Index::new();
        index.insert("k", 1);
        index.insert("k", 12);
        index.remove("k", 1);
        assert_eq!(index.search("k", true), Some(vec![12]));
        assert_eq!(index.stats().dup_leaves, 0);
    }

    #[test]
    fn duplicate_on_branch_demotes_and_keeps_continuation() {
        let mut index = Index::new();
        index.insert("ca", 1);
        index.insert("ca", 2);
        index.insert("cat", 3);
        index.remove("ca", 1);
        assert_eq!(index.search("ca", true), Some(vec![2]));
        assert_eq!(index.search("cat", true), Some(vec![3]));
        let stats = index.stats();
        assert_eq!(stats.dup_branches, 0);
        assert_eq!(stats.branches, 1);
    }

    #[test]
    fn remove_absent_record_from_duplicate_group() {
        let mut index = Index::new();
        index.insert("k", 5);
        index.insert("k", 6);
        let before = index.stats();
        index.remove("k", 7);
        assert_eq!(index.stats(), before);
        assert_eq!(index.search("k", true), Some(vec![5, 6]));
    }

    #[test]
    fn deleted_slots_are_reused_by_later_inserts() {
        let mut index = Index::new();
        index.insert("cat", 1);
        index.insert("car", 2);
        index.remove("car", 2);
        let slots = index.stats().total_slots;

        // Two slots are free; the next small insert grows nothing.
        index.insert("co", 3);
        assert_eq!(index.stats().total_slots, slots);
        assert_eq!(index.search("c", false), Some(vec![1, 3]));
    }

    #[test]
    fn interleaved_churn_conserves_slots() {
        let mut index = Index::new();
        let keys = ["alpha", "beta", "gamma", "delta", "epsilon"];
        for (n, key) in keys.iter().enumerate() {
            index.insert(key, n as u64);
        }
        for (n, key) in keys.iter().enumerate() {
            index.remove(key, n as u64);
        }
        let stats = index.stats();
        assert_eq!(stats.active, 0);
        assert_eq!(stats.free, stats.total_slots);
        assert!(index.is_empty());

        // The emptied arena satisfies new inserts from recycled slots.
        index.insert("zeta", 9);
        assert_eq!(index.stats().total_slots, stats.total_slots);
        assert_eq!(index.search("zeta", true), Some(vec![9]));
    }
}
