//! Search operations for the trie index.
//!
//! Traversal consumes one canonical-key byte per character-bearing node and
//! branches at decision nodes by comparing the next unconsumed byte against
//! the pivot. Matches are collected by an in-order walk over an explicit
//! stack, which yields record identifiers in ascending full-key order.

use crate::key::canonical;
use crate::types::{Index, Node, NodeId, RecordId, NULL_NODE};

impl Index {
    // ========================================================================
    // PUBLIC SEARCH
    // ========================================================================

    /// Look up a key and return the matching record identifiers, or `None`
    /// when nothing matches.
    ///
    /// With `precise = true` the canonical key must equal a stored key
    /// exactly; the result is that key's identifiers (several, when
    /// duplicates share the key). With `precise = false` the canonical key
    /// only needs to be a prefix of one or more stored keys and the result
    /// covers everything beneath the prefix. An empty canonical key matches
    /// nothing precisely, but as a prefix it returns the entire index.
    ///
    /// Identifiers always ascend by full key text; several identifiers under
    /// one key order by their decimal-text encoding.
    ///
    /// # Examples
    ///
    /// ```
    /// use triedex::Index;
    ///
    /// let mut index = Index::new();
    /// index.insert("star", 10);
    /// index.insert("stem", 11);
    ///
    /// assert_eq!(index.search("star", true), Some(vec![10]));
    /// assert_eq!(index.search("st", false), Some(vec![10, 11]));
    /// assert_eq!(index.search("st", true), None);
    /// assert_eq!(index.search("sun", false), None);
    /// assert_eq!(index.search("", false), Some(vec![10, 11]));
    /// ```
    pub fn search(&self, key: &str, precise: bool) -> Option<Vec<RecordId>> {
        if self.root == NULL_NODE {
            return None;
        }
        let key = canonical(key);
        if key.is_empty() {
            if precise {
                return None;
            }
            let mut out = Vec::new();
            self.collect(self.root, &mut out);
            return Some(out);
        }

        let mut cur = self.root;
        let mut i = 0;
        loop {
            match self.node(cur) {
                Node::Decision { pivot, left, right } => {
                    cur = if key[i] <= pivot { left } else { right };
                }
                Node::Chain { ch, next } => {
                    if key[i] != ch {
                        return None;
                    }
                    i += 1;
                    if i == key.len() {
                        // The key ends on an interior character: no stored
                        // key terminates here, but everything past this
                        // point shares the key as a prefix.
                        if precise {
                            return None;
                        }
                        let mut out = Vec::new();
                        self.collect(next, &mut out);
                        return Some(out);
                    }
                    cur = next;
                }
                Node::Leaf { ch, record } => {
                    if key[i] != ch {
                        return None;
                    }
                    i += 1;
                    if i == key.len() {
                        return Some(vec![record]);
                    }
                    // Chain ends before the key is consumed.
                    return None;
                }
                Node::Branch { ch, record, next } => {
                    if key[i] != ch {
                        return None;
                    }
                    i += 1;
                    if i == key.len() {
                        let mut out = vec![record];
                        if !precise {
                            self.collect(next, &mut out);
                        }
                        return Some(out);
                    }
                    cur = next;
                }
                Node::DupLeaf { ch, dups } => {
                    if key[i] != ch {
                        return None;
                    }
                    i += 1;
                    if i == key.len() {
                        let mut out = Vec::new();
                        self.collect(dups, &mut out);
                        return Some(out);
                    }
                    return None;
                }
                Node::DupBranch { ch, dups, next } => {
                    if key[i] != ch {
                        return None;
                    }
                    i += 1;
                    if i == key.len() {
                        let mut out = Vec::new();
                        self.collect(dups, &mut out);
                        if !precise {
                            self.collect(next, &mut out);
                        }
                        return Some(out);
                    }
                    cur = next;
                }
                Node::Free { .. } => unreachable!("active path reached a free slot"),
            }
        }
    }

    // ========================================================================
    // RESULT COLLECTION
    // ========================================================================

    /// Append every record identifier in the subtree rooted at `start` to
    /// `out`, in ascending full-key order. In-order over an explicit stack:
    /// decision nodes descend left with the right side pending, terminals
    /// emit their record before any longer keys continuing past them, and
    /// duplicate tries emit before the outer continuation.
    pub(crate) fn collect(&self, start: NodeId, out: &mut Vec<RecordId>) {
        let mut pending: Vec<NodeId> = Vec::new();
        let mut cur = start;
        loop {
            match self.node(cur) {
                Node::Decision { left, right, .. } => {
                    pending.push(right);
                    cur = left;
                }
                Node::Chain { next, .. } => cur = next,
                Node::Leaf { record, .. } => {
                    out.push(record);
                    match pending.pop() {
                        Some(slot) => cur = slot,
                        None => return,
                    }
                }
                Node::Branch { record, next, .. } => {
                    out.push(record);
                    cur = next;
                }
                Node::DupLeaf { dups, .. } => cur = dups,
                Node::DupBranch { dups, next, .. } => {
                    pending.push(next);
                    cur = dups;
                }
                Node::Free { .. } => unreachable!("active path reached a free slot"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Index;

    #[test]
    fn empty_index_finds_nothing() {
        let index = Index::new();
        assert_eq!(index.search("a", true), None);
        assert_eq!(index.search("a", false), None);
        assert_eq!(index.search("", false), None);
    }

    #[test]
    fn empty_key_precise_finds_nothing() {
        let mut index = Index::new();
        index.insert("a", 1);
        assert_eq!(index.search("", true), None);
        assert_eq!(index.search("   ", true), None);
    }

    #[test]
    fn empty_key_prefix_scans_everything_ascending() {
        let mut index = Index::new();
        index.insert("b", 1);
        index.insert("a", 2);
        index.insert("c", 3);
        assert_eq!(index.search("", false), Some(vec![2, 1, 3]));
    }

    #[test]
    fn single_key_precise_and_prefix() {
        let mut index = Index::new();
        index.insert("door", 9);
        assert_eq!(index.search("door", true), Some(vec![9]));
        assert_eq!(index.search("do", false), Some(vec![9]));
        assert_eq!(index.search("do", true), None);
        assert_eq!(index.search("doors", true), None);
        assert_eq!(index.search("doors", false), None);
        assert_eq!(index.search("dx", false), None);
    }

    #[test]
    fn prefix_at_branch_includes_the_branch_record() {
        let mut index = Index::new();
        index.insert("car", 2);
        index.insert("cart", 3);
        // "car" is a stored key and a prefix of "cart".
        assert_eq!(index.search("car", true), Some(vec![2]));
        assert_eq!(index.search("car", false), Some(vec![2, 3]));
    }

    #[test]
    fn mismatch_inside_decision_subtree() {
        let mut index = Index::new();
        index.insert("cat", 1);
        index.insert("cot", 2);
        index.insert("cut", 3);
        assert_eq!(index.search("cat", true), Some(vec![1]));
        assert_eq!(index.search("cot", true), Some(vec![2]));
        assert_eq!(index.search("cut", true), Some(vec![3]));
        assert_eq!(index.search("cit", true), None);
        assert_eq!(index.search("c", false), Some(vec![1, 2, 3]));
    }

    #[test]
    fn duplicate_key_returns_all_records_in_digit_order() {
        let mut index = Index::new();
        index.insert("k", 2);
        index.insert("k", 10);
        index.insert("k", 3);
        // Digit-string lexical order: "10" < "2" < "3".
        assert_eq!(index.search("k", true), Some(vec![10, 2, 3]));
    }

    #[test]
    fn search_canonicalizes_its_input() {
        let mut index = Index::new();
        index.insert("cat", 1);
        assert_eq!(index.search("  cat  ", true), Some(vec![1]));
    }
}
