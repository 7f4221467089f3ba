//! Insert operations for the trie index.
//!
//! Insertion traverses like a precise search until no further progress is
//! possible, then repairs the structure at that point: promoting an interior
//! chain character into a terminal, growing a continuation past an existing
//! terminal, converting a terminal into a duplicate node with a nested digit
//! trie, or splitting a chain with a new decision fork where keys diverge.
//! All new runs of nodes come from [`extend`](Index::extend), the only place
//! slots are minted.

use crate::key::{canonical, DigitKey, KeyBuf};
use crate::types::{Edge, Index, Node, NodeId, RecordId, NULL_NODE};

impl Index {
    // ========================================================================
    // PUBLIC INSERT
    // ========================================================================

    /// Insert a `(key, record)` pair.
    ///
    /// An empty canonical key is a no-op, as is re-inserting a pair that is
    /// already present. One key may hold any number of distinct records:
    /// the second record converts the terminal into a duplicate node whose
    /// records live in a nested trie keyed on their decimal digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use triedex::Index;
    ///
    /// let mut index = Index::new();
    /// index.insert("lamp", 4);
    /// index.insert("lamp", 4); // idempotent
    /// index.insert("lamp", 9); // duplicate record under one key
    /// assert_eq!(index.search("lamp", true), Some(vec![4, 9]));
    /// ```
    pub fn insert(&mut self, key: &str, record: RecordId) {
        let key = canonical(key);
        if key.is_empty() {
            return;
        }
        if self.root == NULL_NODE {
            self.root = self.extend(key, record, NULL_NODE);
            return;
        }

        let mut kb = KeyBuf::from_canonical(key);
        let mut cur = self.root;
        let mut parent = NULL_NODE;
        let mut edge = Edge::Next;
        let mut i = 0;

        // Walk until the key is placed or the divergence point is found.
        loop {
            match self.node(cur) {
                Node::Decision { pivot, left, right } => {
                    parent = cur;
                    if kb.byte(i) <= pivot {
                        edge = Edge::Left;
                        cur = left;
                    } else {
                        edge = Edge::Right;
                        cur = right;
                    }
                }
                Node::Chain { ch, next } => {
                    if kb.byte(i) != ch {
                        break;
                    }
                    if i + 1 == kb.len() {
                        // Key ends on an interior character: the chain node
                        // becomes a terminal that the longer keys continue
                        // past.
                        *self.node_mut(cur) = Node::Branch { ch, record, next };
                        return;
                    }
                    parent = cur;
                    edge = Edge::Next;
                    cur = next;
                    i += 1;
                }
                Node::Leaf { ch, record: existing } => {
                    if kb.byte(i) != ch {
                        break;
                    }
                    if i + 1 == kb.len() {
                        if existing == record {
                            return;
                        }
                        // Exact-key coincidence: seed a digit trie with the
                        // resident record, then place the new record in it.
                        let dups = self.seed_duplicates(existing);
                        *self.node_mut(cur) = Node::DupLeaf { ch, dups };
                        parent = cur;
                        edge = Edge::Dups;
                        cur = dups;
                        kb.load_digits(record);
                        i = 0;
                    } else {
                        // Key continues past this terminal.
                        let next = self.extend(&kb.as_bytes()[i + 1..], record, NULL_NODE);
                        *self.node_mut(cur) = Node::Branch { ch, record: existing, next };
                        return;
                    }
                }
                Node::Branch { ch, record: existing, next } => {
                    if kb.byte(i) != ch {
                        break;
                    }
                    if i + 1 == kb.len() {
                        if existing == record {
                            return;
                        }
                        let dups = self.seed_duplicates(existing);
                        *self.node_mut(cur) = Node::DupBranch { ch, dups, next };
                        parent = cur;
                        edge = Edge::Dups;
                        cur = dups;
                        kb.load_digits(record);
                        i = 0;
                    } else {
                        parent = cur;
                        edge = Edge::Next;
                        cur = next;
                        i += 1;
                    }
                }
                Node::DupLeaf { ch, dups } => {
                    if kb.byte(i) != ch {
                        break;
                    }
                    if i + 1 == kb.len() {
                        parent = cur;
                        edge = Edge::Dups;
                        cur = dups;
                        kb.load_digits(record);
                        i = 0;
                    } else {
                        let next = self.extend(&kb.as_bytes()[i + 1..], record, NULL_NODE);
                        *self.node_mut(cur) = Node::DupBranch { ch, dups, next };
                        return;
                    }
                }
                Node::DupBranch { ch, dups, next } => {
                    if kb.byte(i) != ch {
                        break;
                    }
                    if i + 1 == kb.len() {
                        parent = cur;
                        edge = Edge::Dups;
                        cur = dups;
                        kb.load_digits(record);
                        i = 0;
                    } else {
                        parent = cur;
                        edge = Edge::Next;
                        cur = next;
                        i += 1;
                    }
                }
                Node::Free { .. } => unreachable!("active path reached a free slot"),
            }
        }

        // Divergence: the unconsumed byte differs from the character at
        // `cur`. Split with a decision fork, existing subtree on the side
        // chosen by byte comparison, a fresh chain for the remaining suffix
        // on the other, and relink the parent.
        let new_byte = kb.byte(i);
        let existing_ch = self.node(cur).ch();
        let chain = self.extend(&kb.as_bytes()[i..], record, NULL_NODE);
        let fork = if new_byte < existing_ch {
            self.alloc(Node::Decision { pivot: new_byte, left: chain, right: cur })
        } else {
            self.alloc(Node::Decision { pivot: existing_ch, left: cur, right: chain })
        };
        self.set_edge(parent, edge, fork);
    }

    // ========================================================================
    // CHAIN CONSTRUCTION
    // ========================================================================

    /// Allocate a run of nodes for `suffix`, built last character first.
    /// The final character becomes a `Leaf` carrying `record`, or a `Branch`
    /// when a `continuation` subtree is supplied; every earlier character
    /// becomes a `Chain` node pointing at the one built before it. Returns
    /// the run's head slot.
    pub(crate) fn extend(&mut self, suffix: &[u8], record: RecordId, continuation: NodeId) -> NodeId {
        debug_assert!(!suffix.is_empty());
        let last = suffix[suffix.len() - 1];
        let mut head = if continuation == NULL_NODE {
            self.alloc(Node::Leaf { ch: last, record })
        } else {
            self.alloc(Node::Branch { ch: last, record, next: continuation })
        };
        for &ch in suffix[..suffix.len() - 1].iter().rev() {
            head = self.alloc(Node::Chain { ch, next: head });
        }
        head
    }

    /// Build the one-entry digit trie that starts a duplicate group: the
    /// resident record re-keyed as its decimal digit string.
    fn seed_duplicates(&mut self, existing: RecordId) -> NodeId {
        let digits = DigitKey::new(existing);
        self.extend(digits.as_bytes(), existing, NULL_NODE)
    }
}
