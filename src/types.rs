//! Core types and data structures for the trie index.
//!
//! This module contains the node representation, the index structure itself,
//! and the statistics record returned by structural scans.

// ============================================================================
// CONSTANTS AND TYPE DEFINITIONS
// ============================================================================

/// Slot ID type for arena-based allocation.
pub type NodeId = u32;

/// Sentinel meaning "no slot": an empty root, an empty free list, or the
/// absent continuation of a chain terminal.
pub const NULL_NODE: NodeId = u32::MAX;

/// Caller-supplied integer payload associated with a text key.
pub type RecordId = u64;

/// Keys are trimmed of surrounding whitespace and truncated to this many
/// bytes before any lookup or mutation.
pub const MAX_KEY_LENGTH: usize = 32;

// ============================================================================
// NODE REPRESENTATION
// ============================================================================

/// One arena slot.
///
/// The closed set of node kinds, matched exhaustively by every traversal,
/// insert, and delete routine. `Decision` is the only structural kind: it
/// matches no key character itself and implements an unbalanced binary
/// search over the distinct sibling characters present at one trie depth.
/// All other active kinds consume exactly one key character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Node {
    /// Binary fork: `left` holds every key whose character here is `<= pivot`,
    /// `right` everything greater.
    Decision { pivot: u8, left: NodeId, right: NodeId },
    /// Interior character of a key chain; never terminates a key.
    Chain { ch: u8, next: NodeId },
    /// Terminal character of a key carrying exactly one record.
    Leaf { ch: u8, record: RecordId },
    /// Terminal character that longer keys continue past via `next`.
    Branch { ch: u8, record: RecordId, next: NodeId },
    /// Terminal whose records live in a nested digit trie rooted at `dups`.
    DupLeaf { ch: u8, dups: NodeId },
    /// Duplicate terminal that longer keys continue past via `next`.
    DupBranch { ch: u8, dups: NodeId, next: NodeId },
    /// Recycled slot; `next` threads the free list.
    Free { next: NodeId },
}

impl Node {
    /// The key character this node matches. Decision nodes report their
    /// pivot character.
    pub(crate) fn ch(&self) -> u8 {
        match *self {
            Node::Decision { pivot, .. } => pivot,
            Node::Chain { ch, .. }
            | Node::Leaf { ch, .. }
            | Node::Branch { ch, .. }
            | Node::DupLeaf { ch, .. }
            | Node::DupBranch { ch, .. } => ch,
            Node::Free { .. } => unreachable!("free slot has no character"),
        }
    }
}

/// Which outgoing edge of a node a traversal followed. Recorded alongside
/// the slot so mutations can relink the parent without back pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    /// `Decision::left`.
    Left,
    /// `Decision::right`.
    Right,
    /// The continuation of a `Chain`, `Branch`, or `DupBranch`.
    Next,
    /// The digit-trie root of a `DupLeaf` or `DupBranch`.
    Dups,
}

// ============================================================================
// INDEX STRUCTURE
// ============================================================================

/// An in-memory index mapping text keys to integer record identifiers.
///
/// The index is a compact trie: every node lives in one flat arena and is
/// addressed by integer position, so there are no heap object graphs and no
/// ownership cycles. Freed slots are recycled LIFO through an intrusive free
/// list; positions are never renumbered, so previously observed positions
/// stay meaningful until explicitly freed.
///
/// The engine assumes single-writer, externally serialized access. It never
/// raises errors for expected edge cases: empty keys, repeated inserts of
/// the same pair, and deletes of absent pairs are silent no-ops.
///
/// # Examples
///
/// ```
/// use triedex::Index;
///
/// let mut index = Index::new();
/// index.insert("cat", 1);
/// index.insert("car", 2);
/// index.insert("cart", 3);
///
/// // Precise search requires an exact key match.
/// assert_eq!(index.search("cat", true), Some(vec![1]));
/// assert_eq!(index.search("ca", true), None);
///
/// // Prefix search returns everything below the prefix in ascending
/// // key order: car, cart, cat.
/// assert_eq!(index.search("ca", false), Some(vec![2, 3, 1]));
///
/// index.remove("cat", 1);
/// assert_eq!(index.search("cat", true), None);
/// ```
#[derive(Debug, Clone)]
pub struct Index {
    /// Root of the active tree, or `NULL_NODE` when the index holds no keys.
    pub(crate) root: NodeId,
    /// Head of the free list, or `NULL_NODE` when no slot is recycled.
    pub(crate) free_head: NodeId,
    /// Flat arena of node slots. Every slot is reachable either from `root`
    /// or from `free_head`, never both.
    pub(crate) nodes: Vec<Node>,
}

impl Index {
    /// Create an empty index.
    pub fn new() -> Self {
        Index {
            root: NULL_NODE,
            free_head: NULL_NODE,
            nodes: Vec::new(),
        }
    }

    /// Reset the index to empty, releasing the arena's backing storage.
    pub fn clear(&mut self) {
        self.root = NULL_NODE;
        self.free_head = NULL_NODE;
        self.nodes.clear();
    }

    /// Returns true if the index contains no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use triedex::Index;
    ///
    /// let mut index = Index::new();
    /// assert!(index.is_empty());
    /// index.insert("key", 7);
    /// assert!(!index.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.root == NULL_NODE
    }

    /// Check whether a key is stored exactly.
    ///
    /// # Examples
    ///
    /// ```
    /// use triedex::Index;
    ///
    /// let mut index = Index::new();
    /// index.insert("cart", 3);
    /// assert!(index.contains_key("cart"));
    /// assert!(!index.contains_key("ca"));
    /// ```
    pub fn contains_key(&self, key: &str) -> bool {
        self.search(key, true).is_some()
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// STATISTICS
// ============================================================================

/// Results of a full structural scan of an [`Index`].
///
/// Produced by [`Index::stats`]. `active` counts every node reachable from
/// the root (duplicate tries included); `free` walks the free list; the two
/// together always equal `total_slots`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Nodes reachable from the active root.
    pub active: usize,
    /// Slots on the free list.
    pub free: usize,
    /// Total arena slots ever allocated (`active + free`).
    pub total_slots: usize,
    /// Deepest root-to-leaf path, in nodes.
    pub depth: usize,
    /// Decision forks.
    pub decisions: usize,
    /// Interior chain characters.
    pub chains: usize,
    /// Single-record terminals.
    pub leaves: usize,
    /// Single-record terminals with a continuation.
    pub branches: usize,
    /// Duplicate terminals.
    pub dup_leaves: usize,
    /// Duplicate terminals with a continuation.
    pub dup_branches: usize,
}
