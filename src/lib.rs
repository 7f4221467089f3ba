//! Arena-based compact trie mapping text keys to record identifiers.
//!
//! `triedex` provides an in-memory index over variable-length text keys with
//! exact and prefix lookup, insertion, deletion, and structural diagnostics.
//! Instead of one child slot per possible character, each trie level embeds
//! a small binary search tree ("decision" nodes) over the sibling characters
//! actually present, giving ternary-search-trie space efficiency. All nodes
//! live in one flat arena addressed by integer position; deleted slots are
//! recycled through a LIFO free list, so deletion is proportional to the
//! path length and positions are never renumbered.
//!
//! One key can map to many record identifiers: duplicates are kept in a
//! nested trie keyed on each identifier's decimal digits, which reuses the
//! whole traversal machinery and orders duplicates by digit-string text.
//!
//! The index assumes single-writer, externally serialized access and treats
//! all expected edge cases (empty keys, repeated inserts, deletes of absent
//! pairs) as silent no-ops.
//!
//! # Example
//!
//! ```
//! use triedex::Index;
//!
//! let mut index = Index::new();
//! index.insert("cat", 1);
//! index.insert("car", 2);
//! index.insert("cart", 3);
//!
//! // Exact lookup.
//! assert_eq!(index.search("car", true), Some(vec![2]));
//!
//! // Prefix lookup, ascending key order: car, cart, cat.
//! assert_eq!(index.search("ca", false), Some(vec![2, 3, 1]));
//!
//! // Structural diagnostics.
//! let stats = index.stats();
//! assert_eq!(stats.active + stats.free, stats.total_slots);
//! ```

mod arena;
mod delete;
mod insert;
mod key;
mod search;
mod statistics;
mod types;

pub use types::{Index, IndexStats, NodeId, RecordId, MAX_KEY_LENGTH, NULL_NODE};
