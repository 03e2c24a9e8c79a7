//! This crate provides a lookup table for IPv4 prefixes. Prefixes (a base address and a mask
//! length) can be added and removed, and any address can be checked against the table, returning
//! the mask length of the most specific prefix that contains it (longest-prefix match). This is
//! the operation at the heart of routing tables, firewalls, and policy-based forwarding.
//!
//! ```
//! # use prefix_mgmt::*;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut table = PrefixMgmt::new();
//! table.init()?;
//! table.add(0x0a000000, 8)?; // 10.0.0.0/8
//! table.add(0x0a140000, 16)?; // 10.20.0.0/16
//! assert_eq!(table.check(0x0a141e28), Some(16)); // 10.20.30.40
//! assert_eq!(table.check(0x0a0a0000), Some(8)); // 10.10.0.0
//! assert_eq!(table.check(0x0b000000), None); // 11.0.0.0
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tree
//!
//! The table is a path-compressed binary trie (a radix, or Patricia, trie). Each node stores a
//! *segment*: the bits of the path between its parent and itself. A run of trie levels without
//! any branching is therefore stored in a single node. Each node has two optional children. To
//! descend into the tree, we look at the first bit of the address that was not yet consumed. If it
//! is not set, we take the left branch, and otherwise, we take the right one. A node may
//! terminate a prefix, in which case the mask length of that prefix equals the number of bits
//! consumed to reach the node.
//!
//! The root represents the empty path, and holds the default route `0.0.0.0/0` if present.
//! Apart from the root, every node either terminates a prefix, or has two children. Nodes that
//! lose this property during a removal are merged with their only child, or released. The shape
//! of the tree therefore only depends on the prefixes it contains, and never on the order of
//! insertions and removals.
//!
//! # Operations on the tree
//!
//! The following are the computational complexities of the functions, where `n` is the number of
//! prefixes in the tree. The depth of the tree is bounded by 32.
//!
//! | Operation                          | Complexity |
//! |------------------------------------|------------|
//! | `insert`, `remove`, `contains`     | `O(log n)` |
//! | `lookup`, `lookup_prefix`          | `O(log n)` |
//! | `iter`                             | `O(n)`     |
//! | `clear`, `cleanup`                 | `O(n)`     |
//! | `len` and `is_empty`               | `O(1)`     |
//!
//! [`PrefixTrie`] is the table itself. [`PrefixMgmt`] wraps it with an explicit lifecycle
//! (`init` and `cleanup`) and a command surface that takes raw base addresses and mask lengths.
//!
//! # Features
//!
//! - `ipnet` (default): conversions between [`Ipv4Prefix`] and `ipnet::Ipv4Net`.
//! - `serde`: serialize prefixes as strings, and the trie as a sequence of prefixes.
//! - `tracing`: emit events on structural changes of the tree and on lifecycle transitions.

#![deny(missing_docs)]

pub mod bits;
mod error;
mod fmt;
mod mgmt;
mod node;
mod prefix;
#[cfg(feature = "serde")]
mod serde;
pub mod trie;

#[cfg(test)]
mod fuzzing;

pub use error::Error;
pub use mgmt::PrefixMgmt;
pub use prefix::Ipv4Prefix;
pub use trie::PrefixTrie;
