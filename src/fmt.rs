//! Formatting implementation for the PrefixTrie

use std::fmt::{Debug, Formatter, Result};

use crate::{Ipv4Prefix, PrefixTrie};

/// Render the structure of the trie. Each node is printed as the path it represents, followed by
/// the mask length if it terminates a prefix, and its children.
impl Debug for PrefixTrie {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugNode(self, 0, 0, 0).fmt(f)
    }
}

/// A node of the trie, together with the path and depth of its parent.
struct DebugNode<'a>(&'a PrefixTrie, usize, u32, u8);

impl Debug for DebugNode<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let DebugNode(trie, idx, path, depth) = *self;
        let node = &trie.table[idx];
        let path = path | node.aligned(depth);
        let depth = depth + node.skip;
        let key = Ipv4Prefix::truncating(path, depth);
        let child = |idx: usize| DebugNode(trie, idx, path, depth);
        match (node.prefix_len, node.left, node.right) {
            (None, None, None) => key.fmt(f),
            (None, None, Some(c)) | (None, Some(c), None) => {
                f.debug_map().entry(&key, &child(c)).finish()
            }
            (None, Some(l), Some(r)) => f.debug_map().entry(&key, &(child(l), child(r))).finish(),
            (Some(len), None, None) => f.debug_map().entry(&key, &len).finish(),
            (Some(len), None, Some(c)) | (Some(len), Some(c), None) => {
                f.debug_map().entry(&key, &(len, child(c))).finish()
            }
            (Some(len), Some(l), Some(r)) => f
                .debug_map()
                .entry(&key, &(len, child(l), child(r)))
                .finish(),
        }
    }
}
