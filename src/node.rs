//! The node of the compressed binary trie.

use crate::bits::{extract_bits, match_length};

/// A node of the trie, stored in the arena of a [`crate::PrefixTrie`].
///
/// The node owns its two children through their indices; every node except the root is
/// referenced by exactly one parent. The `segment` holds the `skip` bits of the path between the
/// parent and this node, right-justified. The first of these bits decides whether the node is the
/// left (0) or right (1) child of its parent.
#[derive(Clone, Default)]
pub(crate) struct Node {
    pub(crate) segment: u32,
    pub(crate) skip: u8,
    /// Mask length of the prefix that terminates at this node. It always equals the depth of the
    /// node.
    pub(crate) prefix_len: Option<u8>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl Node {
    /// Create a node without any children.
    pub(crate) fn new(segment: u32, skip: u8, prefix_len: Option<u8>) -> Self {
        Self {
            segment,
            skip,
            prefix_len,
            left: None,
            right: None,
        }
    }

    /// Create a node for the `len` bits of `addr` that start at `depth`.
    pub(crate) fn from_addr(addr: u32, depth: u8, len: u8, prefix_len: Option<u8>) -> Self {
        Self::new(extract_bits(addr, depth, len), len, prefix_len)
    }

    /// The segment, placed at the position in the address where it starts, i.e., at the depth of
    /// the parent.
    #[inline(always)]
    pub(crate) fn aligned(&self, depth: u8) -> u32 {
        if self.skip == 0 {
            return 0;
        }
        (self.segment << (32 - self.skip as u32))
            .checked_shr(depth as u32)
            .unwrap_or(0)
    }

    /// Number of leading bits of the segment that match `addr`, where the parent of this node is
    /// at depth `depth`.
    #[inline(always)]
    pub(crate) fn matched(&self, addr: u32, depth: u8) -> u8 {
        match_length(self.aligned(depth), addr, depth, self.skip)
    }

    /// Check if the node terminates a prefix.
    #[inline(always)]
    pub(crate) fn is_prefix(&self) -> bool {
        self.prefix_len.is_some()
    }

    /// Get the child in the given direction.
    #[inline(always)]
    pub(crate) fn child(&self, right: bool) -> Option<usize> {
        if right {
            self.right
        } else {
            self.left
        }
    }

    /// Drop the first `at` bits of the segment, keeping only the suffix.
    pub(crate) fn split_off(&mut self, at: u8) {
        let rest = self.skip - at;
        self.segment = extract_bits(self.segment, 32 - rest, rest);
        self.skip = rest;
    }

    /// Put the segment of the (removed) parent in front of the own segment.
    pub(crate) fn prepend(&mut self, segment: u32, skip: u8) {
        self.segment |= segment.checked_shl(self.skip as u32).unwrap_or(0);
        self.skip += skip;
    }
}
