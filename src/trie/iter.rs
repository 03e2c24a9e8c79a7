//! Module that contains the implementation for the iterators

use crate::{Ipv4Prefix, PrefixTrie};

/// An iterator over all prefixes of a [`PrefixTrie`] in lexicographic order.
///
/// The trie is traversed in pre-order, visiting the left child before the right one. The full
/// prefix of each node is rebuilt from the segments along the way.
#[derive(Clone)]
pub struct Iter<'a> {
    pub(crate) trie: &'a PrefixTrie,
    /// Nodes still to visit, together with the path and depth of their parent.
    pub(crate) nodes: Vec<(usize, u32, u8)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Ipv4Prefix;

    fn next(&mut self) -> Option<Ipv4Prefix> {
        while let Some((cur, path, depth)) = self.nodes.pop() {
            let node = &self.trie.table[cur];
            let path = path | node.aligned(depth);
            let depth = depth + node.skip;
            if let Some(right) = node.right {
                self.nodes.push((right, path, depth));
            }
            if let Some(left) = node.left {
                self.nodes.push((left, path, depth));
            }
            if node.is_prefix() {
                return Some(Ipv4Prefix::truncating(path, depth));
            }
        }
        None
    }
}

impl PrefixTrie {
    /// An iterator visiting all prefixes in lexicographic order.
    ///
    /// ```
    /// # use prefix_mgmt::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = PrefixTrie::new();
    /// trie.insert("192.168.2.0/24".parse()?)?;
    /// trie.insert("192.168.0.0/16".parse()?)?;
    /// trie.insert("10.0.0.0/8".parse()?)?;
    /// assert_eq!(
    ///     trie.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
    ///     vec!["10.0.0.0/8", "192.168.0.0/16", "192.168.2.0/24"]
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            trie: self,
            nodes: vec![(0, 0, 0)],
        }
    }
}

impl<'a> IntoIterator for &'a PrefixTrie {
    type Item = Ipv4Prefix;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
