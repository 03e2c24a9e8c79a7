//! Implementation of the path-compressed prefix trie.

use crate::{bits::bit_at, node::Node, Error, Ipv4Prefix};

mod iter;

pub use iter::*;

/// Prefix table implemented as a path-compressed binary trie.
///
/// All nodes are stored in an arena; children are referenced by their index into it. The root
/// always lives at index 0 and represents the empty path. It can hold the default route `/0`.
/// Slots released by [`PrefixTrie::remove`] are kept in a free list and reused by later inserts.
#[derive(Clone)]
pub struct PrefixTrie {
    pub(crate) table: Vec<Node>,
    free: Vec<usize>,
    count: usize,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self {
            table: vec![Node::default()],
            free: Vec::new(),
            count: 0,
        }
    }
}

impl PrefixTrie {
    /// Create an empty prefix trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty prefix trie, reporting a failed allocation of the root node instead of
    /// aborting.
    pub fn try_new() -> Result<Self, Error> {
        let mut table = Vec::new();
        table
            .try_reserve_exact(1)
            .map_err(|_| Error::AllocationFailure)?;
        table.push(Node::default());
        Ok(Self {
            table,
            free: Vec::new(),
            count: 0,
        })
    }

    /// Insert a prefix. Returns `true` if the prefix was not present before. Inserting a prefix
    /// twice does not change the trie.
    ///
    /// If the nodes required by the insertion cannot be allocated, the trie is left untouched and
    /// [`Error::AllocationFailure`] is returned.
    ///
    /// ```
    /// # use prefix_mgmt::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = PrefixTrie::new();
    /// assert_eq!(trie.insert("10.0.0.0/8".parse()?), Ok(true));
    /// assert_eq!(trie.insert("10.0.0.0/8".parse()?), Ok(false));
    /// assert_eq!(trie.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(&mut self, prefix: Ipv4Prefix) -> Result<bool, Error> {
        let (base, len) = (prefix.base(), prefix.prefix_len());
        if len == 0 {
            return Ok(self.mark(0, 0));
        }
        // a split creates at most two nodes.
        self.reserve(2)?;

        let mut idx = 0;
        let mut depth = 0;
        loop {
            match self.get_direction_for_insert(idx, depth, base, len) {
                DirectionForInsert::Enter { next } => {
                    depth += self.table[next].skip;
                    idx = next;
                    #[cfg(feature = "tracing")]
                    tracing::trace!(%prefix, node = idx, depth, "insert: descend");
                }
                DirectionForInsert::Reached { node } => return Ok(self.mark(node, len)),
                DirectionForInsert::NewLeaf { right } => {
                    let leaf = self.new_node(Node::from_addr(base, depth, len - depth, Some(len)));
                    self.set_child(idx, leaf, right);
                    self.count += 1;
                    #[cfg(feature = "tracing")]
                    tracing::trace!(%prefix, depth, "insert: new leaf");
                    return Ok(true);
                }
                DirectionForInsert::Split {
                    right,
                    child,
                    matched,
                } => {
                    let split_depth = depth + matched;
                    let child_right = bit_at(self.table[child].aligned(depth), split_depth);
                    let branch = self.new_node(Node::from_addr(base, depth, matched, None));
                    self.table[child].split_off(matched);
                    self.set_child(branch, child, child_right);
                    if split_depth == len {
                        self.table[branch].prefix_len = Some(len);
                    } else {
                        let leaf = self.new_node(Node::from_addr(
                            base,
                            split_depth,
                            len - split_depth,
                            Some(len),
                        ));
                        self.set_child(branch, leaf, bit_at(base, split_depth));
                    }
                    self.set_child(idx, branch, right);
                    self.count += 1;
                    #[cfg(feature = "tracing")]
                    tracing::trace!(%prefix, depth, split_depth, "insert: split segment");
                    return Ok(true);
                }
            }
        }
    }

    /// Remove a prefix. Returns `true` if the prefix was present. Removing a prefix that is not
    /// present does not change the trie.
    ///
    /// Nodes that become redundant are removed: a node that neither terminates a prefix nor
    /// branches is either released (if it has no children) or merged with its only child. The
    /// resulting trie is identical to one in which the prefix was never inserted.
    ///
    /// ```
    /// # use prefix_mgmt::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = PrefixTrie::new();
    /// trie.insert("192.168.0.0/16".parse()?)?;
    /// trie.insert("192.168.1.0/24".parse()?)?;
    /// assert!(trie.remove(&"192.168.1.0/24".parse()?));
    /// assert!(!trie.remove(&"192.168.1.0/24".parse()?));
    /// assert_eq!(trie.lookup(0xc0a80101), Some(16));
    /// # Ok(())
    /// # }
    /// ```
    pub fn remove(&mut self, prefix: &Ipv4Prefix) -> bool {
        let (base, len) = (prefix.base(), prefix.prefix_len());
        let mut idx = 0;
        let mut depth = 0;
        let mut path = Vec::new();
        loop {
            match self.get_direction(idx, depth, base, len) {
                Direction::Reached => break,
                Direction::Enter { next, right } => {
                    path.push((idx, right));
                    depth += self.table[next].skip;
                    idx = next;
                    #[cfg(feature = "tracing")]
                    tracing::trace!(%prefix, node = idx, depth, "remove: descend");
                }
                Direction::Missing => return false,
            }
        }
        if self.table[idx].prefix_len.take().is_none() {
            return false;
        }
        self.count -= 1;
        self.collapse(idx, path);
        true
    }

    /// Longest-prefix match: get the mask length of the most specific prefix that contains `ip`.
    ///
    /// ```
    /// # use prefix_mgmt::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let trie: PrefixTrie = ["10.0.0.0/8", "10.20.0.0/16", "10.20.30.0/24"]
    ///     .into_iter()
    ///     .map(str::parse::<Ipv4Prefix>)
    ///     .collect::<Result<_, _>>()?;
    /// assert_eq!(trie.lookup(0x0a141e28), Some(24)); // 10.20.30.40
    /// assert_eq!(trie.lookup(0x0a140001), Some(16)); // 10.20.0.1
    /// assert_eq!(trie.lookup(0x0a0a0000), Some(8)); // 10.10.0.0
    /// assert_eq!(trie.lookup(0x0b000000), None); // 11.0.0.0
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup(&self, ip: u32) -> Option<u8> {
        let mut idx = 0;
        let mut depth = 0;
        let mut best = None;
        loop {
            // deeper nodes are always more specific.
            if let Some(len) = self.table[idx].prefix_len {
                best = Some(len);
            }
            match self.get_direction(idx, depth, ip, Ipv4Prefix::MAX_LEN) {
                Direction::Enter { next, .. } => {
                    depth += self.table[next].skip;
                    idx = next;
                    #[cfg(feature = "tracing")]
                    tracing::trace!(ip = %std::net::Ipv4Addr::from(ip), node = idx, depth, "lookup: descend");
                }
                Direction::Reached | Direction::Missing => return best,
            }
        }
    }

    /// Longest-prefix match: get the most specific prefix that contains `ip`.
    ///
    /// ```
    /// # use prefix_mgmt::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = PrefixTrie::new();
    /// trie.insert("172.16.0.0/12".parse()?)?;
    /// assert_eq!(trie.lookup_prefix(0xac1f0102), Some("172.16.0.0/12".parse()?));
    /// assert_eq!(trie.lookup_prefix(0xac200000), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup_prefix(&self, ip: u32) -> Option<Ipv4Prefix> {
        self.lookup(ip).map(|len| Ipv4Prefix::truncating(ip, len))
    }

    /// Check if the trie contains exactly the given prefix.
    pub fn contains(&self, prefix: &Ipv4Prefix) -> bool {
        let (base, len) = (prefix.base(), prefix.prefix_len());
        let mut idx = 0;
        let mut depth = 0;
        loop {
            match self.get_direction(idx, depth, base, len) {
                Direction::Reached => return self.table[idx].is_prefix(),
                Direction::Enter { next, .. } => {
                    depth += self.table[next].skip;
                    idx = next;
                }
                Direction::Missing => return false,
            }
        }
    }

    /// Number of prefixes stored in the trie.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if the trie contains no prefix.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of nodes currently in the trie, including the root. As the trie never keeps nodes
    /// that neither terminate a prefix nor branch, this is at most `2 * self.len() + 1`.
    pub fn node_count(&self) -> usize {
        self.table.len() - self.free.len()
    }

    /// Remove all prefixes and release all nodes except the root.
    pub fn clear(&mut self) {
        self.table.truncate(1);
        self.table[0] = Node::default();
        self.free.clear();
        self.count = 0;
    }

    /// Walk back up along `path` (the parents of `idx` and the direction taken at each of them),
    /// and remove every node that neither terminates a prefix nor branches. The walk stops at the
    /// first node that must stay, or at the root.
    fn collapse(&mut self, mut idx: usize, mut path: Vec<(usize, bool)>) {
        while let Some((parent, right)) = path.pop() {
            let node = &self.table[idx];
            if node.is_prefix() {
                break;
            }
            match (node.left, node.right) {
                (Some(_), Some(_)) => break,
                (None, None) => {
                    // nothing hangs below. Detach it, and check the parent next.
                    self.clear_child(parent, right);
                    self.free_node(idx);
                    #[cfg(feature = "tracing")]
                    tracing::trace!(node = idx, parent, "remove: detach leaf");
                    idx = parent;
                }
                (Some(child), None) | (None, Some(child)) => {
                    // the parent keeps the same number of children, so the walk ends here.
                    let (segment, skip) = (node.segment, node.skip);
                    self.table[child].prepend(segment, skip);
                    self.set_child(parent, child, right);
                    self.free_node(idx);
                    #[cfg(feature = "tracing")]
                    tracing::trace!(node = idx, child, parent, "remove: merge with child");
                    break;
                }
            }
        }
    }

    /// Mark the node as prefix. Returns `true` if it was not marked before.
    fn mark(&mut self, idx: usize, len: u8) -> bool {
        let node = &mut self.table[idx];
        if node.is_prefix() {
            false
        } else {
            node.prefix_len = Some(len);
            self.count += 1;
            true
        }
    }

    /// Make sure that `n` new nodes can be created without allocating.
    fn reserve(&mut self, n: usize) -> Result<(), Error> {
        let missing = n.saturating_sub(self.free.len());
        self.table
            .try_reserve(missing)
            .map_err(|_| Error::AllocationFailure)
    }

    /// Get the child of a node, either to the left or the right
    #[inline(always)]
    fn get_child(&self, idx: usize, right: bool) -> Option<usize> {
        self.table[idx].child(right)
    }

    /// set the child of a node (either to the left or the right), and return the index of the old child.
    #[inline(always)]
    fn set_child(&mut self, idx: usize, child: usize, right: bool) -> Option<usize> {
        if right {
            self.table[idx].right.replace(child)
        } else {
            self.table[idx].left.replace(child)
        }
    }

    /// remove a child from a node (just the reference).
    #[inline(always)]
    fn clear_child(&mut self, idx: usize, right: bool) -> Option<usize> {
        if right {
            self.table[idx].right.take()
        } else {
            self.table[idx].left.take()
        }
    }

    /// insert a new node into the table and return its index.
    #[inline(always)]
    fn new_node(&mut self, node: Node) -> usize {
        if let Some(idx) = self.free.pop() {
            self.table[idx] = node;
            idx
        } else {
            let idx = self.table.len();
            self.table.push(node);
            idx
        }
    }

    /// release a node that is no longer referenced.
    #[inline(always)]
    fn free_node(&mut self, idx: usize) {
        self.table[idx] = Node::default();
        self.free.push(idx);
    }

    /// Get the directions from node `cur` at depth `depth` to the node at depth `len` on the
    /// path of `addr`. Every segment on the way must match completely.
    #[inline(always)]
    fn get_direction(&self, cur: usize, depth: u8, addr: u32, len: u8) -> Direction {
        if depth >= len {
            return Direction::Reached;
        }
        let right = bit_at(addr, depth);
        match self.get_child(cur, right) {
            Some(child) => {
                let node = &self.table[child];
                if node.skip <= len - depth && node.matched(addr, depth) == node.skip {
                    Direction::Enter { next: child, right }
                } else {
                    Direction::Missing
                }
            }
            None => Direction::Missing,
        }
    }

    /// Get the directions from node `cur` at depth `depth` to insert the prefix `base/len`.
    #[inline(always)]
    fn get_direction_for_insert(
        &self,
        cur: usize,
        depth: u8,
        base: u32,
        len: u8,
    ) -> DirectionForInsert {
        let right = bit_at(base, depth);
        match self.get_child(cur, right) {
            Some(child) => {
                let node = &self.table[child];
                let remaining = len - depth;
                let matched = node.matched(base, depth).min(remaining);
                if matched == node.skip && matched == remaining {
                    DirectionForInsert::Reached { node: child }
                } else if matched == node.skip {
                    DirectionForInsert::Enter { next: child }
                } else {
                    DirectionForInsert::Split {
                        right,
                        child,
                        matched,
                    }
                }
            }
            None => DirectionForInsert::NewLeaf { right },
        }
    }

    #[cfg(test)]
    pub(crate) fn free_slots(&self) -> &[usize] {
        &self.free
    }
}

impl PartialEq for PrefixTrie {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for PrefixTrie {}

impl FromIterator<Ipv4Prefix> for PrefixTrie {
    fn from_iter<I: IntoIterator<Item = Ipv4Prefix>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl Extend<Ipv4Prefix> for PrefixTrie {
    /// Insert all prefixes. As with the standard collections, running out of memory is fatal
    /// here. Use [`PrefixTrie::insert`] to handle it.
    fn extend<I: IntoIterator<Item = Ipv4Prefix>>(&mut self, iter: I) {
        for prefix in iter {
            if self.insert(prefix).is_err() {
                std::alloc::handle_alloc_error(std::alloc::Layout::new::<[Node; 2]>());
            }
        }
    }
}

enum Direction {
    /// The requested depth is reached.
    Reached,
    /// Enter the next index and search again.
    Enter { next: usize, right: bool },
    /// The node was not found.
    Missing,
}

enum DirectionForInsert {
    /// The child covers exactly the remaining bits of the prefix.
    Reached { node: usize },
    /// The child matches and more bits remain. Enter it and search again.
    Enter { next: usize },
    /// Insert a new child at the given position as a leaf.
    NewLeaf { right: bool },
    /// The prefix diverges from the segment of `child` (at position `right` of the current node)
    /// after `matched` bits. Insert a branch node with the matched bits in its place, and move
    /// `child` below it.
    Split {
        right: bool,
        child: usize,
        matched: u8,
    },
}
