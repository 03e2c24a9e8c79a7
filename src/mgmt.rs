//! Lifecycle and command surface of the prefix table.

use crate::{Error, Ipv4Prefix, PrefixTrie};

/// A prefix table with an explicit lifecycle.
///
/// The table starts out uninitialized. [`PrefixMgmt::init`] creates an empty trie, and
/// [`PrefixMgmt::cleanup`] releases it again. On an uninitialized table, [`PrefixMgmt::add`]
/// fails with [`Error::Uninitialized`], while [`PrefixMgmt::del`] and [`PrefixMgmt::check`] have
/// nothing to modify or find.
///
/// Mask lengths are taken as `i8`, such that out-of-range values coming from a hosting process
/// are rejected with [`Error::InvalidMask`] rather than truncated.
///
/// ```
/// # use prefix_mgmt::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut table = PrefixMgmt::new();
/// assert_eq!(table.add(0x0a000000, 8), Err(Error::Uninitialized));
///
/// table.init()?;
/// table.add(0x0a000000, 8)?; // 10.0.0.0/8
/// assert_eq!(table.check(0x0a0a0000), Some(8)); // 10.10.0.0
/// table.del(0x0a000000, 8)?;
/// assert_eq!(table.check(0x0a0a0000), None);
///
/// table.cleanup();
/// assert_eq!(table.del(0x0a000000, 8), Ok(()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PrefixMgmt {
    trie: Option<PrefixTrie>,
}

impl PrefixMgmt {
    /// Create an uninitialized table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table. An existing table is torn down first.
    pub fn init(&mut self) -> Result<(), Error> {
        self.cleanup();
        self.trie = Some(PrefixTrie::try_new()?);
        #[cfg(feature = "tracing")]
        tracing::debug!("prefix table initialized");
        Ok(())
    }

    /// Release the whole table. Calling this on an uninitialized table does nothing.
    pub fn cleanup(&mut self) {
        let _trie = self.trie.take();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            prefixes = _trie.as_ref().map(PrefixTrie::len),
            nodes = _trie.as_ref().map(PrefixTrie::node_count),
            "prefix table released"
        );
    }

    /// Check if the table was initialized.
    pub fn is_initialized(&self) -> bool {
        self.trie.is_some()
    }

    /// Get the underlying trie, if the table is initialized.
    pub fn trie(&self) -> Option<&PrefixTrie> {
        self.trie.as_ref()
    }

    /// Add the prefix `base/mask`. Adding a prefix that is already present succeeds without
    /// changing anything.
    ///
    /// Fails if the mask is outside of `0..=32`, if `base` has bits set beyond the mask, if the
    /// table is not initialized, or if a node cannot be allocated. In all these cases, the table
    /// is unchanged.
    pub fn add(&mut self, base: u32, mask: i8) -> Result<(), Error> {
        let prefix = validate(base, mask)?;
        let trie = self.trie.as_mut().ok_or(Error::Uninitialized)?;
        trie.insert(prefix)?;
        Ok(())
    }

    /// Delete the prefix `base/mask`. Deleting a prefix that is not present (or deleting from an
    /// uninitialized table) succeeds without changing anything.
    ///
    /// Fails only if the mask is outside of `0..=32` or if `base` has bits set beyond the mask.
    pub fn del(&mut self, base: u32, mask: i8) -> Result<(), Error> {
        let prefix = validate(base, mask)?;
        if let Some(trie) = self.trie.as_mut() {
            trie.remove(&prefix);
        }
        Ok(())
    }

    /// Get the mask length of the most specific prefix that contains `ip`. Returns `None` if no
    /// prefix contains it, or if the table is not initialized.
    pub fn check(&self, ip: u32) -> Option<u8> {
        self.trie.as_ref()?.lookup(ip)
    }
}

fn validate(base: u32, mask: i8) -> Result<Ipv4Prefix, Error> {
    Ipv4Prefix::from_mask(base, mask).map_err(|e| {
        #[cfg(feature = "tracing")]
        tracing::debug!(base = format_args!("{base:#010x}"), mask, error = %e, "rejected prefix");
        e
    })
}
