//! The validated IPv4 prefix type.

use std::{
    fmt,
    net::Ipv4Addr,
    str::FromStr,
};

#[cfg(feature = "ipnet")]
use ipnet::Ipv4Net;

use crate::{bits::mask_from_len, Error};

/// An IPv4 prefix, consisting of a base address and a mask length.
///
/// A prefix can only be constructed if the mask length is in `0..=32`, and if the base address
/// has no bits set beyond the mask length. Prefixes are ordered first by their base address and
/// then by their length, which is also the order in which a [`crate::PrefixTrie`] yields them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ipv4Prefix {
    base: u32,
    len: u8,
}

impl Ipv4Prefix {
    /// The longest possible mask length (a host route).
    pub const MAX_LEN: u8 = 32;

    /// Create a new prefix.
    ///
    /// ```
    /// # use prefix_mgmt::*;
    /// let p = Ipv4Prefix::new(0x0a000000, 8).unwrap();
    /// assert_eq!(p.to_string(), "10.0.0.0/8");
    /// assert_eq!(Ipv4Prefix::new(0x0a000000, 33), Err(Error::InvalidMask(33)));
    /// assert_eq!(
    ///     Ipv4Prefix::new(0x0a000001, 8),
    ///     Err(Error::MisalignedBase { base: 0x0a000001, len: 8 })
    /// );
    /// ```
    pub fn new(base: u32, len: u8) -> Result<Self, Error> {
        if len > Self::MAX_LEN {
            return Err(Error::InvalidMask(len.into()));
        }
        if base & !mask_from_len::<u32>(len) != 0 {
            return Err(Error::MisalignedBase { base, len });
        }
        Ok(Self { base, len })
    }

    /// Create a new prefix from a signed mask length, as it is passed through the command
    /// surface. Negative lengths are rejected as [`Error::InvalidMask`].
    pub fn from_mask(base: u32, mask: i8) -> Result<Self, Error> {
        let len = u8::try_from(mask).map_err(|_| Error::InvalidMask(mask.into()))?;
        Self::new(base, len)
    }

    /// Create the prefix of length `len` that contains `addr`, by clearing all host bits.
    pub(crate) fn truncating(addr: u32, len: u8) -> Self {
        Self {
            base: addr & mask_from_len::<u32>(len),
            len,
        }
    }

    /// The base (network) address.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// The base address as an [`Ipv4Addr`].
    pub fn addr(&self) -> Ipv4Addr {
        self.base.into()
    }

    /// The mask length.
    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// The network mask.
    pub fn mask(&self) -> u32 {
        mask_from_len(self.len)
    }

    /// Check if `ip` lies within this prefix.
    ///
    /// ```
    /// # use prefix_mgmt::*;
    /// let p: Ipv4Prefix = "192.168.0.0/16".parse().unwrap();
    /// assert!(p.contains(0xc0a80101));
    /// assert!(!p.contains(0xc0a90000));
    /// ```
    pub fn contains(&self, ip: u32) -> bool {
        ip & self.mask() == self.base
    }
}

impl fmt::Display for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr(), self.len)
    }
}

impl fmt::Debug for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Ipv4Prefix {
    type Err = Error;

    /// Parse a prefix in CIDR notation, e.g., `10.0.0.0/8`. The base address must not have any
    /// host bits set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidFormat(s.to_string());
        let (addr, len) = s.split_once('/').ok_or_else(invalid)?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
        let len: u8 = len.parse().map_err(|_| invalid())?;
        Self::new(addr.into(), len)
    }
}

#[cfg(feature = "ipnet")]
impl From<Ipv4Prefix> for Ipv4Net {
    fn from(prefix: Ipv4Prefix) -> Self {
        // the length is always valid by construction.
        Ipv4Net::new(prefix.addr(), prefix.len).unwrap_or_default()
    }
}

#[cfg(feature = "ipnet")]
impl TryFrom<Ipv4Net> for Ipv4Prefix {
    type Error = Error;

    /// Convert an [`Ipv4Net`] into a prefix. Unlike `Ipv4Net`, a prefix must not have any host
    /// bits set, so `10.1.0.0/8` is rejected. Use [`Ipv4Net::trunc`] first if that is intended.
    fn try_from(net: Ipv4Net) -> Result<Self, Self::Error> {
        Self::new(net.addr().into(), net.prefix_len())
    }
}
