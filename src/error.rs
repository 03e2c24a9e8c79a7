//! Error type shared by all fallible operations.

use std::fmt;

/// Errors reported by the prefix table.
///
/// All errors are reported before the table is modified. A failed operation leaves the table
/// usable for subsequent calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The mask length is outside of `0..=32`.
    InvalidMask(i16),
    /// The base address has bits set beyond the mask length.
    MisalignedBase {
        /// The offending base address.
        base: u32,
        /// The mask length that was requested.
        len: u8,
    },
    /// The table was never initialized, or was cleaned up.
    Uninitialized,
    /// A new node could not be allocated.
    AllocationFailure,
    /// The textual representation of a prefix could not be parsed.
    InvalidFormat(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMask(len) => write!(f, "invalid mask length {len}, expected 0 to 32"),
            Self::MisalignedBase { base, len } => write!(
                f,
                "base address {} has host bits set beyond /{len}",
                std::net::Ipv4Addr::from(*base)
            ),
            Self::Uninitialized => write!(f, "prefix table is not initialized"),
            Self::AllocationFailure => write!(f, "memory allocation failed"),
            Self::InvalidFormat(s) => write!(f, "invalid prefix {s:?}"),
        }
    }
}

impl std::error::Error for Error {}
