//! Bit and path utilities on unsigned integers.
//!
//! Bit positions are counted from the left, where 0 is the most significant bit. For an IPv4
//! address stored as `u32`, this is the order in which the address is read in dotted-decimal
//! notation, and the order in which the trie consumes it.

use num_traits::{PrimInt, Unsigned};

/// Number of bits in `R`.
#[inline(always)]
pub(crate) fn width<R: PrimInt>() -> u32 {
    R::zero().count_zeros()
}

/// Check if bit `pos` of `value` is set. Positions beyond the width of `R` are never set.
///
/// ```
/// # use prefix_mgmt::bits::bit_at;
/// assert!(bit_at(0x80000000u32, 0));
/// assert!(!bit_at(0x80000000u32, 1));
/// assert!(bit_at(0x0a000000u32, 4));
/// ```
#[inline(always)]
pub fn bit_at<R: PrimInt + Unsigned>(value: R, pos: u8) -> bool {
    let w = width::<R>();
    let pos = pos as u32;
    if pos >= w {
        return false;
    }
    (value >> (w - 1 - pos) as usize) & R::one() == R::one()
}

/// Return the `len` bits of `value` that start at bit `start`, right-justified. Bits that would
/// lie beyond the width of `R` are cut off.
///
/// ```
/// # use prefix_mgmt::bits::extract_bits;
/// assert_eq!(extract_bits(0xc0a80100u32, 0, 8), 0xc0);
/// assert_eq!(extract_bits(0xc0a80100u32, 8, 16), 0xa801);
/// assert_eq!(extract_bits(0xc0a80100u32, 4, 0), 0);
/// ```
#[inline(always)]
pub fn extract_bits<R: PrimInt + Unsigned>(value: R, start: u8, len: u8) -> R {
    let w = width::<R>();
    let (start, len) = (start as u32, len as u32);
    if len == 0 || start >= w {
        return R::zero();
    }
    let len = len.min(w - start);
    (value << start as usize) >> (w - len) as usize
}

/// Count the identical bits of `a` and `b`, starting at bit `start`. Counting stops at the first
/// mismatch, or after `max` bits.
///
/// ```
/// # use prefix_mgmt::bits::match_length;
/// // 192.168.1.0 and 192.168.2.0 first differ at bit 22.
/// assert_eq!(match_length(0xc0a80100u32, 0xc0a80200u32, 0, 32), 22);
/// assert_eq!(match_length(0xc0a80100u32, 0xc0a80200u32, 16, 32), 6);
/// assert_eq!(match_length(0xc0a80100u32, 0xc0a80200u32, 16, 4), 4);
/// ```
#[inline(always)]
pub fn match_length<R: PrimInt + Unsigned>(a: R, b: R, start: u8, max: u8) -> u8 {
    let w = width::<R>();
    let start = start as u32;
    if start >= w {
        return 0;
    }
    let diff = (a ^ b) << start as usize;
    diff.leading_zeros().min(w - start).min(max as u32) as u8
}

/// Network mask with the `len` most significant bits set.
///
/// ```
/// # use prefix_mgmt::bits::mask_from_len;
/// assert_eq!(mask_from_len::<u32>(0), 0x00000000);
/// assert_eq!(mask_from_len::<u32>(20), 0xfffff000);
/// assert_eq!(mask_from_len::<u32>(32), 0xffffffff);
/// ```
pub fn mask_from_len<R: PrimInt + Unsigned>(len: u8) -> R {
    if len as u32 >= width::<R>() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}
