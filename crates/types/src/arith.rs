//! Exact integer arithmetic for consensus-level amounts
//!
//! Every product is formed in a 128-bit intermediate so `a * b` never wraps
//! before the division. No floating point anywhere.

/// Rounding direction for [`big_divide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Floor (truncate toward zero; operands are non-negative).
    Down,
    /// Ceiling.
    Up,
}

/// Multiply then divide on `u128`, returning `None` if the divisor is zero or
/// the product overflows.
#[inline]
pub fn mul_div_u128(n: u128, mul: u128, div: u128, rounding: Rounding) -> Option<u128> {
    if div == 0 {
        return None;
    }
    let product = n.checked_mul(mul)?;
    let quotient = product / div;
    match rounding {
        Rounding::Down => Some(quotient),
        Rounding::Up if product % div != 0 => quotient.checked_add(1),
        Rounding::Up => Some(quotient),
    }
}

/// Compute `a * b / c` exactly.
///
/// Returns `None` when `c <= 0`, when `a` or `b` is negative, or when the
/// quotient does not fit in an `i64`.
#[inline]
pub fn big_divide(a: i64, b: i64, c: i64, rounding: Rounding) -> Option<i64> {
    if a < 0 || b < 0 || c <= 0 {
        return None;
    }
    let q = mul_div_u128(a as u128, b as u128, c as u128, rounding)?;
    i64::try_from(q).ok()
}

/// Unsigned twin of [`big_divide`].
#[inline]
pub fn big_divide_u64(a: u64, b: u64, c: u64, rounding: Rounding) -> Option<u64> {
    let q = mul_div_u128(a as u128, b as u128, c as u128, rounding)?;
    u64::try_from(q).ok()
}
