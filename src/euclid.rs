//! Extended Euclidean algorithm and modular inversion.
//!
//! The private exponent is the inverse of the public exponent modulo the
//! Carmichael totient; both come out of the iterative coefficient-update
//! recurrence here. Iterative on purpose: operands are RSA-sized and a
//! recursive gcd would grow the stack with the operand bit length.

use rug::ops::RemRounding;
use rug::Integer;

use crate::error::KeygenError;

/// Compute `(g, x, y)` such that `b*x + n*y == g == gcd(b, n)`.
pub fn extended_gcd(b: &Integer, n: &Integer) -> (Integer, Integer, Integer) {
    let mut r0 = b.clone();
    let mut r1 = n.clone();
    let mut x0 = Integer::from(1u32);
    let mut x1 = Integer::new();
    let mut y0 = Integer::new();
    let mut y1 = Integer::from(1u32);

    while r1 != 0u32 {
        let (quotient, remainder) = r0.div_rem(r1.clone());
        r0 = r1;
        r1 = remainder;
        let next_x = x0 - Integer::from(&quotient * &x1);
        x0 = x1;
        x1 = next_x;
        let next_y = y0 - quotient * &y1;
        y0 = y1;
        y1 = next_y;
    }
    (r0, x0, y0)
}

/// Modular inverse of `b` modulo `n`, normalized to `[0, n)`.
///
/// # Errors
///
/// Returns `KeygenError::NotInvertible` when `gcd(b, n) != 1`.
pub fn mod_inverse(b: &Integer, n: &Integer) -> Result<Integer, KeygenError> {
    let (g, x, _) = extended_gcd(b, n);
    if g != 1u32 {
        return Err(KeygenError::NotInvertible { gcd: g });
    }
    // x may be negative; rem_euc lands it in [0, n).
    Ok(x.rem_euc(n.clone()))
}
