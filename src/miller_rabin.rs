//! Miller–Rabin probabilistic primality testing.
//!
//! The candidate pool hands us raw integers from the randomness provider;
//! this module decides which of them are probable primes. Each round draws a
//! uniform witness in [2, n-2] and checks the square chain of a^d mod n,
//! where n-1 = d * 2^s with d odd. A composite survives all `rounds`
//! witnesses with probability at most 4^-rounds.

use rug::rand::RandState;
use rug::Integer;

use crate::error::KeygenError;

/// Default number of witness rounds. 10 rounds bounds the false-positive
/// probability below 4^-10 ≈ 1e-6 per candidate.
pub const DEFAULT_ROUNDS: u32 = 10;

/// Decide whether `n` is probably prime using `rounds` Miller–Rabin witness
/// iterations drawn from `rng`.
///
/// Fast paths: 2 and 3 are prime, other even numbers are not.
///
/// # Errors
///
/// Returns `KeygenError::InvalidCandidate` for `n < 2`.
pub fn is_probably_prime(
    n: &Integer,
    rounds: u32,
    rng: &mut RandState,
) -> Result<bool, KeygenError> {
    if *n < 2 {
        return Err(KeygenError::InvalidCandidate { value: n.clone() });
    }
    // 2 and 3 have an empty witness range [2, n-2]; handle them directly.
    if *n == 2 || *n == 3 {
        return Ok(true);
    }
    if n.is_even() {
        return Ok(false);
    }

    // Factor n - 1 = d * 2^s with d odd.
    let n_minus_1 = Integer::from(n - 1u32);
    let s = n_minus_1.find_one(0).unwrap_or(0);
    let d = Integer::from(&n_minus_1 >> s);

    // Witnesses are uniform in [2, n-2]: draw below n-3, shift up by 2.
    let witness_span = Integer::from(n - 3u32);

    for _ in 0..rounds {
        let a = Integer::from(witness_span.random_below_ref(rng)) + 2u32;
        if !witness_passes(&a, &d, s, n, &n_minus_1) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// One witness round: x = a^d mod n passes if it starts at 1 or hits n-1
/// anywhere in the first s squarings.
fn witness_passes(a: &Integer, d: &Integer, s: u32, n: &Integer, n_minus_1: &Integer) -> bool {
    // pow_mod only fails for negative exponents; d is positive here.
    let mut x = match a.clone().pow_mod(d, n) {
        Ok(x) => x,
        Err(_) => return false,
    };
    if x == 1u32 || x == *n_minus_1 {
        return true;
    }
    for _ in 0..s.saturating_sub(1) {
        x = x.square() % n;
        if x == *n_minus_1 {
            return true;
        }
    }
    false
}
