//! Property-based tests for keyreach's number-theoretic primitives.
//!
//! These tests use the `proptest` framework to verify mathematical
//! invariants across thousands of randomly generated inputs, cross-checking
//! our implementations against GMP (via `rug`) wherever GMP exposes the
//! same operation.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test property_tests
//!
//! # Increase case count for thorough testing (default is 256):
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```
//!
//! Each property is named `prop_<function>_<invariant>`.

use proptest::prelude::*;
use rug::rand::RandState;
use rug::Integer;

use keyreach::error::KeygenError;
use keyreach::{euclid, miller_rabin};

proptest! {
    /// Verifies the Bezout identity b*x + n*y == g == gcd(b, n).
    ///
    /// The coefficients are exactly what turns a gcd into a modular
    /// inverse, so this identity underwrites the private-exponent
    /// computation. gcd is cross-checked against GMP.
    #[test]
    fn prop_extended_gcd_bezout_identity(b in 0u64..1_000_000, n in 0u64..1_000_000) {
        let b = Integer::from(b);
        let n = Integer::from(n);
        let (g, x, y) = euclid::extended_gcd(&b, &n);
        prop_assert_eq!(
            Integer::from(&b * &x) + Integer::from(&n * &y),
            g.clone(),
            "Bezout identity violated for ({}, {})", b, n
        );
        prop_assert_eq!(g, Integer::from(b.gcd_ref(&n)));
    }

    /// Verifies mod_inverse returns x in [0, n) with b*x == 1 (mod n) for
    /// coprime pairs, and NotInvertible exactly when gcd(b, n) != 1.
    #[test]
    fn prop_mod_inverse_roundtrip(b in 1u64..1_000_000, n in 2u64..1_000_000) {
        let b = Integer::from(b);
        let n = Integer::from(n);
        let coprime = Integer::from(b.gcd_ref(&n)) == 1u32;
        match euclid::mod_inverse(&b, &n) {
            Ok(inv) => {
                prop_assert!(coprime, "inverse returned for non-coprime ({}, {})", b, n);
                prop_assert!(inv >= 0u32 && inv < n);
                prop_assert_eq!(Integer::from(&b * &inv) % &n, 1u32);
            }
            Err(KeygenError::NotInvertible { gcd }) => {
                prop_assert!(!coprime, "NotInvertible for coprime ({}, {})", b, n);
                prop_assert_eq!(gcd, Integer::from(b.gcd_ref(&n)));
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    /// Verifies mod_inverse agrees with GMP's invert on large operands.
    #[test]
    fn prop_mod_inverse_matches_gmp(b_bits in 1u32..256, seed in any::<u64>()) {
        let mut rng = RandState::new();
        rng.seed(&Integer::from(seed));
        let b = Integer::from(Integer::random_bits(b_bits, &mut rng)) + 1u32;
        let n = Integer::from(Integer::random_bits(256, &mut rng)) + 2u32;
        let ours = euclid::mod_inverse(&b, &n);
        let gmp = b.clone().invert(&n);
        match (ours, gmp) {
            (Ok(x), Ok(y)) => prop_assert_eq!(x, y),
            (Err(KeygenError::NotInvertible { .. }), Err(_)) => {}
            (ours, gmp) => prop_assert!(
                false,
                "disagreement with GMP for ({}, {}): ours={:?} gmp={:?}", b, n, ours, gmp
            ),
        }
    }

    /// Verifies our Miller-Rabin classification agrees with GMP's
    /// is_probably_prime across arbitrary u32 candidates. At 15 rounds a
    /// disagreement would mean a real bug, not bad luck (4^-15 per case).
    #[test]
    fn prop_is_probably_prime_agrees_with_gmp(v in 2u32..u32::MAX) {
        use rug::integer::IsPrime;
        let mut rng = RandState::new();
        rng.seed(&Integer::from(v));
        let n = Integer::from(v);
        let ours = miller_rabin::is_probably_prime(&n, 15, &mut rng).unwrap();
        let gmp = n.is_probably_prime(30) != IsPrime::No;
        prop_assert_eq!(ours, gmp, "disagreement with GMP at {}", v);
    }

    /// Verifies n < 2 is always the typed InvalidCandidate failure.
    #[test]
    fn prop_is_probably_prime_rejects_below_two(v in 0u32..2) {
        let mut rng = RandState::new();
        let n = Integer::from(v);
        prop_assert_eq!(
            miller_rabin::is_probably_prime(&n, 10, &mut rng),
            Err(KeygenError::InvalidCandidate { value: n.clone() })
        );
    }
}
