//! The key-generation pipeline: primes → modulus → totient → exponents.
//!
//! A single linear pass over one owned [`CandidatePool`]. Every derived
//! value (`p`, `q`, `N`, `λ`, `e`, `d`) is produced exactly once, threaded
//! through as an explicit value, and never mutated afterwards; the finished
//! pair moves wholly to the caller. Nothing here logs or prints.

use rug::rand::RandState;
use rug::Integer;
use serde::Serialize;

use crate::error::KeygenError;
use crate::euclid;
use crate::has_small_factor;
use crate::miller_rabin;
use crate::pool::CandidatePool;

/// Tunables for one generation run.
///
/// Defaults follow the classic loose bounds: candidates between 512 and
/// 1024 bits, 10 Miller–Rabin rounds.
#[derive(Debug, Clone)]
pub struct KeygenConfig {
    /// Minimum acceptable prime bit length.
    pub min_bits: u32,
    /// Maximum acceptable prime bit length.
    pub max_bits: u32,
    /// Miller–Rabin witness rounds per candidate.
    pub mr_rounds: u32,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        KeygenConfig {
            min_bits: 512,
            max_bits: 1024,
            mr_rounds: miller_rabin::DEFAULT_ROUNDS,
        }
    }
}

/// Public half of a key pair: the modulus and encryption exponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicKey {
    #[serde(serialize_with = "serialize_integer")]
    pub n: Integer,
    #[serde(serialize_with = "serialize_integer")]
    pub e: Integer,
}

/// Private half of a key pair: the modulus and decryption exponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivateKey {
    #[serde(serialize_with = "serialize_integer")]
    pub n: Integer,
    #[serde(serialize_with = "serialize_integer")]
    pub d: Integer,
}

/// A finished RSA key pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

/// The full working set of one generation run, factors included.
///
/// Production callers take the [`KeyPair`] view via [`generate_keys`]; the
/// factors are exposed so verification (and tests) can check `n == p*q` and
/// `e*d ≡ 1 (mod λ)` without re-deriving them.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    pub p: Integer,
    pub q: Integer,
    pub n: Integer,
    pub lambda: Integer,
    pub e: Integer,
    pub d: Integer,
}

impl KeyMaterial {
    pub fn into_key_pair(self) -> KeyPair {
        KeyPair {
            public: PublicKey {
                n: self.n.clone(),
                e: self.e,
            },
            private: PrivateKey {
                n: self.n,
                d: self.d,
            },
        }
    }
}

fn serialize_integer<S: serde::Serializer>(n: &Integer, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&n.to_string())
}

/// Draw candidates until one is a probable prime within the configured bit
/// range.
///
/// Each draw is classified independently: values below 2 are skipped,
/// composites are discarded, primes outside `[min_bits, max_bits]` are
/// discarded too. Exhaustion and bit-length insufficiency are therefore
/// distinguishable from success — the search can never hand back an
/// unvetted candidate.
///
/// # Errors
///
/// Returns `KeygenError::InsufficientEntropy` when the pool empties first.
pub fn find_prime(
    pool: &mut CandidatePool,
    config: &KeygenConfig,
    rng: &mut RandState,
) -> Result<Integer, KeygenError> {
    let mut drawn = 0usize;
    loop {
        let candidate = match pool.draw_next() {
            Ok(c) => c,
            Err(KeygenError::PoolExhausted) => {
                return Err(KeygenError::InsufficientEntropy {
                    drawn,
                    min_bits: config.min_bits,
                    max_bits: config.max_bits,
                });
            }
            Err(e) => return Err(e),
        };
        drawn += 1;

        if candidate < 2u32 {
            continue;
        }
        let bits = candidate.significant_bits();
        if bits < config.min_bits || bits > config.max_bits {
            continue;
        }
        // Trial division screens out most composites before the full test.
        if has_small_factor(&candidate) {
            continue;
        }
        if miller_rabin::is_probably_prime(&candidate, config.mr_rounds, rng)? {
            return Ok(candidate);
        }
    }
}

/// Run the whole pipeline and return the full working set.
///
/// Steps: two distinct probable primes, `n = p*q`,
/// `λ = (p-1)(q-1) / gcd(p-1, q-1)`, a public exponent sampled uniformly
/// from `[2, λ)` until coprime with λ (no iteration cap; for realistic λ
/// the coprimality density makes non-termination a theoretical concern
/// only), and the private exponent by modular inversion.
///
/// # Errors
///
/// `InsufficientEntropy` when the pool runs dry before both primes are
/// found. `NotInvertible` can only arise from a violated internal
/// invariant — the exponent was validated coprime before inversion — and is
/// propagated, never swallowed.
pub fn generate(
    pool: &mut CandidatePool,
    config: &KeygenConfig,
    rng: &mut RandState,
) -> Result<KeyMaterial, KeygenError> {
    let p = find_prime(pool, config, rng)?;
    let mut q = find_prime(pool, config, rng)?;
    // p == q would make n a perfect square and leak the factorization.
    while q == p {
        q = find_prime(pool, config, rng)?;
    }

    let n = Integer::from(&p * &q);

    let p_minus_1 = Integer::from(&p - 1u32);
    let q_minus_1 = Integer::from(&q - 1u32);
    let lambda = Integer::from(&p_minus_1 * &q_minus_1)
        / Integer::from(p_minus_1.gcd_ref(&q_minus_1));

    let e = sample_exponent(&lambda, rng);
    let d = euclid::mod_inverse(&e, &lambda)?;

    Ok(KeyMaterial {
        p,
        q,
        n,
        lambda,
        e,
        d,
    })
}

/// Generate a key pair from a populated pool.
pub fn generate_keys(
    pool: &mut CandidatePool,
    config: &KeygenConfig,
    rng: &mut RandState,
) -> Result<KeyPair, KeygenError> {
    Ok(generate(pool, config, rng)?.into_key_pair())
}

/// Rejection-sample a public exponent: uniform in `[0, λ)` until it is
/// greater than 1 and coprime with λ. No hardcoded 65537.
fn sample_exponent(lambda: &Integer, rng: &mut RandState) -> Integer {
    loop {
        let e = Integer::from(lambda.random_below_ref(rng));
        if e > 1u32 && Integer::from(e.gcd_ref(lambda)) == 1u32 {
            return e;
        }
    }
}
