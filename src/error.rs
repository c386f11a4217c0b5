//! Typed failures for the key-generation pipeline.
//!
//! Collaborator-level fallibility (HTTP, decoding, file I/O) uses `anyhow`
//! in the `entropy` module; everything number-theoretic surfaces one of
//! these variants to its immediate caller. The core never logs or prints.

use rug::Integer;

/// Errors from the key-generation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeygenError {
    /// The candidate pool emptied before a prime of the required bit length
    /// was found. Re-fetching entropy is the caller's decision, never done
    /// internally.
    InsufficientEntropy { drawn: usize, min_bits: u32, max_bits: u32 },
    /// Draw from an empty pool. Wrapped into `InsufficientEntropy` at the
    /// orchestrator boundary.
    PoolExhausted,
    /// No modular inverse exists: gcd(b, n) != 1. After exponent rejection
    /// sampling this is an internal invariant violation and aborts the run.
    NotInvertible { gcd: Integer },
    /// A value below 2 cannot be classified by the primality test. Skipped
    /// (not escalated) during prime search.
    InvalidCandidate { value: Integer },
}

impl std::fmt::Display for KeygenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeygenError::InsufficientEntropy {
                drawn,
                min_bits,
                max_bits,
            } => write!(
                f,
                "candidate pool exhausted after {} draws without a probable prime of {}-{} bits",
                drawn, min_bits, max_bits
            ),
            KeygenError::PoolExhausted => write!(f, "candidate pool is empty"),
            KeygenError::NotInvertible { gcd } => {
                write!(f, "no modular inverse exists (gcd = {})", gcd)
            }
            KeygenError::InvalidCandidate { value } => {
                write!(f, "candidate {} is below 2 and cannot be prime", value)
            }
        }
    }
}

impl std::error::Error for KeygenError {}
