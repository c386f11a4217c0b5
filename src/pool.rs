//! Candidate pool: the ordered batch of integers one generation run consumes.
//!
//! Populated once, atomically, from a decoded entropy batch before any draw
//! happens; never refilled mid-run, so no random bits are reused or
//! double-counted. Draw order is LIFO (the last integer supplied is drawn
//! first) — callers must not assume FIFO. A drawn integer is gone for good.

use rug::Integer;

use crate::error::KeygenError;

/// A draining pool of prime candidates.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    values: Vec<Integer>,
}

impl CandidatePool {
    /// Build a pool from a fully decoded entropy batch.
    pub fn from_integers(values: Vec<Integer>) -> Self {
        CandidatePool { values }
    }

    /// Remove and return the next candidate (LIFO).
    ///
    /// # Errors
    ///
    /// Returns `KeygenError::PoolExhausted` when the pool is empty.
    pub fn draw_next(&mut self) -> Result<Integer, KeygenError> {
        self.values.pop().ok_or(KeygenError::PoolExhausted)
    }

    /// Number of candidates not yet drawn.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_in_reverse_arrival_order() {
        let mut pool = CandidatePool::from_integers(vec![
            Integer::from(10u32),
            Integer::from(20u32),
            Integer::from(30u32),
        ]);
        assert_eq!(pool.draw_next().unwrap(), 30u32);
        assert_eq!(pool.draw_next().unwrap(), 20u32);
        assert_eq!(pool.draw_next().unwrap(), 10u32);
    }

    #[test]
    fn remaining_only_decreases() {
        let mut pool =
            CandidatePool::from_integers(vec![Integer::from(1u32), Integer::from(2u32)]);
        assert_eq!(pool.remaining(), 2);
        pool.draw_next().unwrap();
        assert_eq!(pool.remaining(), 1);
        pool.draw_next().unwrap();
        assert_eq!(pool.remaining(), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn empty_pool_is_a_defined_failure() {
        let mut pool = CandidatePool::default();
        assert_eq!(pool.draw_next(), Err(KeygenError::PoolExhausted));
        // Still empty, still the same failure on a repeat draw.
        assert_eq!(pool.draw_next(), Err(KeygenError::PoolExhausted));
    }
}
