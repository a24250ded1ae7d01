#![forbid(unsafe_code)]

//! Uniform random indices for symbol draws.
//!
//! Effects only ever need "pick one of `n` symbols", so the seam is a tiny
//! [`SymbolSource`] trait. [`XorShift64`] is the seedable default.

use web_time::{SystemTime, UNIX_EPOCH};

/// Source of uniformly distributed indices.
pub trait SymbolSource {
    /// Return an index in `0..bound`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// xorshift64 generator.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Create a generator from a seed. Any seed is accepted, including zero.
    pub fn new(seed: u64) -> Self {
        // Avoid the all-zero fixed point.
        let state = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    /// Create a generator seeded from the wall clock.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos)
    }

    /// Next raw 64-bit value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl SymbolSource for XorShift64 {
    fn next_index(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "bound must be non-zero");
        // Multiply-shift keeps the result in range without modulo bias
        // worth caring about at alphabet sizes.
        ((self.next_u64() >> 32) * bound as u64 >> 32) as usize
    }
}
