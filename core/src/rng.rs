//! Park-Miller Linear Congruential Generator (MINSTD)
//!
//! Every random decision in the crate (wall shuffles, neighbour choice,
//! seed placement) goes through [`RandomSource`], so a given seed always
//! reproduces the same maze and the same simulation on every platform.
//!
//! Constants:
//! - Multiplier (a): 48271
//! - Modulus (m): 2^31 - 1 = 2147483647
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

/// Park-Miller modulus
const M: u64 = 2147483647; // 2^31 - 1

/// Park-Miller multiplier
const A: u64 = 48271;

/// A source of uniformly distributed indices.
///
/// Generators only ever need "pick one of `len` things", so that is the
/// single required method. Tests implement this with a scripted sequence to
/// force a particular shuffle order.
pub trait RandomSource {
    /// Choose a random index from the range [0, len)
    ///
    /// `len` is always at least 1.
    fn choice_index(&mut self, len: usize) -> usize;

    /// Generate random integer in range [a, b] (inclusive)
    fn randint(&mut self, a: usize, b: usize) -> usize {
        a + self.choice_index(b - a + 1)
    }

    /// Shuffle a slice in place (Fisher-Yates, walking from the back)
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.choice_index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Park-Miller Linear Congruential Generator
///
/// Generates a deterministic sequence of pseudo-random numbers from a seed.
/// Same seed always produces the same sequence.
#[derive(Clone, Debug)]
pub struct SimpleLCG {
    state: u32,
}

impl SimpleLCG {
    /// Create a new LCG with the given seed
    ///
    /// The seed is reduced modulo m; a seed that lands on 0 is replaced with
    /// 1 to avoid the degenerate all-zero sequence.
    pub fn new(seed: u32) -> Self {
        let state = (seed as u64 % M) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    /// Current internal state, enough to resume the sequence later
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance RNG state (internal)
    fn advance(&mut self) {
        // Use u64 to avoid overflow during multiplication
        self.state = ((self.state as u64 * A) % M) as u32;
    }
}

impl RandomSource for SimpleLCG {
    /// Uses pure integer arithmetic - NO floating point operations
    /// Computes `(state * len) / M`, which is always below `len`.
    fn choice_index(&mut self, len: usize) -> usize {
        self.advance();
        let scaled = (self.state as u64 * len as u64) / M;
        scaled as usize
    }
}
