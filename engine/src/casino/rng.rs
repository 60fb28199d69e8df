//! Deterministic draw primitives for game settlement.
//!
//! Each settlement invocation gets its own [`GameRng`], derived from an
//! explicit seed plus the session id and move index. Identical inputs
//! reproduce identical draws (outcomes are replayable in tests); distinct
//! sessions and moves get independent streams; nothing is shared between
//! concurrent invocations.

use super::cards::CARDS_PER_DECK;
use rand::seq::{index, SliceRandom};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

/// Domain separator for draw-stream derivation.
const DRAW_DOMAIN: &[u8] = b"greenfelt-draw";

/// Per-invocation random source for game settlement.
pub struct GameRng {
    inner: ChaCha20Rng,
}

impl GameRng {
    /// Derive a draw stream for one move of one session.
    pub fn new(seed: &[u8; 32], session_id: u64, move_index: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(session_id.to_be_bytes());
        hasher.update(move_index.to_be_bytes());
        hasher.update(DRAW_DOMAIN);
        let digest: [u8; 32] = hasher.finalize().into();
        Self {
            inner: ChaCha20Rng::from_seed(digest),
        }
    }

    /// Uniform integer in `[min, max]` (inclusive).
    pub fn gen_range_inclusive(&mut self, min: u64, max: u64) -> u64 {
        self.inner.gen_range(min..=max)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Bernoulli draw with probability `p` of `true`.
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.inner.gen_bool(p)
    }

    /// Roll a die with the given number of sides, returning `1..=sides`.
    pub fn roll_die(&mut self, sides: u8) -> u8 {
        self.inner.gen_range(1..=sides)
    }

    /// Spin a single-zero wheel, returning `0..=36`.
    pub fn spin_roulette(&mut self) -> u8 {
        self.inner.gen_range(0..=36)
    }

    /// Draw a card rank with replacement, returning `1..=13` (Ace..King).
    pub fn draw_rank(&mut self) -> u8 {
        self.inner.gen_range(1..=13)
    }

    /// Create a shuffled 52-card deck (cards encoded `0..=51`).
    pub fn create_deck(&mut self) -> Vec<u8> {
        let mut deck: Vec<u8> = (0..CARDS_PER_DECK).collect();
        deck.shuffle(&mut self.inner);
        deck
    }

    /// Draw the top card from a deck.
    pub fn draw_card(&mut self, deck: &mut Vec<u8>) -> Option<u8> {
        deck.pop()
    }

    /// Draw `amount` distinct values from `0..population` (without
    /// replacement, unbiased).
    pub fn sample_unique(&mut self, population: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.inner, population, amount).into_vec()
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: [u8; 32] = [7u8; 32];

    #[test]
    fn test_same_inputs_same_stream() {
        let mut a = GameRng::new(&SEED, 1, 0);
        let mut b = GameRng::new(&SEED, 1, 0);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_distinct_moves_distinct_streams() {
        let mut a = GameRng::new(&SEED, 1, 0);
        let mut b = GameRng::new(&SEED, 1, 1);
        let mut c = GameRng::new(&SEED, 2, 0);
        // Different derivation inputs should not produce the same opening draw
        // (64-bit collision here would indicate broken domain separation).
        let first = a.next_u64();
        assert_ne!(first, b.next_u64());
        assert_ne!(first, c.next_u64());
    }

    #[test]
    fn test_roll_die_bounds() {
        let mut rng = GameRng::new(&SEED, 3, 0);
        for _ in 0..1_000 {
            let roll = rng.roll_die(100);
            assert!((1..=100).contains(&roll));
        }
    }

    #[test]
    fn test_spin_roulette_covers_wheel() {
        let mut rng = GameRng::new(&SEED, 4, 0);
        let mut seen = [false; 37];
        for _ in 0..5_000 {
            seen[rng.spin_roulette() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every pocket should be reachable");
    }

    #[test]
    fn test_deck_is_permutation() {
        let mut rng = GameRng::new(&SEED, 5, 0);
        let deck = rng.create_deck();
        assert_eq!(deck.len(), 52);
        let mut sorted = deck.clone();
        sorted.sort_unstable();
        let expected: Vec<u8> = (0..52).collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_sample_unique_distinct() {
        let mut rng = GameRng::new(&SEED, 6, 0);
        for _ in 0..50 {
            let sample = rng.sample_unique(80, 20);
            assert_eq!(sample.len(), 20);
            let mut sorted = sample.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), 20, "sampled numbers must be distinct");
            assert!(sample.iter().all(|&n| n < 80));
        }
    }

    #[test]
    fn test_next_f64_in_unit_interval() {
        let mut rng = GameRng::new(&SEED, 7, 0);
        for _ in 0..1_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
