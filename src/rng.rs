//! seeded pseudo‑random stream used by world generation & mob spawning
//!
//! Seeds are hashed with 32‑bit FNV‑1a, then fed to a Mulberry32 mixer.
//! Same seed ⇒ same infinite sequence, on every platform.
use std::fmt::Display;

use rand::RngCore;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const MULBERRY_INCREMENT: u32 = 0x6d2b_79f5;

/// 32‑bit FNV‑1a over the seed bytes
pub fn hash_seed(seed: &str) -> u32 {
    seed.bytes().fold(FNV_OFFSET_BASIS, |h, b| {
        (h ^ b as u32).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Any displayable seed works; numbers hash through their decimal text.
    pub fn new(seed: impl Display) -> Self {
        Self::from_state(hash_seed(&seed.to_string()))
    }

    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    #[inline]
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// uniform in `[0, 1)`
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_raw() as f64 / 4_294_967_296.0
    }

    /// `floor(next_f64() * n)`, i.e. uniform in `0..n`
    #[inline]
    pub fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_raw() as u64;
        let lo = self.next_raw() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
