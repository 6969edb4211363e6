//! MT19937, the 32-bit Mersenne Twister.
//!
//! The generator is the canonical reference algorithm (Matsumoto & Nishimura,
//! 1998): 624 words of state, period 2^19937 − 1, seeded with the
//! `init_genrand` recurrence.  Reproducing it bit for bit is what lets a run
//! be compared against sequences produced by other MT19937 implementations.
//!
//! `Mt19937` is a plain value type with no interior synchronisation; sharing
//! it across threads is [`RandomEngine`][crate::RandomEngine]'s job.

use rand::{RngCore, SeedableRng};

/// Number of 32-bit words of state.
pub const STATE_WORDS: usize = 624;

const MIDDLE_WORD: usize = 397;
const MATRIX_A:    u32   = 0x9908_b0df;
const UPPER_MASK:  u32   = 0x8000_0000;
const LOWER_MASK:  u32   = 0x7fff_ffff;
const INIT_MULT:   u32   = 1_812_433_253;

/// The 32-bit Mersenne Twister.
#[derive(Clone)]
pub struct Mt19937 {
    state:  [u32; STATE_WORDS],
    /// Next word of `state` to temper; `STATE_WORDS` means "twist first".
    cursor: usize,
}

impl Mt19937 {
    /// Seed deterministically from a 32-bit value.
    pub fn new(seed: u32) -> Self {
        let mut mt = Mt19937 {
            state:  [0; STATE_WORDS],
            cursor: STATE_WORDS,
        };
        mt.reseed(seed);
        mt
    }

    /// Re-derive the whole state from `seed` in place.
    pub fn reseed(&mut self, seed: u32) {
        self.state[0] = seed;
        for i in 1..STATE_WORDS {
            let prev = self.state[i - 1];
            self.state[i] = INIT_MULT
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        self.cursor = STATE_WORDS;
    }

    /// Produce the next tempered 32-bit word.
    #[inline]
    pub fn next_word(&mut self) -> u32 {
        if self.cursor >= STATE_WORDS {
            self.twist();
        }
        let mut y = self.state[self.cursor];
        self.cursor += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    /// `true` if every state word is zero, a fixed point of the recurrence.
    pub fn is_degenerate(&self) -> bool {
        self.state.iter().all(|&w| w == 0)
    }

    fn twist(&mut self) {
        for i in 0..STATE_WORDS {
            let y = (self.state[i] & UPPER_MASK) | (self.state[(i + 1) % STATE_WORDS] & LOWER_MASK);
            let mut next = y >> 1;
            if y & 1 != 0 {
                next ^= MATRIX_A;
            }
            self.state[i] = self.state[(i + MIDDLE_WORD) % STATE_WORDS] ^ next;
        }
        self.cursor = 0;
    }
}

impl std::fmt::Debug for Mt19937 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mt19937")
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

// ── rand integration ─────────────────────────────────────────────────────────

impl RngCore for Mt19937 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    /// Two words, low half first.
    #[inline]
    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_word());
        let hi = u64::from(self.next_word());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_word().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mt19937 {
    /// Little-endian encoding of the 32-bit `init_genrand` seed.
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Mt19937::new(u32::from_le_bytes(seed))
    }
}
