//! The process-wide random engine.
//!
//! # Determinism strategy
//!
//! Every draw in a run comes from one canonical MT19937 stream.  Workers do
//! not get independent streams; instead each public draw runs inside a single
//! critical section on the engine, so after `reset` any `N` draws made by any
//! number of threads are exactly the first `N` values of the single-threaded
//! sequence, in some order:
//!
//! - no value is produced twice and none is skipped,
//! - which thread receives which value is unspecified,
//! - a single-threaded run after the same seed is bit-identical every time.
//!
//! The Gaussian path keeps one spare deviate between calls.  Reading or
//! refilling the spare happens in the same critical section as the uniform
//! draws it consumes, and reseeding clears it.
//!
//! # Mapping from words to floats
//!
//! | Draw       | Core words consumed | Mapping                                    |
//! |------------|---------------------|--------------------------------------------|
//! | uniform    | 1                   | `word as f32 / 2^32`, clamped below 1.0    |
//! | gaussian   | 0 or 2k, k ≥ 1      | Marsaglia polar method on two uniforms     |

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, warn};

use crate::Mt19937;

/// Seed used by [`RandomEngine::reset`] and the lazily created instance.
pub const DEFAULT_SEED: u32 = 1;

/// Seed substituted for a requested seed of zero.
pub const ZERO_SEED_FALLBACK: u32 = 5489;

/// Generator period as an `f32` divisor.
const WORD_RANGE: f32 = 4_294_967_296.0;

/// Largest `f32` strictly below 1.0.
const BELOW_ONE: f32 = f32::from_bits(0x3f7f_ffff);

static INSTANCE: OnceLock<RandomEngine> = OnceLock::new();

// ── EngineState ───────────────────────────────────────────────────────────────

/// Everything guarded by the engine lock.
#[derive(Debug)]
struct EngineState {
    core:     Mt19937,
    /// Second deviate of the last accepted polar pair, if not yet returned.
    spare:    Option<f32>,
    seed:     u32,
    /// Core words consumed since the last reseed.
    advances: u64,
}

impl EngineState {
    fn new(seed: u32) -> Self {
        let seed = effective_seed(seed);
        EngineState {
            core:     Mt19937::new(seed),
            spare:    None,
            seed,
            advances: 0,
        }
    }

    fn reseed(&mut self, seed: u32) {
        let seed = effective_seed(seed);
        self.core.reseed(seed);
        debug_assert!(!self.core.is_degenerate());
        self.spare = None;
        self.seed = seed;
        self.advances = 0;
    }

    #[inline]
    fn uniform(&mut self) -> f32 {
        self.advances += 1;
        word_to_unit(self.core.next_word())
    }

    fn gaussian(&mut self) -> f32 {
        if let Some(spare) = self.spare.take() {
            return spare;
        }

        let (x, y, r2) = loop {
            let x = 2.0 * self.uniform() - 1.0;
            let y = 2.0 * self.uniform() - 1.0;
            let r2 = x * x + y * y;
            if r2 <= 1.0 && r2 != 0.0 {
                break (x, y, r2);
            }
        };

        let mult = (-2.0 * r2.ln() / r2).sqrt();
        self.spare = Some(y * mult);
        x * mult
    }
}

/// Map a raw word onto `[0, 1)`.
///
/// Words within half an `f32` ulp of 2^32 round up to exactly 1.0 during the
/// conversion; those are pulled back to the largest value below one.
#[inline]
pub(crate) fn word_to_unit(word: u32) -> f32 {
    let u = word as f32 / WORD_RANGE;
    if u >= 1.0 { BELOW_ONE } else { u }
}

fn effective_seed(seed: u32) -> u32 {
    if seed == 0 {
        warn!(fallback = ZERO_SEED_FALLBACK, "seed 0 requested; using fallback seed");
        ZERO_SEED_FALLBACK
    } else {
        seed
    }
}

// ── RandomEngine ──────────────────────────────────────────────────────────────

/// Thread-safe uniform and Gaussian deviates from one canonical sequence.
///
/// Use [`RandomEngine::instance`] for the process-wide engine, or
/// [`RandomEngine::new`] for an independently owned one with the same
/// semantics (tests, embedded drivers).
///
/// # Reseeding while draws are in flight
///
/// [`reset`][Self::reset] and [`reseed`][Self::reseed] are atomic with respect
/// to draws: no draw ever observes a half-reset state or a stale spare.  Draws
/// racing with a reset may land on either side of it, so a run that needs the
/// canonical sequence must reset before submitting any work.
#[derive(Debug)]
pub struct RandomEngine {
    state: Mutex<EngineState>,
}

impl RandomEngine {
    /// The process-wide engine, created on first use with [`DEFAULT_SEED`].
    pub fn instance() -> &'static RandomEngine {
        INSTANCE.get_or_init(|| RandomEngine::new(DEFAULT_SEED))
    }

    /// An engine owned by the caller.  A seed of 0 is replaced by
    /// [`ZERO_SEED_FALLBACK`].
    pub fn new(seed: u32) -> Self {
        RandomEngine { state: Mutex::new(EngineState::new(seed)) }
    }

    /// Reseed with [`DEFAULT_SEED`], clear the Gaussian spare and rewind the
    /// draw cursor to 0.
    pub fn reset(&self) {
        self.reseed(DEFAULT_SEED);
    }

    /// Reseed with `seed`, clear the Gaussian spare and rewind the draw cursor
    /// to 0.  Does not wait for draws on other threads to finish.
    pub fn reseed(&self, seed: u32) {
        let mut state = self.lock();
        state.reseed(seed);
        debug!(seed = state.seed, "random engine reseeded");
    }

    /// Next uniform deviate in `[0, 1)`.  Consumes exactly one core word.
    #[inline]
    pub fn uniform(&self) -> f32 {
        self.lock().uniform()
    }

    /// Next standard-normal deviate.
    ///
    /// Calls alternate between generating a pair (consuming an even, variable
    /// number of core words because of rejection) and returning the cached
    /// second half of that pair (consuming none).
    pub fn gaussian(&self) -> f32 {
        self.lock().gaussian()
    }

    /// Fill `out` with the next `out.len()` uniforms, holding the lock once.
    pub fn fill_uniform(&self, out: &mut [f32]) {
        let mut state = self.lock();
        for v in out.iter_mut() {
            *v = state.uniform();
        }
    }

    /// Fill `out` with the next `out.len()` Gaussians, holding the lock once.
    pub fn fill_gaussian(&self, out: &mut [f32]) {
        let mut state = self.lock();
        for v in out.iter_mut() {
            *v = state.gaussian();
        }
    }

    /// Seed in effect (after zero-seed substitution).
    pub fn seed(&self) -> u32 {
        self.lock().seed
    }

    /// Core words consumed since the last reseed.
    pub fn advances(&self) -> u64 {
        self.lock().advances
    }

    /// `true` if the next [`gaussian`][Self::gaussian] call will return a
    /// cached value without touching the core generator.
    pub fn has_spare_gaussian(&self) -> bool {
        self.lock().spare.is_some()
    }

    // State updates are never left half-applied by a panic, so a poisoned
    // lock still guards a consistent state.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        RandomEngine::new(DEFAULT_SEED)
    }
}
