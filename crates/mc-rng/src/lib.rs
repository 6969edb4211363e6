//! `mc-rng` — reproducible random numbers shared by concurrent workers.
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`mt`]      | `Mt19937`, the 32-bit Mersenne Twister core               |
//! | [`engine`]  | `RandomEngine`: locked uniform/Gaussian draws, singleton  |
//!
//! The crate has no knowledge of thread pools: any number of threads may call
//! into the same [`RandomEngine`] and the value set they collectively observe
//! is a prefix of the single-threaded sequence.
//!
//! ```rust
//! use mc_rng::RandomEngine;
//!
//! let rng = RandomEngine::new(1);
//! let u = rng.uniform();
//! assert!((0.0..1.0).contains(&u));
//! let _g = rng.gaussian();
//! ```

pub mod engine;
pub mod mt;

#[cfg(test)]
mod tests;

pub use engine::{DEFAULT_SEED, RandomEngine, ZERO_SEED_FALLBACK};
pub use mt::Mt19937;
