//! Unit tests for mc-rng.
//!
//! Only `singleton` touches `RandomEngine::instance()`; everything else uses
//! owned engines so tests can run in parallel.


#[cfg(test)]
mod mt {
    use rand::{Rng, RngCore, SeedableRng};

    use crate::Mt19937;

    #[test]
    fn canonical_default_seed_10000th_output() {
        let mut mt = Mt19937::new(5489);
        let mut last = 0;
        for _ in 0..10_000 {
            last = mt.next_word();
        }
        assert_eq!(last, 4_123_659_995);
    }

    #[test]
    fn seed_one_prefix() {
        let mut mt = Mt19937::new(1);
        let words: Vec<u32> = (0..5).map(|_| mt.next_word()).collect();
        assert_eq!(words, [1_791_095_845, 4_282_876_139, 3_093_770_124, 4_005_303_368, 491_263]);
    }

    #[test]
    fn reseed_in_place_matches_fresh() {
        let mut used = Mt19937::new(99);
        for _ in 0..1000 {
            used.next_word();
        }
        used.reseed(7);
        let mut fresh = Mt19937::new(7);
        for _ in 0..2000 {
            assert_eq!(used.next_word(), fresh.next_word());
        }
    }

    #[test]
    fn seeded_state_is_never_degenerate() {
        for seed in [0, 1, 5489, u32::MAX] {
            assert!(!Mt19937::new(seed).is_degenerate());
        }
    }

    #[test]
    fn next_u64_is_low_word_first() {
        let mut a = Mt19937::new(3);
        let mut b = Mt19937::new(3);
        let lo = u64::from(b.next_word());
        let hi = u64::from(b.next_word());
        assert_eq!(a.next_u64(), (hi << 32) | lo);
    }

    #[test]
    fn fill_bytes_handles_partial_words() {
        let mut a = Mt19937::new(11);
        let mut b = Mt19937::new(11);
        let mut buf = [0u8; 6];
        a.fill_bytes(&mut buf);
        let w0 = b.next_word().to_le_bytes();
        let w1 = b.next_word().to_le_bytes();
        assert_eq!(&buf[..4], &w0);
        assert_eq!(&buf[4..], &w1[..2]);
    }

    #[test]
    fn from_seed_is_little_endian_u32() {
        let mut a = Mt19937::from_seed(42u32.to_le_bytes());
        let mut b = Mt19937::new(42);
        assert_eq!(a.next_u32(), b.next_word());
    }

    #[test]
    fn works_with_rand_distributions() {
        let mut mt = Mt19937::new(8);
        for _ in 0..1000 {
            let v = mt.gen_range(10..20);
            assert!((10..20).contains(&v));
        }
    }
}

#[cfg(test)]
mod engine {
    use approx::assert_abs_diff_eq;

    use super::reference::{GAUSSIAN, LEN, UNIFORM};
    use crate::engine::word_to_unit;
    use crate::{DEFAULT_SEED, RandomEngine, ZERO_SEED_FALLBACK};

    const UNIFORM_EPS: f32 = 1e-7;
    const GAUSSIAN_EPS: f32 = 1e-7;

    #[test]
    fn uniform_matches_reference_sequence() {
        let rng = RandomEngine::new(DEFAULT_SEED);
        for (i, &want) in UNIFORM.iter().enumerate() {
            let got = rng.uniform();
            assert!((got - want).abs() < UNIFORM_EPS, "draw {i}: got {got}, want {want}");
        }
    }

    #[test]
    fn gaussian_matches_reference_sequence() {
        let rng = RandomEngine::new(DEFAULT_SEED);
        for (i, &want) in GAUSSIAN.iter().enumerate() {
            let got = rng.gaussian();
            assert!((got - want).abs() < GAUSSIAN_EPS, "draw {i}: got {got}, want {want}");
        }
    }

    #[test]
    fn uniform_prefix_repeats_after_reset() {
        let rng = RandomEngine::default();
        let first: Vec<f32> = (0..5).map(|_| rng.uniform()).collect();
        let expected: [f32; 5] = [0.417_021_99, 0.997_184_81, 0.720_324_52, 0.932_557_34, 0.000_114_38];
        for (got, want) in first.iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = UNIFORM_EPS);
        }

        rng.reset();
        let again: Vec<f32> = (0..5).map(|_| rng.uniform()).collect();
        assert_eq!(bits(&first), bits(&again));
    }

    #[test]
    fn gaussian_prefix_repeats_after_reset() {
        let rng = RandomEngine::default();
        let first: Vec<f32> = (0..3).map(|_| rng.gaussian()).collect();
        let expected: [f32; 3] = [0.156_065_69, 0.306_399_67, -0.568_039_77];
        for (got, want) in first.iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = GAUSSIAN_EPS);
        }

        rng.reset();
        let again: Vec<f32> = (0..3).map(|_| rng.gaussian()).collect();
        assert_eq!(bits(&first), bits(&again));
    }

    #[test]
    fn reset_discards_pending_spare() {
        let rng = RandomEngine::default();
        let head = rng.gaussian();
        assert!(rng.has_spare_gaussian());

        rng.reset();
        assert!(!rng.has_spare_gaussian());
        assert_eq!(rng.advances(), 0);
        assert_eq!(rng.gaussian().to_bits(), head.to_bits());
    }

    #[test]
    fn same_seed_is_bit_identical() {
        let a = RandomEngine::new(2024);
        let b = RandomEngine::new(2024);
        for i in 0..4096 {
            let (x, y) = if i % 3 == 0 {
                (a.gaussian(), b.gaussian())
            } else {
                (a.uniform(), b.uniform())
            };
            assert_eq!(x.to_bits(), y.to_bits(), "diverged at draw {i}");
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = RandomEngine::new(1);
        let b = RandomEngine::new(2);
        assert_ne!(a.uniform().to_bits(), b.uniform().to_bits());
    }

    #[test]
    fn reseed_switches_sequence_in_place() {
        let rng = RandomEngine::new(1);
        rng.uniform();
        rng.reseed(77);
        let fresh = RandomEngine::new(77);
        assert_eq!(rng.seed(), 77);
        for _ in 0..100 {
            assert_eq!(rng.uniform().to_bits(), fresh.uniform().to_bits());
        }
    }

    #[test]
    fn zero_seed_uses_fallback() {
        let zero = RandomEngine::new(0);
        let fallback = RandomEngine::new(ZERO_SEED_FALLBACK);
        assert_eq!(zero.seed(), ZERO_SEED_FALLBACK);
        for _ in 0..100 {
            assert_eq!(zero.uniform().to_bits(), fallback.uniform().to_bits());
        }

        zero.reseed(0);
        assert_eq!(zero.seed(), ZERO_SEED_FALLBACK);
    }

    #[test]
    fn uniform_stays_below_one() {
        assert!(word_to_unit(u32::MAX) < 1.0);
        assert!(word_to_unit(u32::MAX - 64) < 1.0);
        assert_eq!(word_to_unit(0), 0.0);

        let rng = RandomEngine::new(5);
        for _ in 0..100_000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u), "{u}");
        }
    }

    #[test]
    fn uniform_advances_once_per_draw() {
        let rng = RandomEngine::new(9);
        for n in 1..=50 {
            rng.uniform();
            assert_eq!(rng.advances(), n);
        }
    }

    #[test]
    fn gaussian_spare_empties_on_even_calls() {
        let rng = RandomEngine::default();
        for call in 1..=2000u32 {
            let before = rng.advances();
            rng.gaussian();
            let consumed = rng.advances() - before;

            if call % 2 == 1 {
                // Fresh pair: at least one accepted pair of uniforms.
                assert!(consumed >= 2 && consumed % 2 == 0, "call {call} consumed {consumed}");
                assert!(rng.has_spare_gaussian());
            } else {
                assert_eq!(consumed, 0, "call {call} should use the spare");
                assert!(!rng.has_spare_gaussian());
                assert_eq!(rng.advances() % 2, 0);
            }
        }
    }

    #[test]
    fn first_pair_needs_one_rejection() {
        // The first two uniforms fall outside the unit circle.
        let rng = RandomEngine::default();
        rng.gaussian();
        assert_eq!(rng.advances(), 4);
    }

    #[test]
    fn fill_matches_single_draws() {
        let single = RandomEngine::new(31);
        let batched = RandomEngine::new(31);

        let mut buf = [0.0f32; 33];
        batched.fill_gaussian(&mut buf);
        let expected: Vec<f32> = (0..33).map(|_| single.gaussian()).collect();
        assert_eq!(bits(&buf), bits(&expected));

        // The odd-length fill leaves a spare behind for the next caller.
        assert_eq!(batched.has_spare_gaussian(), single.has_spare_gaussian());

        batched.fill_uniform(&mut buf);
        let expected: Vec<f32> = (0..33).map(|_| single.uniform()).collect();
        assert_eq!(bits(&buf), bits(&expected));
    }

    #[test]
    fn gaussian_moments_are_standard() {
        let rng = RandomEngine::new(123);
        let n = 200_000;
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for _ in 0..n {
            let g = f64::from(rng.gaussian());
            sum += g;
            sum_sq += g * g;
        }
        let mean = sum / n as f64;
        let var = sum_sq / n as f64 - mean * mean;
        assert!(mean.abs() < 0.01, "mean {mean}");
        assert!((var - 1.0).abs() < 0.02, "variance {var}");
    }

    #[test]
    fn reference_tables_are_complete() {
        assert_eq!(UNIFORM.len(), LEN);
        assert_eq!(GAUSSIAN.len(), LEN);
    }

    fn bits(v: &[f32]) -> Vec<u32> {
        v.iter().map(|x| x.to_bits()).collect()
    }
}

#[cfg(test)]
mod concurrency {
    use std::thread;

    use crate::RandomEngine;

    const THREADS: usize = 8;
    const PER_THREAD: usize = 128;
    const TOTAL: usize = THREADS * PER_THREAD;

    fn concurrent_draws(rng: &RandomEngine, draw: fn(&RandomEngine) -> f32) -> Vec<u32> {
        let mut all: Vec<u32> = thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| s.spawn(move || (0..PER_THREAD).map(|_| draw(rng).to_bits()).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().expect("draw thread panicked"))
                .collect()
        });
        all.sort_unstable();
        all
    }

    fn sequential_draws(rng: &RandomEngine, draw: fn(&RandomEngine) -> f32) -> Vec<u32> {
        let mut all: Vec<u32> = (0..TOTAL).map(|_| draw(rng).to_bits()).collect();
        all.sort_unstable();
        all
    }

    #[test]
    fn concurrent_uniforms_are_a_permutation_of_the_prefix() {
        let shared = RandomEngine::new(17);
        let got = concurrent_draws(&shared, RandomEngine::uniform);
        let want = sequential_draws(&RandomEngine::new(17), RandomEngine::uniform);
        assert_eq!(got, want);
        assert_eq!(shared.advances(), TOTAL as u64);
    }

    #[test]
    fn concurrent_gaussians_are_a_permutation_of_the_prefix() {
        let shared = RandomEngine::new(17);
        let got = concurrent_draws(&shared, RandomEngine::gaussian);
        let want = sequential_draws(&RandomEngine::new(17), RandomEngine::gaussian);
        assert_eq!(got, want);
        // An even number of logical draws always leaves the spare empty.
        assert!(!shared.has_spare_gaussian());
    }

    #[test]
    fn reset_racing_with_draws_leaves_engine_consistent() {
        let rng = RandomEngine::new(4);
        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..2000 {
                        rng.gaussian();
                    }
                });
            }
            s.spawn(|| {
                for seed in 1..50 {
                    rng.reseed(seed);
                }
            });
        });

        rng.reseed(4);
        let fresh = RandomEngine::new(4);
        for _ in 0..256 {
            assert_eq!(rng.gaussian().to_bits(), fresh.gaussian().to_bits());
        }
    }
}

#[cfg(test)]
mod singleton {
    use crate::{DEFAULT_SEED, RandomEngine};

    #[test]
    fn instance_is_shared_and_resettable() {
        let a = RandomEngine::instance();
        let b = RandomEngine::instance();
        assert!(std::ptr::eq(a, b));

        a.reseed(555);
        let first: Vec<u32> = (0..10).map(|_| b.uniform().to_bits()).collect();
        a.reseed(555);
        let again: Vec<u32> = (0..10).map(|_| a.uniform().to_bits()).collect();
        assert_eq!(first, again);

        a.reset();
        assert_eq!(a.seed(), DEFAULT_SEED);
        assert_eq!(a.uniform().to_bits(), RandomEngine::new(DEFAULT_SEED).uniform().to_bits());
    }
}
