//! Deterministic hash and 1-D value noise.
//!
//! Everything here is pure and seed-parameterized: the same `(i, seed)` or
//! `(t, seed)` always yields the same value, on every platform.
//!
//! # Functions
//!
//! - [`hash01`] - integer lattice hash normalized to `[0, 1)`
//! - [`smoothstep`] - cubic ease `3x² - 2x³`
//! - [`value_noise_1d`] - smooth noise built by easing between lattice hashes
//!
//! # Example
//!
//! ```
//! use snowfield::noise::{hash01, value_noise_1d};
//!
//! // At integer positions the noise is exactly the lattice hash.
//! assert_eq!(value_noise_1d(3.0, 42), hash01(3, 42));
//! ```

const LATTICE_MUL: u32 = 374_761_393;
const SEED_MUL: u32 = 668_265_263;
const MIX_MUL: u32 = 1_274_126_177;

/// 2^-24, the spacing of the 24-bit output grid.
const UNIT_24: f32 = 1.0 / 16_777_216.0;

/// Hash an integer lattice coordinate and a seed to a float in `[0, 1)`.
///
/// Mixing is done in wrapping 32-bit arithmetic, so negative `i` values are
/// hashed through their two's-complement bit pattern. Only the top 24 bits of
/// the mixed value are kept, which is exactly the precision of an `f32`
/// mantissa and keeps the result strictly below `1.0`.
#[inline]
pub fn hash01(i: i32, seed: u32) -> f32 {
    let mut n = (i as u32)
        .wrapping_mul(LATTICE_MUL)
        .wrapping_add(seed.wrapping_mul(SEED_MUL));
    n = (n ^ (n >> 13)).wrapping_mul(MIX_MUL);
    n ^= n >> 16;
    (n >> 8) as f32 * UNIT_24
}

/// Cubic ease `3x² - 2x³` on `[0, 1]`.
///
/// Zero slope at both ends, which is what keeps [`value_noise_1d`]
/// C¹-continuous across lattice points.
#[inline]
pub fn smoothstep(x: f32) -> f32 {
    x * x * (3.0 - 2.0 * x)
}

/// 1-D value noise in `[0, 1)`.
///
/// Samples [`hash01`] at `floor(t)` and `floor(t) + 1` and blends them with
/// [`smoothstep`] of the fractional part. Continuous in `t`; equal to
/// `hash01(k, seed)` at every integer `k`.
#[inline]
pub fn value_noise_1d(t: f32, seed: u32) -> f32 {
    let floor = t.floor();
    let i0 = floor as i32;
    let i1 = i0.wrapping_add(1);
    let f = t - floor;

    let a = hash01(i0, seed);
    let b = hash01(i1, seed);
    let u = smoothstep(f);
    a * (1.0 - u) + b * u
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_smoothstep_monotonic() {
        let mut prev = smoothstep(0.0);
        for k in 1..=1000 {
            let v = smoothstep(k as f32 / 1000.0);
            assert!(v >= prev, "smoothstep decreased at x = {}", k as f32 / 1000.0);
            prev = v;
        }
    }

    #[test]
    fn test_smoothstep_flat_at_ends() {
        let h = 1e-3;
        let slope_start = (smoothstep(h) - smoothstep(0.0)) / h;
        let slope_end = (smoothstep(1.0) - smoothstep(1.0 - h)) / h;
        assert!(slope_start < 0.01);
        assert!(slope_end < 0.01);
    }

    #[test]
    fn test_hash01_range() {
        for seed in [0u32, 1, 42, 999, 10_999, u32::MAX] {
            for i in -5_000..5_000 {
                let v = hash01(i, seed);
                assert!((0.0..1.0).contains(&v), "hash01({i}, {seed}) = {v}");
            }
        }
        for i in [i32::MIN, i32::MAX, 0] {
            assert!(hash01(i, 7) < 1.0);
        }
    }

    #[test]
    fn test_hash01_deterministic() {
        assert_eq!(hash01(17, 42), hash01(17, 42));
        assert_eq!(hash01(-3, 0), hash01(-3, 0));
    }

    #[test]
    fn test_hash01_low_collision_rate() {
        // 10k samples on a 2^24 grid: expected exact-collision count is ~3.
        let mut values: Vec<u32> = (0..10_000)
            .map(|i| (hash01(i, 42) / UNIT_24) as u32)
            .collect();
        values.sort_unstable();
        let collisions = values.windows(2).filter(|w| w[0] == w[1]).count();
        assert!(collisions <= 20, "{collisions} collisions in 10k samples");
    }

    #[test]
    fn test_hash01_decorrelates_seeds() {
        let differing = (0..1_000)
            .filter(|&i| (hash01(i, 1) - hash01(i, 2)).abs() > 1e-3)
            .count();
        assert!(differing > 990);
    }

    #[test]
    fn test_hash01_spreads_over_range() {
        let mut buckets = [0u32; 10];
        for i in 0..10_000 {
            buckets[(hash01(i, 5) * 10.0) as usize] += 1;
        }
        for (b, count) in buckets.iter().enumerate() {
            assert!(
                (700..1300).contains(count),
                "bucket {b} holds {count} of 10000"
            );
        }
    }

    #[test]
    fn test_noise_matches_hash_at_integers() {
        for k in -20..20 {
            assert_eq!(value_noise_1d(k as f32, 42), hash01(k, 42));
        }
    }

    #[test]
    fn test_noise_continuous_across_integers() {
        let eps = 1e-4;
        for k in -10..10 {
            let t = k as f32;
            let left = value_noise_1d(t - eps, 7);
            let right = value_noise_1d(t + eps, 7);
            assert!((left - right).abs() < 1e-3, "jump at t = {t}");
        }
    }

    #[test]
    fn test_noise_small_steps_small_changes() {
        let mut t = -3.0f32;
        let mut prev = value_noise_1d(t, 1234);
        while t < 3.0 {
            t += 0.001;
            let v = value_noise_1d(t, 1234);
            // max slope of the eased blend is 1.5 per unit t
            assert!((v - prev).abs() <= 0.0016, "step too large at t = {t}");
            prev = v;
        }
    }

    #[test]
    fn test_noise_range() {
        for k in 0..5_000 {
            let v = value_noise_1d(k as f32 * 0.137 - 300.0, 99);
            assert!((0.0..1.0).contains(&v));
        }
    }
}
