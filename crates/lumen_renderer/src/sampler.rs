//! Sample generation: Halton sequences, pixel stratification and
//! per-sample seed derivation.

use lumen_math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound on samples per pixel.
///
/// Keeps sample indices and counts inside `u32`.
pub const MAX_SAMPLES_PER_PIXEL: u32 = 1 << 24;

/// Largest `f32` strictly below one.
pub const ONE_MINUS_EPSILON: f32 = 1.0 - f32::EPSILON / 2.0;

/// Radical inverse of `index` in `base`.
///
/// Stateless, so any element of the sequence can be computed directly.
/// Accumulates in f64 and clamps below one.
///
/// # Panics
///
/// Panics if `base < 2`.
pub fn halton(index: u64, base: u32) -> f32 {
    assert!(base >= 2, "halton base must be at least 2, got {base}");

    let b = base as u64;
    let inv_base = 1.0 / base as f64;
    let mut f = inv_base;
    let mut r = 0.0f64;
    let mut i = index;
    while i > 0 {
        r += f * (i % b) as f64;
        i /= b;
        f *= inv_base;
    }

    (r as f32).min(ONE_MINUS_EPSILON)
}

/// One sub-pixel sample produced by [`StratifiedPattern::samples`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    /// Index of the sample within its pixel
    pub index: u32,
    /// Offset inside the pixel, each component in `[0, 1)`
    pub offset: Vec2,
}

/// Stratified sub-pixel layout.
///
/// The pixel is split into `strata x strata` cells with
/// `strata = ceil(sqrt(spp))`, each receiving `max(spp / strata², 1)`
/// Halton-jittered samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StratifiedPattern {
    strata: u32,
    per_stratum: u32,
}

impl StratifiedPattern {
    /// Build the pattern for a requested samples-per-pixel count.
    ///
    /// The count is clamped to `1..=MAX_SAMPLES_PER_PIXEL`.
    pub fn new(samples_per_pixel: u32) -> Self {
        let spp = samples_per_pixel.clamp(1, MAX_SAMPLES_PER_PIXEL);
        let strata = ceil_sqrt(spp);
        let per_stratum = (spp / (strata * strata)).max(1);
        Self {
            strata,
            per_stratum,
        }
    }

    /// Cells per axis.
    pub fn strata(&self) -> u32 {
        self.strata
    }

    /// Samples taken inside each cell.
    pub fn samples_per_stratum(&self) -> u32 {
        self.per_stratum
    }

    /// Number of samples actually taken per pixel.
    pub fn total_samples(&self) -> u32 {
        self.strata * self.strata * self.per_stratum
    }

    /// Iterate the pixel's samples.
    ///
    /// `first_index` is the Halton index of the first sample; giving each
    /// pixel a disjoint range keeps neighbouring pixels decorrelated.
    pub fn samples(&self, first_index: u64) -> impl Iterator<Item = PixelSample> {
        let strata = self.strata;
        let per_stratum = self.per_stratum;
        let inv_strata = 1.0 / strata as f32;

        (0..strata).flat_map(move |sy| {
            (0..strata).flat_map(move |sx| {
                (0..per_stratum).map(move |k| {
                    let index = (sy * strata + sx) * per_stratum + k;
                    // Index 0 of every base is 0; skip it
                    let j = first_index + index as u64 + 1;
                    let offset = Vec2::new(
                        ((sx as f32 + halton(j, 2)) * inv_strata).min(ONE_MINUS_EPSILON),
                        ((sy as f32 + halton(j, 3)) * inv_strata).min(ONE_MINUS_EPSILON),
                    );
                    PixelSample { index, offset }
                })
            })
        })
    }
}

fn ceil_sqrt(n: u32) -> u32 {
    let n = n as u64;
    let mut root = (n as f64).sqrt() as u64;
    while root * root < n {
        root += 1;
    }
    while root > 1 && (root - 1) * (root - 1) >= n {
        root -= 1;
    }
    root.max(1) as u32
}

/// Seed for one sample of one pixel.
///
/// splitmix64 finalizer over the combined inputs, so nearby pixels and
/// samples get unrelated streams.
pub fn derive_seed(base_seed: u64, pixel_index: u64, sample_index: u32) -> u64 {
    let mut v = base_seed
        ^ pixel_index.wrapping_mul(0x9e3779b97f4a7c15)
        ^ (((sample_index as u64) << 40) | sample_index as u64);
    v = v.wrapping_add(0x9e3779b97f4a7c15);
    v = (v ^ (v >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    v = (v ^ (v >> 27)).wrapping_mul(0x94d049bb133111eb);
    v ^ (v >> 31)
}

/// Seeded uniform random source driving a single path.
#[derive(Debug, Clone)]
pub struct SampleRng {
    rng: StdRng,
}

impl SampleRng {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform value in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halton_base2_prefix() {
        let expected = [0.5, 0.25, 0.75, 0.125, 0.625, 0.375, 0.875, 0.0625];
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(halton(i as u64 + 1, 2), *want);
        }
    }

    #[test]
    fn test_halton_base3_prefix() {
        let expected = [1.0 / 3.0, 2.0 / 3.0, 1.0 / 9.0, 4.0 / 9.0, 7.0 / 9.0];
        for (i, want) in expected.iter().enumerate() {
            assert!((halton(i as u64 + 1, 3) - want).abs() < 1e-6);
        }
    }

    #[test]
    fn test_halton_zero_and_range() {
        assert_eq!(halton(0, 2), 0.0);
        for base in [2, 3, 5, 7] {
            for i in (0..10_000u64).chain([u64::MAX - 1, u64::MAX]) {
                let x = halton(i, base);
                assert!((0.0..1.0).contains(&x), "halton({i}, {base}) = {x}");
            }
        }
    }

    #[test]
    fn test_halton_is_stateless() {
        let a: Vec<f32> = (1..50).map(|i| halton(i, 3)).collect();
        let b: Vec<f32> = (1..50).map(|i| halton(i, 3)).collect();
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic]
    fn test_halton_rejects_base_one() {
        halton(3, 1);
    }

    #[test]
    fn test_pattern_counts() {
        let one = StratifiedPattern::new(1);
        assert_eq!((one.strata(), one.total_samples()), (1, 1));

        let zero = StratifiedPattern::new(0);
        assert_eq!(zero.total_samples(), 1);

        let sixteen = StratifiedPattern::new(16);
        assert_eq!((sixteen.strata(), sixteen.samples_per_stratum()), (4, 1));
        assert_eq!(sixteen.total_samples(), 16);

        // Non-square counts round the grid up
        let ten = StratifiedPattern::new(10);
        assert_eq!(ten.strata(), 4);
        assert_eq!(ten.total_samples(), 16);
        assert!(ten.total_samples() >= 10);
    }

    #[test]
    fn test_huge_sample_counts_are_clamped() {
        let capped = StratifiedPattern::new(MAX_SAMPLES_PER_PIXEL);
        assert_eq!(capped.strata(), 4096);
        assert_eq!(capped.total_samples(), MAX_SAMPLES_PER_PIXEL);

        assert_eq!(StratifiedPattern::new(u32::MAX), capped);
        assert_eq!(ceil_sqrt(u32::MAX), 65536);
    }

    #[test]
    fn test_pattern_yields_total_samples() {
        for spp in [1, 2, 5, 9, 20] {
            let pattern = StratifiedPattern::new(spp);
            assert_eq!(pattern.samples(0).count() as u32, pattern.total_samples());
        }
    }

    #[test]
    fn test_pattern_offsets_stay_in_their_stratum() {
        let pattern = StratifiedPattern::new(9);
        let strata = pattern.strata() as f32;
        for (n, sample) in pattern.samples(1234).enumerate() {
            assert_eq!(sample.index as usize, n);
            let sx = (n as u32 % pattern.strata()) as f32;
            let sy = (n as u32 / pattern.strata()) as f32;
            assert!(sample.offset.x >= sx / strata && sample.offset.x < (sx + 1.0) / strata);
            assert!(sample.offset.y >= sy / strata && sample.offset.y < (sy + 1.0) / strata);
        }
    }

    #[test]
    fn test_derive_seed_spreads() {
        let a = derive_seed(7, 0, 0);
        assert_eq!(a, derive_seed(7, 0, 0));
        assert_ne!(a, derive_seed(7, 1, 0));
        assert_ne!(a, derive_seed(7, 0, 1));
        assert_ne!(a, derive_seed(8, 0, 0));
        assert_ne!(derive_seed(7, 1, 0), derive_seed(7, 0, 1));
    }

    #[test]
    fn test_sample_rng_reproducible() {
        let mut a = SampleRng::new(99);
        let mut b = SampleRng::new(99);
        for _ in 0..100 {
            let x = a.uniform();
            assert_eq!(x, b.uniform());
            assert!((0.0..1.0).contains(&x));
        }
    }
}
