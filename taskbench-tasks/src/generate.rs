// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Seeded random test data.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic generator for a given seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Row-major n×n matrix with entries drawn uniformly from `[min, max]`.
pub fn random_square_matrix<R: Rng>(n: usize, min: f64, max: f64, rng: &mut R) -> Vec<f64> {
    (0..n * n).map(|_| rng.gen_range(min..=max)).collect()
}

/// Image of `pixels` intensities drawn uniformly from `[min, max]`.
pub fn random_image<R: Rng>(pixels: usize, min: i32, max: i32, rng: &mut R) -> Vec<i32> {
    (0..pixels).map(|_| rng.gen_range(min..=max)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_shape_and_range() {
        let m = random_square_matrix(16, -50.0, 50.0, &mut seeded_rng(1));
        assert_eq!(m.len(), 256);
        assert!(m.iter().all(|v| (-50.0..=50.0).contains(v)));
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = random_image(100, 0, 255, &mut seeded_rng(9));
        let b = random_image(100, 0, 255, &mut seeded_rng(9));
        assert_eq!(a, b);
        assert!(a.iter().all(|p| (0..=255).contains(p)));
    }

    #[test]
    fn test_degenerate_range() {
        let img = random_image(10, 7, 7, &mut seeded_rng(0));
        assert!(img.iter().all(|p| *p == 7));
    }
}
