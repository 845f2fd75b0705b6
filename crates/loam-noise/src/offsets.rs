//! Seeded per-octave offsets.
//!
//! Each generation call derives its own RNG from the seed, so the same seed
//! always yields the same offsets regardless of thread or platform.

use glam::{DVec2, DVec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Offsets are drawn from `[-OFFSET_RANGE, OFFSET_RANGE)` on every axis.
pub const OFFSET_RANGE: i32 = 1000;

/// Derive the deterministic RNG for a generation seed.
pub fn octave_rng(seed: i64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed as u64)
}

/// Draw `octaves` 2D offsets for a planar field.
pub fn offsets_2d(seed: i64, octaves: u32) -> Vec<DVec2> {
    let mut rng = octave_rng(seed);
    (0..octaves)
        .map(|_| {
            let x = draw(&mut rng);
            let y = draw(&mut rng);
            DVec2::new(x, y)
        })
        .collect()
}

/// Draw `octaves` 3D offsets for a volume.
pub fn offsets_3d(seed: i64, octaves: u32) -> Vec<DVec3> {
    let mut rng = octave_rng(seed);
    (0..octaves)
        .map(|_| {
            let x = draw(&mut rng);
            let y = draw(&mut rng);
            let z = draw(&mut rng);
            DVec3::new(x, y, z)
        })
        .collect()
}

#[inline]
fn draw(rng: &mut ChaCha8Rng) -> f64 {
    rng.random_range(-OFFSET_RANGE..OFFSET_RANGE) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_offsets() {
        assert_eq!(offsets_2d(42, 8), offsets_2d(42, 8));
        assert_eq!(offsets_3d(-7, 5), offsets_3d(-7, 5));
    }

    #[test]
    fn test_different_seeds_differ() {
        assert_ne!(
            offsets_2d(42, 4),
            offsets_2d(43, 4),
            "Adjacent seeds should produce different offsets"
        );
    }

    #[test]
    fn test_length_matches_octave_count() {
        assert_eq!(offsets_2d(1, 0).len(), 0);
        assert_eq!(offsets_2d(1, 6).len(), 6);
        assert_eq!(offsets_3d(1, 3).len(), 3);
    }

    #[test]
    fn test_offsets_within_range() {
        for offset in offsets_3d(9999, 256) {
            for axis in offset.to_array() {
                assert!(
                    (-1000.0..1000.0).contains(&axis),
                    "Offset component {axis} outside [-1000, 1000)"
                );
                assert_eq!(axis.fract(), 0.0, "Offsets are whole numbers");
            }
        }
    }

    #[test]
    fn test_prefix_is_stable_across_octave_counts() {
        let short = offsets_2d(5, 2);
        let long = offsets_2d(5, 6);
        assert_eq!(&long[..2], &short[..]);
    }
}
