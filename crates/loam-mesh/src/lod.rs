//! Quantized level-of-detail decimation for grid meshes.

use crate::error::MeshError;

/// Grid decimation level. Level 0 keeps every sample; level `n` keeps every
/// `2n`-th row and column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LevelOfDetail(u8);

impl LevelOfDetail {
    /// Finest level.
    pub const FULL: Self = Self(0);
    /// Coarsest supported level.
    pub const MAX: u8 = 6;

    /// # Errors
    ///
    /// Returns [`MeshError::InvalidArgument`] if `level > 6`.
    pub fn new(level: u8) -> Result<Self, MeshError> {
        if level > Self::MAX {
            return Err(MeshError::InvalidArgument(format!(
                "level of detail {level} exceeds maximum {}",
                Self::MAX
            )));
        }
        Ok(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Stride between sampled grid points.
    pub fn increment(self) -> usize {
        if self.0 == 0 { 1 } else { self.0 as usize * 2 }
    }

    /// Number of samples kept along an axis of `extent` cells.
    pub fn sampled_count(self, extent: usize) -> usize {
        if extent == 0 {
            return 0;
        }
        (extent - 1) / self.increment() + 1
    }
}

impl TryFrom<u8> for LevelOfDetail {
    type Error = MeshError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_per_level() {
        let increments: Vec<usize> = (0..=6)
            .map(|l| LevelOfDetail::new(l).unwrap().increment())
            .collect();
        assert_eq!(increments, vec![1, 2, 4, 6, 8, 10, 12]);
    }

    #[test]
    fn test_sampled_count_for_standard_chunk() {
        // 241 = 240 + 1 divides evenly for every increment.
        for level in 0..=6 {
            let lod = LevelOfDetail::new(level).unwrap();
            assert_eq!(lod.sampled_count(241), 240 / lod.increment() + 1);
        }
        assert_eq!(LevelOfDetail::new(6).unwrap().sampled_count(241), 21);
    }

    #[test]
    fn test_sampled_count_uneven_extent() {
        let lod = LevelOfDetail::new(1).unwrap();
        // Samples at 0, 2, 4 of extent 6.
        assert_eq!(lod.sampled_count(6), 3);
        assert_eq!(lod.sampled_count(1), 1);
    }

    #[test]
    fn test_level_above_six_rejected() {
        assert!(matches!(
            LevelOfDetail::new(7),
            Err(MeshError::InvalidArgument(_))
        ));
        assert!(LevelOfDetail::try_from(6).is_ok());
    }
}
