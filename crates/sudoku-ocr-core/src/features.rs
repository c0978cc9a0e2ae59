//! Fixed-length glyph descriptors.
//!
//! A glyph mask of `H x W` is covered by a 10x10 lattice of blocks of
//! `H/10 x W/10` pixels. Each block is extended by one extra row and column
//! into its neighbours before averaging, which smooths the descriptor for
//! glyphs whose size is not a multiple of ten. The last component is the
//! ink fraction of the whole glyph.

use crate::BinaryMask;
use serde::{Deserialize, Serialize};

/// Lattice cells per side.
pub const FEATURE_LATTICE: usize = 10;
/// Components of a [`FeatureVector`]: the lattice plus one global mean.
pub const FEATURE_LEN: usize = FEATURE_LATTICE * FEATURE_LATTICE + 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FeatureVectorError {
    #[error("feature vector must have {expected} components, got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("feature component {index} = {value} is outside [0, 1]")]
    OutOfRange { index: usize, value: f32 },
}

/// 101 ink fractions in `[0, 1]`: indices `0..100` are the lattice in
/// row-major order, index `100` is the whole-glyph mean.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Lattice block `(row, col)`.
    #[inline]
    pub fn block(&self, row: usize, col: usize) -> f32 {
        self.0[row * FEATURE_LATTICE + col]
    }

    #[inline]
    pub fn global_mean(&self) -> f32 {
        self.0[FEATURE_LEN - 1]
    }

    /// Plain Euclidean distance over all components.
    pub fn distance(&self, other: &FeatureVector) -> f32 {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
    }
}

impl TryFrom<Vec<f32>> for FeatureVector {
    type Error = FeatureVectorError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        if values.len() != FEATURE_LEN {
            return Err(FeatureVectorError::WrongLength {
                expected: FEATURE_LEN,
                got: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !(0.0..=1.0).contains(v)) {
            return Err(FeatureVectorError::OutOfRange {
                index,
                value: values[index],
            });
        }
        Ok(Self(values))
    }
}

impl From<FeatureVector> for Vec<f32> {
    fn from(v: FeatureVector) -> Self {
        v.0
    }
}

/// Reduce a glyph mask to its [`FeatureVector`].
///
/// Glyphs smaller than 10 pixels on a side still produce 101 components;
/// the lattice then collapses onto the first row/column.
pub fn extract_features(glyph: &BinaryMask) -> FeatureVector {
    let unit_h = glyph.height() / FEATURE_LATTICE;
    let unit_w = glyph.width() / FEATURE_LATTICE;

    let mut out = Vec::with_capacity(FEATURE_LEN);
    for row in 0..FEATURE_LATTICE {
        for col in 0..FEATURE_LATTICE {
            let rows = row * unit_h..(row + 1) * unit_h + 1;
            let cols = col * unit_w..(col + 1) * unit_w + 1;
            out.push(glyph.block_mean(rows, cols));
        }
    }
    out.push(glyph.mean());
    FeatureVector(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn length_is_fixed_for_any_size() {
        for (w, h) in [(10, 10), (13, 27), (40, 11), (3, 4)] {
            let mask = BinaryMask::from_fn(w, h, |x, y| (x + y) % 3 == 0).unwrap();
            assert_eq!(extract_features(&mask).as_slice().len(), FEATURE_LEN);
        }
    }

    #[test]
    fn blank_and_solid_glyphs_are_constant() {
        let blank = BinaryMask::from_fn(23, 31, |_, _| false).unwrap();
        let solid = BinaryMask::from_fn(23, 31, |_, _| true).unwrap();
        assert!(extract_features(&blank).as_slice().iter().all(|&v| v == 0.0));
        assert!(extract_features(&solid).as_slice().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn blocks_overlap_by_one_line() {
        // 20x20, ink only in column 2: block (r, 0) covers columns 0..3 and
        // block (r, 1) covers columns 2..5, so both see it.
        let mask = BinaryMask::from_fn(20, 20, |x, _| x == 2).unwrap();
        let f = extract_features(&mask);
        assert_relative_eq!(f.block(0, 0), 1.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(f.block(0, 1), 1.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(f.block(0, 2), 0.0);
        assert_relative_eq!(f.global_mean(), 1.0 / 20.0, epsilon = 1e-6);
    }

    #[test]
    fn last_blocks_are_clipped_to_glyph() {
        // 10x10: every block is 2x2 except the last row/column which clip to 1.
        let mask = BinaryMask::from_fn(10, 10, |x, y| x == 9 && y == 9).unwrap();
        let f = extract_features(&mask);
        assert_relative_eq!(f.block(9, 9), 1.0);
        assert_relative_eq!(f.block(8, 8), 0.25);
    }

    #[test]
    fn try_from_validates_length_and_range() {
        assert!(matches!(
            FeatureVector::try_from(vec![0.5; 100]),
            Err(FeatureVectorError::WrongLength { got: 100, .. })
        ));
        let mut values = vec![0.5; FEATURE_LEN];
        values[7] = 1.5;
        assert!(matches!(
            FeatureVector::try_from(values),
            Err(FeatureVectorError::OutOfRange { index: 7, .. })
        ));
        assert!(FeatureVector::try_from(vec![0.25; FEATURE_LEN]).is_ok());
    }

    #[test]
    fn distance_is_euclidean() {
        let a = FeatureVector::try_from(vec![0.0; FEATURE_LEN]).unwrap();
        let mut values = vec![0.0; FEATURE_LEN];
        values[0] = 0.3;
        values[100] = 0.4;
        let b = FeatureVector::try_from(values).unwrap();
        assert_relative_eq!(a.distance(&b), 0.5, epsilon = 1e-6);
        assert_relative_eq!(b.distance(&b), 0.0);
    }
}
