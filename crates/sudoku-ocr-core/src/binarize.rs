//! Fixed-threshold binarization into ink/background masks.

use crate::image::{check_shape, crop_raw, line_iter};
use crate::{Axis, CropRect, InputError, PixelGrid};
use std::ops::{Range, RangeInclusive};

/// Default intensity cutoff: pixels darker than this are ink.
pub const DEFAULT_INK_THRESHOLD: u8 = 128;

pub const BACKGROUND: u8 = 0;
pub const INK: u8 = 1;

/// Binary image whose values are all `0` (background) or `1` (ink).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BinaryMask {
    /// Wrap a raw buffer, rejecting anything that is not strictly `{0, 1}`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, InputError> {
        check_shape(width, height, data.len())?;
        if let Some(index) = data.iter().position(|&v| v > INK) {
            return Err(InputError::NonBinaryValue {
                value: data[index],
                index,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a mask from a predicate returning `true` for ink.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut is_ink: impl FnMut(usize, usize) -> bool,
    ) -> Result<Self, InputError> {
        check_shape(width, height, width.saturating_mul(height))?;
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(u8::from(is_ink(x, y)));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] == INK
    }

    /// Number of lines along `axis` (rows for `Row`, columns for `Column`).
    #[inline]
    pub fn line_count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.height,
            Axis::Column => self.width,
        }
    }

    /// Length of one line along `axis`.
    #[inline]
    pub fn line_len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.width,
            Axis::Column => self.height,
        }
    }

    pub fn line(&self, axis: Axis, index: usize) -> impl Iterator<Item = u8> + '_ {
        line_iter(&self.data, self.width, self.height, axis, index)
    }

    /// `true` if line `index` carries any ink.
    pub fn line_has_ink(&self, axis: Axis, index: usize) -> bool {
        self.line(axis, index).any(|v| v == INK)
    }

    /// `true` if the part of line `index` within `span` (positions along the
    /// line) is entirely background.
    pub fn span_is_background(
        &self,
        axis: Axis,
        index: usize,
        span: RangeInclusive<usize>,
    ) -> bool {
        match axis {
            Axis::Row => span.into_iter().all(|x| !self.is_ink(x, index)),
            Axis::Column => span.into_iter().all(|y| !self.is_ink(index, y)),
        }
    }

    pub fn ink_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == INK).count()
    }

    /// Fraction of ink pixels in the whole mask.
    pub fn mean(&self) -> f32 {
        self.ink_count() as f32 / self.data.len() as f32
    }

    /// Fraction of ink pixels in `rows x cols`, clipped to the mask bounds.
    ///
    /// Returns `0.0` when the clipped block is empty.
    pub fn block_mean(&self, rows: Range<usize>, cols: Range<usize>) -> f32 {
        let rows = rows.start.min(self.height)..rows.end.min(self.height);
        let cols = cols.start.min(self.width)..cols.end.min(self.width);
        let area = rows.len() * cols.len();
        if area == 0 {
            return 0.0;
        }
        let mut ink = 0usize;
        for y in rows {
            let row = &self.data[y * self.width..(y + 1) * self.width];
            ink += row[cols.clone()].iter().filter(|&&v| v == INK).count();
        }
        ink as f32 / area as f32
    }

    pub fn crop(&self, rect: CropRect) -> Result<Self, InputError> {
        let data = crop_raw(&self.data, self.width, self.height, rect)?;
        Ok(Self {
            width: rect.width(),
            height: rect.height(),
            data,
        })
    }
}

/// Mark every pixel with intensity `< threshold` as ink.
///
/// `PixelGrid` cannot be empty, so this never fails.
pub fn binarize(img: &PixelGrid, threshold: u8) -> BinaryMask {
    let data = img
        .data()
        .iter()
        .map(|&v| if v < threshold { INK } else { BACKGROUND })
        .collect();
    BinaryMask {
        width: img.width(),
        height: img.height(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn binarize_marks_dark_pixels_as_ink() {
        let img = PixelGrid::new(4, 1, vec![0, 127, 128, 255]).unwrap();
        let mask = binarize(&img, DEFAULT_INK_THRESHOLD);
        assert_eq!(mask.data(), &[1, 1, 0, 0]);
    }

    #[test]
    fn binarize_output_is_strictly_binary() {
        let img = PixelGrid::from_fn(16, 16, |x, y| ((x * 37 + y * 11) % 256) as u8).unwrap();
        let mask = binarize(&img, 90);
        assert!(mask.data().iter().all(|&v| v == INK || v == BACKGROUND));
        assert_eq!(mask.width(), 16);
        assert_eq!(mask.height(), 16);
    }

    #[test]
    fn from_raw_rejects_non_binary_values() {
        let err = BinaryMask::from_raw(2, 2, vec![0, 1, 255, 0]).unwrap_err();
        assert_eq!(
            err,
            InputError::NonBinaryValue {
                value: 255,
                index: 2
            }
        );
    }

    #[test]
    fn block_mean_clips_to_bounds() {
        let mask = BinaryMask::from_fn(4, 4, |x, _| x < 2).unwrap();
        assert_relative_eq!(mask.block_mean(0..4, 0..2), 1.0);
        assert_relative_eq!(mask.block_mean(0..10, 0..10), 0.5);
        assert_relative_eq!(mask.block_mean(3..8, 2..8), 0.0);
        assert_relative_eq!(mask.mean(), 0.5);
    }

    #[test]
    fn span_check_respects_range() {
        let mask = BinaryMask::from_fn(5, 1, |x, _| x == 4).unwrap();
        assert!(mask.span_is_background(Axis::Row, 0, 0..=3));
        assert!(!mask.span_is_background(Axis::Row, 0, 0..=4));
        assert!(mask.line_has_ink(Axis::Row, 0));
    }
}
