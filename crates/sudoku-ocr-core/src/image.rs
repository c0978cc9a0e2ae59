use crate::{Axis, CropRect, InputError};

/// Owned single-channel 8-bit image, row-major, `len = width * height`.
///
/// Construction rejects empty images, so every stage downstream can assume
/// at least one pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, InputError> {
        check_shape(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> u8,
    ) -> Result<Self, InputError> {
        check_shape(width, height, width.saturating_mul(height))?;
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self, InputError> {
        Self::new(width, height, vec![value; width.saturating_mul(height)])
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

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Mutable pixel access, used by renderers and tests to draw into a canvas.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.width + x] = value;
    }

    /// Copy the pixels inside `rect` into a new image.
    pub fn crop(&self, rect: CropRect) -> Result<Self, InputError> {
        let data = crop_raw(&self.data, self.width, self.height, rect)?;
        Ok(Self {
            width: rect.width(),
            height: rect.height(),
            data,
        })
    }
}

pub(crate) fn check_shape(width: usize, height: usize, len: usize) -> Result<(), InputError> {
    if width == 0 || height == 0 {
        return Err(InputError::EmptyImage { width, height });
    }
    let Some(expected) = width.checked_mul(height) else {
        return Err(InputError::EmptyImage { width, height });
    };
    if len != expected {
        return Err(InputError::BufferSizeMismatch { expected, got: len });
    }
    Ok(())
}

pub(crate) fn crop_raw(
    data: &[u8],
    width: usize,
    height: usize,
    rect: CropRect,
) -> Result<Vec<u8>, InputError> {
    if !rect.fits(width, height) {
        return Err(InputError::CropOutOfBounds {
            rect: rect.as_array(),
            width,
            height,
        });
    }
    let mut out = Vec::with_capacity(rect.area());
    for y in rect.top..=rect.bottom {
        let row = y * width;
        out.extend_from_slice(&data[row + rect.left..=row + rect.right]);
    }
    Ok(out)
}

/// Iterate over one full row (`Axis::Row`) or column (`Axis::Column`).
pub(crate) fn line_iter(
    data: &[u8],
    width: usize,
    height: usize,
    axis: Axis,
    index: usize,
) -> impl Iterator<Item = u8> + '_ {
    let (start, step, len) = match axis {
        Axis::Row => (index * width, 1, width),
        Axis::Column => (index, width, height),
    };
    data[start..].iter().step_by(step).take(len).copied()
}
