//! Scan axes and inclusive crop rectangles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which family of lines a scan walks over.
///
/// `Row` scans visit one row per step and therefore bound content
/// vertically; `Column` scans bound it horizontally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

/// Crop rectangle with *inclusive* bounds on all four sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRect {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl CropRect {
    /// Rectangle covering a whole `width x height` image.
    ///
    /// Both dimensions must be non-zero.
    pub fn full(width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            top: 0,
            left: 0,
            bottom: height.saturating_sub(1),
            right: width.saturating_sub(1),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.right + 1 - self.left
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.bottom + 1 - self.top
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// `true` when the rectangle is well-formed and fits a `width x height` image.
    pub fn fits(&self, width: usize, height: usize) -> bool {
        self.top <= self.bottom
            && self.left <= self.right
            && self.bottom < height
            && self.right < width
    }

    pub(crate) fn as_array(&self) -> [usize; 4] {
        [self.top, self.left, self.bottom, self.right]
    }
}
