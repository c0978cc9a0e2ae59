//! Border cropping.
//!
//! Two building blocks are combined by the callers:
//! - a *tolerance sweep* that looks for a qualifying line inside a window
//!   next to each edge (used to find the drawn board frame, and, with the
//!   polarity flipped, to find the clear margin inside a cell),
//! - an *idempotent shrink* loop that walks each side inward while the line
//!   under it is entirely background.

use crate::{Axis, BinaryMask, CropRect, InputError, BACKGROUND, INK};
use serde::{Deserialize, Serialize};

/// Window and run-length settings for a tolerance sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorderSearchParams {
    /// Fraction of each dimension searched from every edge.
    pub tolerance_ratio: f32,
    /// Minimum run length, as a fraction of the line length, for a line to qualify.
    pub min_run_fraction: f32,
}

impl BorderSearchParams {
    /// Whole-board frame search.
    pub const BOARD: Self = Self {
        tolerance_ratio: 0.2,
        min_run_fraction: 0.6,
    };

    /// Per-cell margin trimming.
    pub const CELL: Self = Self {
        tolerance_ratio: 0.15,
        min_run_fraction: 0.8,
    };
}

impl Default for BorderSearchParams {
    fn default() -> Self {
        Self::BOARD
    }
}

/// Value a qualifying run must consist of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinePolarity {
    /// Drawn lines (board frame).
    Ink,
    /// Clear lines (margin between a cell's grid lines and its glyph).
    Background,
}

impl LinePolarity {
    #[inline]
    fn value(self) -> u8 {
        match self {
            LinePolarity::Ink => INK,
            LinePolarity::Background => BACKGROUND,
        }
    }
}

/// Order in which lines inside an edge window are visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepOrder {
    /// From the image edge toward the window's deepest line; the outermost
    /// qualifying line wins.
    EdgeInward,
    /// From the deepest line back toward the edge; the innermost qualifying
    /// line wins.
    DeepestOutward,
}

/// Result of [`shrink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShrinkOutcome {
    pub rect: CropRect,
    /// Total single-line steps taken by all four sides.
    pub advances: usize,
}

/// Length of the longest run of `target` in `values`.
pub fn longest_run(values: impl IntoIterator<Item = u8>, target: u8) -> usize {
    let mut best = 0usize;
    let mut current = 0usize;
    for v in values {
        if v == target {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// `true` if line `index` holds a run of `polarity` covering at least
/// `min_run_fraction` of the line.
pub fn is_border_line(
    mask: &BinaryMask,
    axis: Axis,
    index: usize,
    polarity: LinePolarity,
    min_run_fraction: f32,
) -> bool {
    let len = mask.line_len(axis);
    let run = longest_run(mask.line(axis, index), polarity.value());
    run as f32 >= min_run_fraction * len as f32
}

/// Deepest line index (counted from an edge) inside the search window.
///
/// Capped so the near and far windows never cross.
fn window_depth(extent: usize, tolerance_ratio: f32) -> usize {
    if extent == 0 {
        return 0;
    }
    let depth = (tolerance_ratio.max(0.0) * extent as f32).floor() as usize;
    depth.min((extent - 1) / 2)
}

fn sweep_axis(
    mask: &BinaryMask,
    axis: Axis,
    params: BorderSearchParams,
    polarity: LinePolarity,
    order: SweepOrder,
) -> (usize, usize) {
    let n = mask.line_count(axis);
    let depth = window_depth(n, params.tolerance_ratio);
    let qualifies = |i: usize| is_border_line(mask, axis, i, polarity, params.min_run_fraction);

    let near = 0..=depth;
    let far = (n - 1 - depth)..=(n - 1);
    let (lo, hi) = match order {
        SweepOrder::EdgeInward => (
            near.into_iter().find(|&i| qualifies(i)),
            far.rev().find(|&i| qualifies(i)),
        ),
        SweepOrder::DeepestOutward => (
            near.rev().find(|&i| qualifies(i)),
            far.into_iter().find(|&i| qualifies(i)),
        ),
    };
    (lo.unwrap_or(0), hi.unwrap_or(n - 1))
}

/// Pick one cut per side by sweeping the edge windows.
///
/// A side with no qualifying line inside its window keeps the image edge.
pub fn tolerance_sweep(
    mask: &BinaryMask,
    params: BorderSearchParams,
    polarity: LinePolarity,
    order: SweepOrder,
) -> CropRect {
    let (top, bottom) = sweep_axis(mask, Axis::Row, params, polarity, order);
    let (left, right) = sweep_axis(mask, Axis::Column, params, polarity, order);
    CropRect {
        top,
        left,
        bottom,
        right,
    }
}

/// Locate the drawn outer frame of a board.
pub fn frame_search(mask: &BinaryMask, params: BorderSearchParams) -> CropRect {
    tolerance_sweep(mask, params, LinePolarity::Ink, SweepOrder::EdgeInward)
}

/// Locate the clear margin inside a cell, just inside its grid lines.
pub fn trim_cell_margin(mask: &BinaryMask, params: BorderSearchParams) -> CropRect {
    tolerance_sweep(
        mask,
        params,
        LinePolarity::Background,
        SweepOrder::DeepestOutward,
    )
}

/// Walk every side of `initial` inward while the line under it (restricted
/// to the current rectangle) is entirely background, until a full pass moves
/// nothing.
///
/// Running it again on its own output performs zero advances. Fails with
/// [`InputError::DegenerateCrop`] if a side would cross the opposite one,
/// which means the rectangle holds no ink at all.
pub fn shrink(mask: &BinaryMask, initial: CropRect) -> Result<ShrinkOutcome, InputError> {
    if !initial.fits(mask.width(), mask.height()) {
        return Err(InputError::CropOutOfBounds {
            rect: initial.as_array(),
            width: mask.width(),
            height: mask.height(),
        });
    }

    let mut r = initial;
    let mut advances = 0usize;
    loop {
        let mut moved = false;

        if mask.span_is_background(Axis::Row, r.top, r.left..=r.right) {
            if r.top == r.bottom {
                return Err(InputError::DegenerateCrop { axis: Axis::Row });
            }
            r.top += 1;
            advances += 1;
            moved = true;
        }
        if mask.span_is_background(Axis::Row, r.bottom, r.left..=r.right) {
            if r.bottom == r.top {
                return Err(InputError::DegenerateCrop { axis: Axis::Row });
            }
            r.bottom -= 1;
            advances += 1;
            moved = true;
        }
        if mask.span_is_background(Axis::Column, r.left, r.top..=r.bottom) {
            if r.left == r.right {
                return Err(InputError::DegenerateCrop {
                    axis: Axis::Column,
                });
            }
            r.left += 1;
            advances += 1;
            moved = true;
        }
        if mask.span_is_background(Axis::Column, r.right, r.top..=r.bottom) {
            if r.right == r.left {
                return Err(InputError::DegenerateCrop {
                    axis: Axis::Column,
                });
            }
            r.right -= 1;
            advances += 1;
            moved = true;
        }

        if !moved {
            break;
        }
    }

    log::trace!("shrink {:?} -> {:?} ({} advances)", initial, r, advances);
    Ok(ShrinkOutcome { rect: r, advances })
}

/// Whole-board crop: frame search picks the start, shrink tightens it.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip_all,
        fields(width = mask.width(), height = mask.height())
    )
)]
pub fn crop_to_frame(
    mask: &BinaryMask,
    params: BorderSearchParams,
) -> Result<CropRect, InputError> {
    let start = frame_search(mask, params);
    Ok(shrink(mask, start)?.rect)
}

/// Tighten to content starting from the full image, with no frame assumption.
pub fn shrink_to_content(mask: &BinaryMask) -> Result<CropRect, InputError> {
    Ok(shrink(mask, CropRect::full(mask.width(), mask.height()))?.rect)
}
