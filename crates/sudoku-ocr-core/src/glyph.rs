//! Isolate the single glyph inside one cell mask.

use crate::{Axis, BinaryMask, CropRect, InputError};
use serde::{Deserialize, Serialize};

/// Half-open interval `[start, end)` of consecutive lines that all carry ink,
/// bounded by ink-free lines or the mask edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InkRun {
    pub start: usize,
    pub end: usize,
}

impl InkRun {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Outcome of glyph isolation for one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlyphIsolation {
    /// Exactly one ink run on both axes; `mask` is the cell cropped to it.
    Glyph { mask: BinaryMask, rect: CropRect },
    /// No ink at all: a blank cell.
    Empty,
    /// More than one disconnected ink run along `axis`.
    Ambiguous { axis: Axis, runs: Vec<InkRun> },
}

/// All maximal runs of ink-bearing lines along `axis`, in scan order.
pub fn ink_runs(mask: &BinaryMask, axis: Axis) -> Vec<InkRun> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;
    for i in 0..mask.line_count(axis) {
        match (mask.line_has_ink(axis, i), open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                runs.push(InkRun { start, end: i });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        runs.push(InkRun {
            start,
            end: mask.line_count(axis),
        });
    }
    runs
}

/// Exactly one run along `axis`, or the isolation verdict that ends the search.
fn single_run(mask: &BinaryMask, axis: Axis) -> Result<InkRun, GlyphIsolation> {
    let runs = ink_runs(mask, axis);
    match runs.len() {
        0 => Err(GlyphIsolation::Empty),
        1 => Ok(runs[0]),
        _ => Err(GlyphIsolation::Ambiguous { axis, runs }),
    }
}

/// Crop `mask` to its single glyph.
///
/// Columns are scanned first, then rows. Fragments are never merged: a
/// second run on either axis makes the cell [`GlyphIsolation::Ambiguous`].
pub fn isolate_glyph(mask: &BinaryMask) -> Result<GlyphIsolation, InputError> {
    let cols = match single_run(mask, Axis::Column) {
        Ok(run) => run,
        Err(verdict) => return Ok(verdict),
    };
    let rows = match single_run(mask, Axis::Row) {
        Ok(run) => run,
        Err(verdict) => return Ok(verdict),
    };

    let rect = CropRect {
        top: rows.start,
        left: cols.start,
        bottom: rows.end - 1,
        right: cols.end - 1,
    };
    Ok(GlyphIsolation::Glyph {
        mask: mask.crop(rect)?,
        rect,
    })
}
