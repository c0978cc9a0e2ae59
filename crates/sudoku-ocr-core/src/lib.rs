//! Image primitives for Sudoku board digitization.
//!
//! This crate is intentionally small and works on plain 8-bit buffers. It
//! does *not* decode image files or know about labels; that lives in the
//! `sudoku-ocr-knn` and `sudoku-ocr` crates.
//!
//! Stages, leaf first:
//! 1. [`binarize`] a [`PixelGrid`] into a [`BinaryMask`] with a fixed threshold.
//! 2. Crop the board to its frame ([`crop_to_frame`]) or tighten a sample to
//!    its content ([`shrink_to_content`]).
//! 3. Split the board into 81 cells ([`split_board`]).
//! 4. Trim each cell's grid lines ([`trim_cell_margin`]) and isolate its
//!    glyph ([`isolate_glyph`]).
//! 5. Reduce the glyph to a 101-component [`FeatureVector`].

mod binarize;
mod crop;
mod error;
mod features;
mod glyph;
mod image;
mod logger;
mod rect;
mod split;

pub use binarize::{binarize, BinaryMask, BACKGROUND, DEFAULT_INK_THRESHOLD, INK};
pub use crop::{
    crop_to_frame, frame_search, is_border_line, longest_run, shrink, shrink_to_content,
    tolerance_sweep, trim_cell_margin, BorderSearchParams, LinePolarity, ShrinkOutcome,
    SweepOrder,
};
pub use error::InputError;
pub use features::{
    extract_features, FeatureVector, FeatureVectorError, FEATURE_LATTICE, FEATURE_LEN,
};
pub use glyph::{ink_runs, isolate_glyph, GlyphIsolation, InkRun};
pub use image::PixelGrid;
pub use rect::{Axis, CropRect};
pub use split::{split_board, CellSlice, GridSplitter, BOARD_SIZE, CELL_COUNT};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};
