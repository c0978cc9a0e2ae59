//! Partition a cropped board into its 9x9 cells.

use crate::{CropRect, InputError, PixelGrid};
use std::iter::FusedIterator;

/// Cells per board side.
pub const BOARD_SIZE: usize = 9;
/// Cells per board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// One cell cut out of a board image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellSlice {
    pub row: usize,
    pub col: usize,
    /// Where the cell sits inside the board image.
    pub rect: CropRect,
    pub image: PixelGrid,
}

/// Single-pass iterator over the 81 cells of a board, row-major.
///
/// Cells are `floor(W/9) x floor(H/9)`; the last column and the last row
/// absorb the remainder, so slices tile the board exactly.
#[derive(Debug)]
pub struct GridSplitter<'a> {
    board: &'a PixelGrid,
    cell_w: usize,
    cell_h: usize,
    next: usize,
}

impl<'a> GridSplitter<'a> {
    /// Start splitting `board`, which must be at least 9x9 pixels.
    pub fn new(board: &'a PixelGrid) -> Result<Self, InputError> {
        if board.width() < BOARD_SIZE || board.height() < BOARD_SIZE {
            return Err(InputError::TooSmallForGrid {
                width: board.width(),
                height: board.height(),
            });
        }
        Ok(Self {
            board,
            cell_w: board.width() / BOARD_SIZE,
            cell_h: board.height() / BOARD_SIZE,
            next: 0,
        })
    }

    /// Rectangle of cell `(row, col)` inside the board.
    pub fn cell_rect(&self, row: usize, col: usize) -> CropRect {
        let span = |i: usize, step: usize, extent: usize| {
            let start = i * step;
            let end = if i + 1 == BOARD_SIZE {
                extent
            } else {
                (i + 1) * step
            };
            (start, end - 1)
        };
        let (top, bottom) = span(row, self.cell_h, self.board.height());
        let (left, right) = span(col, self.cell_w, self.board.width());
        CropRect {
            top,
            left,
            bottom,
            right,
        }
    }
}

impl Iterator for GridSplitter<'_> {
    type Item = CellSlice;

    fn next(&mut self) -> Option<CellSlice> {
        if self.next >= CELL_COUNT {
            return None;
        }
        let (row, col) = (self.next / BOARD_SIZE, self.next % BOARD_SIZE);
        self.next += 1;
        let rect = self.cell_rect(row, col);
        // `cell_rect` always fits the board, so the crop cannot fail.
        let image = self.board.crop(rect).ok()?;
        Some(CellSlice {
            row,
            col,
            rect,
            image,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = CELL_COUNT.saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for GridSplitter<'_> {}
impl FusedIterator for GridSplitter<'_> {}

/// Convenience wrapper around [`GridSplitter::new`].
pub fn split_board(board: &PixelGrid) -> Result<GridSplitter<'_>, InputError> {
    GridSplitter::new(board)
}
