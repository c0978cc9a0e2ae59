//! Rendered boards and digit samples for end-to-end tests.

use sudoku_ocr::knn::sample_features;
use sudoku_ocr::{Digit, PixelGrid, ReferenceSet, ReferenceSetBuilder};

/// Cell side in pixels.
pub const CELL: usize = 40;
/// White border around the drawn grid.
pub const MARGIN: usize = 20;
/// Grid line thickness.
pub const LINE: usize = 2;
/// Glyph stroke thickness.
pub const STROKE: usize = 3;

pub const INK: u8 = 20;
pub const PAPER: u8 = 235;

/// Block-letter shapes used as stand-ins for handwritten digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    One,
    Five,
    Seven,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::One, Shape::Five, Shape::Seven];

    pub fn digit(self) -> Digit {
        let v = match self {
            Shape::One => 1,
            Shape::Five => 5,
            Shape::Seven => 7,
        };
        Digit::new(v).unwrap()
    }

    /// Name of the corpus directory for this shape.
    pub fn label(self) -> String {
        self.digit().to_string()
    }
}

pub fn board_side() -> usize {
    CELL * 9 + 2 * MARGIN
}

/// Empty board: white page, 9x9 grid of dark lines inset by `MARGIN`.
pub fn blank_board() -> PixelGrid {
    let grid = CELL * 9;
    PixelGrid::from_fn(board_side(), board_side(), |x, y| {
        let on_line = |p: usize| {
            if !(MARGIN..MARGIN + grid).contains(&p) {
                return false;
            }
            let local = p - MARGIN;
            local % CELL < LINE || local >= grid - LINE
        };
        let inside = |p: usize| (MARGIN..MARGIN + grid).contains(&p);
        if (on_line(x) && inside(y)) || (on_line(y) && inside(x)) {
            INK
        } else {
            PAPER
        }
    })
    .unwrap()
}

/// Board whose grid fills the whole image: `9 * cell` pixels on a side,
/// outer frame on the image border, no paper margin.
pub fn edge_to_edge_board(cell: usize) -> PixelGrid {
    let side = 9 * cell;
    let on_line = |p: usize| p % cell < LINE || p >= side - LINE;
    PixelGrid::from_fn(side, side, |x, y| {
        if on_line(x) || on_line(y) {
            INK
        } else {
            PAPER
        }
    })
    .unwrap()
}

/// Top-left pixel of cell `(row, col)` on a board from [`blank_board`].
pub fn cell_origin(row: usize, col: usize) -> (usize, usize) {
    (MARGIN + col * CELL, MARGIN + row * CELL)
}

pub fn fill(img: &mut PixelGrid, x0: usize, y0: usize, w: usize, h: usize) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.set(x, y, INK);
        }
    }
}

/// Draw `shape` into the `w x h` box at `(x0, y0)`.
pub fn draw(img: &mut PixelGrid, shape: Shape, x0: usize, y0: usize, w: usize, h: usize) {
    let t = STROKE;
    let mid = h / 2;
    match shape {
        Shape::One => fill(img, x0 + w / 2 - t / 2, y0, t, h),
        Shape::Five => {
            fill(img, x0, y0, w, t);
            fill(img, x0, y0, t, mid + 1);
            fill(img, x0, y0 + mid - t / 2, w, t);
            fill(img, x0 + w - t, y0 + mid, t, h - mid);
            fill(img, x0, y0 + h - t, w, t);
        }
        Shape::Seven => {
            fill(img, x0, y0, w, t);
            fill(img, x0 + w - t, y0, t, h);
        }
    }
}

/// Draw a 15x20 glyph well inside cell `(row, col)`.
pub fn draw_in_cell(img: &mut PixelGrid, shape: Shape, row: usize, col: usize) {
    let (x, y) = cell_origin(row, col);
    draw(img, shape, x + 12, y + 10, 15, 20);
}

/// Two separate blobs side by side inside cell `(row, col)`.
pub fn smudge_cell(img: &mut PixelGrid, row: usize, col: usize) {
    let (x, y) = cell_origin(row, col);
    fill(img, x + 10, y + 14, 6, 10);
    fill(img, x + 24, y + 14, 6, 10);
}

/// Pre-isolated training sample: `shape` in a `w x h` box with a white pad.
pub fn sample(shape: Shape, w: usize, h: usize) -> PixelGrid {
    let pad = 4;
    let mut img = PixelGrid::filled(w + 2 * pad, h + 2 * pad, PAPER).unwrap();
    draw(&mut img, shape, pad, pad, w, h);
    img
}

/// Glyph box sizes rendered per label.
pub const SAMPLE_SIZES: [(usize, usize); 4] = [(12, 16), (15, 20), (18, 24), (21, 28)];

pub fn reference() -> ReferenceSet {
    let mut builder = ReferenceSetBuilder::default();
    for shape in Shape::ALL {
        for (w, h) in SAMPLE_SIZES {
            builder.add_sample(shape.digit(), &sample(shape, w, h)).unwrap();
        }
    }
    builder.build().0
}

/// Label of the reference vector closest to the board-sized glyph.
pub fn nearest_label(reference: &ReferenceSet, shape: Shape) -> Digit {
    let query = sample_features(&sample(shape, 15, 20), 128).unwrap();
    reference
        .iter()
        .min_by(|a, b| query.distance(a.1).total_cmp(&query.distance(b.1)))
        .map(|(d, _)| d)
        .unwrap()
}

pub fn to_gray_image(grid: &PixelGrid) -> image::GrayImage {
    image::GrayImage::from_raw(
        grid.width() as u32,
        grid.height() as u32,
        grid.data().to_vec(),
    )
    .unwrap()
}
