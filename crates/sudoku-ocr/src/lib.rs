//! High-level facade for the `sudoku-ocr-*` workspace.
//!
//! This crate provides:
//! - re-exports of the image primitives (`sudoku_ocr::core`) and the
//!   reference set / classifier (`sudoku_ocr::knn`),
//! - [`BoardRecognizer`], which turns a board photo into a 9x9 [`Board`]
//!   plus the list of cells it could not read,
//! - (feature `image`) decoding of raster files and corpus directories.
//!
//! ## Quickstart
//!
//! ```no_run
//! use sudoku_ocr::{raster, BoardRecognizer, RecognizerParams};
//! use sudoku_ocr::knn::ReferenceSet;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reference = ReferenceSet::load_json("reference.json")?;
//! let recognizer = BoardRecognizer::new(&reference, RecognizerParams::default())?;
//!
//! let image = raster::load_pixel_grid("board.png")?;
//! let result = recognizer.recognize(&image)?;
//! print!("{}", result.board);
//! println!("unreadable cells: {:?}", result.failures);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//! - `image` (default): [`raster`] and [`corpus`] helpers built on the `image` crate.
//! - `cli` (default): the `sudoku-ocr` binary.
//! - `rayon`: classify the 81 cells in parallel.
//! - `tracing`: spans on the hot entry points of every crate.

pub use sudoku_ocr_core as core;
pub use sudoku_ocr_knn as knn;

pub use sudoku_ocr_core::{InputError, PixelGrid};
pub use sudoku_ocr_knn::{Digit, ReferenceSet, ReferenceSetBuilder};

mod params;
mod recognize;

pub use params::{ParamsError, RecognizerParams};
pub use recognize::{
    Board, BoardRecognition, BoardRecognizer, CellCoord, CellOutcome, RecognizeError,
};

#[cfg(feature = "image")]
pub mod corpus;
#[cfg(feature = "image")]
pub mod raster;
