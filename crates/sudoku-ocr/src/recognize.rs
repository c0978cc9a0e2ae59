//! Whole-board recognition: frame crop, grid split, per-cell classification.

use crate::params::{ParamsError, RecognizerParams};
use serde::{Deserialize, Serialize};
use std::fmt;
use sudoku_ocr_core::{
    binarize, crop_to_frame, extract_features, isolate_glyph, split_board, trim_cell_margin, Axis,
    CellSlice, GlyphIsolation, InkRun, InputError, PixelGrid, BOARD_SIZE, CELL_COUNT,
};
use sudoku_ocr_knn::{ClassifyError, Digit, KnnClassifier, ReferenceSet};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors that stop a whole recognition run.
///
/// Problems confined to one cell never surface here; they are reported in
/// [`BoardRecognition::failures`].
#[derive(thiserror::Error, Debug)]
pub enum RecognizeError {
    #[error("board image unusable: {0}")]
    Input(#[from] InputError),
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// 9x9 grid of recognized digits, `0` where nothing was recognized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board(pub [[u8; BOARD_SIZE]; BOARD_SIZE]);

impl Board {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.0[row][col]
    }

    pub fn rows(&self) -> &[[u8; BOARD_SIZE]; BOARD_SIZE] {
        &self.0
    }

    /// Number of non-zero cells.
    pub fn filled(&self) -> usize {
        self.0.iter().flatten().filter(|&&v| v != 0).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            let line: Vec<String> = row
                .iter()
                .map(|&v| match v {
                    0 => ".".to_string(),
                    d => d.to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// `(row, col)` position of a cell, both in `0..9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// What happened to one cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellOutcome {
    /// No ink inside the cell margins.
    Blank,
    Digit { digit: Digit, votes: usize },
    /// Several disconnected ink regions; the cell is left at `0`.
    Ambiguous { axis: Axis, runs: Vec<InkRun> },
    /// A glyph was isolated but the reference set had nothing to compare it to.
    Unclassified,
}

impl CellOutcome {
    /// Value written into the [`Board`].
    pub fn value(&self) -> u8 {
        match self {
            CellOutcome::Digit { digit, .. } => digit.get(),
            _ => 0,
        }
    }

    /// Whether the cell belongs on the failure list.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CellOutcome::Ambiguous { .. } | CellOutcome::Unclassified
        )
    }
}

/// Output of [`BoardRecognizer::recognize`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardRecognition {
    pub board: Board,
    /// Cells that held ink but got no digit, row-major.
    pub failures: Vec<CellCoord>,
    /// Per-cell outcomes, row-major (`index = 9 * row + col`).
    pub cells: Vec<CellOutcome>,
}

impl BoardRecognition {
    pub fn cell(&self, row: usize, col: usize) -> &CellOutcome {
        &self.cells[row * BOARD_SIZE + col]
    }

    fn assemble(cells: Vec<CellOutcome>) -> Self {
        debug_assert_eq!(cells.len(), CELL_COUNT);
        let mut board = Board::default();
        let mut failures = Vec::new();
        for (idx, outcome) in cells.iter().enumerate() {
            let (row, col) = (idx / BOARD_SIZE, idx % BOARD_SIZE);
            board.0[row][col] = outcome.value();
            if outcome.is_failure() {
                failures.push(CellCoord { row, col });
            }
        }
        Self {
            board,
            failures,
            cells,
        }
    }
}

/// Reads boards against one borrowed reference set.
///
/// The recognizer holds no mutable state; one instance can serve any number
/// of boards, from several threads at once.
#[derive(Clone, Debug)]
pub struct BoardRecognizer<'a> {
    params: RecognizerParams,
    classifier: KnnClassifier<'a>,
}

impl<'a> BoardRecognizer<'a> {
    pub fn new(
        reference: &'a ReferenceSet,
        params: RecognizerParams,
    ) -> Result<Self, RecognizeError> {
        params.validate()?;
        let classifier = KnnClassifier::new(reference, params.k)?;
        Ok(Self { params, classifier })
    }

    pub fn params(&self) -> &RecognizerParams {
        &self.params
    }

    /// Recognize every cell of a board image.
    ///
    /// Fails only when the board as a whole cannot be cropped or split.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, image),
            fields(width = image.width(), height = image.height())
        )
    )]
    pub fn recognize(&self, image: &PixelGrid) -> Result<BoardRecognition, RecognizeError> {
        let mask = binarize(image, self.params.ink_threshold);
        let rect = crop_to_frame(&mask, self.params.board_search())?;
        log::debug!("board frame {:?} in {}x{}", rect, image.width(), image.height());
        let board = image.crop(rect)?;

        let cells: Vec<CellSlice> = split_board(&board)?.collect();

        #[cfg(feature = "rayon")]
        let outcomes: Vec<CellOutcome> = cells
            .into_par_iter()
            .map(|cell| self.recognize_slice(&cell))
            .collect::<Result<_, _>>()?;

        #[cfg(not(feature = "rayon"))]
        let outcomes: Vec<CellOutcome> = cells
            .iter()
            .map(|cell| self.recognize_slice(cell))
            .collect::<Result<_, _>>()?;

        let result = BoardRecognition::assemble(outcomes);
        log::info!(
            "recognized {} digits, {} failed cells",
            result.board.filled(),
            result.failures.len()
        );
        Ok(result)
    }

    fn recognize_slice(&self, cell: &CellSlice) -> Result<CellOutcome, InputError> {
        let outcome = self.recognize_cell(&cell.image)?;
        match &outcome {
            CellOutcome::Ambiguous { axis, runs } => log::debug!(
                "cell ({}, {}): {} ink runs along {}",
                cell.row,
                cell.col,
                runs.len(),
                axis
            ),
            CellOutcome::Unclassified => {
                log::debug!("cell ({}, {}): no reference data", cell.row, cell.col)
            }
            _ => {}
        }
        Ok(outcome)
    }

    /// Classify a single cell image, grid lines included.
    pub fn recognize_cell(&self, cell: &PixelGrid) -> Result<CellOutcome, InputError> {
        let mask = binarize(cell, self.params.ink_threshold);
        let inner = mask.crop(trim_cell_margin(&mask, self.params.cell_search()))?;
        let glyph = match isolate_glyph(&inner)? {
            GlyphIsolation::Empty => return Ok(CellOutcome::Blank),
            GlyphIsolation::Ambiguous { axis, runs } => {
                return Ok(CellOutcome::Ambiguous { axis, runs })
            }
            GlyphIsolation::Glyph { mask, .. } => mask,
        };
        let features = extract_features(&glyph);
        Ok(match self.classifier.classify(&features) {
            Ok(c) => CellOutcome::Digit {
                digit: c.digit,
                votes: c.votes,
            },
            Err(ClassifyError::NoReferenceData | ClassifyError::InvalidK) => {
                CellOutcome::Unclassified
            }
        })
    }
}
