//! Recognizer configuration.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use sudoku_ocr_core::{BorderSearchParams, DEFAULT_INK_THRESHOLD};
use sudoku_ocr_knn::DEFAULT_K;

#[derive(thiserror::Error, Debug)]
pub enum ParamsError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{name} must be in (0, 1), got {value}")]
    ToleranceRatio { name: &'static str, value: f32 },
    #[error("{name} must be in (0, 1], got {value}")]
    RunFraction { name: &'static str, value: f32 },
    #[error("neighbour count k must be >= 1")]
    ZeroK,
}

/// Tunables of the board recognizer.
///
/// Every field has a default, so a JSON file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerParams {
    /// Intensities strictly below this value are ink.
    pub ink_threshold: u8,
    /// Fraction of each board edge searched for the drawn frame.
    pub border_tolerance_ratio: f32,
    /// Minimum ink run, as a fraction of the line, for a frame line.
    pub border_min_run_fraction: f32,
    /// Fraction of each cell edge searched for the clear margin.
    pub cell_tolerance_ratio: f32,
    /// Minimum background run, as a fraction of the line, for a margin line.
    pub cell_min_run_fraction: f32,
    /// Neighbours consulted per cell.
    pub k: usize,
}

impl Default for RecognizerParams {
    fn default() -> Self {
        Self {
            ink_threshold: DEFAULT_INK_THRESHOLD,
            border_tolerance_ratio: BorderSearchParams::BOARD.tolerance_ratio,
            border_min_run_fraction: BorderSearchParams::BOARD.min_run_fraction,
            cell_tolerance_ratio: BorderSearchParams::CELL.tolerance_ratio,
            cell_min_run_fraction: BorderSearchParams::CELL.min_run_fraction,
            k: DEFAULT_K,
        }
    }
}

fn check_tolerance(name: &'static str, value: f32) -> Result<(), ParamsError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ParamsError::ToleranceRatio { name, value })
    }
}

fn check_fraction(name: &'static str, value: f32) -> Result<(), ParamsError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ParamsError::RunFraction { name, value })
    }
}

impl RecognizerParams {
    /// Load and validate a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let raw = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&raw)?;
        params.validate()?;
        Ok(params)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        check_tolerance("border_tolerance_ratio", self.border_tolerance_ratio)?;
        check_fraction("border_min_run_fraction", self.border_min_run_fraction)?;
        check_tolerance("cell_tolerance_ratio", self.cell_tolerance_ratio)?;
        check_fraction("cell_min_run_fraction", self.cell_min_run_fraction)?;
        if self.k == 0 {
            return Err(ParamsError::ZeroK);
        }
        Ok(())
    }

    /// Settings for the whole-board frame search.
    pub fn board_search(&self) -> BorderSearchParams {
        BorderSearchParams {
            tolerance_ratio: self.border_tolerance_ratio,
            min_run_fraction: self.border_min_run_fraction,
        }
    }

    /// Settings for the per-cell margin trim.
    pub fn cell_search(&self) -> BorderSearchParams {
        BorderSearchParams {
            tolerance_ratio: self.cell_tolerance_ratio,
            min_run_fraction: self.cell_min_run_fraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = RecognizerParams::default();
        params.validate().unwrap();
        assert_eq!(params.ink_threshold, 128);
        assert_eq!(params.k, 10);
        assert_eq!(params.board_search(), BorderSearchParams::BOARD);
        assert_eq!(params.cell_search(), BorderSearchParams::CELL);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: RecognizerParams = serde_json::from_str(r#"{"k": 3}"#).unwrap();
        assert_eq!(params.k, 3);
        assert_eq!(params.ink_threshold, DEFAULT_INK_THRESHOLD);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut params = RecognizerParams {
            border_tolerance_ratio: 1.0,
            ..RecognizerParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::ToleranceRatio {
                name: "border_tolerance_ratio",
                ..
            })
        ));

        params = RecognizerParams {
            cell_min_run_fraction: 0.0,
            ..RecognizerParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::RunFraction { .. })
        ));

        params = RecognizerParams {
            k: 0,
            ..RecognizerParams::default()
        };
        assert!(matches!(params.validate(), Err(ParamsError::ZeroK)));
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        let params = RecognizerParams {
            ink_threshold: 100,
            k: 5,
            ..RecognizerParams::default()
        };
        params.write_json(&path).unwrap();
        assert_eq!(RecognizerParams::load_json(&path).unwrap(), params);
    }
}
