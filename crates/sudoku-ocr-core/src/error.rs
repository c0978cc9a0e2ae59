use crate::Axis;

/// Input that the pipeline cannot process at all.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("empty image (width={width}, height={height})")]
    EmptyImage { width: usize, height: usize },

    #[error("pixel buffer length mismatch (expected {expected} values, got {got})")]
    BufferSizeMismatch { expected: usize, got: usize },

    #[error("mask value {value} at index {index} is not binary")]
    NonBinaryValue { value: u8, index: usize },

    #[error("cropping collapsed along the {axis} axis; image has no content")]
    DegenerateCrop { axis: Axis },

    #[error("{width}x{height} image is too small to split into a 9x9 grid")]
    TooSmallForGrid { width: usize, height: usize },

    #[error("crop rectangle {rect:?} outside {width}x{height} image")]
    CropOutOfBounds {
        rect: [usize; 4],
        width: usize,
        height: usize,
    },
}
