//! Conversions from the `image` crate into [`PixelGrid`].

use image::{DynamicImage, GrayImage, ImageReader};
use std::path::Path;
use sudoku_ocr_core::{InputError, PixelGrid};

#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Decode(#[from] image::ImageError),
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Copy a grayscale image into a [`PixelGrid`].
pub fn pixel_grid_from_gray(img: &GrayImage) -> Result<PixelGrid, InputError> {
    PixelGrid::new(
        img.width() as usize,
        img.height() as usize,
        img.as_raw().clone(),
    )
}

/// Reduce any decoded image to luma and wrap it.
pub fn pixel_grid_from_dynamic(img: DynamicImage) -> Result<PixelGrid, InputError> {
    let gray = img.into_luma8();
    let (w, h) = gray.dimensions();
    PixelGrid::new(w as usize, h as usize, gray.into_raw())
}

/// Decode an image file into a single-channel [`PixelGrid`].
pub fn load_pixel_grid(path: impl AsRef<Path>) -> Result<PixelGrid, RasterError> {
    let img = ImageReader::open(path.as_ref())?
        .with_guessed_format()?
        .decode()?;
    Ok(pixel_grid_from_dynamic(img)?)
}
