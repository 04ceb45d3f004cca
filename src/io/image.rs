//! Decoded-image input (PNG/JPEG/BMP/GIF).
//!
//! The binary `.bin` format in [`params`](crate::io::params) is the network's
//! native input; this module additionally accepts ordinary image files,
//! resized to the network's input shape, converted to grayscale, and
//! normalized to [0, 1].

use std::path::Path;

use crate::error::{MlpError, Result};
use crate::math::matrix::Matrix;

/// Decodes image bytes into a `rows x cols` grayscale matrix with pixel
/// values in [0, 1].
pub fn decode_image(bytes: &[u8], rows: usize, cols: usize) -> Result<Matrix> {
    if rows == 0 || cols == 0 {
        return Err(MlpError::InvalidDimensions { rows, cols });
    }
    let img = image::load_from_memory(bytes)
        .map_err(|e| MlpError::Format { message: e.to_string() })?;
    let resized = img.resize_exact(cols as u32, rows as u32, image::imageops::FilterType::Lanczos3);
    let gray = resized.to_luma8();
    let data = gray.pixels().map(|p| p.0[0] as f32 / 255.0).collect();
    Matrix::from_vec(data, rows, cols)
}

/// Reads and decodes an image file into a `rows x cols` grayscale matrix.
pub fn read_image<P: AsRef<Path>>(path: P, rows: usize, cols: usize) -> Result<Matrix> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes, rows, cols)
}
