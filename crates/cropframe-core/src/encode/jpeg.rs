//! JPEG encoding of rasterized crops.
//!
//! Committed images are always JPEG; the quality is expressed on the 0–1
//! scale used by browser canvas encoders and mapped onto the encoder's
//! 1–100 scale here.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

/// MIME type of everything this module produces.
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Quality factor used for committed crops.
pub const DEFAULT_QUALITY_FACTOR: f64 = 0.95;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),

    /// The encoder finished without producing any bytes
    #[error("JPEG encoder produced no data")]
    EmptyOutput,
}

/// Map a 0–1 quality factor onto the encoder's 1–100 scale.
///
/// Out-of-range and NaN factors are clamped (NaN maps to the default).
pub fn quality_from_factor(factor: f64) -> u8 {
    let factor = if factor.is_nan() {
        DEFAULT_QUALITY_FACTOR
    } else {
        factor.clamp(0.0, 1.0)
    };
    ((factor * 100.0).round() as u8).clamp(1, 100)
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, clamped)
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    let bytes = buffer.into_inner();
    if bytes.is_empty() {
        return Err(EncodeError::EmptyOutput);
    }
    Ok(bytes)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
