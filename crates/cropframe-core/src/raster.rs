//! Rasterization of a crop rectangle into the fixed-size output.
//!
//! The selected region is resampled to fill the target surface exactly: no
//! letterboxing, no padding. The result is JPEG-encoded and registered in a
//! [`ReferenceStore`].
//!
//! This is the only expensive step in the widget. [`RasterTask`] packages
//! its inputs so the host can run it wherever it likes (inline, on a worker
//! thread, in a Web Worker) and hand the outcome back to the controller.

use std::sync::Arc;

use image::{imageops, RgbImage};
use thiserror::Error;

use crate::decode::{DecodedImage, FilterType};
use crate::encode::{encode_jpeg, quality_from_factor, EncodeError, JPEG_MIME_TYPE};
use crate::geometry::{CropRectangle, TargetSpec};
use crate::reference::{ImageReference, ReferenceStore};

/// Errors that can occur while rasterizing a crop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RasterError {
    /// The output surface is empty or too large to allocate.
    #[error("Cannot create a {width}x{height} output surface")]
    InvalidSurface { width: u32, height: u32 },

    /// The source pixel buffer does not match its declared size.
    #[error("Source pixel buffer does not match {width}x{height}")]
    InvalidSource { width: u32, height: u32 },

    /// The crop rectangle selects no pixels of the source.
    #[error("Crop rectangle selects no source pixels")]
    EmptyRegion,

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Settings that affect the rasterized output but not its size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    pub filter: FilterType,
    /// JPEG quality on a 0–1 scale.
    pub quality: f64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
            quality: crate::encode::DEFAULT_QUALITY_FACTOR,
        }
    }
}

/// Encoded output of a raster run, not yet registered anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Register the bytes in `store`.
    pub fn into_reference(self, store: &ReferenceStore) -> ImageReference {
        store.create(self.mime_type, self.bytes)
    }
}

/// Integer pixel region selected by a crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRegion {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

/// Snap a crop rectangle to whole source pixels.
///
/// Edges are rounded and clamped to the source; a region that still has
/// extent after clamping is at least 1x1. A rectangle that lies entirely
/// outside the source selects nothing.
fn pixel_region(rect: &CropRectangle, src_width: u32, src_height: u32) -> Option<PixelRegion> {
    let snap = |value: f64, max: u32| -> u32 {
        if value.is_nan() {
            0
        } else {
            value.round().clamp(0.0, max as f64) as u32
        }
    };

    if rect.width <= 0.0 || rect.height <= 0.0 || src_width == 0 || src_height == 0 {
        return None;
    }
    let misses = rect.right() <= 0.0
        || rect.bottom() <= 0.0
        || rect.x >= src_width as f64
        || rect.y >= src_height as f64;
    if misses || rect.x.is_nan() || rect.y.is_nan() {
        return None;
    }

    let left = snap(rect.x, src_width);
    let top = snap(rect.y, src_height);
    let right = snap(rect.right(), src_width);
    let bottom = snap(rect.bottom(), src_height);

    // Sub-pixel rectangles still sample one pixel
    let left = left.min(src_width - 1);
    let top = top.min(src_height - 1);
    let width = right.saturating_sub(left).max(1);
    let height = bottom.saturating_sub(top).max(1);

    Some(PixelRegion {
        left,
        top,
        width,
        height,
    })
}

/// Copy a pixel region out of the source, row by row.
fn copy_region(source: &DecodedImage, region: PixelRegion) -> Option<RgbImage> {
    let row_bytes = region.width as usize * 3;
    let mut data = Vec::with_capacity(row_bytes * region.height as usize);

    for row in region.top..region.top + region.height {
        let start = (row as usize * source.width as usize + region.left as usize) * 3;
        data.extend_from_slice(source.pixels.get(start..start + row_bytes)?);
    }

    RgbImage::from_raw(region.width, region.height, data)
}

/// Resample `rect` from `source` into a `target`-sized raster.
pub fn render_crop(
    source: &DecodedImage,
    rect: &CropRectangle,
    target: TargetSpec,
    filter: FilterType,
) -> Result<DecodedImage, RasterError> {
    target.validate().map_err(|_| RasterError::InvalidSurface {
        width: target.target_width,
        height: target.target_height,
    })?;

    if !source.has_valid_buffer() {
        return Err(RasterError::InvalidSource {
            width: source.width,
            height: source.height,
        });
    }
    let region = pixel_region(rect, source.width, source.height).ok_or(RasterError::EmptyRegion)?;

    let cropped = copy_region(source, region).ok_or(RasterError::EmptyRegion)?;
    let output = imageops::resize(
        &cropped,
        target.target_width,
        target.target_height,
        filter.into(),
    );

    Ok(DecodedImage::from_rgb_image(output))
}

/// Render and encode a crop without registering it.
pub fn render_and_encode(
    source: &DecodedImage,
    rect: &CropRectangle,
    target: TargetSpec,
    options: RasterOptions,
) -> Result<EncodedImage, RasterError> {
    let surface = render_crop(source, rect, target, options.filter)?;
    let bytes = encode_jpeg(
        &surface.pixels,
        surface.width,
        surface.height,
        quality_from_factor(options.quality),
    )?;

    Ok(EncodedImage {
        width: surface.width,
        height: surface.height,
        mime_type: JPEG_MIME_TYPE,
        bytes,
    })
}

/// Rasterize `rect` into a new JPEG reference of exactly the target size.
///
/// # Errors
///
/// Any failure to create the surface or encode it is a `RasterError`; the
/// store is left untouched in that case.
pub fn rasterize(
    source: &DecodedImage,
    rect: &CropRectangle,
    target: TargetSpec,
    options: RasterOptions,
    store: &ReferenceStore,
) -> Result<ImageReference, RasterError> {
    let encoded = render_and_encode(source, rect, target, options)?;
    log::debug!(
        "rasterized {}x{} crop to {} bytes",
        encoded.width,
        encoded.height,
        encoded.bytes.len()
    );
    Ok(encoded.into_reference(store))
}

/// A detached rasterization job.
///
/// Holds shared source pixels, so it is `Send` and can outlive the borrow of
/// the controller that created it.
#[derive(Debug, Clone)]
pub struct RasterTask {
    source: Arc<DecodedImage>,
    rect: CropRectangle,
    target: TargetSpec,
    options: RasterOptions,
}

impl RasterTask {
    pub fn new(
        source: Arc<DecodedImage>,
        rect: CropRectangle,
        target: TargetSpec,
        options: RasterOptions,
    ) -> Self {
        Self {
            source,
            rect,
            target,
            options,
        }
    }

    pub fn rect(&self) -> CropRectangle {
        self.rect
    }

    pub fn target(&self) -> TargetSpec {
        self.target
    }

    /// Perform the resample and encode.
    pub fn run(&self) -> Result<EncodedImage, RasterError> {
        render_and_encode(&self.source, &self.rect, self.target, self.options)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn gray_image(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(width, height, vec![128u8; (width * height * 3) as usize])
    }

    proptest! {
        /// Property: Output size equals the target regardless of source and crop.
        #[test]
        fn prop_output_matches_target(
            (sw, sh) in (1u32..=120, 1u32..=120),
            (x, y, w, h) in (-20.0f64..=140.0, -20.0f64..=140.0, 0.5f64..=150.0, 0.5f64..=150.0),
            (tw, th) in (1u32..=64, 1u32..=64),
        ) {
            // Keep at least part of the rectangle on the source
            let x = x.min(sw as f64 - 0.5);
            let y = y.min(sh as f64 - 0.5);
            let w = w.max(0.5 - x);
            let h = h.max(0.5 - y);

            let source = gray_image(sw, sh);
            let rect = CropRectangle::new(x, y, w, h);
            let output = render_crop(&source, &rect, TargetSpec::new(tw, th).unwrap(), FilterType::Bilinear)
                .unwrap();

            prop_assert_eq!((output.width, output.height), (tw, th));
            prop_assert_eq!(output.pixels.len(), (tw * th * 3) as usize);
        }

        /// Property: Snapped regions never leave the source.
        #[test]
        fn prop_region_within_source(
            (sw, sh) in (1u32..=500, 1u32..=500),
            (x, y, w, h) in (-100.0f64..=600.0, -100.0f64..=600.0, 0.01f64..=700.0, 0.01f64..=700.0),
        ) {
            let region = pixel_region(&CropRectangle::new(x, y, w, h), sw, sh);
            let overlaps = x < sw as f64 && y < sh as f64 && x + w > 0.0 && y + h > 0.0;
            prop_assert_eq!(region.is_some(), overlaps);

            if let Some(region) = region {
                prop_assert!(region.width >= 1 && region.height >= 1);
                prop_assert!(region.left + region.width <= sw);
                prop_assert!(region.top + region.height <= sh);
            }
        }
    }
}
