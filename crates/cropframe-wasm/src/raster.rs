//! One-shot crop rasterization binding.
//!
//! For hosts that run their own crop UI and only need the pixel work.

use crate::types::{js_error, JsCropRectangle};
use cropframe_core::decode::decode_image;
use cropframe_core::geometry::{
    validate_crop, CropRectangle, Dimensions, TargetSpec, DEFAULT_MIN_CROP_DIMENSION,
};
use cropframe_core::raster::{render_and_encode, RasterOptions};
use wasm_bindgen::prelude::*;

/// Crop `bytes` to `rect`, resample to exactly `target_width`x`target_height`
/// and encode as JPEG at quality 0.95.
///
/// The rectangle goes through the same validation as editor adjustments: it
/// is clamped into the source and must be at least 50px per side.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded, the rectangle is too
/// small, the target size is zero or too large, or encoding fails.
#[wasm_bindgen]
pub fn rasterize_image(
    bytes: &[u8],
    rect: &JsCropRectangle,
    target_width: u32,
    target_height: u32,
) -> Result<Vec<u8>, JsValue> {
    let source = decode_image(bytes).map_err(js_error)?;
    let target = TargetSpec::new(target_width, target_height).map_err(js_error)?;
    let rect = validate_crop(
        CropRectangle::from(rect),
        Dimensions::from_pixels(source.width, source.height),
        DEFAULT_MIN_CROP_DIMENSION,
    )
    .map_err(js_error)?;
    render_and_encode(
        &source,
        &rect,
        target,
        RasterOptions::default(),
    )
    .map(|encoded| encoded.bytes)
    .map_err(js_error)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_rasterize_rejects_garbage() {
        let rect = JsCropRectangle::new(0.0, 0.0, 10.0, 10.0);
        assert!(rasterize_image(&[1, 2, 3], &rect, 10, 10).is_err());
    }

    #[wasm_bindgen_test]
    fn test_rasterize_rejects_small_rect() {
        let jpeg = cropframe_core::encode::encode_jpeg(&vec![90u8; 100 * 100 * 3], 100, 100, 90)
            .unwrap();
        let rect = JsCropRectangle::new(0.0, 0.0, 20.0, 20.0);
        assert!(rasterize_image(&jpeg, &rect, 64, 64).is_err());
    }

    #[wasm_bindgen_test]
    fn test_rasterize_rejects_oversized_target() {
        let jpeg = cropframe_core::encode::encode_jpeg(&vec![90u8; 100 * 100 * 3], 100, 100, 90)
            .unwrap();
        let rect = JsCropRectangle::new(0.0, 0.0, 100.0, 100.0);
        assert!(rasterize_image(&jpeg, &rect, 100_000, 100_000).is_err());
    }
}
