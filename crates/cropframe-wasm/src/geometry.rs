//! Crop geometry WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { compute_initial_crop, validate_crop } from '@cropframe/wasm';
//!
//! const seed = compute_initial_crop(img.naturalWidth, img.naturalHeight, 1230, 120);
//! const clamped = validate_crop(editorRect, img.naturalWidth, img.naturalHeight, 50);
//! ```

use crate::types::{js_error, JsCropRectangle};
use cropframe_core::geometry::{self, CropRectangle, Dimensions, TargetSpec};
use wasm_bindgen::prelude::*;

/// Largest centered rectangle of the target aspect ratio inside the source.
///
/// # Errors
///
/// Returns an error if any dimension is zero, negative or not finite.
#[wasm_bindgen]
pub fn compute_initial_crop(
    source_width: f64,
    source_height: f64,
    target_width: u32,
    target_height: u32,
) -> Result<JsCropRectangle, JsValue> {
    let target = TargetSpec::new(target_width, target_height).map_err(js_error)?;
    geometry::compute_initial_crop(Dimensions::new(source_width, source_height), target)
        .map(JsCropRectangle::from)
        .map_err(js_error)
}

/// Check a rectangle reported by the crop editor and clamp it into the source.
///
/// # Errors
///
/// Returns an error if either side is below `min_dimension` or the source
/// dimensions are invalid.
#[wasm_bindgen]
pub fn validate_crop(
    rect: &JsCropRectangle,
    source_width: f64,
    source_height: f64,
    min_dimension: f64,
) -> Result<JsCropRectangle, JsValue> {
    geometry::validate_crop(
        CropRectangle::from(rect),
        Dimensions::new(source_width, source_height),
        min_dimension,
    )
    .map(JsCropRectangle::from)
    .map_err(js_error)
}
