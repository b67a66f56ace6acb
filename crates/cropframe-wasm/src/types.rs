//! WASM-compatible wrapper types.
//!
//! Rectangles cross the boundary as a small class with getters so that
//! TypeScript gets real property types instead of an untyped object.

use cropframe_core::geometry::CropRectangle;
use wasm_bindgen::prelude::*;

/// A crop rectangle in source-image pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsCropRectangle {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl JsCropRectangle {
    #[wasm_bindgen(constructor)]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> JsCropRectangle {
        JsCropRectangle {
            x,
            y,
            width,
            height,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl From<CropRectangle> for JsCropRectangle {
    fn from(rect: CropRectangle) -> Self {
        Self::new(rect.x, rect.y, rect.width, rect.height)
    }
}

impl From<&JsCropRectangle> for CropRectangle {
    fn from(rect: &JsCropRectangle) -> Self {
        CropRectangle::new(rect.x, rect.y, rect.width, rect.height)
    }
}

/// Convert any displayable error into a JS exception value.
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_preserves_fields() {
        let core = CropRectangle::new(1.5, 2.0, 300.0, 29.25);
        let js = JsCropRectangle::from(core);
        assert_eq!(js.x(), 1.5);
        assert_eq!(js.height(), 29.25);
        assert_eq!(CropRectangle::from(&js), core);
    }
}
