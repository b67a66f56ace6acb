//! Cropframe WASM - WebAssembly bindings for cropframe-core
//!
//! This crate exposes the selectable image widget and the crop geometry and
//! rasterization helpers to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `widget` - The `JsSelectableImage` state machine class
//! - `geometry` - Initial crop and crop validation
//! - `raster` - One-shot crop, resample and JPEG encode
//! - `types` - WASM-compatible wrapper types
//! - `logger` - `log` records forwarded to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsSelectableImage } from '@cropframe/wasm';
//!
//! await init();
//! const widget = new JsSelectableImage(bannerUrl, 'Homepage banner', 1230, 120);
//! ```

use log::LevelFilter;
use wasm_bindgen::prelude::*;

mod geometry;
mod logger;
mod raster;
mod types;
mod widget;

pub use geometry::{compute_initial_crop, validate_crop};
pub use logger::set_log_level;
pub use raster::rasterize_image;
pub use types::JsCropRectangle;
pub use widget::JsSelectableImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(LevelFilter::Warn);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
