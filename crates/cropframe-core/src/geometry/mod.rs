//! Crop geometry for fixed-size output slots.
//!
//! This module is pure arithmetic with no image data involved:
//! - Seeding the largest centered crop with a target aspect ratio
//! - Validating rectangles reported by the interactive crop editor
//!
//! # Coordinate System
//!
//! - Rectangles are in source-image pixels
//! - Origin is top-left corner

mod crop;
mod types;

pub use crop::{compute_initial_crop, validate_crop};
pub use types::{
    CropRectangle, CropToolConfig, Dimensions, GeometryError, TargetSpec,
    DEFAULT_MIN_CROP_DIMENSION, DEFAULT_TARGET_HEIGHT, DEFAULT_TARGET_WIDTH, MAX_TARGET_DIMENSION,
    MAX_TARGET_PIXELS,
};
