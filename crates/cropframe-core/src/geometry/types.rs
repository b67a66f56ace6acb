//! Core types for crop geometry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default output width of a widget (the banner slot it was designed for).
pub const DEFAULT_TARGET_WIDTH: u32 = 1230;

/// Default output height of a widget.
pub const DEFAULT_TARGET_HEIGHT: u32 = 120;

/// Default minimum crop width and height, in source pixels.
pub const DEFAULT_MIN_CROP_DIMENSION: f64 = 50.0;

/// Largest output side the JPEG encoder accepts.
pub const MAX_TARGET_DIMENSION: u32 = 65_535;

/// Largest output surface, in pixels.
pub const MAX_TARGET_PIXELS: u64 = 16_777_216;

/// Error types for geometry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Source or target dimensions are zero, negative or not finite.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    /// The crop rectangle is smaller than the configured minimum.
    #[error("Crop {width:.0}x{height:.0} is smaller than the minimum of {min:.0}px per side")]
    CropTooSmall { width: f64, height: f64, min: f64 },

    /// The output surface exceeds the encoder or memory limits.
    #[error(
        "Output size {width}x{height} exceeds {max_side}px per side or {max_pixels} pixels",
        max_side = MAX_TARGET_DIMENSION,
        max_pixels = MAX_TARGET_PIXELS
    )]
    TargetTooLarge { width: u32, height: u32 },
}

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Dimensions of a decoded raster.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    /// Returns the dimensions unchanged if both sides are finite and positive.
    pub fn validated(self) -> Result<Self, GeometryError> {
        if self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
        {
            Ok(self)
        } else {
            Err(GeometryError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Fixed output size of a widget instance.
///
/// Defines both the aspect ratio of the crop and the size of the
/// rasterized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub target_width: u32,
    pub target_height: u32,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            target_height: DEFAULT_TARGET_HEIGHT,
        }
    }
}

impl TargetSpec {
    /// Create a target spec, rejecting zero-area and oversized targets.
    pub fn new(target_width: u32, target_height: u32) -> Result<Self, GeometryError> {
        let spec = Self {
            target_width,
            target_height,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(GeometryError::InvalidDimensions {
                width: self.target_width as f64,
                height: self.target_height as f64,
            });
        }

        let too_large = GeometryError::TargetTooLarge {
            width: self.target_width,
            height: self.target_height,
        };
        if self.target_width > MAX_TARGET_DIMENSION || self.target_height > MAX_TARGET_DIMENSION {
            return Err(too_large);
        }
        match (self.target_width as u64).checked_mul(self.target_height as u64) {
            Some(pixels) if pixels <= MAX_TARGET_PIXELS => Ok(()),
            _ => Err(too_large),
        }
    }

    /// Target aspect ratio (width / height).
    pub fn aspect(&self) -> f64 {
        self.target_width as f64 / self.target_height as f64
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::from_pixels(self.target_width, self.target_height)
    }
}

/// A crop region in source-image pixel coordinates.
///
/// Origin is the top-left corner of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// True if the rectangle lies entirely inside `source`.
    ///
    /// Edges may overshoot by a relative 1e-9 to absorb rounding in
    /// `(w - width) + width`.
    pub fn fits_within(&self, source: Dimensions) -> bool {
        let slack_x = source.width.abs().max(1.0) * 1e-9;
        let slack_y = source.height.abs().max(1.0) * 1e-9;
        self.is_finite()
            && self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= source.width + slack_x
            && self.bottom() <= source.height + slack_y
    }

    pub(crate) fn check_finite(&self) -> Result<(), GeometryError> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(GeometryError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Settings handed to the interactive rectangle editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropToolConfig {
    /// Locked width / height ratio of the selection.
    pub aspect_ratio_lock: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl CropToolConfig {
    pub fn for_target(target: TargetSpec, min_dimension: f64) -> Self {
        Self {
            aspect_ratio_lock: target.aspect(),
            min_width: min_dimension,
            min_height: min_dimension,
        }
    }
}
