//! Widget configuration.
//!
//! Everything tunable about a widget instance lives in [`WidgetConfig`]. The
//! defaults describe the banner slot the widget was built for; hosts usually
//! only override the target size.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::encode::DEFAULT_QUALITY_FACTOR;
use crate::geometry::{CropToolConfig, GeometryError, TargetSpec, DEFAULT_MIN_CROP_DIMENSION};

/// Default cap on decoded source size (width * height).
pub const DEFAULT_MAX_SOURCE_PIXELS: u64 = 40_000_000;

/// Errors reported by [`WidgetConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid target size: {0}")]
    InvalidTarget(#[from] GeometryError),

    #[error("Minimum crop dimension must be a finite number >= 1, got {0}")]
    InvalidMinDimension(f64),

    #[error("JPEG quality must be within 0..=1, got {0}")]
    InvalidQuality(f64),

    #[error("Maximum source pixel count must be non-zero")]
    InvalidPixelLimit,
}

/// Configuration of a single widget instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Output size, and through it the locked aspect ratio.
    pub target: TargetSpec,
    /// Minimum crop width and height in source pixels.
    pub min_crop_dimension: f64,
    /// JPEG quality factor on a 0–1 scale.
    pub jpeg_quality: f64,
    /// Filter used when scaling the crop to the target size.
    pub resample_filter: FilterType,
    /// Largest accepted source (width * height).
    pub max_source_pixels: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            target: TargetSpec::default(),
            min_crop_dimension: DEFAULT_MIN_CROP_DIMENSION,
            jpeg_quality: DEFAULT_QUALITY_FACTOR,
            resample_filter: FilterType::Lanczos3,
            max_source_pixels: DEFAULT_MAX_SOURCE_PIXELS,
        }
    }
}

impl WidgetConfig {
    /// Default configuration with a different output size.
    pub fn with_target(target_width: u32, target_height: u32) -> Result<Self, ConfigError> {
        let config = Self {
            target: TargetSpec::new(target_width, target_height)?,
            ..Self::default()
        };
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.target.validate()?;

        if !self.min_crop_dimension.is_finite() || self.min_crop_dimension < 1.0 {
            return Err(ConfigError::InvalidMinDimension(self.min_crop_dimension));
        }
        if !(0.0..=1.0).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidQuality(self.jpeg_quality));
        }
        if self.max_source_pixels == 0 {
            return Err(ConfigError::InvalidPixelLimit);
        }
        Ok(())
    }

    /// Settings for the external crop editor.
    pub fn crop_tool(&self) -> CropToolConfig {
        CropToolConfig::for_target(self.target, self.min_crop_dimension)
    }
}
