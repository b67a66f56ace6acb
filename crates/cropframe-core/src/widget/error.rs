//! Errors surfaced to the user by the widget.
//!
//! Every variant is recoverable: the controller reverts or keeps its state
//! and the message is shown as a notice. Nothing here is fatal.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::decode::DecodeError;
use crate::geometry::GeometryError;
use crate::raster::RasterError;

/// Input events the controller accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetEvent {
    Click,
    RequestChange,
    FileChosen,
    FileDialogCancelled,
    Adjust,
    Confirm,
    Cancel,
}

impl fmt::Display for WidgetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WidgetEvent::Click => "click",
            WidgetEvent::RequestChange => "request_change",
            WidgetEvent::FileChosen => "file_chosen",
            WidgetEvent::FileDialogCancelled => "file_dialog_cancelled",
            WidgetEvent::Adjust => "adjust",
            WidgetEvent::Confirm => "confirm",
            WidgetEvent::Cancel => "cancel",
        };
        f.write_str(name)
    }
}

/// A rejected action, with the message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WidgetError {
    #[error("The image has invalid dimensions ({width}x{height})")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("The selection must be at least {min:.0}x{min:.0} pixels (got {width:.0}x{height:.0})")]
    CropTooSmall { width: f64, height: f64, min: f64 },

    #[error("Please select an image file (got {0})")]
    UnsupportedFileType(String),

    #[error("Could not read the image: {0}")]
    DecodeFailed(String),

    #[error("The image is too large ({width}x{height}, limit {max_pixels} pixels)")]
    SourceTooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    #[error("Failed to upload image: {0}")]
    EncodingFailure(String),

    #[error("Please wait for the upload to finish ({0} ignored)")]
    OperationInProgress(WidgetEvent),
}

impl From<GeometryError> for WidgetError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::InvalidDimensions { width, height } => {
                WidgetError::InvalidDimensions { width, height }
            }
            GeometryError::CropTooSmall { width, height, min } => {
                WidgetError::CropTooSmall { width, height, min }
            }
            GeometryError::TargetTooLarge { width, height } => WidgetError::InvalidDimensions {
                width: width as f64,
                height: height as f64,
            },
        }
    }
}

impl From<DecodeError> for WidgetError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::TooLarge {
                width,
                height,
                max_pixels,
            } => WidgetError::SourceTooLarge {
                width,
                height,
                max_pixels,
            },
            other => WidgetError::DecodeFailed(other.to_string()),
        }
    }
}

impl From<RasterError> for WidgetError {
    fn from(err: RasterError) -> Self {
        WidgetError::EncodingFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_conversion() {
        let err: WidgetError = GeometryError::CropTooSmall {
            width: 10.0,
            height: 80.0,
            min: 50.0,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "The selection must be at least 50x50 pixels (got 10x80)"
        );
    }

    #[test]
    fn test_decode_conversion() {
        let err: WidgetError = DecodeError::TooLarge {
            width: 9000,
            height: 9000,
            max_pixels: 1000,
        }
        .into();
        assert!(matches!(err, WidgetError::SourceTooLarge { width: 9000, .. }));

        let err: WidgetError = DecodeError::InvalidFormat.into();
        assert!(matches!(err, WidgetError::DecodeFailed(_)));
    }

    #[test]
    fn test_raster_conversion() {
        let err: WidgetError = RasterError::EmptyRegion.into();
        assert_eq!(
            err,
            WidgetError::EncodingFailure("Crop rectangle selects no source pixels".to_string())
        );
    }

    #[test]
    fn test_operation_in_progress_names_event() {
        let err = WidgetError::OperationInProgress(WidgetEvent::Cancel);
        assert_eq!(
            err.to_string(),
            "Please wait for the upload to finish (cancel ignored)"
        );
    }
}
