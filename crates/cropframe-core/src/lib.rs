//! Cropframe Core - fixed-size image replacement
//!
//! This crate provides the core of a clickable image slot whose picture can be
//! replaced by a user-picked file, cropped to the slot's aspect ratio and
//! re-encoded at the slot's exact pixel size. It is independent of any UI
//! toolkit; the WASM bindings live in `cropframe-wasm`.

pub mod config;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod raster;
pub mod reference;
pub mod widget;

pub use config::{ConfigError, WidgetConfig, DEFAULT_MAX_SOURCE_PIXELS};
pub use geometry::{
    compute_initial_crop, validate_crop, CropRectangle, CropToolConfig, Dimensions,
    GeometryError, TargetSpec,
};
pub use raster::{rasterize, EncodedImage, RasterError, RasterOptions, RasterTask};
pub use reference::{ImageReference, ReferenceStore, SourceLease};
pub use widget::{PickedFile, SelectableImage, WidgetError, WidgetEvent, WidgetState, WidgetView};
