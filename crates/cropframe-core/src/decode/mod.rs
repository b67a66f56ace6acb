//! Image decoding for picked replacement files.
//!
//! This module provides functionality for:
//! - Sniffing and decoding the common web formats (JPEG, PNG, GIF, WebP, BMP)
//! - Applying EXIF orientation so the crop editor sees the upright image
//! - Rejecting oversized sources before their pixels are allocated
//!
//! All operations are synchronous and single-threaded, so they run the same
//! natively and inside WASM.

mod reader;
mod types;

pub use reader::{decode_image, decode_image_with_limit, probe_dimensions};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
