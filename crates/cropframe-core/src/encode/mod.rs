//! Image encoding for committed crops.
//!
//! Output is always JPEG at a fixed quality factor; there is no format
//! conversion beyond that.

mod jpeg;

pub use jpeg::{encode_jpeg, quality_from_factor, EncodeError, DEFAULT_QUALITY_FACTOR, JPEG_MIME_TYPE};
