//! Types shared by the decoder and the rasterizer.

use image::imageops;
use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a picked file could not be turned into pixels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Content sniffing found no supported image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The header declares more pixels than the configured budget.
    #[error("Image is too large: {width}x{height} exceeds {max_pixels} pixels")]
    TooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },
}

/// Resampling kernel used when the crop is scaled to the output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Nearest,
    #[default]
    Bilinear,
    CatmullRom,
    /// Sharpest downscaling; the widget default.
    Lanczos3,
}

impl From<FilterType> for imageops::FilterType {
    fn from(filter: FilterType) -> Self {
        match filter {
            FilterType::Nearest => imageops::FilterType::Nearest,
            FilterType::Bilinear => imageops::FilterType::Triangle,
            FilterType::CatmullRom => imageops::FilterType::CatmullRom,
            FilterType::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Camera orientation recorded in the EXIF `Orientation` tag.
///
/// Variants describe the transform that brings the stored pixels upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Upright,
    Mirrored,
    UpsideDown,
    MirroredUpsideDown,
    MirroredRotatedLeft,
    RotatedRight,
    MirroredRotatedRight,
    RotatedLeft,
}

impl Orientation {
    /// Map an EXIF tag value (1-8); anything else is treated as upright.
    pub fn from_exif(value: u32) -> Self {
        const TABLE: [Orientation; 8] = [
            Orientation::Upright,
            Orientation::Mirrored,
            Orientation::UpsideDown,
            Orientation::MirroredUpsideDown,
            Orientation::MirroredRotatedLeft,
            Orientation::RotatedRight,
            Orientation::MirroredRotatedRight,
            Orientation::RotatedLeft,
        ];
        value
            .checked_sub(1)
            .and_then(|index| TABLE.get(index as usize).copied())
            .unwrap_or_default()
    }

    /// Rotate and flip `img` so it displays upright.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Upright => img,
            Orientation::Mirrored => img.fliph(),
            Orientation::UpsideDown => img.rotate180(),
            Orientation::MirroredUpsideDown => img.flipv(),
            Orientation::MirroredRotatedLeft => img.rotate90().fliph(),
            Orientation::RotatedRight => img.rotate90(),
            Orientation::MirroredRotatedRight => img.rotate270().fliph(),
            Orientation::RotatedLeft => img.rotate270(),
        }
    }
}

/// An upright RGB8 raster, row-major, 3 bytes per pixel.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// True if the buffer length matches the declared size.
    pub fn has_valid_buffer(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two pixels side by side: red then green.
    fn red_green() -> DynamicImage {
        let pixels = vec![255, 0, 0, 0, 255, 0];
        DynamicImage::ImageRgb8(RgbImage::from_raw(2, 1, pixels).unwrap())
    }

    #[test]
    fn test_filter_maps_to_image_kernel() {
        let triangle: imageops::FilterType = FilterType::Bilinear.into();
        assert!(matches!(triangle, imageops::FilterType::Triangle));
        let lanczos: imageops::FilterType = FilterType::Lanczos3.into();
        assert!(matches!(lanczos, imageops::FilterType::Lanczos3));
    }

    #[test]
    fn test_filter_serde_names() {
        let filter: FilterType = parse_filter("catmullrom");
        assert_eq!(filter, FilterType::CatmullRom);
    }

    /// Parse a lowercase variant name through serde's value deserializer.
    fn parse_filter(name: &str) -> FilterType {
        use serde::de::value::{Error, StrDeserializer};
        use serde::de::IntoDeserializer;
        let deserializer: StrDeserializer<'_, Error> = name.into_deserializer();
        FilterType::deserialize(deserializer).unwrap()
    }

    #[test]
    fn test_orientation_from_exif() {
        assert_eq!(Orientation::from_exif(1), Orientation::Upright);
        assert_eq!(Orientation::from_exif(6), Orientation::RotatedRight);
        assert_eq!(Orientation::from_exif(8), Orientation::RotatedLeft);
        assert_eq!(Orientation::from_exif(0), Orientation::Upright);
        assert_eq!(Orientation::from_exif(99), Orientation::Upright);
    }

    #[test]
    fn test_rotated_right_is_turned_upright() {
        let result = Orientation::RotatedRight.apply(red_green()).into_rgb8();
        assert_eq!(result.dimensions(), (1, 2));
        assert_eq!(result.get_pixel(0, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_mirrored_is_flipped() {
        let result = Orientation::Mirrored.apply(red_green()).into_rgb8();
        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_buffer_check() {
        assert!(DecodedImage::new(4, 2, vec![7u8; 24]).has_valid_buffer());

        let short = DecodedImage {
            width: 4,
            height: 4,
            pixels: vec![0u8; 10],
        };
        assert!(!short.has_valid_buffer());
    }

    #[test]
    fn test_too_large_message() {
        let err = DecodeError::TooLarge {
            width: 10_000,
            height: 10_000,
            max_pixels: 40_000_000,
        };
        assert_eq!(
            err.to_string(),
            "Image is too large: 10000x10000 exceeds 40000000 pixels"
        );
    }
}
