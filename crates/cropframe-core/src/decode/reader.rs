//! Decoding of user-picked image files with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::ImageReader;

use super::{DecodeError, DecodedImage, Orientation};

/// Decode an image file (JPEG, PNG, GIF, WebP, BMP) from bytes.
///
/// The format is sniffed from the content, not from the MIME type the host
/// reported. EXIF orientation is applied so that phone photos come out
/// upright.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a known format.
/// Returns `DecodeError::CorruptedFile` if the file is damaged or truncated.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    decode_image_with_limit(bytes, u64::MAX)
}

/// Decode an image, refusing sources larger than `max_pixels`.
///
/// The header is inspected first so an oversized file is rejected before
/// its pixel buffer is allocated.
pub fn decode_image_with_limit(bytes: &[u8], max_pixels: u64) -> Result<DecodedImage, DecodeError> {
    let (width, height) = probe_dimensions(bytes)?;
    if width as u64 * height as u64 > max_pixels {
        return Err(DecodeError::TooLarge {
            width,
            height,
            max_pixels,
        });
    }

    let orientation = extract_orientation(bytes);

    let img = open_reader(bytes)?
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(DecodedImage::from_rgb_image(orientation.apply(img).into_rgb8()))
}

/// Read the stored width and height without decoding pixel data.
///
/// The result is before orientation correction.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    open_reader(bytes)?
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn open_reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }
    Ok(reader)
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Upright` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from_exif)
            .unwrap_or_default(),
        Err(_) => Orientation::Upright,
    }
}
