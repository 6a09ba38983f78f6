//! Image codec boundary.
//!
//! Thin wrapper over the `image` crate: decode a stored blob into a
//! [`DynamicImage`] and encode a transform result back into bytes. The encode
//! format follows the media item's original content type, so derived
//! artifacts keep the original encoding along with the original extension.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use crate::error::ConversionResult;

/// Decode a blob, sniffing the format from its magic bytes.
pub fn decode(data: &[u8]) -> ConversionResult<DynamicImage> {
    let image = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?
        .decode()?;

    Ok(image)
}

/// Map a content type to an encode format, defaulting to JPEG.
pub fn format_for_content_type(content_type: &str) -> ImageFormat {
    match content_type {
        "image/jpeg" | "image/jpg" => ImageFormat::Jpeg,
        "image/png" => ImageFormat::Png,
        "image/gif" => ImageFormat::Gif,
        "image/webp" => ImageFormat::WebP,
        _ => ImageFormat::Jpeg,
    }
}

/// Encode an image in the format implied by the given content type.
pub fn encode(image: &DynamicImage, content_type: &str) -> ConversionResult<Bytes> {
    let format = format_for_content_type(content_type);

    let (width, height) = image.dimensions();
    let estimated_size = (width * height * 3) as usize;
    let mut buffer = Vec::with_capacity(estimated_size);

    image.write_to(&mut Cursor::new(&mut buffer), format)?;

    Ok(Bytes::from(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([120, 80, 40])))
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(format_for_content_type("image/jpeg"), ImageFormat::Jpeg);
        assert_eq!(format_for_content_type("image/png"), ImageFormat::Png);
        assert_eq!(format_for_content_type("image/webp"), ImageFormat::WebP);
        // Unknown types fall back to JPEG.
        assert_eq!(format_for_content_type("image/x-exotic"), ImageFormat::Jpeg);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let original = test_image(8, 6);

        let encoded = encode(&original, "image/png").unwrap();
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded.dimensions(), (8, 6));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode(b"definitely not an image");
        assert!(result.is_err());
    }
}
