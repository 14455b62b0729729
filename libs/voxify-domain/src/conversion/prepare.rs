//! Image preparation
//!
//! Normalizes an uploaded photo into the fixed shape the vision API is fed:
//! a 512x512 PNG under the upstream byte ceiling. Preparation failures are
//! deterministic for a given input and are never retried.

use image::{imageops::FilterType, ImageFormat};
use std::io::Cursor;

use crate::conversion::entity::PreparedImage;
use crate::conversion::error::{ConversionError, Result};

/// Side length of the normalized square image
pub const PREPARED_DIMENSION: u32 = 512;

/// Hard ceiling on the normalized PNG, imposed by the vision API
pub const MAX_PREPARED_BYTES: usize = 4 * 1024 * 1024;

/// Decode, crop-to-fill, and re-encode an uploaded image.
///
/// The input may be any common raster format. The output is always a
/// 512x512 PNG: the image is scaled to cover the square and center-cropped,
/// so output dimensions are deterministic regardless of input aspect ratio.
///
/// # Errors
///
/// - `ConversionError::Preparation` if the input cannot be decoded or the
///   output cannot be encoded
/// - `ConversionError::PreparedImageTooLarge` if the normalized PNG exceeds
///   [`MAX_PREPARED_BYTES`]
pub fn prepare_image(raw: &[u8]) -> Result<PreparedImage> {
    let decoded = image::load_from_memory(raw)
        .map_err(|e| ConversionError::preparation(format!("could not decode image: {e}")))?;

    let (source_width, source_height) = (decoded.width(), decoded.height());

    let normalized = decoded.resize_to_fill(PREPARED_DIMENSION, PREPARED_DIMENSION, FilterType::Lanczos3);

    let mut buffer = Cursor::new(Vec::new());
    normalized
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ConversionError::preparation(format!("could not encode PNG: {e}")))?;
    let png = buffer.into_inner();

    if png.len() > MAX_PREPARED_BYTES {
        return Err(ConversionError::PreparedImageTooLarge {
            size: png.len(),
            max: MAX_PREPARED_BYTES,
        });
    }

    Ok(PreparedImage::new(
        png,
        normalized.width(),
        normalized.height(),
        source_width,
        source_height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    fn encode_png(img: &DynamicImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_prepare_normalizes_to_fixed_square() {
        let input = encode_png(&DynamicImage::new_rgb8(1024, 768));

        let prepared = prepare_image(&input).unwrap();

        assert_eq!(prepared.dimensions(), (PREPARED_DIMENSION, PREPARED_DIMENSION));
        assert_eq!(prepared.source_dimensions(), (1024, 768));
        assert!(prepared.byte_len() <= MAX_PREPARED_BYTES);
    }

    #[test]
    fn test_prepare_crops_extreme_aspect_ratios() {
        let wide = encode_png(&DynamicImage::new_rgb8(2000, 200));
        let tall = encode_png(&DynamicImage::new_rgb8(200, 2000));

        for input in [wide, tall] {
            let prepared = prepare_image(&input).unwrap();
            assert_eq!(prepared.dimensions(), (PREPARED_DIMENSION, PREPARED_DIMENSION));
        }
    }

    #[test]
    fn test_prepare_upscales_small_inputs() {
        let input = encode_png(&DynamicImage::new_rgb8(64, 64));

        let prepared = prepare_image(&input).unwrap();

        assert_eq!(prepared.dimensions(), (PREPARED_DIMENSION, PREPARED_DIMENSION));
    }

    #[test]
    fn test_prepare_output_is_png() {
        let input = encode_png(&DynamicImage::new_rgb8(300, 300));

        let prepared = prepare_image(&input).unwrap();

        let round_tripped = image::load_from_memory(prepared.as_png()).unwrap();
        assert_eq!(round_tripped.width(), PREPARED_DIMENSION);
        // PNG magic bytes
        assert_eq!(&prepared.as_png()[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_prepare_rejects_undecodable_bytes() {
        let err = prepare_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ConversionError::Preparation(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_prepare_rejects_empty_input() {
        assert!(matches!(
            prepare_image(&[]).unwrap_err(),
            ConversionError::Preparation(_)
        ));
    }
}
