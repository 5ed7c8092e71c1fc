//! Image normalisation: `DynamicImage` → PNG → base64 text payload.
//!
//! Whatever format was fetched, the appendix always declares `image/png`.
//! PNG is lossless, so re-encoding a PNG, GIF or BMP source keeps every pixel;
//! a JPEG source keeps its already-decoded pixels exactly.

use crate::error::InlineError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a decoded image as a padded standard-alphabet base64 PNG.
///
/// `target` only labels the error.
pub fn encode_png_base64(img: &DynamicImage, target: &str) -> Result<String, InlineError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|source| InlineError::EncodeFailed {
            target: target.to_string(),
            source,
        })?;

    let b64 = STANDARD.encode(&buf);
    debug!(
        "Encoded {}x{} image → {} bytes PNG, {} bytes base64",
        img.width(),
        img.height(),
        buf.len(),
        b64.len()
    );

    Ok(b64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let b64 = encode_png_base64(&img, "red.png").expect("encode should succeed");
        assert!(b64.is_ascii());
        assert_eq!(b64.len() % 4, 0, "padded base64");
        let decoded = STANDARD.decode(&b64).expect("valid base64");
        assert_eq!(&decoded[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn dimensions_survive_round_trip() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 5, Rgb([0, 128, 255])));
        let b64 = encode_png_base64(&img, "blue.bmp").expect("encode");
        let png = STANDARD.decode(&b64).expect("valid base64");
        let back = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
            .expect("valid png");
        assert_eq!((back.width(), back.height()), (3, 5));
        assert_eq!(back.to_rgb8().get_pixel(2, 4), &Rgb([0, 128, 255]));
    }
}
