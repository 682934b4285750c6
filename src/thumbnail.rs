//! Thumbnail generation for uploaded cover art.
//!
//! [`generate_thumbnail`] is a pure function: decode, resize to a fixed
//! width with a Lanczos filter, re-encode. It touches no store and is run
//! on the blocking thread pool by the upload handler.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Limits};

/// Width of every generated thumbnail, in pixels.
pub const THUMBNAIL_WIDTH: u32 = 300;

/// JPEG quality used for lossy thumbnails.
pub const JPEG_QUALITY: u8 = 85;

/// Tallest thumbnail that will be produced, in pixels.
pub const MAX_THUMBNAIL_HEIGHT: u32 = 4096;

/// Largest accepted source width or height, in pixels.
pub const MAX_SOURCE_DIMENSION: u32 = 16_384;

/// Upper bound on decoder allocations, in bytes.
const MAX_DECODE_ALLOC: u64 = 256 * 1024 * 1024;

/// Errors produced while building a thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThumbnailError {
    /// The input bytes are not an image in a supported format.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The thumbnail would exceed [`MAX_THUMBNAIL_HEIGHT`].
    #[error("image of {width}x{height} is too elongated for a thumbnail")]
    TooLarge {
        /// Source width in pixels.
        width: u32,
        /// Source height in pixels.
        height: u32,
    },

    /// The resized image could not be encoded.
    #[error("failed to encode thumbnail: {0}")]
    Encode(String),
}

/// Output encoding of a thumbnail, chosen from the upload's content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailFormat {
    /// Lossy JPEG at [`JPEG_QUALITY`].
    Jpeg,
    /// Lossless PNG.
    Png,
}

impl ThumbnailFormat {
    /// Picks the thumbnail encoding for an upload's content type.
    ///
    /// PNG uploads stay PNG; JPEG and every other type become JPEG.
    #[must_use]
    pub fn for_mime(mime_type: &str) -> Self {
        if mime_type.trim().eq_ignore_ascii_case("image/png") {
            Self::Png
        } else {
            Self::Jpeg
        }
    }

    /// Content type of thumbnails in this format.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Decodes `raw`, resizes it to [`THUMBNAIL_WIDTH`] pixels wide preserving
/// the aspect ratio, and re-encodes it according to `mime_type`.
///
/// The header is inspected before any pixel is decoded: sources larger
/// than [`MAX_SOURCE_DIMENSION`] on either side, or whose thumbnail would be
/// taller than [`MAX_THUMBNAIL_HEIGHT`], are rejected.
///
/// # Errors
///
/// Returns [`ThumbnailError::Decode`] when `raw` is not a valid JPEG, PNG,
/// GIF or WebP image or exceeds the decoder limits,
/// [`ThumbnailError::TooLarge`] when the thumbnail would exceed its pixel
/// budget, and [`ThumbnailError::Encode`] if encoding fails.
pub fn generate_thumbnail(raw: &[u8], mime_type: &str) -> Result<Vec<u8>, ThumbnailError> {
    let (width, height) = reader(raw)?
        .into_dimensions()
        .map_err(|e| ThumbnailError::Decode(e.to_string()))?;
    let target_height = scaled_height(width, height);
    if target_height > MAX_THUMBNAIL_HEIGHT {
        return Err(ThumbnailError::TooLarge { width, height });
    }

    let source = reader(raw)?
        .decode()
        .map_err(|e| ThumbnailError::Decode(e.to_string()))?;
    let resized = source.resize_exact(THUMBNAIL_WIDTH, target_height, FilterType::Lanczos3);

    let mut buf = Vec::new();
    match ThumbnailFormat::for_mime(mime_type) {
        ThumbnailFormat::Png => resized.write_with_encoder(PngEncoder::new(&mut buf)),
        // JPEG has no alpha channel.
        ThumbnailFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)),
    }
    .map_err(|e| ThumbnailError::Encode(e.to_string()))?;

    Ok(buf)
}

/// Format-sniffing reader with bounded dimensions and allocations.
fn reader(raw: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, ThumbnailError> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_SOURCE_DIMENSION);
    limits.max_image_height = Some(MAX_SOURCE_DIMENSION);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);

    let mut reader = ImageReader::new(Cursor::new(raw))
        .with_guessed_format()
        .map_err(|e| ThumbnailError::Decode(e.to_string()))?;
    if reader.format().is_none() {
        return Err(ThumbnailError::Decode("unrecognized image format".to_string()));
    }
    reader.limits(limits);
    Ok(reader)
}

/// Height that keeps the aspect ratio at [`THUMBNAIL_WIDTH`], rounded to
/// the nearest pixel and never zero.
fn scaled_height(width: u32, height: u32) -> u32 {
    if width == 0 {
        return 1;
    }
    let width = u64::from(width);
    let scaled = (u64::from(height) * u64::from(THUMBNAIL_WIDTH) + width / 2) / width;
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    use super::*;

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        let Ok(()) = img.write_to(&mut buf, format) else {
            panic!("test image encoding failed");
        };
        buf.into_inner()
    }

    fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
    }

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 64, 200])
        });
        encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
    }

    #[test]
    fn jpeg_input_yields_300px_jpeg() {
        let Ok(thumb) = generate_thumbnail(&sample_jpeg(600, 400), "image/jpeg") else {
            panic!("thumbnail failed");
        };
        assert_eq!(image::guess_format(&thumb).ok(), Some(ImageFormat::Jpeg));
        let Ok(decoded) = image::load_from_memory_with_format(&thumb, ImageFormat::Jpeg) else {
            panic!("output is not a JPEG");
        };
        assert_eq!(decoded.width(), THUMBNAIL_WIDTH);
        assert_eq!(decoded.height(), 200);
    }

    #[test]
    fn jpg_alias_is_treated_as_jpeg() {
        let Ok(thumb) = generate_thumbnail(&sample_jpeg(900, 300), "image/jpg") else {
            panic!("thumbnail failed");
        };
        assert_eq!(image::guess_format(&thumb).ok(), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn png_input_yields_png_with_alpha() {
        let Ok(thumb) = generate_thumbnail(&sample_png(400, 400), "image/png") else {
            panic!("thumbnail failed");
        };
        let Ok(decoded) = image::load_from_memory_with_format(&thumb, ImageFormat::Png) else {
            panic!("output is not a PNG");
        };
        assert_eq!(decoded.width(), THUMBNAIL_WIDTH);
        assert_eq!(decoded.height(), THUMBNAIL_WIDTH);
        assert!(decoded.color().has_alpha());
    }

    #[test]
    fn other_mime_types_fall_back_to_jpeg() {
        let Ok(thumb) = generate_thumbnail(&sample_png(600, 300), "image/webp") else {
            panic!("thumbnail failed");
        };
        assert_eq!(image::guess_format(&thumb).ok(), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn narrow_images_are_scaled_to_full_width() {
        let Ok(thumb) = generate_thumbnail(&sample_png(100, 50), "image/png") else {
            panic!("thumbnail failed");
        };
        let Ok(decoded) = image::load_from_memory(&thumb) else {
            panic!("output does not decode");
        };
        assert_eq!((decoded.width(), decoded.height()), (300, 150));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result = generate_thumbnail(b"definitely not an image", "image/png");
        assert!(matches!(result, Err(ThumbnailError::Decode(_))));
    }

    #[test]
    fn truncated_image_is_a_decode_error() {
        let png = sample_png(64, 64);
        let truncated = png.get(..png.len() / 2).unwrap_or_default();
        let result = generate_thumbnail(truncated, "image/png");
        assert!(matches!(result, Err(ThumbnailError::Decode(_))));
    }

    #[test]
    fn tall_sliver_is_rejected_before_resizing() {
        let png = encode(
            DynamicImage::ImageRgb8(RgbImage::new(2, 40_000)),
            ImageFormat::Png,
        );
        let result = generate_thumbnail(&png, "image/png");
        assert_eq!(
            result,
            Err(ThumbnailError::TooLarge {
                width: 2,
                height: 40_000
            })
        );
    }

    #[test]
    fn tall_image_within_budget_is_accepted() {
        let Ok(thumb) = generate_thumbnail(&sample_png(100, 1365), "image/png") else {
            panic!("thumbnail failed");
        };
        let Ok(decoded) = image::load_from_memory(&thumb) else {
            panic!("output does not decode");
        };
        assert_eq!(decoded.height(), 4095);
        assert!(decoded.height() <= MAX_THUMBNAIL_HEIGHT);
    }

    #[test]
    fn oversized_source_hits_decoder_limits() {
        let png = encode(
            DynamicImage::ImageRgb8(RgbImage::new(MAX_SOURCE_DIMENSION + 1, 1)),
            ImageFormat::Png,
        );
        let result = generate_thumbnail(&png, "image/png");
        assert!(matches!(result, Err(ThumbnailError::Decode(_))));
    }

    #[test]
    fn output_is_deterministic() {
        let png = sample_png(320, 240);
        let first = generate_thumbnail(&png, "image/png");
        let second = generate_thumbnail(&png, "image/png");
        assert!(first.is_ok());
        assert_eq!(first, second);
    }

    #[test]
    fn scaled_height_rounds_and_never_hits_zero() {
        assert_eq!(scaled_height(600, 400), 200);
        assert_eq!(scaled_height(301, 1), 1);
        assert_eq!(scaled_height(3000, 1), 1);
        assert_eq!(scaled_height(0, 10), 1);
        assert_eq!(scaled_height(7, 5), 214);
    }

    #[test]
    fn format_selection_follows_mime_type() {
        assert_eq!(ThumbnailFormat::for_mime("image/png"), ThumbnailFormat::Png);
        assert_eq!(ThumbnailFormat::for_mime("IMAGE/PNG"), ThumbnailFormat::Png);
        assert_eq!(ThumbnailFormat::for_mime("image/jpeg"), ThumbnailFormat::Jpeg);
        assert_eq!(ThumbnailFormat::for_mime("image/gif"), ThumbnailFormat::Jpeg);
        assert_eq!(ThumbnailFormat::Png.content_type(), "image/png");
        assert_eq!(ThumbnailFormat::Jpeg.content_type(), "image/jpeg");
    }
}
