//! Bounded-size JPEG re-encoding for the vision model.
//!
//! Recognition requests work best on modest images: the short edge is clamped
//! to [`SHORT_EDGE_MAX`] and, after that, the long edge to [`LONG_EDGE_MAX`].
//! Images are never enlarged and the aspect ratio is preserved.

use std::io::Cursor;

use {
    image::{
        DynamicImage, GenericImageView, ImageReader, codecs::jpeg::JpegEncoder,
        imageops::FilterType,
    },
    tracing::debug,
};

use crate::{Error, Result};

/// Upper bound for the shorter side, in pixels.
pub const SHORT_EDGE_MAX: u32 = 768;

/// Upper bound for the longer side, in pixels.
pub const LONG_EDGE_MAX: u32 = 2000;

/// JPEG quality for normalized images (0-100).
pub const JPEG_QUALITY: u8 = 85;

pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

/// Result of normalization.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// JPEG bytes.
    pub data: Vec<u8>,
    /// Always [`JPEG_MEDIA_TYPE`].
    pub media_type: &'static str,
    pub original_width: u32,
    pub original_height: u32,
    pub width: u32,
    pub height: u32,
}

impl NormalizedImage {
    pub fn was_resized(&self) -> bool {
        self.width != self.original_width || self.height != self.original_height
    }
}

/// Compute the output size for a `width`×`height` source.
///
/// Two-stage clamp: first scale so the short edge fits, then, if the long edge
/// of that intermediate size is still too large, shrink again. Each stage
/// floors, and neither stage ever upscales. Both axes are at least 1px.
pub fn target_dimensions(width: u32, height: u32) -> (u32, u32) {
    let (mut w, mut h) = (u64::from(width), u64::from(height));

    let short = w.min(h);
    if short > u64::from(SHORT_EDGE_MAX) {
        w = w * u64::from(SHORT_EDGE_MAX) / short;
        h = h * u64::from(SHORT_EDGE_MAX) / short;
    }

    let long = w.max(h);
    if long > u64::from(LONG_EDGE_MAX) {
        w = w * u64::from(LONG_EDGE_MAX) / long;
        h = h * u64::from(LONG_EDGE_MAX) / long;
    }

    // Both values only ever shrink from a u32, so they still fit.
    let clamp = |v: u64| u32::try_from(v.max(1)).unwrap_or(u32::MAX);
    (clamp(w), clamp(h))
}

/// Decode `data` (JPEG, PNG or WebP), bound its dimensions and re-encode it as
/// JPEG at [`JPEG_QUALITY`].
///
/// The output is always a fresh JPEG, even when no resizing was needed.
pub fn normalize_for_recognition(data: &[u8]) -> Result<NormalizedImage> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|source| Error::Io { source })?
        .decode()
        .map_err(Error::decode)?;

    let (original_width, original_height) = img.dimensions();
    let (width, height) = target_dimensions(original_width, original_height);

    let resized = if (width, height) == (original_width, original_height) {
        img
    } else {
        debug!(
            original_width,
            original_height, width, height, "downscaling image for recognition"
        );
        img.resize_exact(width, height, FilterType::CatmullRom)
    };

    let data = encode_jpeg(&resized, JPEG_QUALITY)?;

    Ok(NormalizedImage {
        data,
        media_type: JPEG_MEDIA_TYPE,
        original_width,
        original_height,
        width,
        height,
    })
}

/// Encode as JPEG with the given quality, flattening any alpha channel.
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut output = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut output, quality);
    rgb.write_with_encoder(encoder).map_err(Error::encode)?;
    Ok(output.into_inner())
}
