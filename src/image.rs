//! Image ingestion: turn an arbitrary pasted/dropped/uploaded image blob
//! into a bounded-size data URI plus pixel dimensions.
//!
//! The public entry point never fails — any decode or encode problem
//! degrades to returning the original bytes as a data URI with a
//! placeholder dimension guess, so image ingestion can never abort the
//! user's gesture.

#[cfg(test)]
#[path = "image_test.rs"]
mod image_test;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, GenericImageView};
use log::warn;

use crate::consts::{
    FALLBACK_IMAGE_HEIGHT, FALLBACK_IMAGE_WIDTH, IMAGE_QUALITY, MAX_IMAGE_DIMENSION,
};

/// Configuration for [`ingest`].
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    /// Maximum output dimension (longer edge), in pixels.
    pub max_dimension: u32,
    /// Lossy encode quality in `[0, 1]`.
    pub quality: f32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { max_dimension: MAX_IMAGE_DIMENSION, quality: IMAGE_QUALITY }
    }
}

/// A storable image: encoded content plus final pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingested {
    /// `data:` URI holding the encoded image.
    pub data_url: String,
    /// Output pixel width.
    pub width: u32,
    /// Output pixel height.
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
enum IngestError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Decode, downscale, and re-encode an image blob.
///
/// Pipeline: decode the bytes, scale so the longer edge fits
/// `options.max_dimension` (never upscaling, floors at 1px per axis),
/// resample with a high-quality filter, and encode as lossy JPEG at
/// `options.quality`. Failures fall back to the raw bytes as a data URI
/// with an 800×600 dimension guess.
#[must_use]
pub fn ingest(bytes: &[u8], options: &IngestOptions) -> Ingested {
    match try_ingest(bytes, options) {
        Ok(result) => result,
        Err(err) => {
            warn!("image ingestion fell back to raw bytes: {err}");
            raw_fallback(bytes, FALLBACK_IMAGE_WIDTH, FALLBACK_IMAGE_HEIGHT)
        }
    }
}

fn try_ingest(bytes: &[u8], options: &IngestOptions) -> Result<Ingested, IngestError> {
    let decoded = image::load_from_memory(bytes).map_err(IngestError::Decode)?;
    let (orig_w, orig_h) = decoded.dimensions();

    if orig_w == 0 || orig_h == 0 {
        // Dimensions unavailable: skip resizing, keep the raw bytes.
        return Ok(raw_fallback(bytes, FALLBACK_IMAGE_WIDTH, FALLBACK_IMAGE_HEIGHT));
    }

    let longest = f64::from(orig_w.max(orig_h));
    let scale = (f64::from(options.max_dimension) / longest).min(1.0);
    let width = scale_dimension(orig_w, scale);
    let height = scale_dimension(orig_h, scale);

    let resized = if scale < 1.0 {
        decoded.resize_exact(width, height, FilterType::CatmullRom)
    } else {
        decoded
    };

    // JPEG carries no alpha; flatten before encoding.
    let rgb = resized.to_rgb8();
    let mut encoded = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut encoded, jpeg_quality(options.quality));
    encoder
        .encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(IngestError::Encode)?;

    Ok(Ingested {
        data_url: format!("data:image/jpeg;base64,{}", BASE64.encode(&encoded)),
        width,
        height,
    })
}

fn scale_dimension(original: u32, scale: f64) -> u32 {
    let scaled = (f64::from(original) * scale).round();
    if scaled < 1.0 { 1 } else { scaled as u32 }
}

fn jpeg_quality(quality: f32) -> u8 {
    let percent = (quality.clamp(0.0, 1.0) * 100.0).round();
    if percent < 1.0 { 1 } else { percent as u8 }
}

/// Wrap the original bytes unchanged in a data URI. The mime type comes
/// from format sniffing when possible.
fn raw_fallback(bytes: &[u8], width: u32, height: u32) -> Ingested {
    let mime = image::guess_format(bytes)
        .ok()
        .map_or("application/octet-stream", |format| format.to_mime_type());
    Ingested {
        data_url: format!("data:{mime};base64,{}", BASE64.encode(bytes)),
        width,
        height,
    }
}
