// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image codec. Decode uploaded bytes into a working image and encode the
// rectified result back into JPEG or PNG. Uses the `image` crate's codecs.

use image::{DynamicImage, ImageFormat};
use docwarp_core::OutputFormat;
use docwarp_core::error::{Result, ScanError};
use tracing::{debug, instrument};

/// Decode raw encoded bytes (JPEG, PNG, etc.) into a 3-channel color image.
///
/// Alpha and 16-bit channels are dropped so that every later stage sees
/// 8-bit RGB regardless of what the camera or editor produced.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    if data.is_empty() {
        return Err(ScanError::Decode("input is empty".into()));
    }
    let img = image::load_from_memory(data)
        .map_err(|err| ScanError::Decode(err.to_string()))?;
    if img.width() == 0 || img.height() == 0 {
        return Err(ScanError::InvalidImage {
            width: img.width(),
            height: img.height(),
        });
    }
    debug!(
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Image decoded from bytes"
    );
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}

/// Encode an image in the requested output format.
///
/// `jpeg_quality` (1-100) only applies to JPEG output.
pub fn encode(image: &DynamicImage, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(image, jpeg_quality),
        OutputFormat::Png => encode_to_format(image, ImageFormat::Png),
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    // JPEG has no alpha; grayscale stays single-channel.
    let written = if image.color().has_color() {
        image.to_rgb8().write_with_encoder(encoder)
    } else {
        image.to_luma8().write_with_encoder(encoder)
    };
    written.map_err(|err| ScanError::Encode(format!("JPEG encoding failed: {}", err)))?;
    Ok(buffer)
}

fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| ScanError::Encode(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}
