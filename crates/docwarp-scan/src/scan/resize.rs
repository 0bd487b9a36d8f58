// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Working-resolution normalisation.

use docwarp_core::error::{Result, ScanError};
use image::DynamicImage;
use image::imageops::FilterType;
use tracing::{debug, instrument};

/// Tallest working copy the detector will allocate.
pub const MAX_WORKING_HEIGHT: u32 = 16_384;

/// Height that keeps the aspect ratio of a `width` x `height` image when its
/// width becomes `target_width`.
pub fn target_height(width: u32, height: u32, target_width: u32) -> u32 {
    let aspect_ratio = width as f64 / height as f64;
    (target_width as f64 / aspect_ratio).round() as u32
}

/// Resize `image` to exactly `target_width` pixels wide, preserving aspect
/// ratio, with bilinear (triangle) filtering.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn resize_to_width(image: &DynamicImage, target_width: u32) -> Result<DynamicImage> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ScanError::InvalidImage { width, height });
    }

    let new_height = target_height(width, height, target_width);
    if target_width == 0 || new_height == 0 || new_height > MAX_WORKING_HEIGHT {
        return Err(ScanError::InvalidImage {
            width: target_width,
            height: new_height,
        });
    }

    if (target_width, new_height) == (width, height) {
        return Ok(image.clone());
    }

    let resized = image.resize_exact(target_width, new_height, FilterType::Triangle);
    debug!(new_w = resized.width(), new_h = resized.height(), "Resize complete");
    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    #[test]
    fn output_size_follows_rounded_aspect_ratio() {
        for &(w, h) in &[(4032u32, 3024u32), (1000, 1414), (333, 777), (640, 480), (501, 3)] {
            let img = DynamicImage::ImageRgb8(RgbImage::new(w, h));
            let out = resize_to_width(&img, 500).expect("resize");
            let expected_h = (500.0 / (w as f64 / h as f64)).round() as u32;
            assert_eq!(out.width(), 500);
            assert_eq!(out.height(), expected_h, "for {w}x{h}");
        }
    }

    #[test]
    fn zero_height_is_invalid() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(10, 0));
        assert!(matches!(
            resize_to_width(&img, 500),
            Err(ScanError::InvalidImage { width: 10, height: 0 })
        ));
    }

    #[test]
    fn extreme_panorama_collapses_to_invalid() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(5000, 1));
        assert!(matches!(
            resize_to_width(&img, 500),
            Err(ScanError::InvalidImage { .. })
        ));
    }

    #[test]
    fn extreme_portrait_is_rejected_before_allocating() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(1, 100_000));
        assert!(matches!(
            resize_to_width(&img, 500),
            Err(ScanError::InvalidImage { width: 500, .. })
        ));
    }

    #[test]
    fn channel_count_is_preserved() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(1000, 800));
        let out = resize_to_width(&img, 500).expect("resize");
        assert_eq!(out.color(), image::ColorType::L8);
    }
}
