// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document scanner. Wires the detection stages together and runs the
// rectification on the full-resolution image.

use docwarp_core::ScanConfig;
use docwarp_core::error::Result;
use image::DynamicImage;
use tracing::{debug, info, instrument};

use super::contours::trace_contours;
use super::edges::{close_gaps, extract_edges};
use super::enhance::enhance;
use super::geometry::{Original, Quadrilateral, rescale};
use super::quad::select_quadrilateral;
use super::rectify::rectify;
use super::resize::resize_to_width;
use crate::image::codec;

/// Finds the document in a photograph and warps it flat.
///
/// Holds only configuration: every call owns its intermediate buffers, so one
/// scanner can be shared freely between threads.
///
/// ```ignore
/// let scanner = DocumentScanner::new(ScanConfig::default())?;
/// let jpeg = scanner.scan(&std::fs::read("photo.jpg")?)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentScanner {
    config: ScanConfig,
}

impl DocumentScanner {
    // -- Construction ---------------------------------------------------------

    /// Create a scanner after validating `config`.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    // -- Pipeline -------------------------------------------------------------

    /// Locate the document outline, in original-image coordinates.
    ///
    /// 1. Resize to the working width
    /// 2. Edge-preserving detail enhancement
    /// 3. Grayscale, blur, Canny
    /// 4. Dilate + close
    /// 5. Trace every contour
    /// 6. Largest contour that simplifies to four vertices
    /// 7. Rescale back to the original resolution
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn detect(&self, image: &DynamicImage) -> Result<Quadrilateral<Original>> {
        let cfg = &self.config;

        let working = resize_to_width(image, cfg.working_width)?;
        let detailed = enhance(&working, cfg.enhance_sigma_s, cfg.enhance_sigma_r, cfg.detail_gain);
        let edges = extract_edges(&detailed, cfg.blur_sigma, cfg.canny_low, cfg.canny_high);
        let closed = close_gaps(&edges, cfg.morph_radius);

        let contours = trace_contours(&closed);
        debug!(contours = contours.len(), "Searching for document outline");

        let quad = select_quadrilateral(&contours, cfg.approx_epsilon_ratio)?;
        rescale(quad, working.width(), image.width())
    }

    /// Detect the document and return the rectified image.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn rectify_image(&self, image: &DynamicImage) -> Result<DynamicImage> {
        let quad = self.detect(image)?;
        info!(corners = ?quad.corners(), "Document outline found");
        rectify(image, &quad)
    }

    /// Decode `data`, rectify the document, and encode the result in the
    /// configured output format.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn scan(&self, data: &[u8]) -> Result<Vec<u8>> {
        let image = codec::decode(data)?;
        let rectified = self.rectify_image(&image)?;
        let encoded = codec::encode(&rectified, self.config.output_format, self.config.jpeg_quality)?;
        info!(
            out_w = rectified.width(),
            out_h = rectified.height(),
            bytes = encoded.len(),
            "Scan complete"
        );
        Ok(encoded)
    }
}

/// Scan raw image bytes with the default configuration.
pub fn scan(data: &[u8]) -> Result<Vec<u8>> {
    DocumentScanner::default().scan(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docwarp_core::ScanError;
    use image::{Rgb, RgbImage};

    #[test]
    fn invalid_config_is_rejected() {
        let config = ScanConfig {
            blur_sigma: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            DocumentScanner::new(config),
            Err(ScanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn uniform_image_has_no_document() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Rgb([200, 200, 200])));
        assert!(matches!(
            DocumentScanner::default().rectify_image(&img),
            Err(ScanError::NoQuadrilateralFound)
        ));
    }

    #[test]
    fn all_black_image_has_no_document() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(300, 200));
        assert!(matches!(
            DocumentScanner::default().detect(&img),
            Err(ScanError::NoQuadrilateralFound)
        ));
    }

    #[test]
    fn scanner_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DocumentScanner>();
    }

    #[test]
    fn empty_bytes_fail_to_decode() {
        assert!(matches!(scan(&[]), Err(ScanError::Decode(_))));
    }
}
