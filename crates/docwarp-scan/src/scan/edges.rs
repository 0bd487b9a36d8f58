// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge map construction. Grayscale conversion, Gaussian blur, Canny edge
// detection, and morphological gap closing.

use image::{DynamicImage, GrayImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{close, dilate};
use tracing::{debug, instrument};

// -- Edge extraction ----------------------------------------------------------

/// Produce a binary edge map (edge = 255, background = 0).
///
/// The image is converted to luma, blurred with `blur_sigma` to suppress
/// residual noise, and run through Canny with hysteresis thresholds
/// `low`/`high`. Gradients between the two thresholds survive only when
/// connected to a strong edge.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn extract_edges(image: &DynamicImage, blur_sigma: f32, low: f32, high: f32) -> GrayImage {
    let gray = image.to_luma8();
    let blurred = gaussian_blur_f32(&gray, blur_sigma);
    let edges = canny(&blurred, low, high);
    debug!(
        edge_pixels = edges.pixels().filter(|p| p.0[0] > 0).count(),
        "Canny edge detection complete"
    );
    edges
}

// -- Morphological closing ----------------------------------------------------

/// Thicken edges and seal small gaps so document borders form closed loops.
///
/// Dilates once with a `(2 * radius + 1)` square structuring element, then
/// applies a closing (dilate + erode) with the same element.
#[instrument(skip(edges))]
pub fn close_gaps(edges: &GrayImage, radius: u8) -> GrayImage {
    let dilated = dilate(edges, Norm::LInf, radius);
    close(&dilated, Norm::LInf, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, RgbImage};

    #[test]
    fn uniform_image_has_no_edges() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, image::Rgb([90, 90, 90])));
        let edges = extract_edges(&img, 1.1, 75.0, 200.0);
        assert!(edges.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn bright_square_produces_edges_on_its_border() {
        let mut gray = GrayImage::new(60, 60);
        for y in 20..40 {
            for x in 20..40 {
                gray.put_pixel(x, y, Luma([255]));
            }
        }
        let edges = extract_edges(&DynamicImage::ImageLuma8(gray), 1.1, 75.0, 200.0);
        // Left border, away from the corners.
        assert!((18..=21).any(|x| edges.get_pixel(x, 30).0[0] == 255));
        // Interior and far background stay empty.
        assert_eq!(edges.get_pixel(30, 30).0[0], 0);
        assert_eq!(edges.get_pixel(5, 5).0[0], 0);
    }

    #[test]
    fn closing_bridges_a_small_gap() {
        // A horizontal line with a 3-pixel break.
        let mut edges = GrayImage::new(40, 11);
        for x in (5..18).chain(21..35) {
            edges.put_pixel(x, 5, Luma([255]));
        }
        let closed = close_gaps(&edges, 2);
        assert!((18..21).all(|x| closed.get_pixel(x, 5).0[0] == 255));
    }

    #[test]
    fn closing_thickens_by_radius() {
        let mut edges = GrayImage::new(21, 21);
        edges.put_pixel(10, 10, Luma([255]));
        let closed = close_gaps(&edges, 2);
        assert_eq!(closed.get_pixel(8, 8).0[0], 255);
        assert_eq!(closed.get_pixel(12, 12).0[0], 255);
        assert_eq!(closed.get_pixel(7, 10).0[0], 0);
    }
}
