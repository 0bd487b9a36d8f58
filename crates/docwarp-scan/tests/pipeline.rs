// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end scans of synthetic documents.

use docwarp_core::{OutputFormat, ScanConfig, ScanError};
use docwarp_scan::scan::rectify::order_corners;
use docwarp_scan::{DocumentScanner, decode, encode};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

/// Draw a light page with the given corners onto a dark background.
fn photo(width: u32, height: u32, corners: &[(i32, i32); 4]) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([20, 20, 20]));
    let poly: Vec<Point<i32>> = corners.iter().map(|&(x, y)| Point::new(x, y)).collect();
    draw_polygon_mut(&mut img, &poly, Rgb([245, 245, 245]));
    DynamicImage::ImageRgb8(img)
}

fn scale(corners: &[(i32, i32); 4], factor: i32) -> [(i32, i32); 4] {
    corners.map(|(x, y)| (x * factor, y * factor))
}

#[test]
fn white_rectangle_corners_are_found() {
    // 500 px wide, so the working copy is the original and no rescale error applies.
    let known = [(100, 80), (400, 80), (400, 320), (100, 320)];
    let img = photo(500, 400, &known);

    let quad = DocumentScanner::default().detect(&img).expect("document found");
    let found = order_corners(quad.corners()).expect("ordered");

    for (corner, &(x, y)) in found.iter().zip(known.iter()) {
        assert!(
            (corner.x - x).abs() <= 3 && (corner.y - y).abs() <= 3,
            "found {corner:?}, expected ({x}, {y})"
        );
    }
}

#[test]
fn rescaled_corners_land_in_original_space() {
    let known = [(200, 160), (800, 160), (800, 640), (200, 640)];
    let img = photo(1000, 800, &known);

    let quad = DocumentScanner::default().detect(&img).expect("document found");
    let found = order_corners(quad.corners()).expect("ordered");

    // Working copy is half size: allow twice the working-space tolerance.
    for (corner, &(x, y)) in found.iter().zip(known.iter()) {
        assert!(
            (corner.x - x).abs() <= 10 && (corner.y - y).abs() <= 10,
            "found {corner:?}, expected ({x}, {y})"
        );
    }
}

#[test]
fn aspect_ratio_is_stable_across_resolutions() {
    let page = [(150, 100), (650, 140), (620, 500), (120, 460)];
    let scanner = DocumentScanner::default();

    let small = scanner.rectify_image(&photo(800, 600, &page)).expect("small scan");
    let large = scanner
        .rectify_image(&photo(1600, 1200, &scale(&page, 2)))
        .expect("large scan");

    let ratio = |img: &DynamicImage| img.width() as f64 / img.height() as f64;
    assert!(
        (ratio(&small) - ratio(&large)).abs() < 0.03,
        "small {}x{}, large {}x{}",
        small.width(),
        small.height(),
        large.width(),
        large.height()
    );
    // Twice the resolution in, roughly twice the pixels out.
    assert!((large.width() as f64 / small.width() as f64 - 2.0).abs() < 0.1);
}

#[test]
fn rectified_page_is_mostly_page() {
    let page = [(120, 60), (560, 110), (530, 420), (90, 390)];
    let out = DocumentScanner::default()
        .rectify_image(&photo(640, 480, &page))
        .expect("scan")
        .to_rgb8();

    let bright = out.pixels().filter(|p| p.0[0] > 200).count();
    let total = (out.width() * out.height()) as usize;
    assert!(bright * 10 >= total * 9, "{bright} of {total} bright");
}

#[test]
fn uniform_photo_reports_missing_boundary() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(800, 600, Rgb([128, 64, 32])));
    let bytes = encode(&img, OutputFormat::Png, 90).expect("encode");
    assert!(matches!(
        DocumentScanner::default().scan(&bytes),
        Err(ScanError::NoQuadrilateralFound)
    ));
}

#[test]
fn byte_level_scan_round_trips_through_png() {
    let page = [(100, 50), (500, 70), (480, 350), (90, 330)];
    let bytes = encode(&photo(600, 400, &page), OutputFormat::Png, 90).expect("encode");

    let config = ScanConfig {
        output_format: OutputFormat::Png,
        ..Default::default()
    };
    let out = DocumentScanner::new(config).expect("config").scan(&bytes).expect("scan");
    let decoded = decode(&out).expect("decode output");
    assert!(decoded.width() > 300 && decoded.height() > 200);
}
