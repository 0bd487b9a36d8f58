// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification. Order the document corners, size the output
// rectangle from the detected shape, solve the homography, and warp.

use docwarp_core::error::{Result, ScanError};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use imageproc::point::Point;
use tracing::{debug, info, instrument};

use super::geometry::{Original, Quadrilateral, distance};

/// Smallest |sin| of the angle at a corner before three corners count as
/// collinear.
const MIN_CORNER_SINE: f64 = 1e-2;

/// Corners in canonical order: top-left, top-right, bottom-right, bottom-left.
pub type OrderedCorners = [Point<i32>; 4];

/// Put four corners in top-left, top-right, bottom-right, bottom-left order.
///
/// Top-left has the smallest `x + y`, bottom-right the largest; top-right has
/// the smallest `y - x`, bottom-left the largest. Returns
/// `DegenerateQuadrilateral` when one point would fill two roles.
pub fn order_corners(corners: &[Point<i32>; 4]) -> Result<OrderedCorners> {
    let sum = |p: &Point<i32>| p.x + p.y;
    let diff = |p: &Point<i32>| p.y - p.x;
    let indices = [
        extreme_index(corners, sum, false),
        extreme_index(corners, diff, false),
        extreme_index(corners, sum, true),
        extreme_index(corners, diff, true),
    ];
    for i in 0..4 {
        for j in i + 1..4 {
            if indices[i] == indices[j] {
                return Err(ScanError::DegenerateQuadrilateral(format!(
                    "corner {:?} matches more than one role",
                    corners[indices[i]]
                )));
            }
        }
    }
    Ok(indices.map(|i| corners[i]))
}

/// Index of the corner minimising (or maximising) `key`; ties go to the lowest index.
fn extreme_index(
    corners: &[Point<i32>; 4],
    key: impl Fn(&Point<i32>) -> i32,
    largest: bool,
) -> usize {
    let mut best = 0;
    for i in 1..4 {
        let (candidate, current) = (key(&corners[i]), key(&corners[best]));
        if (largest && candidate > current) || (!largest && candidate < current) {
            best = i;
        }
    }
    best
}

/// Output size from the longer of each pair of opposite edges.
pub fn output_dimensions(ordered: &OrderedCorners) -> (u32, u32) {
    let [tl, tr, br, bl] = *ordered;
    let width = (distance(br, bl) as u32).max(distance(tr, tl) as u32);
    let height = (distance(tr, br) as u32).max(distance(tl, bl) as u32);
    (width, height)
}

/// Reject corner sets where any three consecutive corners are (nearly) collinear.
fn check_non_degenerate(ordered: &OrderedCorners) -> Result<()> {
    for i in 0..4 {
        let a = ordered[i];
        let b = ordered[(i + 1) % 4];
        let c = ordered[(i + 3) % 4];
        let (ab, ac) = (distance(a, b), distance(a, c));
        let cross = (b.x - a.x) as f64 * (c.y - a.y) as f64 - (b.y - a.y) as f64 * (c.x - a.x) as f64;
        if ab == 0.0 || ac == 0.0 || cross.abs() < MIN_CORNER_SINE * ab * ac {
            return Err(ScanError::DegenerateQuadrilateral(format!(
                "corners {:?}, {:?}, {:?} are collinear",
                c, a, b
            )));
        }
    }
    Ok(())
}

/// Solve the projective transform taking the ordered corners onto a
/// `width` x `height` rectangle.
pub fn solve_transform(ordered: &OrderedCorners, width: u32, height: u32) -> Result<Projection> {
    let src = ordered.map(|p| (p.x as f32, p.y as f32));
    let (right, bottom) = ((width - 1) as f32, (height - 1) as f32);
    let dest = [(0.0, 0.0), (right, 0.0), (right, bottom), (0.0, bottom)];
    Projection::from_control_points(src, dest).ok_or_else(|| {
        ScanError::DegenerateQuadrilateral("projective transform is singular".into())
    })
}

/// Warp the region bounded by `quad` into an axis-aligned rectangle.
///
/// Pixels mapped from outside the source image are black. Grayscale input
/// stays grayscale; anything with color is warped as RGB8.
#[instrument(skip(image, quad), fields(width = image.width(), height = image.height()))]
pub fn rectify(image: &DynamicImage, quad: &Quadrilateral<Original>) -> Result<DynamicImage> {
    let ordered = order_corners(quad.corners())?;
    check_non_degenerate(&ordered)?;

    let (out_w, out_h) = output_dimensions(&ordered);
    if out_w < 2 || out_h < 2 {
        return Err(ScanError::DegenerateQuadrilateral(format!(
            "output would be {out_w}x{out_h}"
        )));
    }

    debug!(
        top_left = ?ordered[0],
        top_right = ?ordered[1],
        bottom_right = ?ordered[2],
        bottom_left = ?ordered[3],
        "Corners ordered"
    );

    let projection = solve_transform(&ordered, out_w, out_h)?;

    let output = if image.color().has_color() {
        let mut out = RgbImage::new(out_w, out_h);
        warp_into(&image.to_rgb8(), &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut out);
        DynamicImage::ImageRgb8(out)
    } else {
        let mut out = GrayImage::new(out_w, out_h);
        warp_into(&image.to_luma8(), &projection, Interpolation::Bilinear, Luma([0]), &mut out);
        DynamicImage::ImageLuma8(out)
    };

    info!(out_w, out_h, "Perspective correction applied");
    Ok(output)
}
