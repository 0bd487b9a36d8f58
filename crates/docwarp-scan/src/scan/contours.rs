// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour tracing. Every closed border in the binary edge map, outer and
// hole borders alike, with straight runs compressed to their end points.

use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::point::Point;
use tracing::{debug, instrument};

use super::geometry::Contour;

/// Trace all borders of the foreground (non-zero) regions of `binary`.
///
/// Nesting is ignored: outer borders and hole borders are returned in the
/// order the border follower meets them. An image without foreground pixels
/// yields an empty vector.
#[instrument(skip(binary), fields(width = binary.width(), height = binary.height()))]
pub fn trace_contours(binary: &GrayImage) -> Vec<Contour> {
    let contours: Vec<Contour> = find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| !c.points.is_empty())
        .map(|c| Contour::new(compress_chain(&c.points)))
        .collect();
    debug!(contours = contours.len(), "Contours traced");
    contours
}

/// Drop every point that lies in the middle of a straight horizontal,
/// vertical, or diagonal run of the closed chain.
pub fn compress_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let step = |a: Point<i32>, b: Point<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());

    let kept: Vec<Point<i32>> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect();

    // A chain that is one straight run everywhere cannot be closed; keep it whole.
    if kept.is_empty() {
        points.to_vec()
    } else {
        kept
    }
}
