// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral selection. Rank contours by enclosed area and return the
// largest one that simplifies (Ramer–Douglas–Peucker) to exactly four vertices.

use docwarp_core::error::{Result, ScanError};
use imageproc::point::Point;
use tracing::{debug, instrument, warn};

use super::geometry::{Contour, Polygon, Quadrilateral, Working, distance};

/// Rounds of "farthest point from the current anchor" used to pick the two
/// split points of a closed curve.
const ANCHOR_ROUNDS: usize = 3;

/// Select the document outline among `contours`.
///
/// Contours are visited by decreasing area (ties keep tracing order). Each is
/// simplified with a tolerance of `epsilon_ratio` times its perimeter; the
/// first four-vertex result wins. Area is only a pre-filter: a larger
/// contour that does not reduce to four vertices is skipped.
#[instrument(skip(contours), fields(count = contours.len()))]
pub fn select_quadrilateral(
    contours: &[Contour],
    epsilon_ratio: f64,
) -> Result<Quadrilateral<Working>> {
    let mut ranked: Vec<(f64, &Contour)> = contours.iter().map(|c| (c.area(), c)).collect();
    // `sort_by` is stable, so equal areas keep tracing order.
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (rank, (area, contour)) in ranked.iter().enumerate() {
        let epsilon = epsilon_ratio * contour.perimeter();
        let polygon = simplify_closed(&contour.points, epsilon);
        if let Some(quad) = Quadrilateral::from_polygon(&polygon) {
            debug!(rank, area, corners = ?quad.corners(), "Quadrilateral selected");
            return Ok(quad);
        }
    }

    warn!("No contour simplified to four vertices");
    Err(ScanError::NoQuadrilateralFound)
}

/// Ramer–Douglas–Peucker simplification of a closed curve.
///
/// The curve is split at two mutually distant points and each half is
/// simplified as an open chain, so the result does not depend on where
/// tracing happened to start. Every kept vertex is a point of `points`.
pub fn simplify_closed(points: &[Point<i32>], epsilon: f64) -> Polygon {
    let n = points.len();
    if n < 3 {
        return Polygon {
            vertices: points.to_vec(),
        };
    }

    let mut start = 0;
    let mut end = farthest_from(points, start);
    for _ in 1..ANCHOR_ROUNDS {
        let next = farthest_from(points, end);
        if next == start {
            break;
        }
        start = end;
        end = next;
    }
    if points[start] == points[end] {
        // Every point coincides.
        return Polygon {
            vertices: vec![points[start]],
        };
    }

    // Two open chains start..=end and end..=start (wrapping around).
    let span = (end + n - start) % n;
    let first: Vec<Point<i32>> = (0..=span).map(|k| points[(start + k) % n]).collect();
    let second: Vec<Point<i32>> = (0..=n - span).map(|k| points[(end + k) % n]).collect();

    let mut vertices = simplify_open(&first, epsilon);
    vertices.pop();
    let mut tail = simplify_open(&second, epsilon);
    tail.pop();
    vertices.extend(tail);

    Polygon { vertices }
}

/// Open-chain Ramer–Douglas–Peucker. Both end points are always kept.
fn simplify_open(chain: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = chain.len();
    if n < 3 {
        return chain.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    // Explicit stack: traced contours can run to thousands of points.
    let mut stack = vec![(0usize, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }
        let (index, max_distance) = (first + 1..last)
            .map(|i| (i, segment_distance(chain[i], chain[first], chain[last])))
            .fold((first, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        if max_distance > epsilon {
            keep[index] = true;
            stack.push((first, index));
            stack.push((index, last));
        }
    }

    chain
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn farthest_from(points: &[Point<i32>], from: usize) -> usize {
    let origin = points[from];
    let mut best = from;
    let mut best_distance = 0.0;
    for (i, &p) in points.iter().enumerate() {
        let d = distance(origin, p);
        if d > best_distance {
            best = i;
            best_distance = d;
        }
    }
    best
}

/// Distance from `p` to the line through `a` and `b` (to `a` when they coincide).
fn segment_distance(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let length = distance(a, b);
    if length == 0.0 {
        return distance(a, p);
    }
    let cross = (b.x - a.x) as f64 * (p.y - a.y) as f64 - (b.y - a.y) as f64 * (p.x - a.x) as f64;
    cross.abs() / length
}
