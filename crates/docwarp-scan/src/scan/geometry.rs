// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometric types shared by the detection stages: traced contours,
// simplified polygons, and four-cornered document outlines tagged with the
// coordinate space they live in.

use std::fmt;
use std::marker::PhantomData;

use docwarp_core::error::{Result, ScanError};
use imageproc::point::Point;
use tracing::debug;

/// Coordinate space marker: the downscaled copy used for detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Working {}

/// Coordinate space marker: the full-resolution input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Original {}

/// A closed boundary curve as produced by the contour tracer.
///
/// Points follow tracing order; the last point connects back to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Area enclosed by the curve (shoelace formula, always non-negative).
    pub fn area(&self) -> f64 {
        shoelace_area(&self.points)
    }

    /// Closed arc length: the sum of all segment lengths including the
    /// closing segment from the last point back to the first.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| distance(self.points[i], self.points[(i + 1) % n]))
            .sum()
    }
}

/// Ordered vertices approximating a contour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    pub vertices: Vec<Point<i32>>,
}

/// A four-vertex polygon in coordinate space `S`.
///
/// Vertex order is whatever the simplifier produced; use
/// [`crate::scan::rectify::order_corners`] for a canonical order.
pub struct Quadrilateral<S> {
    corners: [Point<i32>; 4],
    _space: PhantomData<S>,
}

impl<S> Quadrilateral<S> {
    pub fn new(corners: [Point<i32>; 4]) -> Self {
        Self {
            corners,
            _space: PhantomData,
        }
    }

    /// Returns `None` unless the polygon has exactly four vertices.
    pub fn from_polygon(polygon: &Polygon) -> Option<Self> {
        let corners: [Point<i32>; 4] = polygon.vertices.as_slice().try_into().ok()?;
        Some(Self::new(corners))
    }

    pub fn corners(&self) -> &[Point<i32>; 4] {
        &self.corners
    }

    pub fn area(&self) -> f64 {
        shoelace_area(&self.corners)
    }
}

// Manual impls: derives would demand `S: Clone` etc. on the uninhabited markers.
impl<S> Clone for Quadrilateral<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Quadrilateral<S> {}

impl<S> PartialEq for Quadrilateral<S> {
    fn eq(&self, other: &Self) -> bool {
        self.corners == other.corners
    }
}

impl<S> Eq for Quadrilateral<S> {}

impl<S> fmt::Debug for Quadrilateral<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quadrilateral")
            .field("space", &std::any::type_name::<S>())
            .field("corners", &self.corners)
            .finish()
    }
}

/// Map a quadrilateral found on the working copy back onto the original image.
///
/// Coordinates are multiplied by `original_width / working_width` and
/// truncated toward zero.
pub fn rescale(
    quad: Quadrilateral<Working>,
    working_width: u32,
    original_width: u32,
) -> Result<Quadrilateral<Original>> {
    if working_width == 0 {
        return Err(ScanError::InvalidImage {
            width: working_width,
            height: 0,
        });
    }
    let multiplier = original_width as f64 / working_width as f64;
    let corners = quad
        .corners
        .map(|p| Point::new((p.x as f64 * multiplier) as i32, (p.y as f64 * multiplier) as i32));
    debug!(multiplier, ?corners, "Quadrilateral rescaled to original space");
    Ok(Quadrilateral::new(corners))
}

pub(crate) fn distance(a: Point<i32>, b: Point<i32>) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Compute the area of a closed polygon using the shoelace formula.
pub(crate) fn shoelace_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x as i64 * points[j].y as i64;
        twice_area -= points[j].x as i64 * points[i].y as i64;
    }
    twice_area.abs() as f64 / 2.0
}
