// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline. Resize, detail enhancement, edge map, contour tracing,
// quadrilateral selection, rescaling, and perspective rectification.

pub mod contours;
pub mod edges;
pub mod enhance;
pub mod geometry;
pub mod pipeline;
pub mod quad;
pub mod rectify;
pub mod resize;

pub use geometry::{Contour, Original, Polygon, Quadrilateral, Working, rescale};
pub use pipeline::{DocumentScanner, scan};
