// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docwarp-scan — Document detection and rectification.
//
// Finds the four corners of a photographed page (resize, detail enhancement,
// Canny edges, morphological closing, contour tracing, polygon simplification)
// and warps the page into an axis-aligned rectangle. Also provides the decode /
// encode helpers used at the byte boundary.

pub mod image;
pub mod scan;

// Re-export the primary entry points so callers can use `docwarp_scan::DocumentScanner` etc.
pub use crate::image::codec::{decode, encode};
pub use scan::pipeline::{DocumentScanner, scan};
pub use scan::geometry::{Original, Quadrilateral, Working};
