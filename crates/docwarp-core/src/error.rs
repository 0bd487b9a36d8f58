// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docwarp.

use thiserror::Error;

/// Top-level error type for every scan operation.
///
/// Each variant is terminal for the scan attempt that produced it: nothing in
/// the pipeline retries, because every failure here depends on the input.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Pipeline errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("invalid image dimensions {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    #[error("could not find a document boundary")]
    NoQuadrilateralFound,

    #[error("degenerate document quadrilateral: {0}")]
    DegenerateQuadrilateral(String),

    // -- Output --
    #[error("failed to encode image: {0}")]
    Encode(String),

    // -- Configuration / persistence --
    #[error("invalid scan configuration: {0}")]
    InvalidConfig(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanError {
    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::InvalidImage { .. } => "invalid_image",
            Self::NoQuadrilateralFound => "no_quadrilateral_found",
            Self::DegenerateQuadrilateral(_) => "degenerate_quadrilateral",
            Self::Encode(_) => "encode_error",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Io(_) => "io_error",
            Self::Serialization(_) => "serialization_error",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
