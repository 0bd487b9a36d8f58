// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people photographing documents.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity tells the caller whether the person can fix it by retaking the photo.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The person can fix it: retake the photo, pick another file.
    ActionRequired,
    /// The input can never be scanned as-is (corrupt file, wrong format).
    Permanent,
    /// Something went wrong on our side (configuration, disk, encoder).
    Internal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `ScanError` into a `HumanError`.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::Decode(_) => HumanError {
            message: "We couldn't open this picture.".into(),
            suggestion: "The file may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::Permanent,
        },

        ScanError::InvalidImage { width, height } => HumanError {
            message: "This picture is empty.".into(),
            suggestion: format!("The image has no usable pixels ({width}x{height}). Try taking the photo again."),
            severity: Severity::Permanent,
        },

        ScanError::NoQuadrilateralFound => HumanError {
            message: "We couldn't find the edges of the document.".into(),
            suggestion: "Place the page on a plain, darker surface with all four corners visible and good lighting, then try again.".into(),
            severity: Severity::ActionRequired,
        },

        ScanError::DegenerateQuadrilateral(_) => HumanError {
            message: "The document outline we found doesn't look like a page.".into(),
            suggestion: "Hold the camera more squarely above the page so all four corners are clearly separated, then try again.".into(),
            severity: Severity::ActionRequired,
        },

        ScanError::Encode(detail) => HumanError {
            message: "We couldn't save the scanned page.".into(),
            suggestion: format!("Try a different output format. (Detail: {detail})"),
            severity: Severity::Internal,
        },

        ScanError::InvalidConfig(detail) => HumanError {
            message: "The scanner settings are not valid.".into(),
            suggestion: format!("Fix the configuration file or remove it to use the defaults. ({detail})"),
            severity: Severity::Internal,
        },

        ScanError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to use that file.".into(),
                    suggestion: "Check the file and folder permissions, or choose a different location.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: format!("Check there is free disk space and try again. ({io_err})"),
                    severity: Severity::Internal,
                }
            }
        }

        ScanError::Serialization(_) => HumanError {
            message: "The scanner settings file couldn't be read.".into(),
            suggestion: "Make sure the configuration file is valid JSON.".into(),
            severity: Severity::Internal,
        },
    }
}
