// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output persistence for scanned pages.

use std::path::Path;

use docwarp_core::OutputFormat;
use tracing::info;

/// Where the rectified page goes when no path is given.
pub const DEFAULT_OUTPUT_PATH: &str = "./output/scanned_document.jpg";

/// Output format implied by the file extension, if it names one we write.
pub fn format_for(path: &Path) -> Option<OutputFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(OutputFormat::from_extension)
}

/// Write `bytes` to `path`, creating parent directories as needed.
pub fn persist(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "Scanned document saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_jpeg() {
        assert_eq!(format_for(Path::new(DEFAULT_OUTPUT_PATH)), Some(OutputFormat::Jpeg));
    }

    #[test]
    fn unknown_extension_defers_to_config() {
        assert_eq!(format_for(Path::new("scan.bmp")), None);
        assert_eq!(format_for(Path::new("scan")), None);
    }

    #[test]
    fn persist_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("a").join("b").join("page.jpg");
        persist(&path, b"bytes").expect("persist");
        assert_eq!(std::fs::read(&path).expect("read back"), b"bytes");
    }
}
