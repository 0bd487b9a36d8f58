// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docwarp — scan a photographed document into a flat page.
//
// Entry point. Runs one scan from the command line and prints a JSON report
// on stdout.

mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use docwarp_core::human_errors::humanize_error;
use docwarp_core::{ScanConfig, ScanReport};

/// Find the document in a photo and save it as a flat, straightened page.
#[derive(Debug, Parser)]
#[command(name = "docwarp", version, about)]
struct Cli {
    /// Photograph containing the document (JPEG, PNG, ...).
    input: PathBuf,

    /// Where to write the rectified page; the extension picks JPEG or PNG.
    #[arg(short, long, default_value = output::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// JSON file overriding the scan configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of the working copy used for detection.
    #[arg(long)]
    working_width: Option<u32>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!(input = %cli.input.display(), "docwarp starting");

    let (report, code) = match run(&cli) {
        Ok(report) => (report, ExitCode::SUCCESS),
        Err(err) => {
            tracing::error!(kind = err.kind(), error = %err, "scan failed");
            let human = humanize_error(&err);
            let report = ScanReport::Failure {
                error: err.kind().to_string(),
                message: human.message,
                suggestion: human.suggestion,
            };
            (report, ExitCode::FAILURE)
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => tracing::error!(error = %err, "failed to serialise report"),
    }
    code
}

fn run(cli: &Cli) -> docwarp_core::error::Result<ScanReport> {
    let mut config = match &cli.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };
    if let Some(width) = cli.working_width {
        config.working_width = width;
    }
    if let Some(format) = output::format_for(&cli.output) {
        config.output_format = format;
    }

    let scanner = docwarp_scan::DocumentScanner::new(config)?;
    let data = std::fs::read(&cli.input)?;
    let image = docwarp_scan::decode(&data)?;
    let page = scanner.rectify_image(&image)?;

    let cfg = scanner.config();
    let encoded = docwarp_scan::encode(&page, cfg.output_format, cfg.jpeg_quality)?;
    tracing::debug!(
        mime = cfg.output_format.mime_type(),
        bytes = encoded.len(),
        "Page encoded"
    );
    output::persist(&cli.output, &encoded)?;

    Ok(ScanReport::Success {
        message: "Document scanned successfully".into(),
        output_path: cli.output.display().to_string(),
        width: page.width(),
        height: page.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use imageproc::drawing::draw_polygon_mut;
    use imageproc::point::Point;

    fn cli(input: PathBuf, output: PathBuf) -> Cli {
        Cli {
            input,
            output,
            config: None,
            working_width: None,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn scans_photo_into_nested_output_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut img = RgbImage::from_pixel(600, 450, Rgb([25, 25, 25]));
        let page = [
            Point::new(110, 70),
            Point::new(480, 90),
            Point::new(470, 380),
            Point::new(100, 360),
        ];
        draw_polygon_mut(&mut img, &page, Rgb([235, 235, 235]));
        let input = dir.path().join("photo.png");
        DynamicImage::ImageRgb8(img).save(&input).expect("save input");

        let output = dir.path().join("out").join("page.png");
        let report = run(&cli(input, output.clone())).expect("scan");

        assert!(output.exists());
        match report {
            ScanReport::Success { width, height, .. } => assert!(width > 300 && height > 200),
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = run(&cli(dir.path().join("nope.jpg"), dir.path().join("o.jpg")))
            .expect_err("missing input");
        assert_eq!(err.kind(), "io_error");
    }
}
