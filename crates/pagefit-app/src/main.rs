// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagefit — image in, one-page PDF out.
//
// Entry point. Initialises logging, builds the conversion config from the
// command line, runs the conversion, and reports the outcome.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use pagefit_core::error::PagefitError;
use pagefit_core::human_errors::humanize_error;
use pagefit_document::{ConversionReport, convert_file};

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Conversion failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), PagefitError> {
    let config = cli.convert_config()?;
    let report = convert_file(&config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ConversionReport) {
    let g = &report.geometry;
    println!(
        "{} -> {} ({} KB)",
        report.input.display(),
        report.output.display(),
        report.output_bytes / 1024
    );
    println!(
        "  image {}x{} px -> {}x{} px, placed {:.2}x{:.2} pt at ({:.2}, {:.2})",
        g.source_width,
        g.source_height,
        g.scaled_width,
        g.scaled_height,
        g.placement_width_pt,
        g.placement_height_pt,
        g.offset_x_pt,
        g.offset_y_pt
    );
    println!("  sha256 {}", report.sha256);
    if let Some(summary) = &report.summary {
        println!(
            "  verified: {} page, /{} /{} {} bytes",
            summary.page_count, summary.image_filter, summary.image_color_space, summary.image_bytes
        );
    }
}
