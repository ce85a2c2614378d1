// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion pipeline: decode → layout → resample → JPEG-encode → emit.
//
// Each stage produces a value the next one consumes; nothing is shared, so
// independent conversions can run on separate threads with their own sinks.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use pagefit_core::config::{ConvertConfig, RenderSettings};
use pagefit_core::error::{PagefitError, Result};
use pagefit_core::types::PageSpec;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::image::{EncodedImage, ImageProcessor};
use crate::integrity::hash_bytes;
use crate::layout::{ImageGeometry, compute_geometry};
use crate::pdf::reader::{PdfReader, PdfSummary};
use crate::pdf::writer::PdfWriter;

/// Everything the emitter needs, computed before any output exists.
#[derive(Debug, Clone)]
pub struct PreparedPage {
    pub page: PageSpec,
    pub geometry: ImageGeometry,
    pub image: EncodedImage,
}

/// Result of writing one document to a sink.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub geometry: ImageGeometry,
    pub encoded_image_bytes: usize,
    pub bytes_written: u64,
}

/// Result of a file-to-file conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_bytes: u64,
    pub geometry: ImageGeometry,
    pub encoded_image_bytes: usize,
    pub output_bytes: u64,
    /// SHA-256 of the output file, lowercase hex.
    pub sha256: String,
    /// Present when the settings asked for verification.
    pub summary: Option<PdfSummary>,
}

/// Decode `data`, lay it out on the configured page, and produce the
/// compressed image stream.
#[instrument(skip_all, fields(data_len = data.len()))]
pub fn prepare(data: &[u8], settings: &RenderSettings) -> Result<PreparedPage> {
    settings.validate()?;
    let processor = ImageProcessor::from_bytes(data)?;
    prepare_decoded(processor, settings)
}

/// Lay out an already-decoded image and produce the compressed stream.
fn prepare_decoded(processor: ImageProcessor, settings: &RenderSettings) -> Result<PreparedPage> {
    let page = settings.page_spec()?;
    let geometry = compute_geometry(&page, processor.width(), processor.height())?;
    debug!(
        scaled_w = geometry.scaled_width,
        scaled_h = geometry.scaled_height,
        scale = geometry.scale,
        offset_x = geometry.offset_x_pt,
        offset_y = geometry.offset_y_pt,
        "Layout computed"
    );

    let image = processor
        .resize_exact(geometry.scaled_width, geometry.scaled_height, settings.resample)
        .encode_jpeg(settings.color_model, settings.jpeg_quality)?;

    Ok(PreparedPage {
        page,
        geometry,
        image,
    })
}

/// Convert encoded image bytes into a PDF written to `sink`.
pub fn convert_bytes<W: Write>(
    data: &[u8],
    settings: &RenderSettings,
    sink: W,
) -> Result<Conversion> {
    let prepared = prepare(data, settings)?;
    emit(&prepared, settings, sink)
}

/// Convert the image at `config.input` into a PDF at `config.output`.
///
/// Decoding and encoding finish before the output file is created, so bad
/// input never leaves a file behind. If writing or verification fails, the
/// output file is removed before the error is returned.
#[instrument(skip_all, fields(input = %config.input.display(), output = %config.output.display()))]
pub fn convert_file(config: &ConvertConfig) -> Result<ConversionReport> {
    info!("Starting image to PDF conversion");

    config.settings.validate()?;
    let processor = ImageProcessor::open(&config.input)?;
    let input_bytes = fs::metadata(&config.input)?.len();
    let prepared = prepare_decoded(processor, &config.settings)?;

    let file = File::create(&config.output).map_err(PagefitError::SinkWrite)?;
    let conversion = match emit(&prepared, &config.settings, BufWriter::new(file)) {
        Ok(conversion) => conversion,
        Err(err) => {
            discard_partial(config);
            return Err(err);
        }
    };

    let written = fs::read(&config.output)?;
    let summary = if config.settings.verify {
        match verify(&written, &prepared) {
            Ok(summary) => Some(summary),
            Err(err) => {
                discard_partial(config);
                return Err(err);
            }
        }
    } else {
        None
    };

    info!(
        kib = written.len() / 1024,
        "PDF saved at {}",
        config.output.display()
    );

    Ok(ConversionReport {
        input: config.input.clone(),
        output: config.output.clone(),
        input_bytes,
        geometry: conversion.geometry,
        encoded_image_bytes: conversion.encoded_image_bytes,
        output_bytes: conversion.bytes_written,
        sha256: hash_bytes(&written),
        summary,
    })
}

fn emit<W: Write>(
    prepared: &PreparedPage,
    settings: &RenderSettings,
    sink: W,
) -> Result<Conversion> {
    let bytes_written = PdfWriter::new(prepared.page)
        .with_xref_mode(settings.xref)
        .write_document(sink, &prepared.geometry, &prepared.image)?;

    Ok(Conversion {
        geometry: prepared.geometry,
        encoded_image_bytes: prepared.image.len(),
        bytes_written,
    })
}

/// Read the document back and make sure it describes the image we embedded.
fn verify(pdf: &[u8], prepared: &PreparedPage) -> Result<PdfSummary> {
    let summary = PdfReader::from_bytes(pdf)?.summary()?;
    let expected = (prepared.geometry.scaled_width, prepared.geometry.scaled_height);
    if summary.page_count != 1
        || (summary.image_width, summary.image_height) != expected
        || summary.image_bytes != prepared.image.len()
    {
        return Err(PagefitError::PdfError(format!(
            "written document does not match the embedded image: {summary:?}"
        )));
    }
    debug!(?summary, "Output verified");
    Ok(summary)
}

fn discard_partial(config: &ConvertConfig) {
    match fs::remove_file(&config.output) {
        Ok(()) => warn!("Removed output {}", config.output.display()),
        Err(err) => warn!(
            error = %err,
            "Could not remove output {}",
            config.output.display()
        ),
    }
}
