// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagefit-document — Image-to-page conversion for Pagefit.
//
// Provides the layout engine (fit an image inside a page), the image
// collaborators (decode, resize, JPEG-encode), a minimal single-page PDF
// emitter, a reader for checking emitted documents, and the conversion
// pipeline tying them together.

pub mod convert;
pub mod image;
pub mod integrity;
pub mod layout;
pub mod pdf;

// Re-export the primary items so callers can use `pagefit_document::PdfWriter` etc.
pub use convert::{Conversion, ConversionReport, convert_bytes, convert_file};
pub use image::{EncodedImage, ImageProcessor};
pub use layout::{ImageGeometry, compute_geometry};
pub use pdf::reader::{PdfReader, PdfSummary};
pub use pdf::writer::{PdfWriter, write_document};
