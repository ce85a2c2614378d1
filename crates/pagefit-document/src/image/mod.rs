// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decode, resample, and JPEG-encode the source image, and the
// compressed stream handed to the PDF emitter.

pub mod processor;

pub use processor::ImageProcessor;

use pagefit_core::types::{ColorModel, ImageFilter};

/// A compressed image stream ready to be embedded verbatim in a PDF.
///
/// `declared_len` is the length the producing codec reported. The emitter
/// refuses to write an image whose declared and actual lengths disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    color_model: ColorModel,
    filter: ImageFilter,
    declared_len: usize,
}

impl EncodedImage {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        color_model: ColorModel,
        filter: ImageFilter,
    ) -> Self {
        let declared_len = data.len();
        Self {
            data,
            width,
            height,
            color_model,
            filter,
            declared_len,
        }
    }

    /// Override the declared payload length, e.g. with a size reported by an
    /// external codec.
    pub fn with_declared_len(mut self, declared_len: usize) -> Self {
        self.declared_len = declared_len;
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_model(&self) -> ColorModel {
        self.color_model
    }

    pub fn filter(&self) -> ImageFilter {
        self.filter
    }

    pub fn declared_len(&self) -> usize {
        self.declared_len
    }

    /// Actual payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
