// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Pagefit: page geometry, colour model, and the
// tags written into the PDF image dictionary.

use serde::{Deserialize, Serialize};

use crate::error::{PagefitError, Result};

/// PostScript points per inch. PDF user space is measured in points.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Standard paper sizes, measured in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_pt: u32, height_pt: u32 },
}

impl PaperSize {
    /// Dimensions in points (width, height), portrait orientation.
    pub fn dimensions_pt(&self) -> (u32, u32) {
        match self {
            Self::A4 => (595, 842),
            Self::A3 => (842, 1191),
            Self::A5 => (420, 595),
            Self::Letter => (612, 792),
            Self::Legal => (612, 1008),
            Self::Tabloid => (792, 1224),
            Self::Custom {
                width_pt,
                height_pt,
            } => (*width_pt, *height_pt),
        }
    }
}

/// Target page: size in points plus the raster resolution the image is
/// resampled to.
///
/// Construct through [`PageSpec::new`], which rejects zero, negative and
/// non-finite values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSpec {
    width_pt: f64,
    height_pt: f64,
    dpi: f64,
}

impl PageSpec {
    /// Default target resolution, a compromise between quality and file size.
    pub const DEFAULT_DPI: f64 = 150.0;

    pub fn new(width_pt: f64, height_pt: f64, dpi: f64) -> Result<Self> {
        let checks = [
            ("page width", width_pt),
            ("page height", height_pt),
            ("resolution", dpi),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(PagefitError::InvalidDimension(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(Self {
            width_pt,
            height_pt,
            dpi,
        })
    }

    /// Page spec for a paper preset at the given resolution.
    pub fn from_paper(paper: PaperSize, dpi: f64) -> Result<Self> {
        let (w, h) = paper.dimensions_pt();
        Self::new(f64::from(w), f64::from(h), dpi)
    }

    /// A4 portrait at 150 dpi.
    pub fn a4() -> Self {
        Self {
            width_pt: 595.0,
            height_pt: 842.0,
            dpi: Self::DEFAULT_DPI,
        }
    }

    /// The same page rotated a quarter turn (width and height swapped).
    pub fn landscape(self) -> Self {
        Self {
            width_pt: self.height_pt,
            height_pt: self.width_pt,
            dpi: self.dpi,
        }
    }

    pub fn width_pt(&self) -> f64 {
        self.width_pt
    }

    pub fn height_pt(&self) -> f64 {
        self.height_pt
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Page bounds in pixels at the target resolution, each axis rounded to
    /// the nearest integer.
    pub fn page_px(&self) -> (u32, u32) {
        (
            points_to_pixels(self.width_pt, self.dpi),
            points_to_pixels(self.height_pt, self.dpi),
        )
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::a4()
    }
}

fn points_to_pixels(points: f64, dpi: f64) -> u32 {
    (points / POINTS_PER_INCH * dpi).round() as u32
}

/// Colour model of the embedded image. Always 8 bits per component, no alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorModel {
    #[default]
    Rgb8,
    Gray8,
}

impl ColorModel {
    /// PDF colour space name (without the leading slash).
    pub fn pdf_color_space(&self) -> &'static str {
        match self {
            Self::Rgb8 => "DeviceRGB",
            Self::Gray8 => "DeviceGray",
        }
    }

    pub fn bits_per_component(&self) -> u8 {
        8
    }
}

/// Compression scheme of an embedded image stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFilter {
    /// Baseline JPEG.
    #[default]
    Dct,
}

impl ImageFilter {
    /// PDF filter name (without the leading slash).
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Dct => "DCTDecode",
        }
    }
}

/// Resampling filter used when scaling the source image to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resample {
    Nearest,
    /// Smooth bilinear interpolation.
    #[default]
    Bilinear,
    Lanczos3,
}

/// How the cross-reference section of the output is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XrefMode {
    /// Full table with the byte offset of every object.
    #[default]
    Indexed,
    /// Free-list head only and `startxref 0`. Lenient readers rebuild the
    /// table themselves; strict ones reject the file.
    Minimal,
}
