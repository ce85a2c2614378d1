// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PagefitError, Result};
use crate::types::{ColorModel, PageSpec, PaperSize, Resample, XrefMode};

/// How the image is rendered onto the page. Every field has a default, so a
/// settings file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Target paper size.
    pub paper_size: PaperSize,
    /// Rotate the page a quarter turn (swap width and height).
    pub landscape: bool,
    /// Raster resolution the image is resampled to, in pixels per inch.
    pub dpi: f64,
    /// Colour model of the embedded image.
    pub color_model: ColorModel,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
    /// Resampling filter for the resize step.
    pub resample: Resample,
    /// Cross-reference style of the output document.
    pub xref: XrefMode,
    /// Read the finished document back and check its structure.
    pub verify: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            landscape: false,
            dpi: PageSpec::DEFAULT_DPI,
            color_model: ColorModel::Rgb8,
            jpeg_quality: 75,
            resample: Resample::Bilinear,
            xref: XrefMode::Indexed,
            verify: false,
        }
    }
}

impl RenderSettings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let settings: Self = serde_json::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(PagefitError::Config(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.verify && self.xref == XrefMode::Minimal {
            return Err(PagefitError::Config(
                "verification needs an indexed xref table; the minimal form cannot be read back"
                    .into(),
            ));
        }
        self.page_spec().map(|_| ())
    }

    /// The page the image is laid out on.
    pub fn page_spec(&self) -> Result<PageSpec> {
        let spec = PageSpec::from_paper(self.paper_size, self.dpi)?;
        Ok(if self.landscape { spec.landscape() } else { spec })
    }
}

/// A single conversion: where to read, where to write, and how to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub settings: RenderSettings,
}

impl ConvertConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            settings: RenderSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }
}
