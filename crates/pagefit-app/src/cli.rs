// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and how they fold into a `ConvertConfig`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pagefit_core::config::{ConvertConfig, RenderSettings};
use pagefit_core::error::Result;
use pagefit_core::types::{ColorModel, PaperSize, Resample, XrefMode};

/// Paper size presets.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => PaperSize::A3,
            PaperArg::A4 => PaperSize::A4,
            PaperArg::A5 => PaperSize::A5,
            PaperArg::Letter => PaperSize::Letter,
            PaperArg::Legal => PaperSize::Legal,
            PaperArg::Tabloid => PaperSize::Tabloid,
        }
    }
}

/// Colour model of the embedded image.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorArg {
    /// 8-bit RGB
    Rgb,
    /// 8-bit grayscale
    Gray,
}

impl From<ColorArg> for ColorModel {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Rgb => ColorModel::Rgb8,
            ColorArg::Gray => ColorModel::Gray8,
        }
    }
}

/// Resampling filter.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResampleArg {
    Nearest,
    Bilinear,
    Lanczos3,
}

impl From<ResampleArg> for Resample {
    fn from(arg: ResampleArg) -> Self {
        match arg {
            ResampleArg::Nearest => Resample::Nearest,
            ResampleArg::Bilinear => Resample::Bilinear,
            ResampleArg::Lanczos3 => Resample::Lanczos3,
        }
    }
}

/// Cross-reference style.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum XrefArg {
    /// Full offset table (readable by strict parsers)
    Indexed,
    /// Placeholder table, byte-compatible with older output
    Minimal,
}

impl From<XrefArg> for XrefMode {
    fn from(arg: XrefArg) -> Self {
        match arg {
            XrefArg::Indexed => XrefMode::Indexed,
            XrefArg::Minimal => XrefMode::Minimal,
        }
    }
}

/// Place a single image, scaled to fit and centred, on a one-page PDF.
#[derive(Parser, Debug)]
#[command(name = "pagefit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Image to convert (JPEG, PNG, or any format the decoder supports)
    pub input: PathBuf,

    /// Where to write the PDF
    pub output: PathBuf,

    /// JSON settings file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Paper size preset
    #[arg(long, value_enum, conflicts_with = "width_pt")]
    pub paper: Option<PaperArg>,

    /// Custom page width in points
    #[arg(long, requires = "height_pt")]
    pub width_pt: Option<u32>,

    /// Custom page height in points
    #[arg(long, requires = "width_pt")]
    pub height_pt: Option<u32>,

    /// Swap page width and height
    #[arg(long)]
    pub landscape: bool,

    /// Target resolution in pixels per inch
    #[arg(long)]
    pub dpi: Option<f64>,

    /// Colour model of the embedded image
    #[arg(long, value_enum)]
    pub color: Option<ColorArg>,

    /// JPEG quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Resampling filter
    #[arg(long, value_enum)]
    pub resample: Option<ResampleArg>,

    /// Cross-reference table style
    #[arg(long, value_enum)]
    pub xref: Option<XrefArg>,

    /// Read the written PDF back and check it
    #[arg(long)]
    pub verify: bool,

    /// Print the conversion report as JSON
    #[arg(long)]
    pub json: bool,

    /// Use debug logging level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Settings from the config file (or defaults) with flag overrides applied.
    pub fn render_settings(&self) -> Result<RenderSettings> {
        let mut settings = match &self.config {
            Some(path) => RenderSettings::from_json_file(path)?,
            None => RenderSettings::default(),
        };

        if let Some(paper) = self.paper {
            settings.paper_size = paper.into();
        }
        if let (Some(width_pt), Some(height_pt)) = (self.width_pt, self.height_pt) {
            settings.paper_size = PaperSize::Custom {
                width_pt,
                height_pt,
            };
        }
        if self.landscape {
            settings.landscape = true;
        }
        if let Some(dpi) = self.dpi {
            settings.dpi = dpi;
        }
        if let Some(color) = self.color {
            settings.color_model = color.into();
        }
        if let Some(quality) = self.quality {
            settings.jpeg_quality = quality;
        }
        if let Some(resample) = self.resample {
            settings.resample = resample.into();
        }
        if let Some(xref) = self.xref {
            settings.xref = xref.into();
        }
        if self.verify {
            settings.verify = true;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn convert_config(&self) -> Result<ConvertConfig> {
        Ok(ConvertConfig::new(&self.input, &self.output).with_settings(self.render_settings()?))
    }
}
