// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, resample, and JPEG-encode. Operates on in-memory
// images using the `image` crate.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageError};
use pagefit_core::error::{PagefitError, Result};
use pagefit_core::types::{ColorModel, ImageFilter, Resample};
use tracing::{debug, info, instrument};

use super::EncodedImage;

/// Image pipeline operating on a single in-memory image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, enabling
/// method chaining.
///
/// ```ignore
/// let encoded = ImageProcessor::open("photo.jpg")?
///     .resize_exact(1240, 826, Resample::Bilinear)
///     .encode_jpeg(ColorModel::Rgb8, 75)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load and decode an image file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PagefitError::InputNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        let processor = Self::from_bytes(&data)?;
        info!(
            width = processor.width(),
            height = processor.height(),
            "Image loaded"
        );
        Ok(processor)
    }

    /// Decode an image from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(PagefitError::CorruptImage("input is empty".into()));
        }
        let img = image::load_from_memory(data).map_err(map_decode_error)?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // -- Transformations ------------------------------------------------------

    /// Resample to exactly `width` x `height`, ignoring aspect ratio. The
    /// layout engine has already chosen dimensions that preserve it.
    #[instrument(skip(self))]
    pub fn resize_exact(self, width: u32, height: u32, filter: Resample) -> Self {
        if self.image.width() == width && self.image.height() == height {
            return self;
        }
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            "Resizing image"
        );
        let resized = self.image.resize_exact(width, height, filter_type(filter));
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as baseline JPEG in the given colour model. Any alpha channel
    /// is dropped.
    #[instrument(skip(self))]
    pub fn encode_jpeg(&self, color_model: ColorModel, quality: u8) -> Result<EncodedImage> {
        let mut buffer = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        let encoded = match color_model {
            ColorModel::Rgb8 => self.image.to_rgb8().write_with_encoder(encoder),
            ColorModel::Gray8 => self.image.to_luma8().write_with_encoder(encoder),
        };
        encoded.map_err(|err| PagefitError::ImageError(format!("JPEG encoding failed: {err}")))?;

        debug!(bytes = buffer.len(), "JPEG encoded");
        Ok(EncodedImage::new(
            buffer,
            self.width(),
            self.height(),
            color_model,
            ImageFilter::Dct,
        ))
    }
}

fn filter_type(filter: Resample) -> FilterType {
    match filter {
        Resample::Nearest => FilterType::Nearest,
        Resample::Bilinear => FilterType::Triangle,
        Resample::Lanczos3 => FilterType::Lanczos3,
    }
}

/// Split decoder failures into "not a format we know" and "a known format
/// that is damaged".
fn map_decode_error(err: ImageError) -> PagefitError {
    match err {
        ImageError::Unsupported(inner) => PagefitError::UnsupportedFormat(inner.to_string()),
        ImageError::Decoding(inner) => PagefitError::CorruptImage(inner.to_string()),
        ImageError::IoError(inner) => PagefitError::CorruptImage(inner.to_string()),
        other => PagefitError::ImageError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 7) as u8, (y * 5) as u8, 128]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn decodes_png_bytes() {
        let processor = ImageProcessor::from_bytes(&png_bytes(32, 16)).unwrap();
        assert_eq!((processor.width(), processor.height()), (32, 16));
    }

    #[test]
    fn empty_input_is_corrupt() {
        assert!(matches!(
            ImageProcessor::from_bytes(&[]),
            Err(PagefitError::CorruptImage(_))
        ));
    }

    #[test]
    fn unknown_bytes_are_unsupported() {
        assert!(matches!(
            ImageProcessor::from_bytes(b"definitely not an image"),
            Err(PagefitError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn truncated_png_is_corrupt() {
        let bytes = png_bytes(32, 32);
        assert!(matches!(
            ImageProcessor::from_bytes(&bytes[..24]),
            Err(PagefitError::CorruptImage(_))
        ));
    }

    #[test]
    fn missing_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.jpg");
        match ImageProcessor::open(&missing) {
            Err(PagefitError::InputNotFound(path)) => assert_eq!(path, missing),
            Err(other) => panic!("unexpected error variant: {other}"),
            Ok(_) => panic!("missing file must not load"),
        }
    }

    #[test]
    fn resize_exact_hits_requested_size() {
        let processor = ImageProcessor::from_bytes(&png_bytes(40, 20))
            .unwrap()
            .resize_exact(100, 50, Resample::Bilinear);
        assert_eq!((processor.width(), processor.height()), (100, 50));
    }

    #[test]
    fn encode_rgb_jpeg() {
        let encoded = ImageProcessor::from_bytes(&png_bytes(24, 12))
            .unwrap()
            .encode_jpeg(ColorModel::Rgb8, 75)
            .unwrap();
        assert_eq!(&encoded.data()[..2], &[0xFF, 0xD8]);
        assert_eq!((encoded.width(), encoded.height()), (24, 12));
        assert_eq!(encoded.declared_len(), encoded.len());
        assert_eq!(encoded.filter(), ImageFilter::Dct);
    }

    #[test]
    fn encode_gray_jpeg_decodes_as_luma() {
        let encoded = ImageProcessor::from_bytes(&png_bytes(16, 16))
            .unwrap()
            .encode_jpeg(ColorModel::Gray8, 90)
            .unwrap();
        assert_eq!(encoded.color_model(), ColorModel::Gray8);
        let decoded = image::load_from_memory(encoded.data()).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn alpha_is_dropped_for_rgb() {
        let rgba = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 0]));
        let encoded = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(rgba))
            .encode_jpeg(ColorModel::Rgb8, 75)
            .unwrap();
        let decoded = image::load_from_memory(encoded.data()).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }
}
