// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout engine — fit a raster image inside a page without distortion and
// centre it.
//
// Pure arithmetic: no I/O and no logging, so it can be called from any
// thread and tested exhaustively.

use pagefit_core::error::{PagefitError, Result};
use pagefit_core::types::{POINTS_PER_INCH, PageSpec};
use serde::Serialize;

/// Largest side a baseline JPEG can describe.
pub const MAX_SCALED_PX: u32 = u16::MAX as u32;

/// Where and how large the image lands on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageGeometry {
    /// Decoded source width in pixels.
    pub source_width: u32,
    /// Decoded source height in pixels.
    pub source_height: u32,
    /// Width the image is resampled to.
    pub scaled_width: u32,
    /// Height the image is resampled to.
    pub scaled_height: u32,
    /// Uniform scale factor applied to both axes.
    pub scale: f64,
    /// Placed width in points.
    pub placement_width_pt: f64,
    /// Placed height in points.
    pub placement_height_pt: f64,
    /// Distance from the left page edge in points.
    pub offset_x_pt: f64,
    /// Distance from the bottom page edge in points.
    pub offset_y_pt: f64,
    /// Width of the page the placement was computed for, in points.
    pub page_width_pt: f64,
    /// Height of the page the placement was computed for, in points.
    pub page_height_pt: f64,
}

/// Compute the largest undistorted placement of a `source_width` x
/// `source_height` image on `page`, centred on both axes.
///
/// The image is scaled up when it is smaller than the page. Scaled pixel
/// sizes are truncated toward zero, so the image can fall a pixel short of
/// the page edge on its limiting axis; output compatibility depends on this.
pub fn compute_geometry(
    page: &PageSpec,
    source_width: u32,
    source_height: u32,
) -> Result<ImageGeometry> {
    if source_width == 0 || source_height == 0 {
        return Err(PagefitError::InvalidDimension(format!(
            "source image is {source_width}x{source_height} px"
        )));
    }

    let (page_w_px, page_h_px) = page.page_px();
    if page_w_px == 0 || page_h_px == 0 {
        return Err(PagefitError::InvalidDimension(format!(
            "page rounds to {page_w_px}x{page_h_px} px at {} dpi",
            page.dpi()
        )));
    }

    let scale = f64::min(
        f64::from(page_w_px) / f64::from(source_width),
        f64::from(page_h_px) / f64::from(source_height),
    );

    // Truncation, not rounding. Extreme aspect ratios may truncate to zero;
    // keep at least one pixel so the encoder has something to compress.
    let scaled_width = ((f64::from(source_width) * scale) as u32).clamp(1, page_w_px);
    let scaled_height = ((f64::from(source_height) * scale) as u32).clamp(1, page_h_px);

    if scaled_width > MAX_SCALED_PX || scaled_height > MAX_SCALED_PX {
        return Err(PagefitError::InvalidDimension(format!(
            "scaled image would be {scaled_width}x{scaled_height} px at {} dpi, \
             more than {MAX_SCALED_PX} px per side",
            page.dpi()
        )));
    }

    let placement_width_pt = f64::from(scaled_width) * POINTS_PER_INCH / page.dpi();
    let placement_height_pt = f64::from(scaled_height) * POINTS_PER_INCH / page.dpi();

    // Rounding the page up to whole pixels can make the placement a fraction
    // of a point wider than the page; pin that axis to the edge.
    let offset_x_pt = ((page.width_pt() - placement_width_pt) / 2.0).max(0.0);
    let offset_y_pt = ((page.height_pt() - placement_height_pt) / 2.0).max(0.0);

    Ok(ImageGeometry {
        source_width,
        source_height,
        scaled_width,
        scaled_height,
        scale,
        placement_width_pt,
        placement_height_pt,
        offset_x_pt,
        offset_y_pt,
        page_width_pt: page.width_pt(),
        page_height_pt: page.height_pt(),
    })
}
