// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — load an emitted document with `lopdf` and report what a
// consuming reader will see: page count, media box, and the placed image.

use std::path::Path;

use lopdf::{Dictionary, Document, Object};
use pagefit_core::error::{PagefitError, Result};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// What a conforming reader finds in a single-image document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfSummary {
    pub page_count: usize,
    /// `[llx lly urx ury]` of the first page, in points.
    pub media_box: [f64; 4],
    /// Resource name of the first image XObject on the first page.
    pub image_name: String,
    pub image_width: u32,
    pub image_height: u32,
    pub image_filter: String,
    pub image_color_space: String,
    /// Length of the embedded image stream in bytes.
    pub image_bytes: usize,
}

/// Reads existing PDF files.
///
/// Wraps `lopdf::Document`. Only documents with a real cross-reference table
/// load reliably; the minimal xref form is rejected by strict parsers.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            PagefitError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            PagefitError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Describe the first page and the first image it references.
    pub fn summary(&self) -> Result<PdfSummary> {
        let pages = self.document.get_pages();
        let page_id = *pages
            .get(&1)
            .ok_or_else(|| PagefitError::PdfError("document has no pages".into()))?;
        let page = self.document.get_dictionary(page_id).map_err(pdf_error)?;

        let media_box = self.media_box(page)?;

        let resources = self.resolve(page.get(b"Resources").map_err(pdf_error)?)?;
        let resources = resources.as_dict().map_err(pdf_error)?;
        let xobjects = self.resolve(resources.get(b"XObject").map_err(pdf_error)?)?;
        let (name, reference) = xobjects
            .as_dict()
            .map_err(pdf_error)?
            .iter()
            .next()
            .ok_or_else(|| PagefitError::PdfError("page references no XObject".into()))?;

        let stream = self.resolve(reference)?.as_stream().map_err(pdf_error)?;
        let dict = &stream.dict;

        Ok(PdfSummary {
            page_count: pages.len(),
            media_box,
            image_name: String::from_utf8_lossy(name).into_owned(),
            image_width: dimension(dict, b"Width")?,
            image_height: dimension(dict, b"Height")?,
            image_filter: name_value(dict, b"Filter")?,
            image_color_space: name_value(dict, b"ColorSpace")?,
            image_bytes: stream.content.len(),
        })
    }

    fn media_box(&self, page: &Dictionary) -> Result<[f64; 4]> {
        let values = self
            .resolve(page.get(b"MediaBox").map_err(pdf_error)?)?
            .as_array()
            .map_err(pdf_error)?;
        let mut media_box = [0.0; 4];
        if values.len() != media_box.len() {
            return Err(PagefitError::PdfError(format!(
                "MediaBox has {} entries",
                values.len()
            )));
        }
        for (slot, value) in media_box.iter_mut().zip(values) {
            *slot = number(value)
                .ok_or_else(|| PagefitError::PdfError("MediaBox entry is not a number".into()))?;
        }
        Ok(media_box)
    }

    /// Follow an indirect reference, or pass a direct object through.
    fn resolve<'a>(&'a self, object: &'a Object) -> Result<&'a Object> {
        match object {
            Object::Reference(id) => self.document.get_object(*id).map_err(pdf_error),
            other => Ok(other),
        }
    }
}

fn pdf_error(err: lopdf::Error) -> PagefitError {
    PagefitError::PdfError(err.to_string())
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}

fn dimension(dict: &Dictionary, key: &[u8]) -> Result<u32> {
    let value = dict.get(key).and_then(Object::as_i64).map_err(pdf_error)?;
    u32::try_from(value).map_err(|_| {
        PagefitError::PdfError(format!(
            "/{} {} is out of range",
            String::from_utf8_lossy(key),
            value
        ))
    })
}

fn name_value(dict: &Dictionary, key: &[u8]) -> Result<String> {
    match dict.get(key).map_err(pdf_error)? {
        Object::Name(name) => Ok(String::from_utf8_lossy(name).into_owned()),
        other => Err(PagefitError::PdfError(format!(
            "/{} is {:?}, expected a name",
            String::from_utf8_lossy(key),
            other
        ))),
    }
}
