// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagefit.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Pagefit operations.
#[derive(Debug, Error)]
pub enum PagefitError {
    // -- Input / decode stage --
    #[error("input image not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("corrupt or unreadable image: {0}")]
    CorruptImage(String),

    // -- Layout --
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    // -- Emission --
    #[error("failed to write PDF output: {0}")]
    SinkWrite(#[source] std::io::Error),

    #[error("PDF encoding check failed: {0}")]
    EncodingError(String),

    // -- Collaborators --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagefitError>;
