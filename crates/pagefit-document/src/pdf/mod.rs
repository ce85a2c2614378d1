// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — emitting the single-page image document and reading it back.

pub mod reader;
pub mod writer;

pub use reader::{PdfReader, PdfSummary};
pub use writer::PdfWriter;
