// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command-line driver.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity tells the driver whether the user can fix the problem.

use std::io::ErrorKind;

use crate::error::PagefitError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something on the machine got in the way (full disk, locked file).
    Transient,
    /// The user must change the input, a flag, or the settings file.
    ActionRequired,
    /// An internal consistency check failed; retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `PagefitError` into a `HumanError`.
pub fn humanize_error(err: &PagefitError) -> HumanError {
    match err {
        PagefitError::InputNotFound(path) => HumanError {
            message: format!("We couldn't find the image {}.", path.display()),
            suggestion: "Check the path and spelling of the input file.".into(),
            severity: Severity::ActionRequired,
        },

        PagefitError::UnsupportedFormat(_) => HumanError {
            message: "This file isn't an image format we can read.".into(),
            suggestion: "Convert it to JPEG or PNG and try again.".into(),
            severity: Severity::ActionRequired,
        },

        PagefitError::CorruptImage(_) => HumanError {
            message: "The image file looks damaged or empty.".into(),
            suggestion: "Open it in an image viewer to check it, or export it again.".into(),
            severity: Severity::ActionRequired,
        },

        PagefitError::InvalidDimension(detail) => HumanError {
            message: format!("The page or image size doesn't work: {detail}."),
            suggestion: "Use a positive page size and resolution.".into(),
            severity: Severity::ActionRequired,
        },

        PagefitError::SinkWrite(io) | PagefitError::Io(io) => humanize_io_error(io),

        PagefitError::EncodingError(_)
        | PagefitError::ImageError(_)
        | PagefitError::PdfError(_) => HumanError {
            message: "Something went wrong while building the PDF.".into(),
            suggestion: "Run again with --verbose and report the log if it keeps happening.".into(),
            severity: Severity::Permanent,
        },

        PagefitError::Config(detail) => HumanError {
            message: format!("The settings are not valid: {detail}."),
            suggestion: "Fix the flag or the settings file and try again.".into(),
            severity: Severity::ActionRequired,
        },

        PagefitError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Make sure it is valid JSON.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

fn humanize_io_error(io: &std::io::Error) -> HumanError {
    match io.kind() {
        ErrorKind::PermissionDenied => HumanError {
            message: "We aren't allowed to write the PDF there.".into(),
            suggestion: "Pick a folder you can write to, or check the file permissions.".into(),
            severity: Severity::ActionRequired,
        },
        ErrorKind::NotFound => HumanError {
            message: "The output folder doesn't exist.".into(),
            suggestion: "Create the folder first or choose another output path.".into(),
            severity: Severity::ActionRequired,
        },
        _ => HumanError {
            message: "Writing the PDF failed part-way through.".into(),
            suggestion: "Check there is enough free disk space, then try again.".into(),
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn missing_input_names_the_path() {
        let err = PagefitError::InputNotFound(PathBuf::from("/tmp/photo.jpg"));
        let human = humanize_error(&err);
        assert!(human.message.contains("photo.jpg"));
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn disk_full_is_transient() {
        let err = PagefitError::SinkWrite(io::Error::other("no space left on device"));
        assert_eq!(humanize_error(&err).severity, Severity::Transient);
    }

    #[test]
    fn permission_denied_is_action_required() {
        let err = PagefitError::SinkWrite(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn encoding_check_is_permanent() {
        let err = PagefitError::EncodingError("length mismatch".into());
        assert_eq!(humanize_error(&err).severity, Severity::Permanent);
    }
}
