//! Error types for the paper-renamer library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`RenamerError`]: **Fatal**: the batch cannot proceed at all (missing
//!   directory, backup could not be made, report could not be written).
//!   Returned as `Err(RenamerError)` from the top-level `rename_*` functions.
//!   The reader-level variants (`PdfOpenFailed`, `PageMissing`, …) are also
//!   what a single title tier reports; the extractor swallows those and falls
//!   through to the next tier.
//!
//! * [`FileError`]: **Non-fatal**: one file could not be processed but the
//!   rest of the batch is fine. Its message is stored in the file's
//!   [`crate::output::ProcessingStatus::Error`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the paper-renamer library.
#[derive(Debug, Error)]
pub enum RenamerError {
    // ── Directory errors ──────────────────────────────────────────────────
    /// The target directory does not exist.
    #[error("Source directory not found: '{path}'")]
    DirectoryNotFound { path: PathBuf },

    /// The target path exists but is not a directory.
    #[error("'{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    /// Listing the target directory failed.
    #[error("Failed to read directory '{path}': {source}")]
    DirectoryReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Backup / report errors ────────────────────────────────────────────
    /// Removing, creating or filling the backup directory failed.
    /// No file has been renamed when this is returned.
    #[error("Backup into '{path}' failed: {source}\nNo files were renamed.")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the processing report.
    #[error("Failed to write report '{path}': {source}")]
    ReportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── PDF reader errors ─────────────────────────────────────────────────
    /// The PDF could not be opened or parsed.
    #[error("Failed to open PDF '{path}': {detail}")]
    PdfOpenFailed { path: PathBuf, detail: String },

    /// The document has no first page to inspect.
    #[error("PDF '{path}' has no pages")]
    PageMissing { path: PathBuf },

    /// Text could not be pulled out of the first page.
    #[error("Text extraction failed for '{path}': {detail}")]
    TextExtractionFailed { path: PathBuf, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
The layout and metadata tiers need a pdfium shared library.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib).\n\
  • Or install libpdfium where the system loader can find it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single file.
///
/// Recorded in the file's [`crate::output::ProcessingResult`]; the batch
/// moves on to the next file.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// Title extraction blew up instead of falling back.
    #[error("title extraction failed: {detail}")]
    ExtractionFailed { detail: String },

    /// The filesystem refused the rename.
    #[error("rename to '{target}' failed: {detail}")]
    RenameFailed { target: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_not_found_display() {
        let e = RenamerError::DirectoryNotFound {
            path: PathBuf::from("/no/such/papers"),
        };
        assert!(e.to_string().contains("/no/such/papers"), "got: {e}");
    }

    #[test]
    fn backup_failed_mentions_no_renames() {
        let e = RenamerError::BackupFailed {
            path: PathBuf::from("papers/backup"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let msg = e.to_string();
        assert!(msg.contains("disk full"));
        assert!(msg.contains("No files were renamed"));
    }

    #[test]
    fn rename_failed_display() {
        let e = FileError::RenameFailed {
            target: "A Study.pdf".into(),
            detail: "permission denied".into(),
        };
        assert_eq!(
            e.to_string(),
            "rename to 'A Study.pdf' failed: permission denied"
        );
    }
}
