//! Result types produced by a rename run.

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which title tier produced a file's title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleSource {
    /// The document's metadata title field.
    Metadata,
    /// Largest, topmost qualifying line on page 1.
    Layout,
    /// First plausible line of page 1's plain text.
    PlainText,
    /// Nothing qualified; the sentinel title was used.
    Fallback,
}

impl fmt::Display for TitleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TitleSource::Metadata => "metadata",
            TitleSource::Layout => "layout",
            TitleSource::PlainText => "plain-text",
            TitleSource::Fallback => "fallback",
        })
    }
}

/// Outcome of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProcessingStatus {
    /// The file was renamed.
    Success,
    /// The file already carried its title as its name and was left alone.
    Skipped,
    /// The file could not be processed.
    Error { message: String },
}

impl ProcessingStatus {
    /// Renamed and skipped files both count as successes.
    pub fn is_success(&self) -> bool {
        !matches!(self, ProcessingStatus::Error { .. })
    }
}

impl From<&FileError> for ProcessingStatus {
    fn from(e: &FileError) -> Self {
        ProcessingStatus::Error {
            message: e.to_string(),
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingStatus::Success => f.write_str("success"),
            ProcessingStatus::Skipped => f.write_str("skipped (already correct)"),
            ProcessingStatus::Error { message } => write!(f, "error: {message}"),
        }
    }
}

/// The record kept for every PDF of the batch, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// File name before the run.
    pub original_name: String,
    /// File name after the run; empty when processing failed.
    pub new_name: String,
    /// Extracted title, before sanitising; empty when processing failed.
    pub title: String,
    /// Tier that produced `title`.
    pub title_source: Option<TitleSource>,
    pub status: ProcessingStatus,
}

impl ProcessingResult {
    pub(crate) fn failed(original_name: String, error: &FileError) -> Self {
        Self {
            original_name,
            new_name: String::new(),
            title: String::new(),
            title_source: None,
            status: error.into(),
        }
    }
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// PDFs found in the directory.
    pub total: usize,
    /// Renamed + skipped.
    pub succeeded: usize,
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

impl BatchStats {
    pub(crate) fn from_results(results: &[ProcessingResult], duration_ms: u64) -> Self {
        let renamed = results
            .iter()
            .filter(|r| r.status == ProcessingStatus::Success)
            .count();
        let skipped = results
            .iter()
            .filter(|r| r.status == ProcessingStatus::Skipped)
            .count();
        let succeeded = renamed + skipped;
        Self {
            total: results.len(),
            succeeded,
            renamed,
            skipped,
            failed: results.len() - succeeded,
            duration_ms,
        }
    }
}

/// What the backup stage did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSummary {
    pub path: PathBuf,
    pub files_copied: usize,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameOutcome {
    pub directory: PathBuf,
    pub results: Vec<ProcessingResult>,
    pub stats: BatchStats,
    pub backup: Option<BackupSummary>,
    /// Where the report was written; `None` when no PDFs were found or
    /// report writing was disabled.
    pub report_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: ProcessingStatus) -> ProcessingResult {
        ProcessingResult {
            original_name: "x.pdf".into(),
            new_name: String::new(),
            title: String::new(),
            title_source: None,
            status,
        }
    }

    #[test]
    fn status_display_matches_report_wording() {
        assert_eq!(ProcessingStatus::Success.to_string(), "success");
        assert_eq!(
            ProcessingStatus::Skipped.to_string(),
            "skipped (already correct)"
        );
        let e = ProcessingStatus::Error {
            message: "permission denied".into(),
        };
        assert_eq!(e.to_string(), "error: permission denied");
    }

    #[test]
    fn stats_count_skips_as_successes() {
        let results = vec![
            result(ProcessingStatus::Success),
            result(ProcessingStatus::Skipped),
            result(ProcessingStatus::Error {
                message: "x".into(),
            }),
        ];
        let stats = BatchStats::from_results(&results, 7);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.renamed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.duration_ms, 7);
    }

    #[test]
    fn status_serialises_with_kind_tag() {
        let json = serde_json::to_string(&ProcessingStatus::Error {
            message: "boom".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"error","message":"boom"}"#);
        assert_eq!(
            serde_json::to_string(&TitleSource::PlainText).unwrap(),
            r#""plain-text""#
        );
    }
}
