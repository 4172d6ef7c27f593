//! Configuration types for a rename run.
//!
//! All run behaviour is controlled through [`RenameConfig`], built via its
//! [`RenameConfigBuilder`]. The title heuristics' magic numbers live in
//! [`TitleHeuristics`] so they can be tuned without touching the extractor.

use crate::error::RenamerError;
use crate::progress::ProgressCallback;
use crate::reader::{DocumentReader, TextReader};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Name of the backup subdirectory created next to the PDFs.
pub const DEFAULT_BACKUP_DIR: &str = "backup";

/// Name of the report written into the processed directory ("processing report").
pub const DEFAULT_REPORT_FILE: &str = "处理报告.txt";

/// Configuration for one rename run.
///
/// Built via [`RenameConfig::builder()`] or using [`RenameConfig::default()`].
///
/// # Example
/// ```rust
/// use paper_renamer::RenameConfig;
///
/// let config = RenameConfig::builder()
///     .backup(false)
///     .min_font_size(14.0)
///     .build()
///     .unwrap();
/// assert!(!config.backup);
/// ```
#[derive(Clone)]
pub struct RenameConfig {
    /// Copy every PDF into [`Self::backup_dir_name`] before renaming. Default: true.
    pub backup: bool,

    /// Thresholds used by the layout and plain-text title tiers.
    pub heuristics: TitleHeuristics,

    /// Backup subdirectory name. Default: `backup`.
    pub backup_dir_name: String,

    /// Report file name. Default: `处理报告.txt`.
    pub report_file_name: String,

    /// Write the report after the batch. Default: true.
    pub write_report: bool,

    /// Explicit pdfium shared library. Falls back to `PDFIUM_LIB_PATH`, then
    /// the system loader.
    pub pdfium_library_path: Option<PathBuf>,

    /// Pre-constructed layout/metadata reader. Takes precedence over pdfium.
    pub document_reader: Option<Arc<dyn DocumentReader>>,

    /// Pre-constructed plain-text reader. Takes precedence over lopdf.
    pub text_reader: Option<Arc<dyn TextReader>>,

    /// Receives per-file events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            backup: true,
            heuristics: TitleHeuristics::default(),
            backup_dir_name: DEFAULT_BACKUP_DIR.to_string(),
            report_file_name: DEFAULT_REPORT_FILE.to_string(),
            write_report: true,
            pdfium_library_path: None,
            document_reader: None,
            text_reader: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RenameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenameConfig")
            .field("backup", &self.backup)
            .field("heuristics", &self.heuristics)
            .field("backup_dir_name", &self.backup_dir_name)
            .field("report_file_name", &self.report_file_name)
            .field("write_report", &self.write_report)
            .field("pdfium_library_path", &self.pdfium_library_path)
            .field(
                "document_reader",
                &self.document_reader.as_ref().map(|_| "<dyn DocumentReader>"),
            )
            .field(
                "text_reader",
                &self.text_reader.as_ref().map(|_| "<dyn TextReader>"),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn RenameProgressCallback>"),
            )
            .finish()
    }
}

impl RenameConfig {
    /// Create a new builder for `RenameConfig`.
    pub fn builder() -> RenameConfigBuilder {
        RenameConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RenameConfig`].
#[derive(Debug)]
pub struct RenameConfigBuilder {
    config: RenameConfig,
}

impl RenameConfigBuilder {
    pub fn backup(mut self, v: bool) -> Self {
        self.config.backup = v;
        self
    }

    pub fn heuristics(mut self, h: TitleHeuristics) -> Self {
        self.config.heuristics = h;
        self
    }

    pub fn metadata_min_chars(mut self, n: usize) -> Self {
        self.config.heuristics.metadata_min_chars = n;
        self
    }

    pub fn min_line_chars(mut self, n: usize) -> Self {
        self.config.heuristics.min_line_chars = n;
        self
    }

    pub fn max_line_chars(mut self, n: usize) -> Self {
        self.config.heuristics.max_line_chars = n;
        self
    }

    pub fn min_font_size(mut self, pt: f32) -> Self {
        self.config.heuristics.min_font_size = pt;
        self
    }

    pub fn max_vertical_position(mut self, pt: f32) -> Self {
        self.config.heuristics.max_vertical_position = pt;
        self
    }

    pub fn text_scan_lines(mut self, n: usize) -> Self {
        self.config.heuristics.text_scan_lines = n;
        self
    }

    pub fn backup_dir_name(mut self, name: impl Into<String>) -> Self {
        self.config.backup_dir_name = name.into();
        self
    }

    pub fn report_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.report_file_name = name.into();
        self
    }

    pub fn write_report(mut self, v: bool) -> Self {
        self.config.write_report = v;
        self
    }

    pub fn pdfium_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library_path = Some(path.into());
        self
    }

    pub fn document_reader(mut self, reader: Arc<dyn DocumentReader>) -> Self {
        self.config.document_reader = Some(reader);
        self
    }

    pub fn text_reader(mut self, reader: Arc<dyn TextReader>) -> Self {
        self.config.text_reader = Some(reader);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenameConfig, RenamerError> {
        let c = &self.config;
        validate_entry_name("backup directory", &c.backup_dir_name)?;
        validate_entry_name("report file", &c.report_file_name)?;
        c.heuristics.validate()?;
        Ok(self.config)
    }
}

fn validate_entry_name(what: &str, name: &str) -> Result<(), RenamerError> {
    if name.trim().is_empty() {
        return Err(RenamerError::InvalidConfig(format!(
            "{what} name must not be empty"
        )));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(RenamerError::InvalidConfig(format!(
            "{what} name must be a plain entry name, got '{name}'"
        )));
    }
    Ok(())
}

// ── Heuristic thresholds ─────────────────────────────────────────────────

/// Thresholds for the title tiers. All comparisons are strict.
///
/// The defaults are untuned values that work well enough on typical
/// single-column and two-column conference papers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TitleHeuristics {
    /// Metadata titles must be longer than this after trimming. Default: 5.
    pub metadata_min_chars: usize,
    /// Candidate lines must be longer than this. Default: 10.
    pub min_line_chars: usize,
    /// Candidate lines must be shorter than this. Default: 200.
    pub max_line_chars: usize,
    /// Layout candidates need a span larger than this, in points. Default: 12.
    pub min_font_size: f32,
    /// Layout candidates must start above this offset from the page top,
    /// in points. Default: 200.
    pub max_vertical_position: f32,
    /// How many leading plain-text lines are scanned. Default: 15.
    pub text_scan_lines: usize,
}

impl Default for TitleHeuristics {
    fn default() -> Self {
        Self {
            metadata_min_chars: 5,
            min_line_chars: 10,
            max_line_chars: 200,
            min_font_size: 12.0,
            max_vertical_position: 200.0,
            text_scan_lines: 15,
        }
    }
}

impl TitleHeuristics {
    /// Check that the thresholds describe a non-empty acceptance window.
    pub fn validate(&self) -> Result<(), RenamerError> {
        if self.min_line_chars >= self.max_line_chars {
            return Err(RenamerError::InvalidConfig(format!(
                "min_line_chars ({}) must be below max_line_chars ({})",
                self.min_line_chars, self.max_line_chars
            )));
        }
        if !(self.min_font_size.is_finite() && self.min_font_size > 0.0) {
            return Err(RenamerError::InvalidConfig(format!(
                "min_font_size must be positive, got {}",
                self.min_font_size
            )));
        }
        if !(self.max_vertical_position.is_finite() && self.max_vertical_position > 0.0) {
            return Err(RenamerError::InvalidConfig(format!(
                "max_vertical_position must be positive, got {}",
                self.max_vertical_position
            )));
        }
        if self.text_scan_lines == 0 {
            return Err(RenamerError::InvalidConfig(
                "text_scan_lines must be ≥ 1".into(),
            ));
        }
        Ok(())
    }

    /// Whether a trimmed line length falls inside the accepted window.
    pub fn accepts_length(&self, chars: usize) -> bool {
        chars > self.min_line_chars && chars < self.max_line_chars
    }
}
