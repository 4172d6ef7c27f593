//! # paper-renamer
//!
//! Batch-rename academic PDFs after their titles.
//!
//! Downloaded papers tend to arrive as `2403.01234v2.pdf` or `fulltext(3).pdf`.
//! This crate looks inside each PDF, infers its title and renames the file to
//! `<title>.pdf`, leaving a backup copy and a plain-text report behind.
//!
//! ## Pipeline Overview
//!
//! ```text
//! directory
//!  │
//!  ├─ 1. Scan     top-level *.pdf files, sorted by name
//!  ├─ 2. Backup   fresh backup/ copy of every PDF (optional)
//!  ├─ 3. Title    metadata → layout → plain text → fallback (spawn_blocking)
//!  ├─ 4. Name     sanitise, resolve collisions with " (N)" suffixes
//!  ├─ 5. Rename   in place, one file at a time
//!  └─ 6. Report   处理报告.txt with per-file outcomes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paper_renamer::{rename_pdfs, RenameConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RenameConfig::default();
//!     let outcome = rename_pdfs("papers/", &config).await?;
//!     for r in &outcome.results {
//!         println!("{} → {} ({})", r.original_name, r.new_name, r.status);
//!     }
//!     eprintln!("{}/{} succeeded", outcome.stats.succeeded, outcome.stats.total);
//!     Ok(())
//! }
//! ```
//!
//! ## PDF backends
//!
//! The metadata and layout tiers read through pdfium (`pdfium-render`), which
//! needs a pdfium shared library at runtime: pass one via
//! [`RenameConfigBuilder::pdfium_library_path`], set `PDFIUM_LIB_PATH`, or
//! install it system-wide. The plain-text tier uses pure-Rust `lopdf`. If
//! pdfium cannot be bound, the first two tiers fail for every file and titles
//! come from the plain-text tier alone.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `paper-rename` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod rename;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RenameConfig, RenameConfigBuilder, TitleHeuristics};
pub use error::{FileError, RenamerError};
pub use output::{
    BackupSummary, BatchStats, ProcessingResult, ProcessingStatus, RenameOutcome, TitleSource,
};
pub use pipeline::backup::backup_pdfs;
pub use pipeline::report::write_report;
pub use pipeline::sanitize::sanitize_filename;
pub use pipeline::scan::scan_pdfs;
pub use pipeline::title::{ExtractedTitle, TitleExtractor};
pub use progress::{NoopProgressCallback, ProgressCallback, RenameProgressCallback};
pub use reader::{
    DocumentReader, LopdfTextReader, PageLayout, PdfiumReader, SpanBox, TextBlock, TextLine,
    TextReader, TextSpan,
};
pub use rename::{extract_title, rename_pdfs, rename_pdfs_in_place, rename_pdfs_sync};
