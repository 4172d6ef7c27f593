//! Progress-callback trait for per-file rename events.
//!
//! Inject an [`Arc<dyn RenameProgressCallback>`] via
//! [`crate::config::RenameConfigBuilder::progress_callback`] to receive
//! events as the batch processes each file. The library itself never prints;
//! the CLI turns these events into a progress bar, tests can count them.
//!
//! # Example
//!
//! ```rust
//! use paper_renamer::{RenameConfig, RenameProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     renamed: AtomicUsize,
//! }
//!
//! impl RenameProgressCallback for CountingCallback {
//!     fn on_file_renamed(&self, _index: usize, _total: usize, from: &str, to: &str) {
//!         self.renamed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{from} → {to}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { renamed: AtomicUsize::new(0) });
//!
//! let config = RenameConfig::builder()
//!     .progress_callback(counter as Arc<dyn RenameProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::TitleSource;
use std::path::Path;
use std::sync::Arc;

/// Called by the batch orchestrator as it processes each file.
///
/// Files are handled one at a time, so calls never overlap, but the trait is
/// `Send + Sync` because the extraction step runs on a blocking worker thread.
/// All methods default to no-ops. `index` is 1-based.
pub trait RenameProgressCallback: Send + Sync {
    /// Called after the backup directory has been refreshed.
    fn on_backup_complete(&self, backup_dir: &Path, files_copied: usize) {
        let _ = (backup_dir, files_copied);
    }

    /// Called once before the first file, with the number of PDFs found.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before title extraction starts for a file.
    fn on_file_start(&self, index: usize, total: usize, file_name: &str) {
        let _ = (index, total, file_name);
    }

    /// Called once the title tiers have produced a title.
    fn on_title_extracted(&self, index: usize, source: TitleSource, title: &str) {
        let _ = (index, source, title);
    }

    /// Called after a file has been renamed.
    fn on_file_renamed(&self, index: usize, total: usize, from: &str, to: &str) {
        let _ = (index, total, from, to);
    }

    /// Called when a file already carries its title as its name.
    fn on_file_skipped(&self, index: usize, total: usize, file_name: &str) {
        let _ = (index, total, file_name);
    }

    /// Called when a file could not be processed; the batch continues.
    fn on_file_error(&self, index: usize, total: usize, file_name: &str, error: &str) {
        let _ = (index, total, file_name, error);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RenameProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RenameConfig`].
pub type ProgressCallback = Arc<dyn RenameProgressCallback>;
