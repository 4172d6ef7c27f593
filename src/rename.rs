//! Batch entry points: rename every PDF in a directory after its title.
//!
//! One run goes through four stages:
//!
//! ```text
//! scan ─▶ backup (optional, fatal on failure) ─▶ per-file loop ─▶ report
//! ```
//!
//! Files are handled strictly one at a time, in sorted-name order. Each file
//! moves through `extracting → sanitising → collision-resolving` and ends as
//! renamed, skipped or failed. A failing file never stops the batch.

use crate::config::RenameConfig;
use crate::error::{FileError, RenamerError};
use crate::output::{BatchStats, ProcessingResult, ProcessingStatus, RenameOutcome, TitleSource};
use crate::pipeline::names::{NameClaims, NameResolution};
use crate::pipeline::sanitize::{sanitize_filename, DEFAULT_STEM};
use crate::pipeline::title::{ExtractedTitle, TitleExtractor};
use crate::pipeline::{backup, report, scan};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Rename every PDF directly inside `dir` after its inferred title.
///
/// # Returns
/// `Ok(RenameOutcome)` once every file has been attempted, even if some
/// failed (check `outcome.stats.failed`).
///
/// # Errors
/// Returns `Err(RenamerError)` only for fatal errors:
/// - `dir` is missing, not a directory, or cannot be listed
/// - the backup could not be made (nothing has been renamed then)
/// - the report could not be written (all renames have happened then)
pub async fn rename_pdfs(
    dir: impl AsRef<Path>,
    config: &RenameConfig,
) -> Result<RenameOutcome, RenamerError> {
    let start = Instant::now();
    let dir = scan::resolve_directory(dir.as_ref()).await?;
    info!("Renaming PDFs in {}", dir.display());

    // ── Step 1: Scan ─────────────────────────────────────────────────────
    let pdfs = scan::scan_pdfs(&dir).await?;

    // ── Step 2: Backup ───────────────────────────────────────────────────
    let backup = if config.backup {
        let summary = backup::backup_pdfs(&dir, &pdfs, &config.backup_dir_name).await?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_backup_complete(&summary.path, summary.files_copied);
        }
        Some(summary)
    } else {
        debug!("Backup disabled");
        None
    };

    if pdfs.is_empty() {
        info!("No PDF files found in {}", dir.display());
        return Ok(RenameOutcome {
            directory: dir,
            results: Vec::new(),
            stats: BatchStats::from_results(&[], start.elapsed().as_millis() as u64),
            backup,
            report_path: None,
        });
    }
    info!("Found {} PDF files", pdfs.len());

    // ── Step 3: Per-file loop ────────────────────────────────────────────
    let extractor = TitleExtractor::from_config(config);
    let mut claims = NameClaims::new(scan::list_entry_names(&dir).await?);
    let total = pdfs.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut results = Vec::with_capacity(total);
    for (i, name) in pdfs.into_iter().enumerate() {
        let index = i + 1;
        let result = process_file(&dir, name, index, total, &extractor, &mut claims, config).await;
        results.push(result);
    }

    // ── Step 4: Stats and report ─────────────────────────────────────────
    let stats = BatchStats::from_results(&results, start.elapsed().as_millis() as u64);
    info!(
        "Rename complete: {}/{} succeeded ({} renamed, {} skipped), {}ms",
        stats.succeeded, stats.total, stats.renamed, stats.skipped, stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(stats.total, stats.succeeded);
    }

    let report_path = if config.write_report {
        Some(report::write_report(&dir, &config.report_file_name, &results, &stats).await?)
    } else {
        None
    };

    Ok(RenameOutcome {
        directory: dir,
        results,
        stats,
        backup,
        report_path,
    })
}

/// Blocking wrapper around [`rename_pdfs`].
///
/// Creates its own tokio runtime; do not call from inside one.
pub fn rename_pdfs_sync(
    dir: impl AsRef<Path>,
    config: &RenameConfig,
) -> Result<RenameOutcome, RenamerError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| RenamerError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(rename_pdfs(dir, config))
}

/// Rename in `dir`, or in the current directory when `None`, with default
/// settings apart from the backup switch.
pub async fn rename_pdfs_in_place(
    dir: Option<&Path>,
    backup: bool,
) -> Result<RenameOutcome, RenamerError> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => current_dir()?,
    };
    let config = RenameConfig {
        backup,
        ..RenameConfig::default()
    };
    rename_pdfs(dir, &config).await
}

/// Infer the title of a single PDF without touching it.
pub async fn extract_title(
    path: impl AsRef<Path>,
    config: &RenameConfig,
) -> Result<ExtractedTitle, RenamerError> {
    let path = path.as_ref().to_path_buf();
    if !tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        return Err(RenamerError::PdfOpenFailed {
            path,
            detail: "not a readable file".into(),
        });
    }

    let extractor = TitleExtractor::from_config(config);
    tokio::task::spawn_blocking(move || extractor.extract(&path))
        .await
        .map_err(|e| RenamerError::Internal(format!("Extraction task panicked: {}", e)))
}

fn current_dir() -> Result<PathBuf, RenamerError> {
    std::env::current_dir().map_err(|source| RenamerError::DirectoryReadFailed {
        path: PathBuf::from("."),
        source,
    })
}

// ── Per-file processing ──────────────────────────────────────────────────

async fn process_file(
    dir: &Path,
    name: String,
    index: usize,
    total: usize,
    extractor: &TitleExtractor,
    claims: &mut NameClaims,
    config: &RenameConfig,
) -> ProcessingResult {
    let cb = config.progress_callback.as_ref();
    if let Some(cb) = cb {
        cb.on_file_start(index, total, &name);
    }
    debug!("[{}/{}] {}", index, total, name);

    let outcome = match extract(dir, &name, extractor).await {
        Ok(extracted) => {
            if let Some(cb) = cb {
                cb.on_title_extracted(index, extracted.source, &extracted.title);
            }
            apply_title(dir, &name, extracted, claims).await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => {
            if let Some(cb) = cb {
                match result.status {
                    ProcessingStatus::Skipped => cb.on_file_skipped(index, total, &name),
                    _ => cb.on_file_renamed(index, total, &name, &result.new_name),
                }
            }
            result
        }
        Err(e) => {
            warn!("{}: {}", name, e);
            if let Some(cb) = cb {
                cb.on_file_error(index, total, &name, &e.to_string());
            }
            ProcessingResult::failed(name, &e)
        }
    }
}

async fn extract(
    dir: &Path,
    name: &str,
    extractor: &TitleExtractor,
) -> Result<ExtractedTitle, FileError> {
    let path = dir.join(name);
    let extractor = extractor.clone();
    tokio::task::spawn_blocking(move || extractor.extract(&path))
        .await
        .map_err(|e| FileError::ExtractionFailed {
            detail: join_error_detail(e),
        })
}

async fn apply_title(
    dir: &Path,
    name: &str,
    extracted: ExtractedTitle,
    claims: &mut NameClaims,
) -> Result<ProcessingResult, FileError> {
    let stem = match extracted.source {
        TitleSource::Fallback => DEFAULT_STEM.to_string(),
        _ => sanitize_filename(&extracted.title),
    };

    let (new_name, status) = match claims.resolve(&stem, name) {
        NameResolution::AlreadyCorrect => {
            debug!("{}: name already matches its title", name);
            (name.to_string(), ProcessingStatus::Skipped)
        }
        NameResolution::Rename(target) => {
            tokio::fs::rename(dir.join(name), dir.join(&target))
                .await
                .map_err(|e| FileError::RenameFailed {
                    target: target.clone(),
                    detail: e.to_string(),
                })?;
            claims.commit(name, &target);
            info!("{} → {}", name, target);
            (target, ProcessingStatus::Success)
        }
    };

    Ok(ProcessingResult {
        original_name: name.to_string(),
        new_name,
        title: extracted.title,
        title_source: Some(extracted.source),
        status,
    })
}

fn join_error_detail(e: tokio::task::JoinError) -> String {
    if !e.is_panic() {
        return e.to_string();
    }
    let payload = e.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "extraction panicked".to_string()
    }
}
