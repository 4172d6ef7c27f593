//! Directory scan: validate the target folder and list its PDFs.
//!
//! Only the folder itself is looked at (no recursion). A PDF is a regular
//! file (or a link to one) whose name ends in `.pdf` and does not start with
//! a dot. Names are returned sorted so a run is reproducible.

use crate::error::RenamerError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Check that `dir` exists and is a directory.
pub async fn resolve_directory(dir: &Path) -> Result<PathBuf, RenamerError> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(dir.to_path_buf()),
        Ok(_) => Err(RenamerError::NotADirectory {
            path: dir.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(RenamerError::DirectoryNotFound {
                path: dir.to_path_buf(),
            })
        }
        Err(e) => Err(RenamerError::DirectoryReadFailed {
            path: dir.to_path_buf(),
            source: e,
        }),
    }
}

/// Whether a directory entry name matches `*.pdf`.
pub fn is_pdf_name(name: &str) -> bool {
    name.ends_with(".pdf") && !name.starts_with('.')
}

/// File names of the PDFs directly inside `dir`, sorted.
pub async fn scan_pdfs(dir: &Path) -> Result<Vec<String>, RenamerError> {
    let mut pdfs = Vec::new();
    for name in list_entry_names(dir).await? {
        if !is_pdf_name(&name) {
            continue;
        }
        let is_file = tokio::fs::metadata(dir.join(&name))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file {
            pdfs.push(name);
        }
    }
    pdfs.sort();
    debug!("Found {} PDF files in {}", pdfs.len(), dir.display());
    Ok(pdfs)
}

/// Every entry name in `dir`, of any type. Seeds the collision claims.
pub(crate) async fn list_entry_names(dir: &Path) -> Result<HashSet<String>, RenamerError> {
    let read_failed = |source| RenamerError::DirectoryReadFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = HashSet::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_failed)?;
    while let Some(entry) = entries.next_entry().await.map_err(read_failed)? {
        match entry.file_name().into_string() {
            Ok(name) => {
                names.insert(name);
            }
            Err(raw) => warn!("Ignoring entry with a non-UTF-8 name: {:?}", raw),
        }
    }
    Ok(names)
}
