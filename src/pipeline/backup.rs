//! Backup stage: copy every PDF into a fresh backup subdirectory.
//!
//! A stale backup directory is removed outright and recreated; the copies
//! always reflect the folder as it is right before this run renames
//! anything. Copies keep permissions plus access and modification times.
//! Any failure here aborts the run before the first rename.

use crate::error::RenamerError;
use crate::output::BackupSummary;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Refresh `dir/backup_dir_name` with copies of `pdfs` (names inside `dir`).
///
/// Runs inside `spawn_blocking`: the copy loop is plain blocking file I/O.
pub async fn backup_pdfs(
    dir: &Path,
    pdfs: &[String],
    backup_dir_name: &str,
) -> Result<BackupSummary, RenamerError> {
    let dir = dir.to_path_buf();
    let backup_dir = dir.join(backup_dir_name);

    // Replacing the backup entry would delete the PDF that carries its name.
    if pdfs.iter().any(|name| name == backup_dir_name) {
        return Err(RenamerError::BackupFailed {
            path: backup_dir,
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "backup directory name is taken by one of the PDFs",
            ),
        });
    }
    let names = pdfs.to_vec();

    let target = backup_dir.clone();
    let copied = tokio::task::spawn_blocking(move || backup_blocking(&dir, &target, &names))
        .await
        .map_err(|e| RenamerError::Internal(format!("Backup task panicked: {}", e)))?
        .map_err(|source| RenamerError::BackupFailed {
            path: backup_dir.clone(),
            source,
        })?;

    info!("Backed up {} PDF files to {}", copied, backup_dir.display());
    Ok(BackupSummary {
        path: backup_dir,
        files_copied: copied,
    })
}

fn backup_blocking(dir: &Path, backup_dir: &Path, names: &[String]) -> io::Result<usize> {
    match fs::symlink_metadata(backup_dir) {
        Ok(meta) if meta.is_dir() => {
            warn!(
                "Backup directory {} already exists, replacing it",
                backup_dir.display()
            );
            fs::remove_dir_all(backup_dir)?;
        }
        Ok(_) => {
            warn!("Replacing non-directory {} with a backup directory", backup_dir.display());
            fs::remove_file(backup_dir)?;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(backup_dir)?;

    for name in names {
        copy_preserving_times(&dir.join(name), &backup_dir.join(name))?;
    }
    Ok(names.len())
}

fn copy_preserving_times(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;

    let meta = fs::metadata(from)?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    File::options().write(true).open(to)?.set_times(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[tokio::test]
    async fn replaces_stale_backup_and_copies_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("a.pdf"), b"%PDF-a").unwrap();
        std::fs::write(root.join("b.pdf"), b"%PDF-b").unwrap();
        let stale = root.join("backup");
        std::fs::create_dir_all(stale.join("nested")).unwrap();
        std::fs::write(stale.join("old.pdf"), b"stale").unwrap();

        let summary = backup_pdfs(root, &["a.pdf".into(), "b.pdf".into()], "backup")
            .await
            .unwrap();

        assert_eq!(summary.files_copied, 2);
        assert_eq!(summary.path, stale);
        assert!(!stale.join("old.pdf").exists());
        assert!(!stale.join("nested").exists());
        assert_eq!(std::fs::read(stale.join("a.pdf")).unwrap(), b"%PDF-a");
        assert_eq!(std::fs::read(stale.join("b.pdf")).unwrap(), b"%PDF-b");
        assert!(root.join("a.pdf").exists(), "originals stay in place");
    }

    #[tokio::test]
    async fn copies_keep_modification_time() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let original = root.join("a.pdf");
        std::fs::write(&original, b"%PDF").unwrap();
        let past = SystemTime::now() - Duration::from_secs(86_400);
        File::options()
            .write(true)
            .open(&original)
            .unwrap()
            .set_modified(past)
            .unwrap();

        backup_pdfs(root, &["a.pdf".into()], "backup").await.unwrap();

        let copied = std::fs::metadata(root.join("backup").join("a.pdf"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(copied, std::fs::metadata(&original).unwrap().modified().unwrap());
    }

    #[tokio::test]
    async fn backup_name_equal_to_a_pdf_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("a.pdf"), b"%PDF-a").unwrap();

        let err = backup_pdfs(root, &["a.pdf".into()], "a.pdf")
            .await
            .unwrap_err();

        assert!(matches!(err, RenamerError::BackupFailed { .. }), "got: {err:?}");
        assert_eq!(std::fs::read(root.join("a.pdf")).unwrap(), b"%PDF-a");
    }

    #[tokio::test]
    async fn missing_source_fails_the_backup() {
        let dir = tempfile::tempdir().unwrap();
        let err = backup_pdfs(dir.path(), &["ghost.pdf".into()], "backup")
            .await
            .unwrap_err();
        assert!(matches!(err, RenamerError::BackupFailed { .. }), "got: {err:?}");
    }
}
