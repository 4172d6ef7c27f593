//! Processing report: a plain UTF-8 summary written next to the PDFs.
//!
//! The layout is fixed and line-oriented so it can be diffed between runs:
//!
//! ```text
//! PDF标题提取和重命名处理报告
//! ==================================================
//!
//! 处理时间: 2024-05-01 12:00:00
//! 总文件数: 3
//! 成功处理: 2
//! 失败数量: 1
//!
//! 详细结果:
//! --------------------------------------------------
//!
//! 1. 原文件名: a.pdf
//!    新文件名: A Study of Things.pdf
//!    提取标题: A Study of Things
//!    状态: success
//! ```
//!
//! Failed entries carry only the status line.

use crate::error::RenamerError;
use crate::output::{BatchStats, ProcessingResult};
use std::path::{Path, PathBuf};
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the report body. `timestamp` is printed verbatim.
pub fn render_report(results: &[ProcessingResult], stats: &BatchStats, timestamp: &str) -> String {
    let mut out = format!(
        "PDF标题提取和重命名处理报告\n{rule}\n\n\
         处理时间: {timestamp}\n\
         总文件数: {}\n\
         成功处理: {}\n\
         失败数量: {}\n\n\
         详细结果:\n{sep}\n",
        stats.total,
        stats.succeeded,
        stats.failed,
        rule = "=".repeat(50),
        sep = "-".repeat(50),
    );

    for (i, r) in results.iter().enumerate() {
        out.push_str(&render_entry(i + 1, r));
    }
    out
}

/// One numbered entry; failed files carry only their status line.
fn render_entry(number: usize, r: &ProcessingResult) -> String {
    let mut entry = format!("\n{number}. 原文件名: {}\n", r.original_name);
    if r.status.is_success() {
        entry.push_str(&format!("   新文件名: {}\n", r.new_name));
        entry.push_str(&format!("   提取标题: {}\n", r.title));
    }
    entry.push_str(&format!("   状态: {}\n", r.status));
    entry
}

/// Write the report to `dir/file_name`, stamped with the local time.
pub async fn write_report(
    dir: &Path,
    file_name: &str,
    results: &[ProcessingResult],
    stats: &BatchStats,
) -> Result<PathBuf, RenamerError> {
    let path = dir.join(file_name);
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let body = render_report(results, stats, &timestamp);

    tokio::fs::write(&path, body)
        .await
        .map_err(|source| RenamerError::ReportWriteFailed {
            path: path.clone(),
            source,
        })?;

    info!("Report written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{ProcessingStatus, TitleSource};

    fn sample() -> Vec<ProcessingResult> {
        vec![
            ProcessingResult {
                original_name: "a.pdf".into(),
                new_name: "A Study of Things.pdf".into(),
                title: "A Study of Things".into(),
                title_source: Some(TitleSource::Metadata),
                status: ProcessingStatus::Success,
            },
            ProcessingResult {
                original_name: "Graph Neural Networks.pdf".into(),
                new_name: "Graph Neural Networks.pdf".into(),
                title: "Graph Neural Networks".into(),
                title_source: Some(TitleSource::Layout),
                status: ProcessingStatus::Skipped,
            },
            ProcessingResult {
                original_name: "broken.pdf".into(),
                new_name: String::new(),
                title: String::new(),
                title_source: None,
                status: ProcessingStatus::Error {
                    message: "rename failed".into(),
                },
            },
        ]
    }

    #[test]
    fn report_matches_fixed_layout() {
        let results = sample();
        let stats = BatchStats::from_results(&results, 0);
        let report = render_report(&results, &stats, "2024-05-01 12:00:00");

        let expected = format!(
            "PDF标题提取和重命名处理报告\n{eq}\n\n\
             处理时间: 2024-05-01 12:00:00\n\
             总文件数: 3\n\
             成功处理: 2\n\
             失败数量: 1\n\n\
             详细结果:\n{dash}\n\
             \n1. 原文件名: a.pdf\n\
             \x20  新文件名: A Study of Things.pdf\n\
             \x20  提取标题: A Study of Things\n\
             \x20  状态: success\n\
             \n2. 原文件名: Graph Neural Networks.pdf\n\
             \x20  新文件名: Graph Neural Networks.pdf\n\
             \x20  提取标题: Graph Neural Networks\n\
             \x20  状态: skipped (already correct)\n\
             \n3. 原文件名: broken.pdf\n\
             \x20  状态: error: rename failed\n",
            eq = "=".repeat(50),
            dash = "-".repeat(50),
        );
        assert_eq!(report, expected);
    }

    #[test]
    fn failed_entry_has_only_status_line() {
        let results = sample();
        assert_eq!(
            render_entry(3, &results[2]),
            "\n3. 原文件名: broken.pdf\n   状态: error: rename failed\n"
        );
    }

    #[test]
    fn empty_batch_renders_header_only() {
        let report = render_report(&[], &BatchStats::default(), "t");
        assert!(report.ends_with(&format!("详细结果:\n{}\n", "-".repeat(50))));
        assert!(report.contains("总文件数: 0\n"));
    }

    #[tokio::test]
    async fn write_report_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let results = sample();
        let stats = BatchStats::from_results(&results, 0);

        let path = write_report(dir.path(), "处理报告.txt", &results, &stats)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("处理报告.txt"));
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("PDF标题提取和重命名处理报告\n"));
        assert!(body.contains("总文件数: 3\n"));
    }

    #[tokio::test]
    async fn unwritable_report_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = write_report(&missing, "r.txt", &[], &BatchStats::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RenamerError::ReportWriteFailed { .. }));
    }
}
