//! CLI binary for paper-renamer.
//!
//! A thin shim over the library crate that maps CLI flags and the
//! interactive prompts to `RenameConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use paper_renamer::{
    extract_title, rename_pdfs, ProcessingStatus, ProgressCallback, RenameConfig,
    RenameOutcome, RenameProgressCallback, TitleSource,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the batch plus a log line per file.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Scanning directory…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Stop the spinner and erase it. Safe to call more than once.
    fn clear(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl RenameProgressCallback for CliProgressCallback {
    fn on_backup_complete(&self, backup_dir: &Path, files_copied: usize) {
        self.bar.println(format!(
            "{} Backed up {} PDF files to {}",
            green("✓"),
            bold(&files_copied.to_string()),
            dim(&backup_dir.display().to_string())
        ));
    }

    fn on_batch_start(&self, total_files: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_files as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Renaming");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_files} PDF files"))
        ));
    }

    fn on_file_start(&self, _index: usize, _total: usize, file_name: &str) {
        self.bar.set_message(file_name.to_string());
    }

    fn on_title_extracted(&self, _index: usize, source: TitleSource, title: &str) {
        if source == TitleSource::Fallback {
            self.bar
                .println(format!("    {}", dim("no title found, using placeholder")));
        } else {
            self.bar.println(format!(
                "    {} {}",
                dim(&format!("[{source}]")),
                dim(&truncate(title, 80))
            ));
        }
    }

    fn on_file_renamed(&self, index: usize, total: usize, from: &str, to: &str) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3} {} → {}",
            green("✓"),
            index,
            total,
            from,
            bold(to)
        ));
        self.bar.inc(1);
    }

    fn on_file_skipped(&self, index: usize, total: usize, file_name: &str) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3} {} {}",
            cyan("="),
            index,
            total,
            file_name,
            dim("(already named after its title)")
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, index: usize, total: usize, file_name: &str, error: &str) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3} {}  {}",
            red("✗"),
            index,
            total,
            file_name,
            red(&truncate(error, 80))
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} files processed successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files processed  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max - 1).collect();
        format!("{head}\u{2026}")
    } else {
        s.to_string()
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Rename every PDF in the current directory (backup/ is created first)
  paper-rename

  # Rename in a given folder, without a backup
  paper-rename ~/Downloads/papers --no-backup

  # Ask for the folder and backup choice, then confirm
  paper-rename -i

  # Show the title a single file would get, without renaming anything
  paper-rename --inspect 2403.01234v2.pdf

  # Stricter layout tier
  paper-rename --min-font-size 14 --max-vertical-position 150 papers/

  # Machine-readable outcome
  paper-rename --json papers/ > outcome.json

TITLE TIERS (first hit wins):
  metadata     document Title field, trimmed, longer than 5 chars
  layout       largest font, then topmost, among page-1 lines of
               11-199 chars with font > 12pt in the top 200pt
  plain-text   first of the first 15 text lines with 11-199 chars that is
               not all capitals and not an Abstract/Keywords/... heading
  fallback     file renamed to 未命名论文.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  PAPER_RENAME_*          Defaults for most flags (see --help for names)
  RUST_LOG                Overrides the log filter
"#;

/// Batch-rename PDF papers after their titles.
#[derive(Parser, Debug)]
#[command(
    name = "paper-rename",
    version,
    about = "Batch-rename PDF papers after their titles",
    long_about = "Rename every PDF in a directory to the title found inside it. The title is \
taken from the document metadata, else the largest line near the top of page 1, else the first \
plausible line of page 1's text. Copies of the originals go to backup/ first and a report \
(处理报告.txt) is written afterwards.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the PDFs. Default: current directory.
    #[arg(env = "PAPER_RENAME_DIR")]
    dir: Option<PathBuf>,

    /// Skip copying the PDFs into backup/ before renaming.
    #[arg(long, env = "PAPER_RENAME_NO_BACKUP")]
    no_backup: bool,

    /// Prompt for directory and backup choice, then ask for confirmation.
    #[arg(short, long)]
    interactive: bool,

    /// Do not ask for confirmation in interactive mode.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print the inferred title of one PDF and exit.
    #[arg(long, value_name = "FILE", conflicts_with = "interactive")]
    inspect: Option<PathBuf>,

    /// Metadata titles must be longer than this many characters.
    #[arg(long, env = "PAPER_RENAME_METADATA_MIN_CHARS", default_value_t = 5)]
    metadata_min_chars: usize,

    /// Candidate lines must be longer than this many characters.
    #[arg(long, env = "PAPER_RENAME_MIN_LINE_CHARS", default_value_t = 10)]
    min_line_chars: usize,

    /// Candidate lines must be shorter than this many characters.
    #[arg(long, env = "PAPER_RENAME_MAX_LINE_CHARS", default_value_t = 200)]
    max_line_chars: usize,

    /// Layout candidates need a font larger than this (points).
    #[arg(long, env = "PAPER_RENAME_MIN_FONT_SIZE", default_value_t = 12.0)]
    min_font_size: f32,

    /// Layout candidates must start above this distance from the page top (points).
    #[arg(long, env = "PAPER_RENAME_MAX_VERTICAL_POSITION", default_value_t = 200.0)]
    max_vertical_position: f32,

    /// Number of leading text lines searched by the plain-text tier.
    #[arg(long, env = "PAPER_RENAME_TEXT_SCAN_LINES", default_value_t = 15)]
    text_scan_lines: usize,

    /// Path to the pdfium shared library, or a directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Do not write 处理报告.txt.
    #[arg(long, env = "PAPER_RENAME_NO_REPORT")]
    no_report: bool,

    /// Output the outcome as JSON on stdout.
    #[arg(long, env = "PAPER_RENAME_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PAPER_RENAME_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAPER_RENAME_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PAPER_RENAME_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect mode ─────────────────────────────────────────────────────
    if let Some(ref path) = cli.inspect {
        let config = build_config(&cli, None)?;
        let extracted = extract_title(path, &config)
            .await
            .with_context(|| format!("Failed to inspect {}", path.display()))?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&extracted).context("Failed to serialise title")?
            );
        } else {
            println!("File:    {}", path.display());
            println!("Title:   {}", extracted.title);
            println!("Source:  {}", extracted.source);
            println!(
                "Name:    {}.pdf",
                if extracted.source == TitleSource::Fallback {
                    paper_renamer::pipeline::sanitize::DEFAULT_STEM.to_string()
                } else {
                    paper_renamer::sanitize_filename(&extracted.title)
                }
            );
        }
        return Ok(());
    }

    // ── Interactive prompts ──────────────────────────────────────────────
    if cli.interactive {
        let stdin = io::stdin();
        let mut input = stdin.lock();

        let dir = prompt(&mut input, "PDF directory (empty for current directory): ")?;
        let dir = dir.trim().trim_matches('"');
        if dir.is_empty() {
            eprintln!("Using the current directory");
            cli.dir = None;
        } else {
            let dir = PathBuf::from(dir);
            if !dir.exists() {
                anyhow::bail!("Directory not found: {}", dir.display());
            }
            cli.dir = Some(dir);
        }

        let backup = prompt(&mut input, "Back up the PDFs first? (y/n, default y): ")?;
        cli.no_backup = backup.trim().eq_ignore_ascii_case("n");

        eprintln!();
        if cli.no_backup {
            eprintln!("No backup will be made");
        } else {
            eprintln!("A backup/ subdirectory will receive a copy of every PDF");
        }
        eprintln!("The PDFs will then be renamed in place");

        if !cli.yes {
            let confirm = prompt(&mut input, "\nContinue? (y/n): ")?;
            if !confirm.trim().eq_ignore_ascii_case("y") {
                eprintln!("Cancelled");
                return Ok(());
            }
        }
    }

    // ── Build config ─────────────────────────────────────────────────────
    let cli_progress = show_progress.then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = cli_progress
        .clone()
        .map(|cb| cb as Arc<dyn RenameProgressCallback>);
    let config = build_config(&cli, progress_cb)?;

    let dir = match cli.dir {
        Some(ref d) => d.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    // ── Run ──────────────────────────────────────────────────────────────
    // The bar is only finished by `on_batch_complete`; fatal errors and
    // empty directories never reach it.
    let result = rename_pdfs(&dir, &config).await;
    if let Some(ref cb) = cli_progress {
        cb.clear();
    }
    let outcome = result.context("Rename failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome).context("Failed to serialise outcome")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&outcome, show_progress);
    }

    Ok(())
}

/// Print `question` to stderr and read one line of the answer.
fn prompt(input: &mut impl BufRead, question: &str) -> Result<String> {
    eprint!("{question}");
    io::stderr().flush().ok();
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line)
}

fn print_summary(outcome: &RenameOutcome, show_progress: bool) {
    if outcome.stats.total == 0 {
        eprintln!("No PDF files found in {}", outcome.directory.display());
        return;
    }

    // Without the bar, per-file lines have not been printed yet.
    if !show_progress {
        for r in &outcome.results {
            match r.status {
                ProcessingStatus::Success => {
                    eprintln!("  {} {} → {}", green("✓"), r.original_name, r.new_name)
                }
                ProcessingStatus::Skipped => eprintln!(
                    "  {} {} {}",
                    cyan("="),
                    r.original_name,
                    dim("(already correct)")
                ),
                ProcessingStatus::Error { ref message } => {
                    eprintln!("  {} {}  {}", red("✗"), r.original_name, red(message))
                }
            }
        }
    }

    let stats = &outcome.stats;
    eprintln!(
        "{}  {}/{} files  ({} renamed, {} skipped)  {}ms",
        if stats.failed == 0 {
            green("✔")
        } else {
            cyan("⚠")
        },
        stats.succeeded,
        stats.total,
        stats.renamed,
        stats.skipped,
        stats.duration_ms,
    );
    if let Some(ref path) = outcome.report_path {
        eprintln!("   report: {}", bold(&path.display().to_string()));
    }
}

/// Map CLI args to `RenameConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<RenameConfig> {
    let mut builder = RenameConfig::builder()
        .backup(!cli.no_backup)
        .write_report(!cli.no_report)
        .metadata_min_chars(cli.metadata_min_chars)
        .min_line_chars(cli.min_line_chars)
        .max_line_chars(cli.max_line_chars)
        .min_font_size(cli.min_font_size)
        .max_vertical_position(cli.max_vertical_position)
        .text_scan_lines(cli.text_scan_lines);

    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_library_path(path.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
