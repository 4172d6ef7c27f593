//! Title inference: an ordered chain of tiers, first answer wins.
//!
//! ```text
//! metadata ──▶ layout ──▶ plain-text ──▶ fallback
//! (Info dict)  (font size    (first plausible
//!               + position)   raw text line)
//! ```
//!
//! Every tier returns `Result<Option<String>>`. `Ok(None)` means "nothing
//! qualified", `Err` means the collaborator failed (corrupt file, no pages,
//! missing pdfium). Both fall through to the next tier; only the `Err` case is
//! logged as a warning. [`TitleExtractor::extract`] therefore always returns
//! a title.

use crate::config::{RenameConfig, TitleHeuristics};
use crate::error::RenamerError;
use crate::output::TitleSource;
use crate::reader::{resolve_readers, DocumentReader, PageLayout, TextLine, TextReader};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Title recorded when no tier produced anything ("title could not be extracted").
pub const UNEXTRACTABLE_TITLE: &str = "无法提取标题";

/// Plain-text lines starting with one of these (case-insensitively) are
/// section headings or boilerplate, not titles.
pub const REJECTED_PREFIXES: [&str; 7] = [
    "abstract",
    "keywords",
    "introduction",
    "copyright",
    "©",
    "proceedings",
    "conference",
];

/// Lines made only of capitals and whitespace: running headers, venue banners.
static RE_ALL_CAPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z\s]+$").unwrap());

/// The tiers tried by [`TitleExtractor::extract`], in order.
const TIERS: [TitleSource; 3] = [
    TitleSource::Metadata,
    TitleSource::Layout,
    TitleSource::PlainText,
];

/// A title and the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTitle {
    pub title: String,
    pub source: TitleSource,
}

/// One line of page 1 considered by the layout tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleCandidate {
    pub text: String,
    /// Largest span font size on the line, in points.
    pub font_size: f32,
    /// Distance of the line from the page top, in points.
    pub vertical_position: f32,
}

impl TitleCandidate {
    /// Build a candidate from a layout line; `None` for a line with no text.
    pub fn from_line(line: &TextLine) -> Option<Self> {
        let last = line.spans.last()?;
        let text = line
            .spans
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            return None;
        }
        let font_size = line.spans.iter().map(|s| s.font_size).fold(0.0, f32::max);
        Some(Self {
            text,
            font_size,
            vertical_position: last.bbox.y0,
        })
    }

    /// Larger font first, then nearer the top.
    pub fn rank(&self, other: &Self) -> Ordering {
        other
            .font_size
            .total_cmp(&self.font_size)
            .then(self.vertical_position.total_cmp(&other.vertical_position))
    }

    fn qualifies(&self, h: &TitleHeuristics) -> bool {
        h.accepts_length(self.text.chars().count())
            && self.font_size > h.min_font_size
            && self.vertical_position < h.max_vertical_position
    }
}

// ── Tier rules ───────────────────────────────────────────────────────────

/// Metadata tier: the trimmed metadata title, if long enough.
pub fn accept_metadata_title(raw: &str, h: &TitleHeuristics) -> Option<String> {
    let title = raw.trim();
    (title.chars().count() > h.metadata_min_chars).then(|| title.to_string())
}

/// Layout tier: every qualifying line of the page.
pub fn layout_candidates(layout: &PageLayout, h: &TitleHeuristics) -> Vec<TitleCandidate> {
    layout
        .lines()
        .filter_map(TitleCandidate::from_line)
        .filter(|c| c.qualifies(h))
        .collect()
}

/// Layout tier: the best qualifying line. Ties keep reading order.
pub fn best_layout_candidate(layout: &PageLayout, h: &TitleHeuristics) -> Option<TitleCandidate> {
    layout_candidates(layout, h)
        .into_iter()
        .min_by(|a, b| a.rank(b))
}

/// Plain-text tier: the first plausible line among the leading lines.
pub fn first_plausible_line(text: &str, h: &TitleHeuristics) -> Option<String> {
    text.split('\n')
        .take(h.text_scan_lines)
        .map(str::trim)
        .find(|line| {
            h.accepts_length(line.chars().count())
                && !RE_ALL_CAPS.is_match(line)
                && !has_rejected_prefix(line)
        })
        .map(str::to_string)
}

fn has_rejected_prefix(line: &str) -> bool {
    let lower = line.to_lowercase();
    REJECTED_PREFIXES.iter().any(|p| lower.starts_with(p))
}

// ── Extractor ────────────────────────────────────────────────────────────

/// Runs the tier chain against one PDF at a time. Cheap to clone.
#[derive(Clone)]
pub struct TitleExtractor {
    document: Arc<dyn DocumentReader>,
    text: Arc<dyn TextReader>,
    heuristics: TitleHeuristics,
}

impl TitleExtractor {
    pub fn new(
        document: Arc<dyn DocumentReader>,
        text: Arc<dyn TextReader>,
        heuristics: TitleHeuristics,
    ) -> Self {
        Self {
            document,
            text,
            heuristics,
        }
    }

    /// Use the readers and thresholds of `config`.
    pub fn from_config(config: &RenameConfig) -> Self {
        let (document, text) = resolve_readers(config);
        Self::new(document, text, config.heuristics)
    }

    /// Best-effort title of `path`. Blocking.
    pub fn extract(&self, path: &Path) -> ExtractedTitle {
        for source in TIERS {
            match self.run_tier(source, path) {
                Ok(Some(title)) => {
                    debug!(
                        "{}: {} tier → {:?}",
                        path.display(),
                        source,
                        title.chars().take(50).collect::<String>()
                    );
                    return ExtractedTitle { title, source };
                }
                Ok(None) => debug!("{}: {} tier found nothing", path.display(), source),
                Err(e) => warn!("{}: {} tier failed: {}", path.display(), source, e),
            }
        }

        debug!("{}: no tier produced a title", path.display());
        ExtractedTitle {
            title: UNEXTRACTABLE_TITLE.to_string(),
            source: TitleSource::Fallback,
        }
    }

    fn run_tier(&self, source: TitleSource, path: &Path) -> Result<Option<String>, RenamerError> {
        let h = &self.heuristics;
        match source {
            TitleSource::Metadata => Ok(self
                .document
                .metadata_title(path)?
                .and_then(|raw| accept_metadata_title(&raw, h))),
            TitleSource::Layout => {
                let layout = self.document.first_page_layout(path)?;
                Ok(best_layout_candidate(&layout, h).map(|c| c.text))
            }
            TitleSource::PlainText => {
                let text = self.text.first_page_text(path)?;
                Ok(first_plausible_line(&text, h))
            }
            TitleSource::Fallback => Ok(None),
        }
    }
}
