//! PDF collaborators: the two capabilities the title tiers rely on.
//!
//! The crate never parses PDF internals itself. It asks a
//! [`DocumentReader`] for the metadata title and the first page's layout,
//! and a [`TextReader`] for the first page's plain text. The defaults are
//! [`PdfiumReader`] (pdfium-render) and [`LopdfTextReader`] (lopdf); any other
//! implementation can be injected through
//! [`crate::config::RenameConfigBuilder::document_reader`] and
//! [`crate::config::RenameConfigBuilder::text_reader`].
//!
//! Both traits are blocking. The orchestrator calls them from
//! `spawn_blocking`, one file at a time.

pub mod pdfium;
pub mod plain;

pub use pdfium::PdfiumReader;
pub use plain::LopdfTextReader;

use crate::config::RenameConfig;
use crate::error::RenamerError;
use std::path::Path;
use std::sync::Arc;

/// Structural reader: metadata and positioned text.
pub trait DocumentReader: Send + Sync {
    /// The raw metadata title, if the document has one.
    fn metadata_title(&self, path: &Path) -> Result<Option<String>, RenamerError>;

    /// Blocks, lines and spans of page 1.
    fn first_page_layout(&self, path: &Path) -> Result<PageLayout, RenamerError>;
}

/// Plain-text reader used by the last title tier.
pub trait TextReader: Send + Sync {
    /// Raw text of page 1, lines separated by `\n`.
    fn first_page_text(&self, path: &Path) -> Result<String, RenamerError>;
}

/// Pick the configured readers, falling back to pdfium and lopdf.
pub fn resolve_readers(config: &RenameConfig) -> (Arc<dyn DocumentReader>, Arc<dyn TextReader>) {
    let document = match config.document_reader {
        Some(ref r) => Arc::clone(r),
        None => Arc::new(PdfiumReader::new(config.pdfium_library_path.clone())),
    };
    let text = match config.text_reader {
        Some(ref r) => Arc::clone(r),
        None => Arc::new(LopdfTextReader),
    };
    (document, text)
}

// ── Layout model ─────────────────────────────────────────────────────────

/// Span bounding box in page points, origin at the top-left corner,
/// y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpanBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// A run of text sharing one font and size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub font_size: f32,
    pub bbox: SpanBox,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, font_size: f32, bbox: SpanBox) -> Self {
        Self {
            text: text.into(),
            font_size,
            bbox,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

/// Text structure of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub blocks: Vec<TextBlock>,
}

impl PageLayout {
    /// All lines, block by block.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }
}
