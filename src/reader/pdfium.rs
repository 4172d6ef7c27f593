//! Layout and metadata reader backed by pdfium.
//!
//! pdfium reports text as page objects, each carrying its own font size and
//! bounding box in PDF user space (origin bottom-left). Those objects become
//! [`TextSpan`]s in top-left coordinates; spans sharing a baseline become a
//! [`TextLine`], and lines separated by more than roughly one line of
//! whitespace start a new [`TextBlock`].

use super::{DocumentReader, PageLayout, SpanBox, TextBlock, TextLine, TextSpan};
use crate::error::RenamerError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Spans whose baselines differ by less than this fraction of the smaller
/// font size sit on the same line.
const LINE_TOLERANCE_FACTOR: f32 = 0.4;

/// A vertical gap larger than this fraction of the previous line's font
/// size starts a new block.
const BLOCK_GAP_FACTOR: f32 = 0.8;

/// [`DocumentReader`] using the pdfium shared library.
///
/// The library is bound on every call, inside the blocking worker that runs
/// the call, so the reader itself holds no pdfium state.
#[derive(Debug, Clone, Default)]
pub struct PdfiumReader {
    library_path: Option<PathBuf>,
}

impl PdfiumReader {
    /// `library_path` may name the library file or the directory holding it.
    /// `None` means `PDFIUM_LIB_PATH`, then the working directory, then the
    /// system loader.
    pub fn new(library_path: Option<PathBuf>) -> Self {
        Self { library_path }
    }

    fn bind(&self) -> Result<Pdfium, RenamerError> {
        let explicit = self
            .library_path
            .clone()
            .or_else(|| std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from));

        if let Some(path) = explicit {
            let path = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&path)
            } else {
                path
            };
            let bindings = Pdfium::bind_to_library(&path).map_err(|e| {
                RenamerError::PdfiumBindingFailed(format!("{}: {e}", path.display()))
            })?;
            return Ok(Pdfium::new(bindings));
        }

        let local = Pdfium::pdfium_platform_library_name_at_path(Path::new("./"));
        let bindings = Pdfium::bind_to_library(&local)
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| RenamerError::PdfiumBindingFailed(e.to_string()))?;
        Ok(Pdfium::new(bindings))
    }
}

fn open<'a>(pdfium: &'a Pdfium, path: &Path) -> Result<PdfDocument<'a>, RenamerError> {
    pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| RenamerError::PdfOpenFailed {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })
}

impl DocumentReader for PdfiumReader {
    fn metadata_title(&self, path: &Path) -> Result<Option<String>, RenamerError> {
        let pdfium = self.bind()?;
        let document = open(&pdfium, path)?;
        let title = document
            .metadata()
            .get(PdfDocumentMetadataTagType::Title)
            .map(|tag| tag.value().to_string());
        Ok(title)
    }

    fn first_page_layout(&self, path: &Path) -> Result<PageLayout, RenamerError> {
        let pdfium = self.bind()?;
        let document = open(&pdfium, path)?;
        let pages = document.pages();
        if pages.len() == 0 {
            return Err(RenamerError::PageMissing {
                path: path.to_path_buf(),
            });
        }

        let page = pages.get(0).map_err(|e| RenamerError::TextExtractionFailed {
            path: path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;
        let width = page.width().value;
        let height = page.height().value;

        let mut spans = Vec::new();
        for object in page.objects().iter() {
            let Some(text_object) = object.as_text_object() else {
                continue;
            };
            let text = text_object.text();
            if text.trim().is_empty() {
                continue;
            }
            let bounds = match object.bounds() {
                Ok(b) => b,
                Err(e) => {
                    debug!("Skipping text object without bounds: {:?}", e);
                    continue;
                }
            };
            spans.push(TextSpan::new(
                text,
                text_object.scaled_font_size().value,
                SpanBox {
                    x0: bounds.left().value,
                    y0: height - bounds.top().value,
                    x1: bounds.right().value,
                    y1: height - bounds.bottom().value,
                },
            ));
        }

        debug!("{}: {} text spans on page 1", path.display(), spans.len());

        Ok(PageLayout {
            width,
            height,
            blocks: group_spans(spans),
        })
    }
}

/// Group loose spans into blocks of lines, top to bottom, left to right.
pub(crate) fn group_spans(mut spans: Vec<TextSpan>) -> Vec<TextBlock> {
    spans.retain(|s| !s.text.trim().is_empty());
    spans.sort_by(|a, b| {
        a.bbox
            .y1
            .total_cmp(&b.bbox.y1)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<Vec<TextSpan>> = Vec::new();
    for span in spans {
        match lines.last_mut() {
            Some(line) if same_baseline(line, &span) => line.push(span),
            _ => lines.push(vec![span]),
        }
    }

    let mut blocks: Vec<TextBlock> = Vec::new();
    // (bottom, font size) of the previous line
    let mut previous: Option<(f32, f32)> = None;

    for mut line in lines {
        line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
        let top = line.iter().map(|s| s.bbox.y0).fold(f32::INFINITY, f32::min);
        let bottom = line.iter().map(|s| s.bbox.y1).fold(f32::NEG_INFINITY, f32::max);
        let size = line.iter().map(|s| s.font_size).fold(0.0, f32::max);

        let starts_block = match previous {
            Some((prev_bottom, prev_size)) => top - prev_bottom > prev_size * BLOCK_GAP_FACTOR,
            None => true,
        };
        if starts_block {
            blocks.push(TextBlock::default());
        }
        if let Some(block) = blocks.last_mut() {
            block.lines.push(TextLine { spans: line });
        }
        previous = Some((bottom, size));
    }

    blocks
}

fn same_baseline(line: &[TextSpan], span: &TextSpan) -> bool {
    let Some(first) = line.first() else {
        return false;
    };
    let tolerance = first.font_size.min(span.font_size).max(1.0) * LINE_TOLERANCE_FACTOR;
    (first.bbox.y1 - span.bbox.y1).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, size: f32, x0: f32, baseline: f32) -> TextSpan {
        TextSpan::new(
            text,
            size,
            SpanBox {
                x0,
                y0: baseline - size,
                x1: x0 + text.len() as f32 * size * 0.5,
                y1: baseline,
            },
        )
    }

    #[test]
    fn spans_on_one_baseline_form_one_line_in_x_order() {
        let blocks = group_spans(vec![
            span("Attention", 17.0, 200.0, 100.0),
            span("Is All You Need", 17.0, 300.0, 100.5),
        ]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 1);
        let texts: Vec<&str> = blocks[0].lines[0]
            .spans
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Attention", "Is All You Need"]);
    }

    #[test]
    fn wide_gap_starts_new_block() {
        let blocks = group_spans(vec![
            span("Body text continues here", 10.0, 72.0, 400.0),
            span("A Title", 18.0, 72.0, 90.0),
            span("Author One", 11.0, 72.0, 140.0),
            span("Body text starts here", 10.0, 72.0, 388.0),
        ]);
        assert_eq!(blocks.len(), 3, "title, author, body: {blocks:#?}");
        assert_eq!(blocks[0].lines[0].spans[0].text, "A Title");
        assert_eq!(blocks[2].lines.len(), 2);
    }

    #[test]
    fn whitespace_only_spans_are_dropped() {
        let blocks = group_spans(vec![span("   ", 12.0, 0.0, 50.0)]);
        assert!(blocks.is_empty());
    }
}
