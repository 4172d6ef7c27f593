//! Plain-text reader backed by lopdf.
//!
//! A second, independent parser gives the last title tier a chance on files
//! that pdfium cannot open or that carry no positioned text objects.

use super::TextReader;
use crate::error::RenamerError;
use lopdf::Document;
use std::path::Path;

/// [`TextReader`] that decodes page content streams with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfTextReader;

impl TextReader for LopdfTextReader {
    fn first_page_text(&self, path: &Path) -> Result<String, RenamerError> {
        let document = Document::load(path).map_err(|e| RenamerError::PdfOpenFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        let first = document
            .get_pages()
            .keys()
            .next()
            .copied()
            .ok_or_else(|| RenamerError::PageMissing {
                path: path.to_path_buf(),
            })?;

        document
            .extract_text(&[first])
            .map_err(|e| RenamerError::TextExtractionFailed {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// One page, two text objects, standard Type1 font.
    fn write_sample_pdf(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 760.into()]),
                Operation::new("Tj", vec![Object::string_literal("Deep Learning for X")]),
                Operation::new("ET", vec![]),
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal("ABSTRACT")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn reads_first_page_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.pdf");
        write_sample_pdf(&path);

        let text = LopdfTextReader.first_page_text(&path).unwrap();
        assert!(text.contains("Deep Learning for X"), "got: {text:?}");
        assert!(text.contains("ABSTRACT"), "got: {text:?}");
    }

    #[test]
    fn non_pdf_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = LopdfTextReader.first_page_text(&path).unwrap_err();
        assert!(matches!(err, RenamerError::PdfOpenFailed { .. }), "got: {err:?}");
    }
}
