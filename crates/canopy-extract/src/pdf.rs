//! PDF extractor.
//!
//! One mapping entry per page, labeled `"Page n"` (1-based, document
//! order). A single corrupt page fails the whole document; there is no
//! partial output.
//!
//! Output: `{"pages": [{"Page 1": text}, ...]}`.

use std::path::Path;

use canopy_core::{DocFormat, Error, Result, Tree};

pub fn extract(path: &Path) -> Result<Tree> {
    let doc = lopdf::Document::load(path)
        .map_err(|e| Error::extraction(DocFormat::Pdf, path, e.to_string()))?;

    let mut pages = Vec::new();
    for (i, (page_number, _)) in doc.get_pages().into_iter().enumerate() {
        let text = doc.extract_text(&[page_number]).map_err(|e| {
            Error::extraction(
                DocFormat::Pdf,
                path,
                format!("page {}: {e}", i + 1),
            )
        })?;
        pages.push(Tree::mapping().with_entry(format!("Page {}", i + 1), Tree::scalar(text)));
    }

    Ok(Tree::mapping().with_entry("pages", Tree::Sequence(pages)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a one-page PDF with the given text in a Helvetica Tj run.
    fn write_pdf(path: &Path, text: &str) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_single_page_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        write_pdf(&path, "Hello World");

        let tree = extract(&path).unwrap();
        let Some(Tree::Sequence(pages)) = tree.get("pages") else {
            panic!("expected pages sequence")
        };
        assert_eq!(pages.len(), 1);
        let Some(Tree::Scalar(text)) = pages[0].get("Page 1") else {
            panic!("expected page text scalar")
        };
        assert!(text.contains("Hello World"), "got {text:?}");
    }

    #[test]
    fn test_extract_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        write_pdf(&path, "stable");
        let first = extract(&path).unwrap().to_json(false).unwrap();
        let second = extract(&path).unwrap().to_json(false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_corrupt_file_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.5 truncated garbage").unwrap();
        let err = extract(&path).unwrap_err();
        assert!(matches!(err, Error::Extraction { format, .. } if format == DocFormat::Pdf));
    }
}
