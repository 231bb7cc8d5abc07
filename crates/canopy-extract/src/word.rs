//! Word-document (doc/docx) extractor.
//!
//! One scalar per top-level paragraph in document order. Empty paragraphs
//! are kept: paragraph boundaries are structurally significant and an
//! inserted blank line must show up in a comparison.
//!
//! Output: `{"paragraphs": [text, ...]}`.

use std::path::Path;

use canopy_core::{DocFormat, Error, Result, Tree};

pub fn extract(path: &Path) -> Result<Tree> {
    let data = std::fs::read(path)
        .map_err(|e| Error::extraction(DocFormat::WordDocument, path, e))?;
    let docx = docx_rs::read_docx(&data)
        .map_err(|e| Error::extraction(DocFormat::WordDocument, path, e.to_string()))?;

    let paragraphs: Vec<Tree> = docx
        .document
        .children
        .into_iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(p) => Some(Tree::Scalar(paragraph_text(&p))),
            // Tables and section properties are not paragraphs.
            _ => None,
        })
        .collect();

    Ok(Tree::mapping().with_entry("paragraphs", Tree::Sequence(paragraphs)))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}
