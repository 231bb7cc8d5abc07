//! Slide-deck (pptx) extractor.
//!
//! A pptx file is a zip archive with one XML part per slide under
//! `ppt/slides/slideN.xml`. Each `<p:sp>` shape contributes one text
//! fragment: its `<a:t>` runs concatenated, with `<a:p>` paragraphs joined
//! by newlines. Shapes with no text are skipped rather than emitted as
//! empty fragments.
//!
//! Output: `{"slides": [{"Slide 1": [fragment, ...]}, ...]}` in
//! presentation order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use canopy_core::{DocFormat, Error, Result, Tree};

pub fn extract(path: &Path) -> Result<Tree> {
    let wrap = |e: Box<dyn std::error::Error + Send + Sync>| {
        Error::extraction(DocFormat::SlideDeck, path, e)
    };

    let file = File::open(path).map_err(|e| wrap(e.into()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| wrap(e.into()))?;

    // Slide parts are not stored in archive order; sort by slide number.
    let mut slide_names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .map(|s| s.to_string())
        .collect();
    slide_names.sort_by_key(|name| slide_number(name));

    let mut slides = Vec::with_capacity(slide_names.len());
    for (i, name) in slide_names.iter().enumerate() {
        let mut xml = String::new();
        archive
            .by_name(name)
            .map_err(|e| wrap(e.into()))?
            .read_to_string(&mut xml)
            .map_err(|e| wrap(e.into()))?;
        let fragments = shape_texts(&xml).map_err(|e| wrap(e.into()))?;
        slides.push(
            Tree::mapping().with_entry(format!("Slide {}", i + 1), Tree::Sequence(fragments)),
        );
    }

    Ok(Tree::mapping().with_entry("slides", Tree::Sequence(slides)))
}

fn slide_number(name: &str) -> u32 {
    name.trim_start_matches("ppt/slides/slide")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(0)
}

/// Collect one scalar per text-carrying shape, in shape order.
fn shape_texts(xml: &str) -> std::result::Result<Vec<Tree>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);

    let mut fragments = Vec::new();
    let mut in_shape = false;
    let mut in_run = false;
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sp" => {
                    in_shape = true;
                    paragraphs.clear();
                    current.clear();
                }
                b"p" if in_shape => current.clear(),
                b"t" if in_shape => in_run = true,
                _ => {}
            },
            Event::Text(t) => {
                if in_run {
                    current.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run = false,
                b"p" if in_shape => paragraphs.push(std::mem::take(&mut current)),
                b"sp" => {
                    let text = paragraphs.join("\n");
                    if !text.is_empty() {
                        fragments.push(Tree::scalar(text));
                    }
                    in_shape = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const SLIDE_TWO_SHAPES: &str = r#"<?xml version="1.0"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp><p:txBody>
      <a:p><a:r><a:t>Title </a:t></a:r><a:r><a:t>text</a:t></a:r></a:p>
    </p:txBody></p:sp>
    <p:sp><p:txBody></p:txBody></p:sp>
    <p:sp><p:txBody>
      <a:p><a:r><a:t>Line one</a:t></a:r></a:p>
      <a:p><a:r><a:t>Line two</a:t></a:r></a:p>
    </p:txBody></p:sp>
  </p:spTree></p:cSld>
</p:sld>"#;

    const SLIDE_SINGLE: &str = r#"<?xml version="1.0"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp><p:txBody><a:p><a:r><a:t>Second slide</a:t></a:r></a:p></p:txBody></p:sp>
  </p:spTree></p:cSld>
</p:sld>"#;

    fn write_deck(path: &Path, slides: &[&str]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (i, xml) in slides.iter().enumerate() {
            writer
                .start_file(
                    format!("ppt/slides/slide{}.xml", i + 1),
                    SimpleFileOptions::default(),
                )
                .unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_shape_texts_runs_and_paragraphs() {
        let fragments = shape_texts(SLIDE_TWO_SHAPES).unwrap();
        assert_eq!(
            fragments,
            vec![
                Tree::scalar("Title text"),
                Tree::scalar("Line one\nLine two"),
            ]
        );
    }

    #[test]
    fn test_empty_shapes_are_skipped() {
        let fragments = shape_texts(SLIDE_SINGLE).unwrap();
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn test_extract_deck_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        write_deck(&path, &[SLIDE_TWO_SHAPES, SLIDE_SINGLE]);

        let tree = extract(&path).unwrap();
        let Some(Tree::Sequence(slides)) = tree.get("slides") else {
            panic!("expected slides sequence")
        };
        assert_eq!(slides.len(), 2);
        assert_eq!(
            slides[0].get("Slide 1"),
            Some(&Tree::Sequence(vec![
                Tree::scalar("Title text"),
                Tree::scalar("Line one\nLine two"),
            ]))
        );
        assert_eq!(
            slides[1].get("Slide 2"),
            Some(&Tree::Sequence(vec![Tree::scalar("Second slide")]))
        );
    }

    #[test]
    fn test_slides_sorted_numerically_not_lexically() {
        // slide10 must come after slide2.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for n in [10, 1, 2] {
            writer
                .start_file(
                    format!("ppt/slides/slide{n}.xml"),
                    SimpleFileOptions::default(),
                )
                .unwrap();
            let xml = SLIDE_SINGLE.replace("Second slide", &format!("part {n}"));
            writer.write_all(xml.as_bytes()).unwrap();
        }
        writer.finish().unwrap();

        let tree = extract(&path).unwrap();
        let Some(Tree::Sequence(slides)) = tree.get("slides") else {
            panic!("expected slides sequence")
        };
        assert_eq!(
            slides[2].get("Slide 3"),
            Some(&Tree::Sequence(vec![Tree::scalar("part 10")]))
        );
    }

    #[test]
    fn test_not_a_zip_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.pptx");
        std::fs::write(&path, "plain text, not an archive").unwrap();
        let err = extract(&path).unwrap_err();
        assert!(matches!(err, Error::Extraction { format, .. } if format == DocFormat::SlideDeck));
    }
}
