//! Format extractors: each module converts one document format into the
//! canonical tree, and `extract_file` dispatches on the file's declared
//! type. Extractors never leak format-specific objects; the tree is the
//! entire contract with downstream consumers.

pub mod markup;
pub mod pdf;
pub mod pipeline;
pub mod sheet;
pub mod slides;
pub mod table;
pub mod word;

use std::path::Path;

use canopy_core::{DocFormat, Result, Tree};

pub use pipeline::{BatchFailure, BatchResult, ExtractedDocument};

/// Extract a file, selecting the extractor from its extension.
pub fn extract_file(path: &Path) -> Result<Tree> {
    let format = DocFormat::from_path(path)?;
    extract_with(format, path)
}

/// Extract a file with an explicitly declared format, bypassing extension
/// dispatch (the byte-stream-plus-format entry point).
pub fn extract_with(format: DocFormat, path: &Path) -> Result<Tree> {
    match format {
        DocFormat::SlideDeck => slides::extract(path),
        DocFormat::WordDocument => word::extract(path),
        DocFormat::Pdf => pdf::extract(path),
        DocFormat::Markup => markup::extract(path),
        DocFormat::Spreadsheet => sheet::extract(path),
        DocFormat::DelimitedTable => table::extract(path),
    }
}
