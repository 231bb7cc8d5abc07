//! Spreadsheet (xlsx/xls) extractor.
//!
//! One entry per sheet, source order preserved; each sheet is a sequence
//! of rows over the sheet's used range, so every row carries the same
//! column count and blank cells become empty-string scalars rather than
//! being dropped.
//!
//! Output: `{"sheets": {name: [[cell, ...], ...]}}`.

use std::path::Path;

use calamine::{Data, Reader};

use canopy_core::{DocFormat, Error, Result, Tree};

pub fn extract(path: &Path) -> Result<Tree> {
    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| Error::extraction(DocFormat::Spreadsheet, path, e.to_string()))?;

    let mut sheets = Tree::mapping();
    for name in workbook.sheet_names().to_vec() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| {
                Error::extraction(DocFormat::Spreadsheet, path, format!("sheet '{name}': {e}"))
            })?;
        let rows: Vec<Tree> = range
            .rows()
            .map(|row| Tree::Sequence(row.iter().map(|cell| Tree::Scalar(cell_text(cell))).collect()))
            .collect();
        sheets = sheets.with_entry(name, Tree::Sequence(rows));
    }

    Ok(Tree::mapping().with_entry("sheets", sheets))
}

/// Text form of a cell value. Empty cells are empty strings, not omitted.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}
