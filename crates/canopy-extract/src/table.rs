//! Delimited-table (csv) extractor.
//!
//! Every record becomes a row of scalars, including the first one: there
//! is no header detection, a header row is data like any other.
//!
//! Output: `{"data": [[field, ...], ...]}`.

use std::path::Path;

use canopy_core::{DocFormat, Error, Result, Tree};

pub fn extract(path: &Path) -> Result<Tree> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::extraction(DocFormat::DelimitedTable, path, e))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::extraction(DocFormat::DelimitedTable, path, e))?;
        rows.push(Tree::Sequence(
            record.iter().map(Tree::scalar).collect(),
        ));
    }

    Ok(Tree::mapping().with_entry("data", Tree::Sequence(rows)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_first_row_is_data_like_any_other() {
        let (_dir, path) = write_csv("name,amount\nrent,1200\nfood,300\n");
        let tree = extract(&path).unwrap();
        let Some(Tree::Sequence(rows)) = tree.get("data") else {
            panic!("expected data rows")
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            Tree::Sequence(vec![Tree::scalar("name"), Tree::scalar("amount")])
        );
    }

    #[test]
    fn test_ragged_rows_survive() {
        let (_dir, path) = write_csv("a,b,c\nd\ne,f\n");
        let tree = extract(&path).unwrap();
        let Some(Tree::Sequence(rows)) = tree.get("data") else {
            panic!("expected data rows")
        };
        assert_eq!(rows[1], Tree::Sequence(vec![Tree::scalar("d")]));
        assert_eq!(
            rows[2],
            Tree::Sequence(vec![Tree::scalar("e"), Tree::scalar("f")])
        );
    }

    #[test]
    fn test_quoted_fields() {
        let (_dir, path) = write_csv("\"one, two\",three\n");
        let tree = extract(&path).unwrap();
        let Some(Tree::Sequence(rows)) = tree.get("data") else {
            panic!("expected data rows")
        };
        assert_eq!(
            rows[0],
            Tree::Sequence(vec![Tree::scalar("one, two"), Tree::scalar("three")])
        );
    }

    #[test]
    fn test_empty_file_is_empty_sequence() {
        let (_dir, path) = write_csv("");
        let tree = extract(&path).unwrap();
        assert_eq!(tree.get("data"), Some(&Tree::Sequence(vec![])));
    }
}
