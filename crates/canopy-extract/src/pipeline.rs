//! Parallel batch extraction over a directory tree.
//!
//! Extraction calls share no mutable state, so files are processed with
//! independent rayon workers. A file that fails to extract is recorded and
//! skipped; it never aborts the batch.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use canopy_core::config::BatchConfig;
use canopy_core::{DocFormat, Error, Tree};

/// One successfully normalized file.
pub struct ExtractedDocument {
    pub path: PathBuf,
    pub format: DocFormat,
    pub tree: Tree,
}

/// One file that could not be normalized.
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: Error,
}

pub struct BatchResult {
    pub documents: Vec<ExtractedDocument>,
    pub failures: Vec<BatchFailure>,
}

/// Walk `dir`, extract every file with a recognized extension that the
/// config's exclude globs do not match, and collect results in stable
/// path order.
pub fn extract_dir(dir: &Path, config: &BatchConfig) -> BatchResult {
    let excludes = config.exclude_set();

    let mut candidates: Vec<(PathBuf, DocFormat)> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.into_path();
            let rel = path.strip_prefix(dir).unwrap_or(&path);
            if excludes.is_match(rel) {
                return None;
            }
            // Unrecognized extensions are not failures here; a directory
            // full of unrelated files is expected.
            let format = DocFormat::from_path(&path).ok()?;
            Some((path, format))
        })
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let results: Vec<Result<ExtractedDocument, BatchFailure>> = candidates
        .into_par_iter()
        .map(|(path, format)| match crate::extract_with(format, &path) {
            Ok(tree) => Ok(ExtractedDocument { path, format, tree }),
            Err(error) => Err(BatchFailure { path, error }),
        })
        .collect();

    let mut documents = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(doc) => documents.push(doc),
            Err(failure) => failures.push(failure),
        }
    }
    BatchResult {
        documents,
        failures,
    }
}
