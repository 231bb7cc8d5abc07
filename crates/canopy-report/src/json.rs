use serde::Serialize;

use canopy_core::diff::DiffResult;
use canopy_core::metrics::Metrics;

/// Structured comparison output: the categorized delta plus the derived
/// metrics, as one JSON document.
#[derive(Debug, Serialize)]
pub struct CompareOutput<'a> {
    #[serde(flatten)]
    pub diff: &'a DiffResult,
    pub metrics: &'a Metrics,
}

/// Format a comparison as JSON.
pub fn format_report(delta: &DiffResult, metrics: &Metrics, compact: bool) -> String {
    let output = CompareOutput {
        diff: delta,
        metrics,
    };
    if compact {
        serde_json::to_string(&output).expect("CompareOutput should be serializable")
    } else {
        serde_json::to_string_pretty(&output).expect("CompareOutput should be serializable")
    }
}

/// One entry of a directory comparison.
#[derive(Debug, Serialize)]
pub struct FileCompare<'a> {
    pub file: &'a str,
    #[serde(flatten)]
    pub diff: &'a DiffResult,
    pub metrics: &'a Metrics,
}

/// Format a directory comparison (one entry per common file) as a JSON array.
pub fn format_dir_report(entries: &[FileCompare<'_>], compact: bool) -> String {
    if compact {
        serde_json::to_string(entries).expect("FileCompare should be serializable")
    } else {
        serde_json::to_string_pretty(entries).expect("FileCompare should be serializable")
    }
}
