use std::path::PathBuf;

use thiserror::Error;

use crate::format::DocFormat;

pub type Result<T> = std::result::Result<T, Error>;

/// Domain errors. All are fatal for the file or call that raised them;
/// batch callers log and move on to the next file.
#[derive(Debug, Error)]
pub enum Error {
    /// The dispatcher saw an extension no extractor handles.
    #[error("unsupported file format: '.{0}'")]
    UnsupportedFormat(String),

    /// An extractor could not turn the source into a canonical tree.
    /// Not retried: the content is presumed immutable between attempts.
    #[error("{format} extraction failed for '{path}': {source}")]
    Extraction {
        format: DocFormat,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Interchange JSON encode/decode failure.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn extraction(
        format: DocFormat,
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Extraction {
            format,
            path: path.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_names_extension() {
        let err = Error::UnsupportedFormat("xyz".to_string());
        assert_eq!(err.to_string(), "unsupported file format: '.xyz'");
    }

    #[test]
    fn test_extraction_error_carries_context() {
        let err = Error::extraction(DocFormat::Pdf, "docs/report.pdf", "trailer not found");
        let msg = err.to_string();
        assert!(msg.contains("pdf"), "missing format: {msg}");
        assert!(msg.contains("docs/report.pdf"), "missing path: {msg}");
        assert!(msg.contains("trailer not found"), "missing cause: {msg}");
    }
}
