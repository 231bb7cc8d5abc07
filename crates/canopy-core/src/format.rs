use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A supported document format. Each variant maps 1:1 to an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocFormat {
    SlideDeck,
    WordDocument,
    Pdf,
    Markup,
    Spreadsheet,
    DelimitedTable,
}

impl DocFormat {
    /// File extensions this format claims, lowercase, without the dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            DocFormat::SlideDeck => &["pptx"],
            DocFormat::WordDocument => &["doc", "docx"],
            DocFormat::Pdf => &["pdf"],
            DocFormat::Markup => &["xml"],
            DocFormat::Spreadsheet => &["xlsx", "xls"],
            DocFormat::DelimitedTable => &["csv"],
        }
    }

    pub fn all() -> &'static [DocFormat] {
        &[
            DocFormat::SlideDeck,
            DocFormat::WordDocument,
            DocFormat::Pdf,
            DocFormat::Markup,
            DocFormat::Spreadsheet,
            DocFormat::DelimitedTable,
        ]
    }

    /// Case-insensitive extension lookup.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        DocFormat::all()
            .iter()
            .copied()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    /// Dispatch on a file path's declared type. The file is not opened;
    /// only the extension is inspected.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_extension(&ext).ok_or(Error::UnsupportedFormat(ext))
    }
}

impl fmt::Display for DocFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocFormat::SlideDeck => write!(f, "slide-deck"),
            DocFormat::WordDocument => write!(f, "word-document"),
            DocFormat::Pdf => write!(f, "pdf"),
            DocFormat::Markup => write!(f, "markup"),
            DocFormat::Spreadsheet => write!(f, "spreadsheet"),
            DocFormat::DelimitedTable => write!(f, "delimited-table"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extension_table() {
        assert_eq!(DocFormat::from_extension("pptx"), Some(DocFormat::SlideDeck));
        assert_eq!(DocFormat::from_extension("doc"), Some(DocFormat::WordDocument));
        assert_eq!(DocFormat::from_extension("docx"), Some(DocFormat::WordDocument));
        assert_eq!(DocFormat::from_extension("pdf"), Some(DocFormat::Pdf));
        assert_eq!(DocFormat::from_extension("xml"), Some(DocFormat::Markup));
        assert_eq!(DocFormat::from_extension("xlsx"), Some(DocFormat::Spreadsheet));
        assert_eq!(DocFormat::from_extension("xls"), Some(DocFormat::Spreadsheet));
        assert_eq!(DocFormat::from_extension("csv"), Some(DocFormat::DelimitedTable));
        assert_eq!(DocFormat::from_extension("xyz"), None);
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(DocFormat::from_extension("PPTX"), Some(DocFormat::SlideDeck));
        assert_eq!(DocFormat::from_extension("Pdf"), Some(DocFormat::Pdf));
    }

    #[test]
    fn test_from_path_unknown_extension() {
        let err = DocFormat::from_path(&PathBuf::from("notes.xyz")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ext) if ext == "xyz"));
    }

    #[test]
    fn test_from_path_no_extension() {
        let err = DocFormat::from_path(&PathBuf::from("README")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ext) if ext.is_empty()));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(DocFormat::SlideDeck.to_string(), "slide-deck");
        assert_eq!(DocFormat::DelimitedTable.to_string(), "delimited-table");
    }
}
