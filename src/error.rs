//! Error taxonomy for document analysis.

use crate::models::FileKind;

/// Text conversion failure for a rich document (OOXML container or legacy
/// BIFF workbook).
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("not a valid OOXML container: {0}")]
    Archive(String),

    #[error("required part missing: {0}")]
    MissingPart(String),

    #[error("ZIP entry {name} exceeds size limit ({limit} bytes)")]
    EntryTooLarge { name: String, limit: u64 },

    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("unreadable legacy workbook: {0}")]
    LegacyWorkbook(String),
}

/// Fatal errors surfaced by [`crate::analyzer::DocumentAnalyzer`].
///
/// Non-fatal issues (skipped cells, presentation fallback) are logged and only
/// lower the quality of the result.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to convert {} document: {source}", .kind.as_str())]
    Conversion {
        kind: FileKind,
        #[source]
        source: ConversionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_message_names_kind() {
        let err = AnalyzeError::Conversion {
            kind: FileKind::WordProcessor,
            source: ConversionError::MissingPart("word/document.xml".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "failed to convert word-processor document: required part missing: word/document.xml"
        );
    }
}
