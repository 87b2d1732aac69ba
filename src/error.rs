//! Error types for the pdftoc library.

use std::io;
use thiserror::Error;

/// Result type alias for pdftoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while decoding or serializing.
///
/// The classification heuristics themselves are total and never return
/// errors; only the document boundary (decode in, JSON out) does.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document cannot be parsed (corrupt, truncated, or not a PDF).
    #[error("Decode failure: {0}")]
    Decode(String),

    /// The document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// The document parsed but yielded zero extractable text spans.
    #[error("Document contains no extractable text")]
    EmptyDocument,

    /// Error serializing the outline to JSON.
    #[error("JSON serialization error: {0}")]
    Json(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

impl Error {
    /// Whether this failure is the per-document kind a batch run absorbs
    /// by emitting the fallback outline instead of aborting.
    pub fn is_document_failure(&self) -> bool {
        matches!(
            self,
            Error::Decode(_) | Error::Encrypted | Error::EmptyDocument
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::EmptyDocument;
        assert_eq!(err.to_string(), "Document contains no extractable text");

        let err = Error::Decode("bad xref".to_string());
        assert_eq!(err.to_string(), "Decode failure: bad xref");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_document_failure_kinds() {
        assert!(Error::EmptyDocument.is_document_failure());
        assert!(Error::Encrypted.is_document_failure());
        assert!(Error::Decode("x".into()).is_document_failure());
        assert!(!Error::Json("x".into()).is_document_failure());
    }
}
