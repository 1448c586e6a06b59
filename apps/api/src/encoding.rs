//! File Encoder — turns an uploaded document into a base64 payload tagged
//! with its media type, ready for inline submission to the model.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Failed to read resume document: {0}")]
    Read(#[from] std::io::Error),
}

/// Where the document content comes from. All variants resolve to the same
/// base64 payload.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Raw bytes already in memory (the multipart upload path).
    Bytes { bytes: Bytes, media_type: String },
    /// A file on disk, read asynchronously in a single shot.
    Path {
        path: std::path::PathBuf,
        media_type: String,
    },
    /// Pre-encoded base64 text, optionally wrapped in a data URI.
    Encoded { text: String, media_type: String },
}

impl DocumentSource {
    pub fn media_type(&self) -> &str {
        match self {
            DocumentSource::Bytes { media_type, .. } => media_type,
            DocumentSource::Path { media_type, .. } => media_type,
            DocumentSource::Encoded { media_type, .. } => media_type,
        }
    }

    /// True when the source carries no content at all. Used by submission
    /// validation; an empty document never reaches the encoder.
    pub fn is_empty(&self) -> bool {
        match self {
            DocumentSource::Bytes { bytes, .. } => bytes.is_empty(),
            DocumentSource::Path { path, .. } => path.as_os_str().is_empty(),
            DocumentSource::Encoded { text, .. } => text.trim().is_empty(),
        }
    }
}

/// Resolves a document source to its raw base64 payload.
pub async fn resolve(source: &DocumentSource) -> Result<String, EncodingError> {
    match source {
        DocumentSource::Bytes { bytes, .. } => Ok(encode_document(bytes)),
        DocumentSource::Path { path, .. } => {
            let bytes = read_document(path).await?;
            Ok(encode_document(&bytes))
        }
        DocumentSource::Encoded { text, .. } => Ok(strip_data_uri(text).to_string()),
    }
}

/// Encodes document bytes as standard base64 (no data-URI wrapper).
pub fn encode_document(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Reads a document from disk. Single-shot: one completion or one failure.
pub async fn read_document(path: &Path) -> Result<Vec<u8>, EncodingError> {
    Ok(tokio::fs::read(path).await?)
}

/// Strips a `data:<mime>;base64,` prefix so only the raw encoded payload
/// remains. Text without the prefix passes through untouched.
pub fn strip_data_uri(text: &str) -> &str {
    if text.starts_with("data:") {
        match text.split_once(";base64,") {
            Some((_, payload)) => payload,
            None => text,
        }
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_encode_document_known_bytes() {
        assert_eq!(encode_document(b"%PDF-1.4"), "JVBERi0xLjQ=");
    }

    #[test]
    fn test_strip_data_uri_removes_prefix() {
        let input = "data:application/pdf;base64,JVBERi0xLjQ=";
        assert_eq!(strip_data_uri(input), "JVBERi0xLjQ=");
    }

    #[test]
    fn test_strip_data_uri_passthrough_without_prefix() {
        assert_eq!(strip_data_uri("JVBERi0xLjQ="), "JVBERi0xLjQ=");
    }

    #[test]
    fn test_strip_data_uri_malformed_prefix_left_alone() {
        // "data:" without the ";base64," marker is not a data URI we know
        let input = "data:application/pdf";
        assert_eq!(strip_data_uri(input), input);
    }

    #[test]
    fn test_empty_sources_detected() {
        let empty_bytes = DocumentSource::Bytes {
            bytes: Bytes::new(),
            media_type: "application/pdf".to_string(),
        };
        assert!(empty_bytes.is_empty());

        let blank_text = DocumentSource::Encoded {
            text: "   ".to_string(),
            media_type: "application/pdf".to_string(),
        };
        assert!(blank_text.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_bytes_encodes() {
        let source = DocumentSource::Bytes {
            bytes: Bytes::from_static(b"%PDF-1.4"),
            media_type: "application/pdf".to_string(),
        };
        assert_eq!(resolve(&source).await.unwrap(), "JVBERi0xLjQ=");
    }

    #[tokio::test]
    async fn test_resolve_encoded_strips_prefix() {
        let source = DocumentSource::Encoded {
            text: "data:application/pdf;base64,JVBERi0xLjQ=".to_string(),
            media_type: "application/pdf".to_string(),
        };
        assert_eq!(resolve(&source).await.unwrap(), "JVBERi0xLjQ=");
    }

    #[tokio::test]
    async fn test_resolve_path_reads_and_encodes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let source = DocumentSource::Path {
            path: file.path().to_path_buf(),
            media_type: "application/pdf".to_string(),
        };
        assert_eq!(resolve(&source).await.unwrap(), "JVBERi0xLjQ=");
    }

    #[tokio::test]
    async fn test_resolve_missing_file_is_encoding_error() {
        let source = DocumentSource::Path {
            path: "/nonexistent/resume.pdf".into(),
            media_type: "application/pdf".to_string(),
        };
        let err = resolve(&source).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read resume document"));
    }
}
