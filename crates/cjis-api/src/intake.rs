//! # Policy Text Intake
//!
//! Boundary between uploaded documents and the scoring core. The core only
//! ever sees UTF-8 text; everything else is rejected here.
//!
//! Plain-text files (and files with unrecognized extensions) are decoded as
//! UTF-8. PDF and DOCX uploads are refused with a dedicated error because
//! binary document parsing is outside this service.

use std::path::Path;

use thiserror::Error;

/// Intake failures, translated to HTTP errors by the API layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// Neither a file nor policy text was supplied.
    #[error("No policy text or file provided.")]
    NoInput,

    /// Text was supplied but is empty or whitespace only.
    #[error("The provided document is empty or text could not be extracted.")]
    Empty,

    /// File bytes are not valid UTF-8.
    #[error("Could not read {filename}. Ensure it is UTF-8 encoded.")]
    NotUtf8 {
        /// Uploaded file name.
        filename: String,
    },

    /// Binary document format this service does not parse.
    #[error("{format} documents are not supported ({filename}); upload the extracted text as .txt")]
    Unsupported {
        /// Uploaded file name.
        filename: String,
        /// Detected format.
        format: &'static str,
    },

    /// Upload exceeds the configured size limit.
    #[error("document exceeds the {limit} byte upload limit")]
    TooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },
}

/// Document format guessed from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.txt`
    Text,
    /// `.pdf`
    Pdf,
    /// `.docx`
    Docx,
    /// Anything else.
    Other,
}

impl DocumentFormat {
    /// Classify a file name by extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Self {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("txt") => Self::Text,
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Docx,
            _ => Self::Other,
        }
    }
}

/// An uploaded file.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub filename: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// Decode an uploaded file to text.
pub fn extract_text(file: &UploadedFile, max_bytes: usize) -> Result<String, IntakeError> {
    if file.bytes.len() > max_bytes {
        return Err(IntakeError::TooLarge { limit: max_bytes });
    }

    match DocumentFormat::from_filename(&file.filename) {
        DocumentFormat::Pdf => Err(IntakeError::Unsupported {
            filename: file.filename.clone(),
            format: "PDF",
        }),
        DocumentFormat::Docx => Err(IntakeError::Unsupported {
            filename: file.filename.clone(),
            format: "DOCX",
        }),
        format => {
            if format == DocumentFormat::Other {
                tracing::warn!(
                    filename = %file.filename,
                    "unrecognized file extension, attempting to decode as UTF-8 text"
                );
            }
            String::from_utf8(file.bytes.clone()).map_err(|_| IntakeError::NotUtf8 {
                filename: file.filename.clone(),
            })
        }
    }
}

/// Pick the policy text from an upload or an inline field.
///
/// A file takes precedence over inline text. Blank inline text counts as
/// not supplied. The result is never blank.
pub fn resolve_policy_text(
    file: Option<&UploadedFile>,
    policy_text: Option<&str>,
    max_bytes: usize,
) -> Result<String, IntakeError> {
    let policy_text = policy_text.filter(|t| !t.trim().is_empty());
    let text = match (file, policy_text) {
        (Some(file), _) => extract_text(file, max_bytes)?,
        (None, Some(text)) => {
            if text.len() > max_bytes {
                return Err(IntakeError::TooLarge { limit: max_bytes });
            }
            text.to_string()
        }
        (None, None) => return Err(IntakeError::NoInput),
    };

    if text.trim().is_empty() {
        return Err(IntakeError::Empty);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1024;

    fn upload(name: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn classifies_extensions() {
        assert_eq!(DocumentFormat::from_filename("policy.TXT"), DocumentFormat::Text);
        assert_eq!(DocumentFormat::from_filename("policy.pdf"), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_filename("a.b.docx"), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_filename("policy.md"), DocumentFormat::Other);
        assert_eq!(DocumentFormat::from_filename("policy"), DocumentFormat::Other);
    }

    #[test]
    fn text_file_is_decoded() {
        let text = extract_text(&upload("p.txt", b"Passwords expire."), LIMIT).unwrap();
        assert_eq!(text, "Passwords expire.");
    }

    #[test]
    fn unknown_extension_is_decoded_as_text() {
        assert!(extract_text(&upload("p.md", b"# Policy"), LIMIT).is_ok());
    }

    #[test]
    fn binary_formats_are_unsupported() {
        let err = extract_text(&upload("p.pdf", b"%PDF-1.7"), LIMIT).unwrap_err();
        assert!(matches!(err, IntakeError::Unsupported { format: "PDF", .. }));
        let err = extract_text(&upload("p.docx", b"PK"), LIMIT).unwrap_err();
        assert!(matches!(err, IntakeError::Unsupported { format: "DOCX", .. }));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = extract_text(&upload("p.txt", &[0xff, 0xfe, 0x00]), LIMIT).unwrap_err();
        assert_eq!(err, IntakeError::NotUtf8 { filename: "p.txt".into() });
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let err = extract_text(&upload("p.txt", &[b'a'; 2048]), LIMIT).unwrap_err();
        assert_eq!(err, IntakeError::TooLarge { limit: LIMIT });
    }

    #[test]
    fn file_wins_over_inline_text() {
        let file = upload("p.txt", b"from file");
        let text = resolve_policy_text(Some(&file), Some("inline"), LIMIT).unwrap();
        assert_eq!(text, "from file");
    }

    #[test]
    fn blank_inline_text_does_not_mask_a_file() {
        let file = upload("p.txt", b"from file");
        let text = resolve_policy_text(Some(&file), Some(""), LIMIT).unwrap();
        assert_eq!(text, "from file");
    }

    #[test]
    fn missing_and_blank_inputs() {
        assert_eq!(resolve_policy_text(None, None, LIMIT), Err(IntakeError::NoInput));
        assert_eq!(resolve_policy_text(None, Some(""), LIMIT), Err(IntakeError::NoInput));
        assert_eq!(resolve_policy_text(None, Some("  \n"), LIMIT), Err(IntakeError::NoInput));
        let blank = upload("p.txt", b"   ");
        assert_eq!(resolve_policy_text(Some(&blank), None, LIMIT), Err(IntakeError::Empty));
    }
}
