//! Error types for manifest ingestion

use std::collections::TryReserveError;
use thiserror::Error;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a rejected manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Outer or embedded document is not valid JSON (or not an object)
    MalformedDocument,
    /// Required field absent or empty
    MissingField,
    /// `files`/`fileUrls` empty, or fewer URLs than files
    CountMismatch,
    /// A file declares no hashes
    NoHashes,
    /// A hash entry has an empty algorithm name or value
    InvalidHash,
    /// Field present with the wrong type or an out-of-range value
    InvalidField,
    /// Document exceeds the configured size or nesting limits
    LimitExceeded,
    /// `fileUrls` key at a file's position names a different file
    UrlMismatch,
    /// Storage reservation failed
    AllocationFailure,
}

impl ErrorKind {
    /// Stable identifier used in diagnostics and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedDocument => "malformed_document",
            ErrorKind::MissingField => "missing_field",
            ErrorKind::CountMismatch => "count_mismatch",
            ErrorKind::NoHashes => "no_hashes",
            ErrorKind::InvalidHash => "invalid_hash",
            ErrorKind::InvalidField => "invalid_field",
            ErrorKind::LimitExceeded => "limit_exceeded",
            ErrorKind::UrlMismatch => "url_mismatch",
            ErrorKind::AllocationFailure => "allocation_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while ingesting an update manifest
#[derive(Error, Debug)]
pub enum Error {
    /// Document failed to parse as JSON
    #[error("Malformed {document}: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Document parsed but has the wrong shape
    #[error("Malformed {document}: {reason}")]
    MalformedDocument {
        document: &'static str,
        reason: String,
    },

    /// Missing or empty required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Container that must declare at least one entry is empty
    #[error("'{field}' must contain at least one entry")]
    EmptyCollection { field: &'static str },

    /// Fewer download URLs than declared files
    #[error("File URLs count ({file_urls}) is less than manifest files count ({files})")]
    CountMismatch { files: usize, file_urls: usize },

    /// No hashes declared for a file
    #[error("No hashes declared")]
    NoHashes,

    /// Hash entry with empty algorithm or value
    #[error("Invalid hash entry '{algorithm}': {reason}")]
    InvalidHash {
        algorithm: String,
        reason: &'static str,
    },

    /// Field present with an unusable value
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// Document larger than the configured limit
    #[error("{document} is {size} bytes, limit is {limit}")]
    DocumentTooLarge {
        document: &'static str,
        size: usize,
        limit: usize,
    },

    /// Document nested deeper than the configured limit
    #[error("{document} nesting exceeds depth limit {limit}")]
    NestingTooDeep {
        document: &'static str,
        limit: usize,
    },

    /// Positional URL belongs to a different file id
    #[error("File URL at position {index} is keyed '{url_key}', expected '{file_id}'")]
    UrlMismatch {
        index: usize,
        file_id: String,
        url_key: String,
    },

    /// Storage reservation failed
    #[error("Allocation failed for {what}: {source}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// Failure while building one file entry
    #[error("File '{file_id}' (index {index}): {source}")]
    File {
        index: usize,
        file_id: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a missing field error
    pub fn missing_field<S: Into<String>>(field: S) -> Self {
        Error::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid field error
    pub fn invalid_field<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        Error::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed document error
    pub fn malformed<R: Into<String>>(document: &'static str, reason: R) -> Self {
        Error::MalformedDocument {
            document,
            reason: reason.into(),
        }
    }

    /// Attach the file entry being built when this error occurred
    pub fn in_file<S: Into<String>>(self, index: usize, file_id: S) -> Self {
        Error::File {
            index,
            file_id: file_id.into(),
            source: Box::new(self),
        }
    }

    /// Classification of this error; file context is looked through
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Json { .. } | Error::MalformedDocument { .. } => ErrorKind::MalformedDocument,
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::EmptyCollection { .. } | Error::CountMismatch { .. } => {
                ErrorKind::CountMismatch
            }
            Error::NoHashes => ErrorKind::NoHashes,
            Error::InvalidHash { .. } => ErrorKind::InvalidHash,
            Error::InvalidField { .. } => ErrorKind::InvalidField,
            Error::DocumentTooLarge { .. } | Error::NestingTooDeep { .. } => {
                ErrorKind::LimitExceeded
            }
            Error::UrlMismatch { .. } => ErrorKind::UrlMismatch,
            Error::Allocation { .. } => ErrorKind::AllocationFailure,
            Error::File { source, .. } => source.kind(),
        }
    }

    /// Index of the file entry that failed, if the failure was per-file
    pub fn file_index(&self) -> Option<usize> {
        match self {
            Error::File { index, .. } => Some(*index),
            Error::UrlMismatch { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(source: TryReserveError) -> Self {
        Error::Allocation {
            what: "collection",
            source,
        }
    }
}
