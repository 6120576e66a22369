/*!
 * Error types for the update agent
 */

use ota_core_manifest::{Error as ManifestError, ErrorKind};
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, AgentError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_IO: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_REJECTED: i32 = 3;
pub const EXIT_WORKFLOW: i32 = 4;

#[derive(Debug)]
pub enum AgentError {
    /// Action document not found
    DocumentNotFound(PathBuf),

    /// I/O error
    Io(io::Error),

    /// Configuration error
    Config(String),

    /// Update manifest rejected during ingestion
    Manifest(ManifestError),

    /// Validated manifest cannot serve the requested workflow step
    Workflow(String),

    /// Generic error with message
    Other(String),
}

impl AgentError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AgentError::Config(_) => EXIT_FATAL,
            AgentError::Manifest(_) => EXIT_REJECTED,
            AgentError::Workflow(_) => EXIT_WORKFLOW,
            AgentError::DocumentNotFound(_) | AgentError::Io(_) | AgentError::Other(_) => EXIT_IO,
        }
    }

    /// Check if this error is fatal (should not retry)
    pub fn is_fatal(&self) -> bool {
        match self {
            // Manifest content cannot become valid by parsing it again
            AgentError::Manifest(_) => true,
            AgentError::Workflow(_) => true,
            AgentError::Config(_) => true,
            AgentError::DocumentNotFound(_) => true,

            AgentError::Io(_) => false,
            AgentError::Other(_) => false,
        }
    }

    /// Check if this error is transient (temporary, worth retrying)
    pub fn is_transient(&self) -> bool {
        match self {
            AgentError::Io(io_err) => Self::is_io_transient(io_err),
            _ => false,
        }
    }

    /// Check if an I/O error is transient
    fn is_io_transient(io_err: &io::Error) -> bool {
        use io::ErrorKind::*;
        matches!(io_err.kind(), Interrupted | WouldBlock | TimedOut)
    }

    /// Kind of the manifest validation that failed, if any
    pub fn manifest_kind(&self) -> Option<ErrorKind> {
        match self {
            AgentError::Manifest(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            AgentError::DocumentNotFound(_) | AgentError::Io(_) => ErrorCategory::IoError,
            AgentError::Config(_) => ErrorCategory::Configuration,
            AgentError::Manifest(err) if err.kind() == ErrorKind::LimitExceeded => {
                ErrorCategory::Resource
            }
            AgentError::Manifest(err) if err.kind() == ErrorKind::AllocationFailure => {
                ErrorCategory::Resource
            }
            AgentError::Manifest(_) => ErrorCategory::Validation,
            AgentError::Workflow(_) => ErrorCategory::Workflow,
            AgentError::Other(_) => ErrorCategory::Unknown,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Manifest validation errors
    Validation,
    /// I/O operation errors
    IoError,
    /// Resource limits (document size, nesting, memory)
    Resource,
    /// Configuration errors
    Configuration,
    /// Workflow preconditions
    Workflow,
    /// Uncategorized errors
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::IoError => write!(f, "io"),
            ErrorCategory::Resource => write!(f, "resource"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Workflow => write!(f, "workflow"),
            ErrorCategory::Unknown => write!(f, "unknown"),
        }
    }
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::DocumentNotFound(path) => {
                write!(f, "Update action not found: {}", path.display())
            }
            AgentError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            AgentError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            AgentError::Manifest(err) => {
                write!(f, "Manifest rejected ({}): {}", err.kind(), err)
            }
            AgentError::Workflow(msg) => {
                write!(f, "Workflow error: {}", msg)
            }
            AgentError::Other(msg) => {
                write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentError::Io(err) => Some(err),
            AgentError::Manifest(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AgentError {
    fn from(err: io::Error) -> Self {
        AgentError::Io(err)
    }
}

impl From<ManifestError> for AgentError {
    fn from(err: ManifestError) -> Self {
        AgentError::Manifest(err)
    }
}

impl From<toml::de::Error> for AgentError {
    fn from(err: toml::de::Error) -> Self {
        AgentError::Config(format!("TOML parse error: {}", err))
    }
}
