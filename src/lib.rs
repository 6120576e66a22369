/*!
 * ota-agent - on-device update agent
 *
 * Turns an untrusted update action into validated update metadata before any
 * download or install step is allowed to run:
 * - Bounded parsing of the action and its embedded manifest
 * - Update identity (provider/name/version) extraction
 * - Per-file metadata and declared hash sets, all-or-nothing
 * - Workflow checks for fresh downloads versus resumed install/apply
 */

pub mod cli_style;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod output;

// Re-export commonly used types
pub use config::{AgentConfig, LogLevel};
pub use error::{AgentError, ErrorCategory, Result};
pub use ingest::{check_download_uris, ManifestIngestor, WorkflowStep};
pub use ota_core_manifest as manifest;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
