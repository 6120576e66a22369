//! Structured output writer supporting JSON and human-readable modes.

use crate::cli_style;
use crate::error::AgentError;
use ota_core_manifest::{UpdateAction, UpdateIdentity};
use serde::Serialize;

/// Output mode for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// JSON-serializable rejection report
#[derive(Debug, Serialize)]
pub struct Rejection {
    pub success: bool,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_index: Option<usize>,
    pub error: String,
}

impl Rejection {
    pub fn from_error(err: &AgentError) -> Self {
        let file_index = match err {
            AgentError::Manifest(e) => e.file_index(),
            _ => None,
        };
        Self {
            success: false,
            category: err.category().to_string(),
            kind: err.manifest_kind().map(|k| k.to_string()),
            file_index,
            error: sanitize_error(&err.to_string()),
        }
    }
}

/// Structured output writer that supports both human-readable and JSON output
#[derive(Debug, Clone)]
pub struct OutputWriter {
    pub mode: OutputMode,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            mode: if json { OutputMode::Json } else { OutputMode::Human },
        }
    }

    /// Print an accepted update action
    pub fn update_action(&self, update: &UpdateAction) {
        match self.mode {
            OutputMode::Json => print_json(update),
            OutputMode::Human => {
                println!("{}", cli_style::heading(format!("Update {}", update.update_id)));
                println!("{}", cli_style::identity_table(&update.update_id));
                println!("{}", cli_style::files_table(&update.files));
                cli_style::print_success(&format!(
                    "{} file(s), {} declared",
                    update.files.len(),
                    cli_style::format_bytes(update.files.total_size_in_bytes())
                ));
            }
        }
    }

    /// Print only an update identity
    pub fn update_id(&self, update_id: &UpdateIdentity) {
        match self.mode {
            OutputMode::Json => print_json(update_id),
            OutputMode::Human => println!("{}", update_id),
        }
    }

    /// Print an error
    pub fn error(&self, err: &AgentError) {
        match self.mode {
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(&Rejection::from_error(err)) {
                    eprintln!("{}", json);
                }
            }
            OutputMode::Human => {
                let hint = match err {
                    AgentError::Manifest(_) => Some("the update is rejected; no download or install will run"),
                    AgentError::Workflow(_) => Some("use --step install or --step apply when resuming"),
                    _ => None,
                };
                cli_style::print_error(&sanitize_error(&err.to_string()), hint);
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

/// Collapse whitespace so an error always renders as a single line
pub fn sanitize_error(msg: &str) -> String {
    msg.split_whitespace().collect::<Vec<&str>>().join(" ")
}
