//! Workflow-facing manifest ingestion
//!
//! Loads an update action, runs it through the manifest parser with the
//! configured limits, and applies the workflow rule the parser leaves to its
//! caller: a file may lack a download URL only when resuming install/apply.

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use ota_core_manifest::{self as manifest, ParseOptions, UpdateAction, UpdateIdentity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{error, info, info_span};

/// Workflow step the ingested manifest is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStep {
    /// Fresh download: every file needs a URL
    #[default]
    Download,

    /// Resumed install, files are already on disk
    Install,

    /// Resumed apply, files are already on disk
    Apply,
}

impl WorkflowStep {
    /// Whether every file must carry a download URL
    pub fn requires_download_uris(&self) -> bool {
        matches!(self, WorkflowStep::Download)
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStep::Download => write!(f, "download"),
            WorkflowStep::Install => write!(f, "install"),
            WorkflowStep::Apply => write!(f, "apply"),
        }
    }
}

/// Ingests update actions for the workflow layer
#[derive(Debug, Clone)]
pub struct ManifestIngestor {
    options: ParseOptions,
}

impl ManifestIngestor {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            options: config.parse_options(),
        }
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Ingest an update action stored on disk
    pub fn ingest_file(&self, path: &Path, step: WorkflowStep) -> Result<UpdateAction> {
        let span = info_span!("ingest", source = %path.display(), %step);
        let _guard = span.enter();

        let text = self.read_document(path)?;
        self.ingest_text(&text, step)
    }

    /// Read only the update identity of an update action stored on disk
    pub fn update_id_file(&self, path: &Path) -> Result<UpdateIdentity> {
        let span = info_span!("update_id", source = %path.display());
        let _guard = span.enter();

        let text = self.read_document(path)?;
        let update_id = manifest::parse_update_id_str(&text, &self.options).inspect_err(|e| {
            error!(kind = %e.kind(), error = %e, "Update identity rejected");
        })?;
        Ok(update_id)
    }

    fn read_document(&self, path: &Path) -> Result<String> {
        let metadata = fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AgentError::DocumentNotFound(path.to_path_buf())
            } else {
                AgentError::Io(e)
            }
        })?;

        // Refuse before reading so an oversized file never reaches memory
        let limit = self.options.limits.max_document_bytes;
        if metadata.len() > limit as u64 {
            let err = manifest::Error::DocumentTooLarge {
                document: manifest::root::ACTION_DOCUMENT,
                size: usize::try_from(metadata.len()).unwrap_or(usize::MAX),
                limit,
            };
            error!(error = %err, "Rejecting update action");
            return Err(err.into());
        }

        Ok(fs::read_to_string(path)?)
    }

    /// Ingest an update action from its JSON text
    pub fn ingest_str(&self, text: &str, step: WorkflowStep) -> Result<UpdateAction> {
        let span = info_span!("ingest", source = "inline", %step);
        let _guard = span.enter();
        self.ingest_text(text, step)
    }

    /// Ingest an already-parsed update action
    pub fn ingest_value(&self, action: &Value, step: WorkflowStep) -> Result<UpdateAction> {
        let span = info_span!("ingest", source = "value", %step);
        let _guard = span.enter();
        self.finish(manifest::ingest(action, &self.options), step)
    }

    fn ingest_text(&self, text: &str, step: WorkflowStep) -> Result<UpdateAction> {
        self.finish(manifest::ingest_str(text, &self.options), step)
    }

    fn finish(
        &self,
        parsed: manifest::Result<UpdateAction>,
        step: WorkflowStep,
    ) -> Result<UpdateAction> {
        let update = parsed.map_err(|e| {
            error!(kind = %e.kind(), error = %e, "Update manifest rejected");
            AgentError::Manifest(e)
        })?;

        check_download_uris(&update, step)?;

        info!(
            update_id = %update.update_id,
            files = update.files.len(),
            declared_bytes = update.files.total_size_in_bytes(),
            "Update manifest accepted"
        );
        Ok(update)
    }
}

/// Enforce that a fresh download has a URL for every file
pub fn check_download_uris(update: &UpdateAction, step: WorkflowStep) -> Result<()> {
    if !step.requires_download_uris() {
        return Ok(());
    }

    if let Some(file) = update.files.iter().find(|f| f.download_uri().is_none()) {
        error!(file_id = file.file_id(), %step, "File has no download URL");
        return Err(AgentError::Workflow(format!(
            "file '{}' has no download URL; only a resumed install or apply may omit it",
            file.file_id()
        )));
    }

    Ok(())
}
