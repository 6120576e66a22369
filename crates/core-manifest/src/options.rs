//! Parse limits and ingestion options
//!
//! The embedded manifest is a JSON string that gets parsed a second time, so
//! both passes are bounded by the same byte and nesting limits.

use crate::error::{Error, Result};
use crate::json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default maximum document size (1 MiB)
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 1024 * 1024;

/// Default maximum container nesting depth
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Upper bounds applied to every document before and after parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseLimits {
    /// Maximum length of a JSON text in bytes
    pub max_document_bytes: usize,

    /// Maximum depth of nested objects/arrays (the root container is depth 1)
    pub max_nesting_depth: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParseLimits {
    /// Reject a JSON text longer than `max_document_bytes`
    pub fn check_size(&self, document: &'static str, text: &str) -> Result<()> {
        if text.len() > self.max_document_bytes {
            return Err(Error::DocumentTooLarge {
                document,
                size: text.len(),
                limit: self.max_document_bytes,
            });
        }
        Ok(())
    }

    /// Reject a parsed document nested deeper than `max_nesting_depth`
    pub fn check_depth(&self, document: &'static str, value: &Value) -> Result<()> {
        let mut pending: Vec<(&Value, usize)> = vec![(value, 1)];

        while let Some((node, depth)) = pending.pop() {
            let is_container = matches!(node, Value::Object(_) | Value::Array(_));
            if is_container && depth > self.max_nesting_depth {
                return Err(Error::NestingTooDeep {
                    document,
                    limit: self.max_nesting_depth,
                });
            }

            match node {
                Value::Object(map) => pending.extend(map.values().map(|c| (c, depth + 1))),
                Value::Array(items) => pending.extend(items.iter().map(|c| (c, depth + 1))),
                _ => {}
            }
        }

        Ok(())
    }

    /// Parse a JSON text with both limits enforced
    pub fn parse(&self, document: &'static str, text: &str) -> Result<Value> {
        self.check_size(document, text)?;
        let value =
            json::from_str_unique(text).map_err(|source| Error::Json { document, source })?;
        self.check_depth(document, &value)?;
        Ok(value)
    }
}

/// How a file's download URL is resolved from `fileUrls`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UrlAlignment {
    /// URL taken from the same position; a key that differs from the file id
    /// is logged and otherwise ignored
    #[default]
    Positional,

    /// URL taken from the same position; a differing key rejects the batch
    Strict,
}

/// Options for one ingestion call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Size and nesting limits
    pub limits: ParseLimits,

    /// URL resolution policy
    pub url_alignment: UrlAlignment,
}

impl ParseOptions {
    /// Options with the given URL alignment and default limits
    pub fn with_url_alignment(url_alignment: UrlAlignment) -> Self {
        Self {
            url_alignment,
            ..Default::default()
        }
    }
}
