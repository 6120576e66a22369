//! Update identity (provider, name, version)

use crate::error::{Error, Result};
use crate::fields;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::error;

/// Identity of an update; downstream components use it as an idempotence key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIdentity {
    provider: String,
    name: String,
    version: String,
}

impl UpdateIdentity {
    /// Create an identity; all three parts must be non-empty
    pub fn new<P, N, V>(provider: P, name: N, version: V) -> Result<Self>
    where
        P: Into<String>,
        N: Into<String>,
        V: Into<String>,
    {
        let provider = provider.into();
        let name = name.into();
        let version = version.into();

        for (field, value) in [
            (fields::PROVIDER, &provider),
            (fields::NAME, &name),
            (fields::VERSION, &version),
        ] {
            if value.is_empty() {
                return Err(Error::missing_field(format!("{}.{}", fields::UPDATE_ID, field)));
            }
        }

        Ok(Self {
            provider,
            name,
            version,
        })
    }

    /// Read the `updateId` object of a parsed manifest
    pub fn from_manifest(manifest: &Value) -> Result<Self> {
        let Some(update_id) = manifest.get(fields::UPDATE_ID).filter(|v| v.is_object()) else {
            error!("Update manifest does not include an updateId object");
            return Err(Error::missing_field(fields::UPDATE_ID));
        };

        let provider = required_str(update_id, fields::PROVIDER)?;
        let name = required_str(update_id, fields::NAME)?;
        let version = required_str(update_id, fields::VERSION)?;

        Self::new(provider, name, version)
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

fn required_str<'a>(update_id: &'a Value, field: &str) -> Result<&'a str> {
    match update_id.get(field).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => {
            error!(field, "Missing required updateId field");
            Err(Error::missing_field(format!("{}.{}", fields::UPDATE_ID, field)))
        }
    }
}

impl fmt::Display for UpdateIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.provider, self.name, self.version)
    }
}
