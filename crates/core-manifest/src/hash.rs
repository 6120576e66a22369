//! Declared file hashes
//!
//! A file's `hashes` object maps algorithm names to encoded digests. Values
//! are stored as declared; digest verification happens after download.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

/// One declared digest of a file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Hash {
    /// Algorithm token, e.g. "sha256"
    #[serde(rename = "type")]
    hash_type: String,

    /// Encoded digest, opaque at this layer
    value: String,
}

impl Hash {
    /// Create a hash; algorithm and value must both be non-empty
    pub fn new<T: Into<String>, V: Into<String>>(hash_type: T, value: V) -> Result<Self> {
        let hash_type = hash_type.into();
        let value = value.into();

        if hash_type.is_empty() {
            return Err(Error::InvalidHash {
                algorithm: hash_type,
                reason: "empty algorithm name",
            });
        }
        if value.is_empty() {
            return Err(Error::InvalidHash {
                algorithm: hash_type,
                reason: "empty value",
            });
        }

        Ok(Self { hash_type, value })
    }

    /// Algorithm token
    pub fn hash_type(&self) -> &str {
        &self.hash_type
    }

    /// Encoded digest
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Build one hash from an `algorithm -> value` entry
pub fn parse_hash_entry(algorithm: &str, value: &Value) -> Result<Hash> {
    let Some(encoded) = value.as_str() else {
        error!(algorithm, "Hash value is not a string");
        return Err(Error::InvalidHash {
            algorithm: algorithm.to_string(),
            reason: "value is not a string",
        });
    };

    Hash::new(algorithm, encoded).inspect_err(|e| error!(error = %e, "Invalid hash entry"))
}

/// Build the full hash set of a file, preserving declaration order
///
/// Fails with [`Error::NoHashes`] on an empty object. Any bad entry fails the
/// whole set; hashes built before it are dropped with the buffer.
pub fn parse_hashes(hashes: &Map<String, Value>) -> Result<Vec<Hash>> {
    if hashes.is_empty() {
        error!("No hashes.");
        return Err(Error::NoHashes);
    }

    let mut parsed = Vec::new();
    parsed
        .try_reserve_exact(hashes.len())
        .map_err(|source| Error::Allocation {
            what: "hash set",
            source,
        })?;

    for (algorithm, value) in hashes {
        parsed.push(parse_hash_entry(algorithm, value)?);
    }

    Ok(parsed)
}
