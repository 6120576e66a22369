//! Validated per-file records

use crate::error::{Error, Result};
use crate::fields;
use crate::hash::Hash;
use serde::Serialize;

/// One file referenced by an update manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntity {
    file_id: String,
    target_filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    download_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arguments: Option<String>,
    hashes: Vec<Hash>,
    size_in_bytes: u64,
}

impl FileEntity {
    /// Start building a file entity
    pub fn builder() -> FileEntityBuilder {
        FileEntityBuilder::default()
    }

    /// Key of this file in the manifest `files` object
    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    /// Name the file is stored under on the device
    pub fn target_filename(&self) -> &str {
        &self.target_filename
    }

    /// Download location; absent when resuming install or apply
    pub fn download_uri(&self) -> Option<&str> {
        self.download_uri.as_deref()
    }

    /// Handler arguments for down-level update handlers
    pub fn arguments(&self) -> Option<&str> {
        self.arguments.as_deref()
    }

    /// Declared hashes, never empty
    pub fn hashes(&self) -> &[Hash] {
        &self.hashes
    }

    /// Declared size; 0 when the manifest omits it
    pub fn size_in_bytes(&self) -> u64 {
        self.size_in_bytes
    }

    /// Declared hash for an algorithm (ASCII case-insensitive)
    pub fn hash(&self, algorithm: &str) -> Option<&Hash> {
        self.hashes
            .iter()
            .find(|h| h.hash_type().eq_ignore_ascii_case(algorithm))
    }
}

/// Builder that validates and assembles a [`FileEntity`]
#[derive(Debug, Clone, Default)]
pub struct FileEntityBuilder {
    file_id: Option<String>,
    target_filename: Option<String>,
    download_uri: Option<String>,
    arguments: Option<String>,
    hashes: Vec<Hash>,
    size_in_bytes: u64,
}

impl FileEntityBuilder {
    pub fn file_id<S: Into<String>>(mut self, file_id: S) -> Self {
        self.file_id = Some(file_id.into());
        self
    }

    pub fn target_filename<S: Into<String>>(mut self, target_filename: S) -> Self {
        self.target_filename = Some(target_filename.into());
        self
    }

    /// `None` is valid: it models a resumed install/apply with no URL
    pub fn download_uri(mut self, download_uri: Option<String>) -> Self {
        self.download_uri = download_uri;
        self
    }

    pub fn arguments(mut self, arguments: Option<String>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Hand over the parsed hash set; the entity takes ownership
    pub fn hashes(mut self, hashes: Vec<Hash>) -> Self {
        self.hashes = hashes;
        self
    }

    pub fn size_in_bytes(mut self, size_in_bytes: u64) -> Self {
        self.size_in_bytes = size_in_bytes;
        self
    }

    /// Validate required parts and produce the entity
    pub fn build(self) -> Result<FileEntity> {
        let file_id = non_empty(self.file_id).ok_or_else(|| Error::missing_field("fileId"))?;
        let target_filename = non_empty(self.target_filename)
            .ok_or_else(|| Error::missing_field(fields::FILE_NAME))?;

        if self.hashes.is_empty() {
            return Err(Error::missing_field(fields::HASHES));
        }

        Ok(FileEntity {
            file_id,
            target_filename,
            download_uri: self.download_uri,
            arguments: self.arguments,
            hashes: self.hashes,
            size_in_bytes: self.size_in_bytes,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
