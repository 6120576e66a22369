//! File entity collection parsing
//!
//! Files are declared in the manifest's `files` object; their download URLs
//! sit in the sibling `fileUrls` object of the update action. The two are
//! paired by enumeration position, not by key. Bundle updates carry more URLs
//! than manifest files, so only the first `files.len()` URLs are consulted.

use crate::error::{Error, Result};
use crate::fields;
use crate::file_entity::FileEntity;
use crate::hash::parse_hashes;
use crate::options::{ParseOptions, UrlAlignment};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

/// Ordered, validated files of one update, index-aligned with `files`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileEntityCollection {
    files: Vec<FileEntity>,
}

impl FileEntityCollection {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FileEntity> {
        self.files.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileEntity> {
        self.files.iter()
    }

    pub fn as_slice(&self) -> &[FileEntity] {
        &self.files
    }

    /// Look up a file by its manifest key
    pub fn find(&self, file_id: &str) -> Option<&FileEntity> {
        self.files.iter().find(|f| f.file_id() == file_id)
    }

    /// Sum of declared sizes (saturating)
    pub fn total_size_in_bytes(&self) -> u64 {
        self.files
            .iter()
            .fold(0u64, |acc, f| acc.saturating_add(f.size_in_bytes()))
    }

    pub fn into_vec(self) -> Vec<FileEntity> {
        self.files
    }
}

impl IntoIterator for FileEntityCollection {
    type Item = FileEntity;
    type IntoIter = std::vec::IntoIter<FileEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileEntityCollection {
    type Item = &'a FileEntity;
    type IntoIter = std::slice::Iter<'a, FileEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Build every file entity declared by `manifest`, resolving URLs from `action`
///
/// All-or-nothing: on any failure the entities built so far are dropped and
/// the error names the offending file.
pub fn parse_file_entities(
    manifest: &Value,
    action: &Value,
    options: &ParseOptions,
) -> Result<FileEntityCollection> {
    let files = required_object(manifest, fields::FILES)?;
    let file_urls = required_object(action, fields::FILE_URLS)?;

    if file_urls.len() < files.len() {
        error!(
            file_urls = file_urls.len(),
            files = files.len(),
            "File URLs count is less than manifest files count"
        );
        return Err(Error::CountMismatch {
            files: files.len(),
            file_urls: file_urls.len(),
        });
    }

    let mut entities = Vec::new();
    entities
        .try_reserve_exact(files.len())
        .map_err(|source| Error::Allocation {
            what: "file entities",
            source,
        })?;

    for (index, ((file_id, file), (url_key, url))) in
        files.iter().zip(file_urls.iter()).enumerate()
    {
        let entity = parse_file_entry(index, file_id, file, url_key, url, options)
            .map_err(|e| e.in_file(index, file_id.as_str()))?;
        entities.push(entity);
    }

    debug!(count = entities.len(), "Parsed file entities");
    Ok(FileEntityCollection { files: entities })
}

fn parse_file_entry(
    index: usize,
    file_id: &str,
    file: &Value,
    url_key: &str,
    url: &Value,
    options: &ParseOptions,
) -> Result<FileEntity> {
    // An entry that is not an object has no hash object either
    let Some(file) = file.as_object() else {
        error!(index, file_id, "No hash for file");
        return Err(Error::NoHashes);
    };

    let download_uri = resolve_download_uri(index, file_id, url_key, url, options.url_alignment)?;

    let hashes = match file.get(fields::HASHES) {
        Some(Value::Object(hashes)) => parse_hashes(hashes)?,
        _ => {
            error!(index, file_id, "No hash for file");
            return Err(Error::NoHashes);
        }
    };

    let arguments = match file.get(fields::ARGUMENTS) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            return Err(Error::invalid_field(fields::ARGUMENTS, "expected a string"));
        }
    };

    let size_in_bytes = parse_size(file.get(fields::SIZE_IN_BYTES))?;

    let mut builder = FileEntity::builder()
        .file_id(file_id)
        .download_uri(download_uri)
        .arguments(arguments)
        .hashes(hashes)
        .size_in_bytes(size_in_bytes);
    if let Some(name) = file.get(fields::FILE_NAME).and_then(Value::as_str) {
        builder = builder.target_filename(name);
    }

    builder
        .build()
        .inspect_err(|e| error!(index, file_id, error = %e, "Invalid file arguments"))
}

fn resolve_download_uri(
    index: usize,
    file_id: &str,
    url_key: &str,
    url: &Value,
    alignment: UrlAlignment,
) -> Result<Option<String>> {
    if url_key != file_id {
        match alignment {
            UrlAlignment::Positional => {
                warn!(
                    index,
                    file_id, url_key, "fileUrls key differs from file id, using positional URL"
                );
            }
            UrlAlignment::Strict => {
                error!(index, file_id, url_key, "fileUrls key differs from file id");
                return Err(Error::UrlMismatch {
                    index,
                    file_id: file_id.to_string(),
                    url_key: url_key.to_string(),
                });
            }
        }
    }

    match url.as_str() {
        Some(uri) if !uri.is_empty() => Ok(Some(uri.to_string())),
        _ => {
            warn!(index, file_id, "No download URL for file");
            Ok(None)
        }
    }
}

/// Declared size: integer, integral float, or decimal string; absent is 0
fn parse_size(value: Option<&Value>) -> Result<u64> {
    let invalid = || Error::invalid_field(fields::SIZE_IN_BYTES, "expected a non-negative integer");

    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .filter(|f| *f <= u64::MAX as f64)
                    .map(|f| f as u64)
            })
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<u64>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn required_object<'a>(document: &'a Value, field: &'static str) -> Result<&'a Map<String, Value>> {
    let Some(map) = document.get(field).and_then(Value::as_object) else {
        error!(field, "Invalid json - field missing or incorrect");
        return Err(Error::missing_field(field));
    };

    if map.is_empty() {
        error!(field, "An update must declare at least one file");
        return Err(Error::EmptyCollection { field });
    }

    Ok(map)
}
