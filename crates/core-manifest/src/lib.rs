//! Update manifest ingestion for the OTA agent
//!
//! An update action arrives as JSON carrying a string-encoded manifest
//! (`updateManifest`) and a sibling map of download URLs (`fileUrls`). This
//! crate turns that untrusted payload into validated values before any
//! download or install step may run.
//!
//! # Key Concepts
//!
//! - **Update identity**: provider/name/version triple naming the update
//! - **File entity**: one declared file with its URL, hashes, and size
//! - **All-or-nothing**: a failed parse never returns partial results
//!
//! # Example
//!
//! ```no_run
//! use ota_core_manifest::{ingest_str, ParseOptions};
//!
//! let text = std::fs::read_to_string("action.json").unwrap();
//! let update = ingest_str(&text, &ParseOptions::default()).unwrap();
//! println!("{} declares {} files", update.update_id, update.files.len());
//! ```

pub mod action;
pub mod error;
pub mod file_entity;
pub mod files;
pub mod hash;
pub mod json;
pub mod options;
pub mod root;
pub mod update_id;

// Re-export main types for convenience
pub use action::{
    ingest, ingest_str, parse_files, parse_update_id, parse_update_id_str, UpdateAction,
};
pub use error::{Error, ErrorKind, Result};
pub use file_entity::{FileEntity, FileEntityBuilder};
pub use files::{parse_file_entities, FileEntityCollection};
pub use hash::{parse_hash_entry, parse_hashes, Hash};
pub use options::{ParseLimits, ParseOptions, UrlAlignment};
pub use root::{check_action_depth, extract_manifest_root, parse_action_document};
pub use update_id::UpdateIdentity;

/// JSON field names of the update action and manifest
pub mod fields {
    pub const UPDATE_MANIFEST: &str = "updateManifest";
    pub const FILE_URLS: &str = "fileUrls";
    pub const UPDATE_ID: &str = "updateId";
    pub const PROVIDER: &str = "provider";
    pub const NAME: &str = "name";
    pub const VERSION: &str = "version";
    pub const FILES: &str = "files";
    pub const FILE_NAME: &str = "fileName";
    pub const SIZE_IN_BYTES: &str = "sizeInBytes";
    pub const ARGUMENTS: &str = "arguments";
    pub const HASHES: &str = "hashes";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(fields::UPDATE_MANIFEST, "updateManifest");
        assert_eq!(fields::FILE_URLS, "fileUrls");
        assert_eq!(fields::SIZE_IN_BYTES, "sizeInBytes");
    }
}
