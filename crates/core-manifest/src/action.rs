//! Whole-action ingestion
//!
//! Entry points that take the outer update action, extract the embedded
//! manifest once, and hand back fully validated structures. The extracted
//! manifest document is dropped before returning on every path.

use crate::error::Result;
use crate::files::{parse_file_entities, FileEntityCollection};
use crate::options::ParseOptions;
use crate::root::{check_action_depth, extract_manifest_root, parse_action_document};
use crate::update_id::UpdateIdentity;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Validated contents of one update action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAction {
    /// Identity of the update
    pub update_id: UpdateIdentity,

    /// Declared files, in manifest order
    pub files: FileEntityCollection,
}

/// Parse identity and files from an update action document
pub fn ingest(action: &Value, options: &ParseOptions) -> Result<UpdateAction> {
    check_action_depth(action, &options.limits)?;
    ingest_bounded(action, options)
}

/// Parse an update action from its JSON text
pub fn ingest_str(text: &str, options: &ParseOptions) -> Result<UpdateAction> {
    let action = parse_action_document(text, &options.limits)?;
    ingest_bounded(&action, options)
}

/// Parse only the update identity of an update action
pub fn parse_update_id(action: &Value, options: &ParseOptions) -> Result<UpdateIdentity> {
    check_action_depth(action, &options.limits)?;
    let manifest = extract_manifest_root(action, &options.limits)?;
    UpdateIdentity::from_manifest(&manifest)
}

/// Parse only the update identity from the JSON text of an update action
pub fn parse_update_id_str(text: &str, options: &ParseOptions) -> Result<UpdateIdentity> {
    let action = parse_action_document(text, &options.limits)?;
    let manifest = extract_manifest_root(&action, &options.limits)?;
    UpdateIdentity::from_manifest(&manifest)
}

/// Parse only the files of an update action
pub fn parse_files(action: &Value, options: &ParseOptions) -> Result<FileEntityCollection> {
    check_action_depth(action, &options.limits)?;
    let manifest = extract_manifest_root(action, &options.limits)?;
    parse_file_entities(&manifest, action, options)
}

// `action` is already depth-checked
fn ingest_bounded(action: &Value, options: &ParseOptions) -> Result<UpdateAction> {
    let manifest = extract_manifest_root(action, &options.limits)?;

    let update_id = UpdateIdentity::from_manifest(&manifest)?;
    let files = parse_file_entities(&manifest, action, options)?;

    debug!(update_id = %update_id, files = files.len(), "Ingested update action");
    Ok(UpdateAction { update_id, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn action(manifest: Value, file_urls: Value) -> Value {
        json!({
            "updateManifest": manifest.to_string(),
            "fileUrls": file_urls,
        })
    }

    fn sample() -> Value {
        action(
            json!({
                "updateId": { "provider": "Azure", "name": "IOT-Firmware", "version": "1.2.0.0" },
                "files": {
                    "0001": { "fileName": "agent.deb", "hashes": { "sha256": "AAAA" } }
                }
            }),
            json!({ "0001": "https://example/agent.deb" }),
        )
    }

    #[test]
    fn test_end_to_end() {
        let update = ingest(&sample(), &ParseOptions::default()).unwrap();

        assert_eq!(update.update_id.provider(), "Azure");
        assert_eq!(update.update_id.name(), "IOT-Firmware");
        assert_eq!(update.update_id.version(), "1.2.0.0");

        assert_eq!(update.files.len(), 1);
        let file = update.files.get(0).unwrap();
        assert_eq!(file.file_id(), "0001");
        assert_eq!(file.target_filename(), "agent.deb");
        assert_eq!(file.download_uri(), Some("https://example/agent.deb"));
        assert_eq!(file.hashes().len(), 1);
        assert_eq!(file.hashes()[0].hash_type(), "sha256");
        assert_eq!(file.hashes()[0].value(), "AAAA");
        assert_eq!(file.size_in_bytes(), 0);
    }

    #[test]
    fn test_ingest_str() {
        let text = sample().to_string();
        let update = ingest_str(&text, &ParseOptions::default()).unwrap();
        assert_eq!(update.update_id.to_string(), "Azure/IOT-Firmware:1.2.0.0");
    }

    #[test]
    fn test_missing_update_id_fails_even_with_valid_files() {
        let doc = action(
            json!({ "files": { "0001": { "fileName": "a", "hashes": { "sha256": "A" } } } }),
            json!({ "0001": "u" }),
        );

        let err = parse_update_id(&doc, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert!(parse_files(&doc, &ParseOptions::default()).is_ok());
        assert!(ingest(&doc, &ParseOptions::default()).is_err());
    }

    #[test]
    fn test_missing_manifest() {
        let err = ingest(&json!({ "fileUrls": { "a": "u" } }), &ParseOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }

    // Outer action text whose embedded manifest is `manifest_text` verbatim
    fn action_text(manifest_text: &str, file_urls_text: &str) -> String {
        format!(
            r#"{{"updateManifest": {}, "fileUrls": {}}}"#,
            Value::String(manifest_text.to_string()),
            file_urls_text
        )
    }

    const UPDATE_ID: &str = r#""updateId": {"provider": "Azure", "name": "IOT-Firmware", "version": "1.2.0.0"}"#;

    #[test]
    fn test_repeated_hash_algorithm_rejected() {
        let manifest = format!(
            r#"{{{UPDATE_ID}, "files": {{"a": {{"fileName": "a.bin", "hashes": {{"sha256": "GOOD", "sha256": "EVIL"}}}}}}}}"#
        );
        let text = action_text(&manifest, r#"{"a": "u-a"}"#);

        let err = ingest_str(&text, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
        assert!(err.to_string().contains("sha256"));
    }

    #[test]
    fn test_repeated_file_id_rejected() {
        let manifest = format!(
            r#"{{{UPDATE_ID}, "files": {{
                "a": {{"fileName": "a.bin", "hashes": {{"sha256": "A"}}}},
                "a": {{"fileName": "evil.bin", "hashes": {{"sha256": "E"}}}}
            }}}}"#
        );
        let text = action_text(&manifest, r#"{"a": "u-a", "b": "u-b"}"#);

        let err = ingest_str(&text, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    }

    #[test]
    fn test_repeated_file_url_key_rejected() {
        let manifest = format!(
            r#"{{{UPDATE_ID}, "files": {{
                "a": {{"fileName": "a.bin", "hashes": {{"sha256": "A"}}}},
                "b": {{"fileName": "b.bin", "hashes": {{"sha256": "B"}}}}
            }}}}"#
        );
        let text = action_text(&manifest, r#"{"a": "u-a1", "b": "u-b", "a": "u-a2"}"#);

        let err = ingest_str(&text, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
        assert!(err.to_string().contains("update action"));

        let clean = action_text(&manifest, r#"{"a": "u-a", "b": "u-b"}"#);
        let update = ingest_str(&clean, &ParseOptions::default()).unwrap();
        assert_eq!(update.files.len(), 2);
    }

    #[test]
    fn test_parse_update_id_str() {
        let text = sample().to_string();
        let id = parse_update_id_str(&text, &ParseOptions::default()).unwrap();
        assert_eq!(id.name(), "IOT-Firmware");
    }

    #[test]
    fn test_value_entry_points_bound_action_depth() {
        let mut doc = sample();
        let mut deep = json!(1);
        for _ in 0..40 {
            deep = json!([deep]);
        }
        doc["extra"] = deep;

        let options = ParseOptions::default();
        assert_eq!(ingest(&doc, &options).unwrap_err().kind(), ErrorKind::LimitExceeded);
        assert_eq!(parse_files(&doc, &options).unwrap_err().kind(), ErrorKind::LimitExceeded);
        assert_eq!(
            parse_update_id(&doc, &options).unwrap_err().kind(),
            ErrorKind::LimitExceeded
        );
    }

    #[test]
    fn test_serialized_shape() {
        let update = ingest(&sample(), &ParseOptions::default()).unwrap();
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["updateId"]["provider"], "Azure");
        assert_eq!(value["files"][0]["fileId"], "0001");
        assert_eq!(value["files"][0]["hashes"][0]["type"], "sha256");
    }
}
