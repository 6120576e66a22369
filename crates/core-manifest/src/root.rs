//! Extraction of the embedded update manifest
//!
//! The update action carries its manifest as a JSON-encoded string under
//! `updateManifest`. Extraction re-parses that string into an owned document
//! that lives only as long as the caller keeps it.

use crate::error::{Error, Result};
use crate::fields;
use crate::options::ParseLimits;
use serde_json::Value;
use tracing::error;

/// Name used for the outer document in diagnostics
pub const ACTION_DOCUMENT: &str = "update action";

/// Name used for the embedded manifest in diagnostics
pub const MANIFEST_DOCUMENT: &str = "update manifest";

/// Parse the outer update action text into a JSON object
pub fn parse_action_document(text: &str, limits: &ParseLimits) -> Result<Value> {
    let action = limits.parse(ACTION_DOCUMENT, text)?;
    if !action.is_object() {
        error!("Update action is not a JSON object");
        return Err(Error::malformed(ACTION_DOCUMENT, "expected a JSON object"));
    }
    Ok(action)
}

/// Bound the nesting of an update action that did not come through
/// [`parse_action_document`]
pub fn check_action_depth(action: &Value, limits: &ParseLimits) -> Result<()> {
    limits.check_depth(ACTION_DOCUMENT, action)
}

/// Extract and parse the manifest embedded in an update action
///
/// Only the embedded manifest is bounded here. The action itself is bounded
/// by [`parse_action_document`], or by [`check_action_depth`] when the caller
/// built the value some other way.
pub fn extract_manifest_root(action: &Value, limits: &ParseLimits) -> Result<Value> {
    let Some(text) = action.get(fields::UPDATE_MANIFEST).and_then(Value::as_str) else {
        error!(
            field = fields::UPDATE_MANIFEST,
            "Update action does not include an updateManifest string"
        );
        return Err(Error::missing_field(fields::UPDATE_MANIFEST));
    };

    let manifest = limits.parse(MANIFEST_DOCUMENT, text).inspect_err(|e| {
        error!(error = %e, "updateManifest is invalid");
    })?;

    if !manifest.is_object() {
        error!("updateManifest is not a JSON object");
        return Err(Error::malformed(MANIFEST_DOCUMENT, "expected a JSON object"));
    }

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_extracts_embedded_manifest() {
        let action = json!({
            "updateManifest": "{\"updateId\":{\"provider\":\"Azure\"}}",
        });
        let manifest = extract_manifest_root(&action, &ParseLimits::default()).unwrap();
        assert_eq!(manifest["updateId"]["provider"], "Azure");
    }

    #[test]
    fn test_missing_manifest_field() {
        let action = json!({ "fileUrls": {} });
        let err = extract_manifest_root(&action, &ParseLimits::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.to_string(), "Missing required field: updateManifest");
    }

    #[test]
    fn test_manifest_field_not_a_string() {
        let action = json!({ "updateManifest": { "updateId": {} } });
        let err = extract_manifest_root(&action, &ParseLimits::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }

    #[test]
    fn test_manifest_string_not_json() {
        let action = json!({ "updateManifest": "{\"updateId\": " });
        let err = extract_manifest_root(&action, &ParseLimits::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    }

    #[test]
    fn test_manifest_not_an_object() {
        let action = json!({ "updateManifest": "[1, 2, 3]" });
        let err = extract_manifest_root(&action, &ParseLimits::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    }

    #[test]
    fn test_oversized_manifest_string() {
        let limits = ParseLimits {
            max_document_bytes: 16,
            ..Default::default()
        };
        let action = json!({ "updateManifest": format!("{{\"pad\":\"{}\"}}", "x".repeat(64)) });
        let err = extract_manifest_root(&action, &limits).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    }

    #[test]
    fn test_action_depth_checked_separately() {
        let limits = ParseLimits {
            max_nesting_depth: 3,
            ..Default::default()
        };
        let action = json!({
            "updateManifest": "{}",
            "extra": { "a": { "b": { "c": 1 } } },
        });

        assert!(extract_manifest_root(&action, &limits).is_ok());
        let err = check_action_depth(&action, &limits).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    }

    #[test]
    fn test_parse_action_document_bounds_depth() {
        let limits = ParseLimits {
            max_nesting_depth: 2,
            ..Default::default()
        };
        let err = parse_action_document(r#"{"a": {"b": {}}}"#, &limits).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    }

    #[test]
    fn test_parse_action_document() {
        let action = parse_action_document(r#"{"updateManifest":"{}"}"#, &ParseLimits::default())
            .unwrap();
        assert!(action.get("updateManifest").is_some());

        let err = parse_action_document("42", &ParseLimits::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);

        let err = parse_action_document("{", &ParseLimits::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    }
}
