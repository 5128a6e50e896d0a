use crate::schema::{OwnershipConfig, TouchPolicy};
use globset::GlobBuilder;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const OWNERSHIP_CONFIG_PATH: &str = ".vibe/ownership.json";
pub const CHANGES_DIR: &str = ".vibe/changes";
pub const REPORTS_DIR: &str = ".vibe/reports";

/// Top-level keys a complete ownership document declares.
pub const REQUIRED_CONFIG_KEYS: [&str; 6] = [
    "ai_owned_globs",
    "human_owned_globs",
    "contract_owned_globs",
    "blocked_globs",
    "require_manifest_for_globs",
    "require_touch_enforcement",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PolicyValidationError(pub String);

#[must_use]
pub fn ownership_config_path(root: &Path) -> PathBuf {
    root.join(OWNERSHIP_CONFIG_PATH)
}

/// Decode an ownership document and check that every glob compiles.
pub fn parse_ownership_config(text: &str) -> Result<OwnershipConfig, PolicyValidationError> {
    let config: OwnershipConfig = serde_json::from_str(text)
        .map_err(|e| PolicyValidationError(format!("decode ownership config failed: {e}")))?;
    validate_globs(&config)?;
    Ok(config)
}

/// Touch fields decoded one at a time, plus every entry that was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchPolicyDecode {
    pub policy: TouchPolicy,
    pub dropped: Vec<PolicyValidationError>,
}

/// Lenient decode of the touch fields. Only a document that is not a JSON
/// object fails; a bad field or glob entry is dropped and the rest is kept.
pub fn decode_touch_policy(text: &str) -> Result<TouchPolicyDecode, PolicyValidationError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| PolicyValidationError(format!("decode touch policy failed: {e}")))?;
    let root = value
        .as_object()
        .ok_or_else(|| PolicyValidationError("touch policy must be an object".to_string()))?;
    let mut dropped = Vec::new();

    let require_touch_enforcement = match root.get("require_touch_enforcement") {
        None | Some(Value::Null) => None,
        Some(Value::Bool(flag)) => Some(*flag),
        Some(other) => {
            dropped.push(PolicyValidationError(format!(
                "require_touch_enforcement must be a boolean, found {other}"
            )));
            None
        }
    };

    let mut touch_exempt = Vec::new();
    match root.get("touch_exempt_globs").or_else(|| root.get("touch_exempt")) {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for item in items {
                let Some(pattern) = item.as_str() else {
                    dropped.push(PolicyValidationError(format!(
                        "touch_exempt_globs entry {item} is not a string"
                    )));
                    continue;
                };
                match compile_check("touch_exempt_globs", pattern) {
                    Ok(()) => touch_exempt.push(pattern.to_string()),
                    Err(err) => dropped.push(err),
                }
            }
        }
        Some(other) => dropped.push(PolicyValidationError(format!(
            "touch_exempt_globs must be a list, found {other}"
        ))),
    }

    Ok(TouchPolicyDecode {
        policy: TouchPolicy {
            touch_exempt,
            require_touch_enforcement,
        },
        dropped,
    })
}

pub fn parse_touch_policy(text: &str) -> Result<TouchPolicy, PolicyValidationError> {
    decode_touch_policy(text).map(|decoded| decoded.policy)
}

/// Required keys absent from the document, in declaration order.
pub fn missing_config_keys(text: &str) -> Result<Vec<&'static str>, PolicyValidationError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| PolicyValidationError(format!("parse ownership config failed: {e}")))?;
    let root = value
        .as_object()
        .ok_or_else(|| PolicyValidationError("ownership config must be an object".to_string()))?;
    Ok(REQUIRED_CONFIG_KEYS
        .into_iter()
        .filter(|key| !root.contains_key(*key))
        .collect())
}

pub fn canonical_config_json(config: &OwnershipConfig) -> Result<String, PolicyValidationError> {
    let value = serde_json::to_value(config)
        .map_err(|e| PolicyValidationError(format!("encode ownership config failed: {e}")))?;
    // `serde_json::Map` is key-ordered, so printing the value sorts every object.
    serde_json::to_string_pretty(&value)
        .map_err(|e| PolicyValidationError(format!("print ownership config failed: {e}")))
}

fn validate_globs(config: &OwnershipConfig) -> Result<(), PolicyValidationError> {
    for (key, patterns) in config.glob_lists() {
        for pattern in patterns {
            compile_check(key, pattern)?;
        }
    }
    Ok(())
}

fn compile_check(key: &str, pattern: &str) -> Result<(), PolicyValidationError> {
    if pattern.trim().is_empty() {
        return Err(PolicyValidationError(format!("{key} contains an empty glob")));
    }
    GlobBuilder::new(&pattern.replace('\\', "/"))
        .literal_separator(true)
        .build()
        .map(|_| ())
        .map_err(|e| PolicyValidationError(format!("{key} contains invalid glob `{pattern}`: {e}")))
}
