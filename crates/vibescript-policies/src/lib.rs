#![forbid(unsafe_code)]

mod schema;
mod validate;

pub use schema::{OwnershipConfig, TouchPolicy, GOVERNANCE_DIR};
pub use validate::{
    canonical_config_json, decode_touch_policy, missing_config_keys, ownership_config_path,
    parse_ownership_config, parse_touch_policy, PolicyValidationError, TouchPolicyDecode,
    CHANGES_DIR, OWNERSHIP_CONFIG_PATH, REPORTS_DIR, REQUIRED_CONFIG_KEYS,
};

pub const CRATE_NAME: &str = "vibescript-policies";
