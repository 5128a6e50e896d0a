#![forbid(unsafe_code)]
//! Governance evaluation for vibescript repositories.
//!
//! Every check here is a pure function of the change set, file contents read
//! through the [`ports::Fs`] port, and the ownership configuration value.

pub mod directives;
pub mod doctor;
pub mod glob;
pub mod guard;
pub mod language;
pub mod manifest;
pub mod ownership;
pub mod ports;
pub mod report;
pub mod touch;

pub use directives::{
    missing_directives, parse_directives, render_directive, touch_globs, validate_directives,
};
pub use doctor::{diagnose, summarize};
pub use glob::{filter_by_globs, find_first_match, matches, matches_any, parse_glob_list};
pub use guard::{guard, load_ownership_config, run_guard, ConfigFault};
pub use language::{comment_prefix_for, is_task_file, is_test_file, Language, LanguageSpec};
pub use manifest::{
    draft_manifest, latest_manifest, list_manifests, manifest_file_name, parse_manifest_file_name,
    render_manifest, slugify, validate_manifest, ManifestDraft, ManifestError,
};
pub use ownership::classify;
pub use ports::{resolve_base_ref, AdapterError, Fs, FsWrite, Git, MemoryFs};
pub use report::{create_report, render_fix_summary, render_json, render_text, report_path};
pub use touch::{check_touch, load_touch_policy, run_touch_check, suggest_touch_pattern, task_files};

pub const CRATE_NAME: &str = "vibescript-core";
