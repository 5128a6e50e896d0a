// SPDX-License-Identifier: Apache-2.0
//! Ownership guard over a change set.
//!
//! The guard is fail-closed: without a valid ownership document no per-file
//! checks run and the caller receives a [`ConfigFault`] instead of violations.

use std::path::{Path, PathBuf};

use vibescript_model::{OwnershipCategory, Violation, ViolationKind, ALLOW_HUMAN_EDITS};
use vibescript_policies::{parse_ownership_config, OwnershipConfig, OWNERSHIP_CONFIG_PATH};

use crate::directives::{parse_directives, render_directive};
use crate::glob::{find_first_match, matches_any, normalize_separators};
use crate::language::{comment_prefix_for, is_test_file};
use crate::ownership::classify;
use crate::ports::Fs;

const GOVERNANCE_PREFIX: &str = ".vibe/";
const CHANGES_SEGMENT: &str = ".vibe/changes/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigFault {
    #[error("ownership config not found at {}", path.display())]
    Missing { path: PathBuf },
    #[error("ownership config unreadable at {}: {detail}", path.display())]
    Unreadable { path: PathBuf, detail: String },
    #[error("ownership config invalid at {}: {detail}", path.display())]
    Invalid { path: PathBuf, detail: String },
}

pub fn load_ownership_config(fs: &dyn Fs, repo_root: &Path) -> Result<OwnershipConfig, ConfigFault> {
    let rel = Path::new(OWNERSHIP_CONFIG_PATH);
    let path = repo_root.join(rel);
    if !fs.exists(repo_root, rel) {
        return Err(ConfigFault::Missing { path });
    }
    let text = fs
        .read_text(repo_root, rel)
        .map_err(|e| ConfigFault::Unreadable {
            path: path.clone(),
            detail: e.to_string(),
        })?;
    parse_ownership_config(&text).map_err(|e| ConfigFault::Invalid {
        path,
        detail: e.to_string(),
    })
}

fn is_governance_internal(file: &str) -> bool {
    file.starts_with(GOVERNANCE_PREFIX) && !file.contains(CHANGES_SEGMENT)
}

pub fn guard(
    fs: &dyn Fs,
    repo_root: &Path,
    changed_files: &[String],
    config: &OwnershipConfig,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut contract_files: Vec<&str> = Vec::new();
    let has_new_manifest = changed_files
        .iter()
        .any(|file| normalize_separators(file).contains(CHANGES_SEGMENT));

    for file in changed_files {
        if is_governance_internal(&normalize_separators(file)) {
            tracing::debug!(file = %file, "governance internal, skipped");
            continue;
        }

        let category = classify(file, config);
        tracing::debug!(file = %file, category = category.as_str(), "classified");

        match category {
            OwnershipCategory::Exempt => continue,
            OwnershipCategory::Blocked => {
                let glob = find_first_match(file, &config.blocked).unwrap_or_default();
                violations.push(
                    Violation::new(
                        file.as_str(),
                        ViolationKind::BlockedFile,
                        "This file is in a blocked location and cannot be modified",
                    )
                    .with_details(format!(
                        "Matched blocked glob: {glob}\nFIX: Don't modify files in blocked paths (dist/, node_modules/, etc.)"
                    )),
                );
                continue;
            }
            OwnershipCategory::Unowned => {
                violations.push(
                    Violation::new(file.as_str(), ViolationKind::UnownedFile, "File matches no ownership glob")
                        .with_details(
                            "FIX: Either:\n  1. Add to guard_exempt_globs in .vibe/ownership.json (for docs/config)\n  2. Rename to a governed suffix (.vibe, .human or .lock)\n  3. Add a matching pattern to ai_owned_globs",
                        ),
                );
                continue;
            }
            OwnershipCategory::Human => {
                if let Some(violation) = check_human_owned(fs, repo_root, file) {
                    violations.push(violation);
                }
            }
            OwnershipCategory::Contract => contract_files.push(file.as_str()),
            OwnershipCategory::Ai => {}
        }

        if !has_new_manifest && matches_any(file, &config.manifest_required) {
            violations.push(
                Violation::new(file.as_str(), ViolationKind::MissingManifest, "File requires a change manifest")
                    .with_details(
                        "FIX: Create a manifest before committing:\n  vibescript manifest new \"description-of-change\"",
                    ),
            );
        }
    }

    if !contract_files.is_empty() && !changed_files.iter().any(|f| is_test_file(f)) {
        for file in contract_files {
            violations.push(
                Violation::new(
                    file,
                    ViolationKind::ContractNoTest,
                    "Contract-owned file changed without accompanying test changes",
                )
                .with_details(
                    "FIX: Add or modify a test file for this change\nContract files are critical interfaces that require test coverage.",
                ),
            );
        }
    }

    violations
}

fn check_human_owned(fs: &dyn Fs, repo_root: &Path, file: &str) -> Option<Violation> {
    let rel = Path::new(file);
    if !fs.exists(repo_root, rel) {
        return None;
    }
    let content = match fs.read_text(repo_root, rel) {
        Ok(content) => content,
        Err(err) => {
            return Some(Violation::new(
                file,
                ViolationKind::ParseError,
                format!("Failed to parse file: {err}"),
            ))
        }
    };
    if parse_directives(&content, Some(file)).allows_human_edits() {
        return None;
    }
    Some(
        Violation::new(
            file,
            ViolationKind::HumanOwnedViolation,
            "Human-owned file modified without @vibe:allowHumanEdits directive",
        )
        .with_details(format!(
            "FIX: Add this to the top of the file:\n  {}\nOr have a human make this change instead.",
            render_directive(comment_prefix_for(Some(file)), ALLOW_HUMAN_EDITS, "true")
        )),
    )
}

/// Load the ownership document and guard `changed_files` against it.
pub fn run_guard(
    fs: &dyn Fs,
    repo_root: &Path,
    changed_files: &[String],
) -> Result<Vec<Violation>, ConfigFault> {
    let config = load_ownership_config(fs, repo_root)?;
    let violations = guard(fs, repo_root, changed_files, &config);
    tracing::info!(
        changed = changed_files.len(),
        violations = violations.len(),
        "guard finished"
    );
    Ok(violations)
}
