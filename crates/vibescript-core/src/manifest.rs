// SPDX-License-Identifier: Apache-2.0
//! Change manifests under `.vibe/changes/`.

use std::path::Path;

use chrono::{DateTime, Utc};
use regex::Regex;
use vibescript_model::{ManifestMetadata, ManifestValidation};
use vibescript_policies::{CHANGES_DIR, GOVERNANCE_DIR};

use crate::ports::{AdapterError, Fs};

pub const REQUIRED_SECTIONS: [&str; 4] = ["## Summary", "## Changes", "## Testing", "## Rollback"];
pub const MANIFEST_TEMPLATE_PATH: &str = ".vibe/templates/manifest.md.template";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";
const SLUG_MAX_LEN: usize = 50;

#[must_use]
pub fn validate_manifest(text: &str) -> ManifestValidation {
    let errors: Vec<String> = REQUIRED_SECTIONS
        .iter()
        .filter(|section| !text.contains(*section))
        .map(|section| format!("Missing required section: {section}"))
        .collect();

    let mut warnings = Vec::new();
    if text.contains("{{") || text.contains("}}") {
        warnings.push("Manifest contains unresolved template placeholders".to_string());
    }
    if text.to_lowercase().contains("todo") || text.contains("[ ]") {
        warnings.push("Manifest contains TODO items".to_string());
    }

    ManifestValidation {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Metadata for `<YYYY-MM-DDTHH-MM-SS>-<slug>.md`; other names yield `None`.
#[must_use]
pub fn parse_manifest_file_name(name: &str, dir: &str) -> Option<ManifestMetadata> {
    let re = match Regex::new(r"^(\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2})-(.+)\.md$") {
        Ok(re) => re,
        Err(err) => {
            tracing::warn!("manifest name pattern rejected: {err}");
            return None;
        }
    };
    let caps = re.captures(name)?;
    let timestamp = caps[1].to_string();
    let date = timestamp.split('T').next().unwrap_or_default().to_string();
    Some(ManifestMetadata {
        slug: caps[2].to_string(),
        date,
        timestamp,
        file_path: format!("{}/{name}", dir.trim_end_matches('/')),
    })
}

/// Manifests in `.vibe/changes/`, newest first. A missing folder is empty.
pub fn list_manifests(fs: &dyn Fs, repo_root: &Path) -> Result<Vec<ManifestMetadata>, AdapterError> {
    let dir = Path::new(CHANGES_DIR);
    if !fs.exists(repo_root, dir) {
        return Ok(Vec::new());
    }
    let mut manifests: Vec<ManifestMetadata> = fs
        .list_dir(repo_root, dir)?
        .iter()
        .filter(|name| name.ends_with(".md"))
        .filter_map(|name| parse_manifest_file_name(name, CHANGES_DIR))
        .collect();
    manifests.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(manifests)
}

pub fn latest_manifest(fs: &dyn Fs, repo_root: &Path) -> Result<Option<ManifestMetadata>, AdapterError> {
    Ok(list_manifests(fs, repo_root)?.into_iter().next())
}

#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    if pending_dash && !slug.is_empty() {
        slug.push('-');
    }
    let trimmed = slug.trim_matches('-');
    trimmed.chars().take(SLUG_MAX_LEN).collect()
}

#[must_use]
pub fn manifest_timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

#[must_use]
pub fn manifest_file_name(now: DateTime<Utc>, slug: &str) -> String {
    format!("{}-{}.md", manifest_timestamp(now), slugify(slug))
}

/// Fill the first occurrence of each placeholder in `template`.
#[must_use]
pub fn render_manifest(template: &str, slug: &str, now: DateTime<Utc>) -> String {
    template
        .replacen("{{SLUG}}", slug, 1)
        .replacen("{{DATE}}", &now.format("%Y-%m-%d").to_string(), 1)
        .replacen("{{TIMESTAMP}}", &manifest_timestamp(now), 1)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error(".vibe/ folder not found; initialize the governance folder first")]
    GovernanceMissing,
    #[error("manifest template not found at .vibe/templates/manifest.md.template")]
    TemplateMissing,
    #[error("manifest title `{0}` has no usable slug characters")]
    EmptySlug(String),
    #[error("manifest already exists: {0}")]
    AlreadyExists(String),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// A rendered manifest ready to be written at `path` (repository-relative).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDraft {
    pub path: String,
    pub content: String,
}

pub fn draft_manifest(
    fs: &dyn Fs,
    repo_root: &Path,
    title: &str,
    now: DateTime<Utc>,
) -> Result<ManifestDraft, ManifestError> {
    if !fs.exists(repo_root, Path::new(GOVERNANCE_DIR)) {
        return Err(ManifestError::GovernanceMissing);
    }
    let template_path = Path::new(MANIFEST_TEMPLATE_PATH);
    if !fs.exists(repo_root, template_path) {
        return Err(ManifestError::TemplateMissing);
    }
    if slugify(title).is_empty() {
        return Err(ManifestError::EmptySlug(title.to_string()));
    }
    let path = format!("{CHANGES_DIR}/{}", manifest_file_name(now, title));
    if fs.exists(repo_root, Path::new(&path)) {
        return Err(ManifestError::AlreadyExists(path));
    }
    let template = fs.read_text(repo_root, template_path)?;
    Ok(ManifestDraft {
        content: render_manifest(&template, title, now),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, h, m, s).single().expect("valid time")
    }

    const COMPLETE: &str = "## Summary\nx\n## Changes\nx\n## Testing\nx\n## Rollback\nx\n";

    #[test]
    fn complete_manifest_is_clean() {
        let validation = validate_manifest(COMPLETE);
        assert!(validation.valid);
        assert!(validation.errors.is_empty());
        assert!(validation.warnings.is_empty());
    }

    #[test]
    fn missing_testing_and_placeholder() {
        let text = "## Summary\n{{SLUG}}\n## Changes\n## Rollback\n";
        let validation = validate_manifest(text);
        assert!(!validation.valid);
        assert_eq!(validation.errors, vec!["Missing required section: ## Testing"]);
        assert_eq!(
            validation.warnings,
            vec!["Manifest contains unresolved template placeholders"]
        );
    }

    #[test]
    fn todo_markers_warn_but_stay_valid() {
        let validation = validate_manifest(&format!("{COMPLETE}- [ ] verify\n"));
        assert!(validation.valid);
        assert_eq!(validation.warnings, vec!["Manifest contains TODO items"]);
        let shouting = validate_manifest(&format!("{COMPLETE}TODO: rollback plan\n"));
        assert_eq!(shouting.warnings.len(), 1);
    }

    #[test]
    fn file_names_parse_into_metadata() {
        let meta = parse_manifest_file_name("2024-03-09T10-15-00-add-login.md", CHANGES_DIR)
            .expect("parsed");
        assert_eq!(meta.slug, "add-login");
        assert_eq!(meta.date, "2024-03-09");
        assert_eq!(meta.timestamp, "2024-03-09T10-15-00");
        assert_eq!(meta.file_path, ".vibe/changes/2024-03-09T10-15-00-add-login.md");
        assert!(parse_manifest_file_name("notes.md", CHANGES_DIR).is_none());
        assert!(parse_manifest_file_name("2024-03-09T10-15-00-x.txt", CHANGES_DIR).is_none());
    }

    #[test]
    fn slugify_collapses_and_truncates() {
        assert_eq!(slugify("Add Login Flow!"), "add-login-flow");
        assert_eq!(slugify("  --Fix__bug 42--  "), "fix-bug-42");
        assert_eq!(slugify("Überfall"), "berfall");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(&"a".repeat(80)).len(), 50);
    }

    #[test]
    fn rendering_replaces_first_placeholder_only() {
        let now = at(8, 5, 3);
        let rendered = render_manifest("{{SLUG}} {{SLUG}} {{DATE}} {{TIMESTAMP}}", "Add X", now);
        assert_eq!(rendered, "Add X {{SLUG}} 2024-03-09 2024-03-09T08-05-03");
        assert_eq!(manifest_file_name(now, "Add X"), "2024-03-09T08-05-03-add-x.md");
    }
}
