//! Governance folder health checks.

use std::path::Path;

use vibescript_model::{Diagnostic, DiagnosticStatus};
use vibescript_policies::{missing_config_keys, GOVERNANCE_DIR, OWNERSHIP_CONFIG_PATH, REQUIRED_CONFIG_KEYS};

use crate::ports::Fs;

const REQUIRED_FILES: [&str; 5] = [
    "spec.md",
    "claude.instructions.md",
    "ownership.json",
    "templates/task.vibe.ts.template",
    "templates/manifest.md.template",
];
const EXPECTED_DIRS: [&str; 2] = ["reports", "changes"];
const WORKFLOW_PATH: &str = ".github/workflows/vibe.yml";
const PRE_COMMIT_HOOK: &str = ".husky/pre-commit";

pub fn diagnose(fs: &dyn Fs, repo_root: &Path) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    out.push(if fs.exists(repo_root, Path::new(GOVERNANCE_DIR)) {
        Diagnostic::new(".vibe folder", DiagnosticStatus::Pass, "Found")
    } else {
        Diagnostic::new(
            ".vibe folder",
            DiagnosticStatus::Fail,
            "Missing - initialize the governance folder",
        )
    });

    for file in REQUIRED_FILES {
        let rel = format!("{GOVERNANCE_DIR}/{file}");
        let (status, message) = if fs.exists(repo_root, Path::new(&rel)) {
            (DiagnosticStatus::Pass, "Found")
        } else {
            (DiagnosticStatus::Fail, "Missing")
        };
        out.push(Diagnostic::new(rel, status, message));
    }

    for dir in EXPECTED_DIRS {
        let rel = format!("{GOVERNANCE_DIR}/{dir}");
        let (status, message) = if fs.exists(repo_root, Path::new(&rel)) {
            (DiagnosticStatus::Pass, "Found")
        } else {
            (DiagnosticStatus::Warn, "Missing - will be created on first use")
        };
        out.push(Diagnostic::new(format!("{rel}/"), status, message));
    }

    out.extend(ownership_key_checks(fs, repo_root));

    out.push(if fs.exists(repo_root, Path::new(WORKFLOW_PATH)) {
        Diagnostic::new("GitHub workflow", DiagnosticStatus::Pass, format!("Found at {WORKFLOW_PATH}"))
    } else {
        Diagnostic::new(
            "GitHub workflow",
            DiagnosticStatus::Warn,
            "Not found - CI will not run vibe checks",
        )
    });

    out.push(pre_commit_check(fs, repo_root));
    out
}

fn ownership_key_checks(fs: &dyn Fs, repo_root: &Path) -> Vec<Diagnostic> {
    let path = Path::new(OWNERSHIP_CONFIG_PATH);
    if !fs.exists(repo_root, path) {
        return Vec::new();
    }
    let missing = match fs
        .read_text(repo_root, path)
        .map_err(|e| e.to_string())
        .and_then(|text| missing_config_keys(&text).map_err(|e| e.to_string()))
    {
        Ok(missing) => missing,
        Err(err) => {
            tracing::debug!("ownership config rejected by doctor: {err}");
            return vec![Diagnostic::new("ownership.json", DiagnosticStatus::Fail, "Invalid JSON")];
        }
    };
    REQUIRED_CONFIG_KEYS
        .iter()
        .map(|key| {
            let check = format!("ownership.json: {key}");
            if missing.contains(key) {
                Diagnostic::new(check, DiagnosticStatus::Fail, "Missing key")
            } else {
                Diagnostic::new(check, DiagnosticStatus::Pass, "Defined")
            }
        })
        .collect()
}

fn pre_commit_check(fs: &dyn Fs, repo_root: &Path) -> Diagnostic {
    let path = Path::new(PRE_COMMIT_HOOK);
    if !fs.exists(repo_root, path) {
        return Diagnostic::new("pre-commit hook", DiagnosticStatus::Warn, "Not found");
    }
    match fs.read_text(repo_root, path) {
        Ok(hook) if hook.contains("vibe:check") || hook.contains("vibescript") => {
            Diagnostic::new("pre-commit hook", DiagnosticStatus::Pass, "Found with vibe check")
        }
        Ok(_) => Diagnostic::new(
            "pre-commit hook",
            DiagnosticStatus::Warn,
            "Found but no vibe check configured",
        ),
        Err(err) => Diagnostic::new("pre-commit hook", DiagnosticStatus::Warn, err.to_string()),
    }
}

/// Counts of (pass, fail, warn).
#[must_use]
pub fn summarize(diagnostics: &[Diagnostic]) -> (usize, usize, usize) {
    diagnostics.iter().fold((0, 0, 0), |(p, f, w), d| match d.status {
        DiagnosticStatus::Pass => (p + 1, f, w),
        DiagnosticStatus::Fail => (p, f + 1, w),
        DiagnosticStatus::Warn => (p, f, w + 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MemoryFs;

    const FULL_CONFIG: &str = r#"{"ai_owned_globs": [], "human_owned_globs": [],
        "contract_owned_globs": [], "blocked_globs": [],
        "require_manifest_for_globs": [], "require_touch_enforcement": true}"#;

    fn healthy() -> MemoryFs {
        MemoryFs::new()
            .with_file(".vibe/spec.md", "#")
            .with_file(".vibe/claude.instructions.md", "#")
            .with_file(".vibe/ownership.json", FULL_CONFIG)
            .with_file(".vibe/templates/task.vibe.ts.template", "")
            .with_file(".vibe/templates/manifest.md.template", "")
            .with_file(".vibe/reports/.keep", "")
            .with_file(".vibe/changes/.keep", "")
            .with_file(".github/workflows/vibe.yml", "on: push")
            .with_file(".husky/pre-commit", "vibescript check\n")
    }

    #[test]
    fn healthy_repository_passes_every_check() {
        let diagnostics = diagnose(&healthy(), Path::new("/repo"));
        let (pass, fail, warn) = summarize(&diagnostics);
        assert_eq!((fail, warn), (0, 0), "{diagnostics:?}");
        assert_eq!(pass, 1 + 5 + 2 + 6 + 2);
    }

    #[test]
    fn empty_repository_fails_and_warns() {
        let diagnostics = diagnose(&MemoryFs::new(), Path::new("/repo"));
        let (pass, fail, warn) = summarize(&diagnostics);
        assert_eq!(pass, 0);
        assert_eq!(fail, 6);
        assert_eq!(warn, 4);
    }

    #[test]
    fn invalid_ownership_json_fails_once() {
        let mut fs = healthy();
        fs.insert(".vibe/ownership.json", "{oops");
        let diagnostics = diagnose(&fs, Path::new("/repo"));
        let failures: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.status == DiagnosticStatus::Fail)
            .collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].check, "ownership.json");
    }

    #[test]
    fn missing_keys_are_reported_individually() {
        let mut fs = healthy();
        fs.insert(".vibe/ownership.json", r#"{"ai_owned_globs": []}"#);
        let missing: Vec<_> = diagnose(&fs, Path::new("/repo"))
            .into_iter()
            .filter(|d| d.message == "Missing key")
            .map(|d| d.check)
            .collect();
        assert_eq!(missing.len(), 5);
        assert_eq!(missing[0], "ownership.json: human_owned_globs");
    }

    #[test]
    fn hook_without_vibe_check_warns() {
        let mut fs = healthy();
        fs.insert(".husky/pre-commit", "npm test\n");
        let hook = diagnose(&fs, Path::new("/repo"))
            .into_iter()
            .last()
            .expect("hook diagnostic");
        assert_eq!(hook.status, DiagnosticStatus::Warn);
    }
}
