// SPDX-License-Identifier: Apache-2.0
//! Task-file directive checks and touch-scope enforcement.

use std::path::Path;

use vibescript_model::{Violation, ViolationKind};
use vibescript_policies::{decode_touch_policy, TouchPolicy, OWNERSHIP_CONFIG_PATH};

use crate::directives::{parse_directives, render_directive, touch_globs, validate_directives};
use crate::glob::{matches_any, normalize_separators};
use crate::language::{comment_prefix_for, is_task_file};
use crate::ports::Fs;

/// Changed files that are task files, in input order.
#[must_use]
pub fn task_files(changed_files: &[String]) -> Vec<String> {
    changed_files
        .iter()
        .filter(|file| is_task_file(file))
        .cloned()
        .collect()
}

/// Touch policy from the ownership document. A missing, unreadable or
/// non-object document yields the default policy; bad entries are skipped.
pub fn load_touch_policy(fs: &dyn Fs, repo_root: &Path) -> TouchPolicy {
    let path = Path::new(OWNERSHIP_CONFIG_PATH);
    if !fs.exists(repo_root, path) {
        return TouchPolicy::default();
    }
    let text = match fs.read_text(repo_root, path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("touch policy unreadable, using defaults: {err}");
            return TouchPolicy::default();
        }
    };
    match decode_touch_policy(&text) {
        Ok(decoded) => {
            for err in &decoded.dropped {
                tracing::warn!("touch policy entry skipped: {err}");
            }
            decoded.policy
        }
        Err(err) => {
            tracing::warn!("touch policy invalid, using defaults: {err}");
            TouchPolicy::default()
        }
    }
}

pub fn check_touch(
    fs: &dyn Fs,
    repo_root: &Path,
    changed_files: &[String],
    task_files: &[String],
    policy: &TouchPolicy,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut declared: Vec<String> = Vec::new();
    let mut fix_prefix: Option<&'static str> = None;

    for task_file in task_files {
        tracing::debug!(file = %task_file, "checking task file");
        let content = match fs.read_text(repo_root, Path::new(task_file)) {
            Ok(content) => content,
            Err(err) => {
                violations.push(Violation::new(
                    task_file.as_str(),
                    ViolationKind::ParseError,
                    format!("Failed to parse file: {err}"),
                ));
                continue;
            }
        };

        let directives = parse_directives(&content, Some(task_file));
        let validation = validate_directives(&directives);
        if !validation.valid {
            let details = missing_directive_fix(task_file, &validation.missing);
            for error in &validation.errors {
                let violation =
                    Violation::new(task_file.as_str(), ViolationKind::MissingDirective, error.as_str());
                violations.push(match &details {
                    Some(details) => violation.with_details(details.as_str()),
                    None => violation,
                });
            }
        }
        let globs = touch_globs(&directives);
        if !globs.is_empty() && fix_prefix.is_none() {
            fix_prefix = Some(comment_prefix_for(Some(task_file)));
        }
        declared.extend(globs);
    }

    if !policy.enforcement_enabled() || declared.is_empty() {
        return violations;
    }
    let prefix = fix_prefix.unwrap_or_else(|| comment_prefix_for(None));

    for changed in changed_files {
        if is_task_file(changed) || matches_any(changed, &policy.touch_exempt) {
            continue;
        }
        if matches_any(changed, &declared) {
            continue;
        }
        tracing::debug!(file = %changed, "change outside declared touch scope");
        violations.push(
            Violation::new(
                changed.as_str(),
                ViolationKind::UndeclaredTouch,
                "File changed but not declared in any @vibe:touch directive",
            )
            .with_details(undeclared_touch_fix(prefix, changed, &declared)),
        );
    }
    violations
}

/// Full checker pass over a change set: task files, lenient policy, touch scope.
pub fn run_touch_check(fs: &dyn Fs, repo_root: &Path, changed_files: &[String]) -> Vec<Violation> {
    let tasks = task_files(changed_files);
    if tasks.is_empty() {
        tracing::info!("no task files in change set; directive checks skipped");
        return Vec::new();
    }
    let policy = load_touch_policy(fs, repo_root);
    let violations = check_touch(fs, repo_root, changed_files, &tasks, &policy);
    tracing::info!(
        task_files = tasks.len(),
        violations = violations.len(),
        "touch check finished"
    );
    violations
}

fn missing_directive_fix(task_file: &str, missing: &[String]) -> Option<String> {
    if missing.is_empty() {
        return None;
    }
    let prefix = comment_prefix_for(Some(task_file));
    let lines: Vec<String> = missing
        .iter()
        .map(|key| format!("  {}", render_directive(prefix, key, "<value>")))
        .collect();
    Some(format!(
        "FIX: Add these directives to the top of the file:\n{}",
        lines.join("\n")
    ))
}

fn undeclared_touch_fix(prefix: &str, changed: &str, declared: &[String]) -> String {
    format!(
        "Declared patterns: {}\nFIX: Add to @vibe:touch in your task file:\n  {}\nOr stop modifying this file.",
        declared.join(", "),
        render_directive(prefix, "touch", &suggest_touch_pattern(changed))
    )
}

/// `<dir>/**/*<ext>` for nested files, the path itself for root files.
#[must_use]
pub fn suggest_touch_pattern(path: &str) -> String {
    let path = normalize_separators(path);
    let Some((dir, base)) = path.rsplit_once('/') else {
        return path;
    };
    if dir.is_empty() || dir == "." {
        return path;
    }
    format!("{dir}/**/*{}", extension_of(base))
}

fn extension_of(base: &str) -> &str {
    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx..],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MemoryFs;
    use vibescript_model::REQUIRED_DIRECTIVES;

    fn header(touch: &str) -> String {
        REQUIRED_DIRECTIVES
            .iter()
            .map(|key| match *key {
                "risk" => "// @vibe:risk low".to_string(),
                "touch" => format!("// @vibe:touch {touch}"),
                other => format!("// @vibe:{other} x"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn files(list: &[&str]) -> Vec<String> {
        list.iter().map(|f| (*f).to_string()).collect()
    }

    #[test]
    fn suggestions_follow_directory_and_extension() {
        assert_eq!(suggest_touch_pattern("src/api/user.ts"), "src/api/**/*.ts");
        assert_eq!(suggest_touch_pattern("package.json"), "package.json");
        assert_eq!(suggest_touch_pattern("config/.env"), "config/**/*");
        assert_eq!(suggest_touch_pattern("lib\\x.tar.gz"), "lib/**/*.gz");
    }

    #[test]
    fn undeclared_change_is_reported_with_fix() {
        let fs = MemoryFs::new().with_file("src/a.vibe.ts", &header("src/**/*.ts"));
        let changed = files(&["src/a.vibe.ts", "src/b.ts", "lib/c.ts"]);
        let violations = check_touch(
            &fs,
            Path::new("/repo"),
            &changed,
            &task_files(&changed),
            &TouchPolicy::default(),
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "lib/c.ts");
        assert_eq!(violations[0].kind, ViolationKind::UndeclaredTouch);
        let details = violations[0].details.as_deref().expect("details");
        assert!(details.starts_with("Declared patterns: src/**/*.ts\n"));
        assert!(details.contains("// @vibe:touch lib/**/*.ts"));
    }

    #[test]
    fn touch_exempt_and_disabled_enforcement_skip_scope() {
        let fs = MemoryFs::new().with_file("src/a.vibe.ts", &header("src/**"));
        let changed = files(&["src/a.vibe.ts", "README.md"]);
        let tasks = task_files(&changed);

        let exempt = TouchPolicy {
            touch_exempt: vec!["*.md".to_string()],
            require_touch_enforcement: None,
        };
        assert!(check_touch(&fs, Path::new("."), &changed, &tasks, &exempt).is_empty());

        let off = TouchPolicy {
            touch_exempt: Vec::new(),
            require_touch_enforcement: Some(false),
        };
        assert!(check_touch(&fs, Path::new("."), &changed, &tasks, &off).is_empty());
    }

    #[test]
    fn unreadable_task_file_is_a_parse_error() {
        let fs = MemoryFs::new();
        let changed = files(&["src/gone.vibe.ts"]);
        let violations =
            check_touch(&fs, Path::new("."), &changed, &changed, &TouchPolicy::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ParseError);
        assert!(violations[0].message.starts_with("Failed to parse file: "));
    }

    #[test]
    fn fix_snippets_use_the_task_file_comment_prefix() {
        let fs = MemoryFs::new().with_file("jobs/run.vibe.py", "# @vibe:goal nightly job\n");
        let changed = files(&["jobs/run.vibe.py"]);
        let violations =
            check_touch(&fs, Path::new("."), &changed, &changed, &TouchPolicy::default());
        assert_eq!(violations.len(), 1);
        let details = violations[0].details.as_deref().expect("details");
        assert!(details.contains("  # @vibe:touch <value>"), "{details}");
    }

    #[test]
    fn invalid_risk_alone_has_no_fix_details() {
        let content = header("src/**").replace("@vibe:risk low", "@vibe:risk severe");
        let fs = MemoryFs::new().with_file("src/a.vibe.ts", &content);
        let changed = files(&["src/a.vibe.ts"]);
        let violations =
            check_touch(&fs, Path::new("."), &changed, &changed, &TouchPolicy::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].details, None);
    }

    #[test]
    fn lenient_policy_falls_back_to_defaults() {
        let root = Path::new(".");
        assert_eq!(load_touch_policy(&MemoryFs::new(), root), TouchPolicy::default());

        let corrupt = MemoryFs::new().with_file(OWNERSHIP_CONFIG_PATH, "{not json");
        assert!(load_touch_policy(&corrupt, root).enforcement_enabled());

        let off = MemoryFs::new().with_file(
            OWNERSHIP_CONFIG_PATH,
            r#"{"require_touch_enforcement": false}"#,
        );
        assert!(!load_touch_policy(&off, root).enforcement_enabled());
    }

    #[test]
    fn undeclared_fix_uses_the_declaring_task_file_prefix() {
        let content = header("jobs/**").replace("// ", "# ");
        let fs = MemoryFs::new().with_file("jobs/run.vibe.py", &content);
        let changed = files(&["jobs/run.vibe.py", "ops/deploy.sh"]);
        let violations = check_touch(
            &fs,
            Path::new("."),
            &changed,
            &task_files(&changed),
            &TouchPolicy::default(),
        );
        assert_eq!(violations.len(), 1);
        let details = violations[0].details.as_deref().expect("details");
        assert!(details.contains("\n  # @vibe:touch ops/**/*.sh\n"), "{details}");
        assert!(!details.contains("// @vibe:touch"), "{details}");
    }

    #[test]
    fn disabled_enforcement_survives_bad_exempt_entries() {
        let changed = files(&["src/a.vibe.ts", "ops/run.sh"]);
        for policy in [
            r#"{"touch_exempt_globs": ["docs/["], "require_touch_enforcement": false}"#,
            r#"{"touch_exempt_globs": null, "require_touch_enforcement": false}"#,
        ] {
            let fs = MemoryFs::new()
                .with_file("src/a.vibe.ts", &header("src/**"))
                .with_file(OWNERSHIP_CONFIG_PATH, policy);
            assert!(!load_touch_policy(&fs, Path::new(".")).enforcement_enabled(), "{policy}");
            assert!(run_touch_check(&fs, Path::new("."), &changed).is_empty(), "{policy}");
        }
    }

    #[test]
    fn bad_exempt_entry_keeps_the_good_ones() {
        let fs = MemoryFs::new()
            .with_file("src/a.vibe.ts", &header("src/**"))
            .with_file(OWNERSHIP_CONFIG_PATH, r#"{"touch_exempt_globs": ["docs/[", "ops/**"]}"#);
        let changed = files(&["src/a.vibe.ts", "ops/run.sh", "lib/x.ts"]);
        let violations = run_touch_check(&fs, Path::new("."), &changed);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].file, "lib/x.ts");
        assert_eq!(violations[0].kind, ViolationKind::UndeclaredTouch);
    }

    #[test]
    fn run_without_task_files_is_clean() {
        let fs = MemoryFs::new();
        assert!(run_touch_check(&fs, Path::new("."), &files(&["src/x.ts"])).is_empty());
    }
}
