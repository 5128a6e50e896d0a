// SPDX-License-Identifier: Apache-2.0
//! Report construction and rendering.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use vibescript_model::{CheckKind, Report, Violation, ViolationKind, REQUIRED_DIRECTIVES};
use vibescript_policies::REPORTS_DIR;

use crate::directives::render_directive;
use crate::touch::suggest_touch_pattern;

const RULE_WIDTH: usize = 60;
const MAX_SUGGESTED_PATTERNS: usize = 5;

#[must_use]
pub fn create_report(
    kind: CheckKind,
    base_ref: &str,
    changed_files: &[String],
    violations: Vec<Violation>,
    timestamp: DateTime<Utc>,
) -> Report {
    Report {
        timestamp,
        check_kind: kind,
        base_ref: base_ref.to_string(),
        changed_files: changed_files.to_vec(),
        passed: violations.is_empty(),
        violations,
    }
}

/// Repository-relative path the report for `kind` is written to.
#[must_use]
pub fn report_path(kind: CheckKind) -> String {
    let name = match kind {
        CheckKind::Checker => "vibe-check.txt",
        CheckKind::Guard => "vibe-guard.txt",
    };
    format!("{REPORTS_DIR}/{name}")
}

#[must_use]
pub fn render_text(report: &Report) -> String {
    let heavy = "═".repeat(RULE_WIDTH);
    let light = "─".repeat(RULE_WIDTH);
    let mut lines = vec![
        heavy.clone(),
        format!("VIBESCRIPT {} REPORT", report.check_kind.as_str().to_uppercase()),
        heavy.clone(),
        String::new(),
        format!(
            "Timestamp: {}",
            report.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        format!("Base Ref:  {}", report.base_ref),
        format!(
            "Status:    {}",
            if report.passed { "PASSED ✓" } else { "FAILED ✗" }
        ),
        String::new(),
        format!("Changed Files ({}):", report.changed_files.len()),
    ];
    lines.extend(report.changed_files.iter().map(|f| format!("  - {f}")));
    lines.push(String::new());

    if report.violations.is_empty() {
        lines.push("No violations found.".to_string());
        lines.push(String::new());
    } else {
        lines.push(light.clone());
        lines.push(format!("VIOLATIONS ({})", report.violations.len()));
        lines.push(light);
        lines.push(String::new());
        for violation in &report.violations {
            lines.push(format!("[{}] {}", violation.kind, violation.file));
            lines.push(format!("  → {}", violation.message));
            if let Some(details) = &violation.details {
                lines.push(format!("    {details}"));
            }
            lines.push(String::new());
        }
    }

    lines.push(heavy);
    lines.join("\n")
}

pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Grouped quick fixes, or `None` when no violation has one. Touch snippets
/// are written with `comment_prefix`, the task file's comment marker.
#[must_use]
pub fn render_fix_summary(violations: &[Violation], comment_prefix: &str) -> Option<String> {
    let has_missing = violations
        .iter()
        .any(|v| v.kind == ViolationKind::MissingDirective);
    let mut seen = BTreeSet::new();
    let patterns: Vec<String> = violations
        .iter()
        .filter(|v| v.kind == ViolationKind::UndeclaredTouch)
        .map(|v| suggest_touch_pattern(&v.file))
        .filter(|p| seen.insert(p.clone()))
        .collect();

    if !has_missing && patterns.is_empty() {
        return None;
    }

    let mut lines = vec!["Quick fixes:".to_string(), String::new()];
    if has_missing {
        lines.push("Missing directives:".to_string());
        lines.push("  Add required directives to your task files.".to_string());
        lines.push(format!("  Required: {}", REQUIRED_DIRECTIVES.join(", ")));
        lines.push(String::new());
    }
    if !patterns.is_empty() {
        lines.push("Undeclared file changes:".to_string());
        lines.push("  Option 1: Add to @vibe:touch in your task file:".to_string());
        for pattern in patterns.iter().take(MAX_SUGGESTED_PATTERNS) {
            lines.push(format!(
                "    {}",
                render_directive(comment_prefix, "touch", pattern)
            ));
        }
        if patterns.len() > MAX_SUGGESTED_PATTERNS {
            lines.push(format!(
                "    ... and {} more",
                patterns.len() - MAX_SUGGESTED_PATTERNS
            ));
        }
        lines.push("  Option 2: Stop modifying files not in your touch list.".to_string());
        lines.push(String::new());
    }
    Some(lines.join("\n"))
}
