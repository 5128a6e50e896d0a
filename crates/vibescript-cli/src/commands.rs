// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use chrono::Utc;
use vibescript_adapters::RealWorld;
use vibescript_core::{
    comment_prefix_for, create_report, diagnose, draft_manifest, guard, list_manifests,
    load_ownership_config, render_fix_summary, render_json, render_text, report_path,
    resolve_base_ref, run_touch_check, summarize, task_files, validate_manifest, Fs, FsWrite, Git,
};
use vibescript_model::{CheckKind, DiagnosticStatus, Report};
use vibescript_policies::canonical_config_json;

use crate::cli::{CheckArgs, FormatArg};
use crate::{CliError, ExitCode};

pub(crate) fn check(repo_root: &Path, args: &CheckArgs) -> Result<ExitCode, CliError> {
    let world = RealWorld::new();
    let run_guard = !args.checker_only;
    let run_checker = !args.guard_only;

    let mut fault = None;
    let config = if run_guard {
        match load_ownership_config(&world.fs, repo_root) {
            Ok(config) => Some(config),
            Err(err) if run_checker => {
                tracing::warn!("guard skipped: {err}");
                fault = Some(err);
                None
            }
            Err(err) => return Err(err.into()),
        }
    } else {
        None
    };

    let base_ref = resolve_base_ref(&world.git, repo_root, args.base.as_deref());
    let changed = match world.git.changed_files(repo_root, &base_ref) {
        Ok(changed) => changed,
        Err(err) => {
            return Err(match fault {
                Some(fault) => {
                    tracing::debug!("change set unavailable: {err}");
                    fault.into()
                }
                None => err.into(),
            })
        }
    };
    tracing::info!(base_ref = %base_ref, changed = changed.len(), "collected change set");
    let now = Utc::now();

    let mut reports = Vec::new();
    if let Some(config) = &config {
        let violations = guard(&world.fs, repo_root, &changed, config);
        reports.push(create_report(CheckKind::Guard, &base_ref, &changed, violations, now));
    }
    if run_checker {
        let violations = run_touch_check(&world.fs, repo_root, &changed);
        reports.push(create_report(CheckKind::Checker, &base_ref, &changed, violations, now));
    }

    for report in &reports {
        write_report(&world, repo_root, report);
    }

    match args.format {
        FormatArg::Json => {
            let value = serde_json::to_value(&reports)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        FormatArg::Text => {
            let prefix = comment_prefix_for(task_files(&changed).first().map(String::as_str));
            if changed.is_empty() {
                println!("No changed files detected.");
            }
            for report in &reports {
                println!("{}", render_text(report));
                if report.check_kind == CheckKind::Checker {
                    if let Some(summary) = render_fix_summary(&report.violations, prefix) {
                        println!("\n{summary}");
                    }
                }
            }
        }
    }

    if let Some(fault) = fault {
        return Err(fault.into());
    }
    let failed: usize = reports.iter().map(|r| r.violations.len()).sum();
    if failed > 0 {
        eprintln!("vibescript: {failed} violation(s)");
        return Ok(ExitCode::Violations);
    }
    Ok(ExitCode::Success)
}

fn write_report(world: &RealWorld, repo_root: &Path, report: &Report) {
    let path = report_path(report.check_kind);
    match world
        .fs
        .write_text(repo_root, Path::new(&path), &render_text(report))
    {
        Ok(target) => tracing::debug!(path = %target.display(), "report written"),
        Err(err) => tracing::warn!(path = %path, "report not written: {err}"),
    }
    if tracing::enabled!(tracing::Level::TRACE) {
        if let Ok(json) = render_json(report) {
            tracing::trace!(report = %json, "report payload");
        }
    }
}

pub(crate) fn manifest_list(repo_root: &Path) -> Result<ExitCode, CliError> {
    let world = RealWorld::new();
    let manifests = list_manifests(&world.fs, repo_root)?;
    if manifests.is_empty() {
        println!("No manifests found in .vibe/changes/");
        println!("Create one with: vibescript manifest new \"description\"");
        return Ok(ExitCode::Success);
    }

    println!("Found {} manifest(s):\n", manifests.len());
    for manifest in &manifests {
        let text = world.fs.read_text(repo_root, Path::new(&manifest.file_path))?;
        let validation = validate_manifest(&text);
        let icon = if validation.valid { "✓" } else { "⚠" };
        println!("{icon} {} - {}", manifest.date, manifest.slug);
        println!("   {}", manifest.file_path);
        for error in &validation.errors {
            println!("   ✗ {error}");
        }
        for warning in &validation.warnings {
            println!("   ⚠ {warning}");
        }
        println!();
    }
    Ok(ExitCode::Success)
}

pub(crate) fn manifest_new(repo_root: &Path, title: &str) -> Result<ExitCode, CliError> {
    let world = RealWorld::new();
    let draft = draft_manifest(&world.fs, repo_root, title, Utc::now())?;
    let target = world
        .fs
        .write_text(repo_root, Path::new(&draft.path), &draft.content)?;
    tracing::info!(path = %draft.path, "manifest created");
    println!("Created manifest: {}", target.display());
    println!("Next steps:");
    println!("  1. Fill in the manifest sections");
    println!("  2. Commit the manifest with your changes");
    Ok(ExitCode::Success)
}

pub(crate) fn doctor(repo_root: &Path) -> Result<ExitCode, CliError> {
    let world = RealWorld::new();
    let diagnostics = diagnose(&world.fs, repo_root);
    for diagnostic in &diagnostics {
        let icon = match diagnostic.status {
            DiagnosticStatus::Pass => "✓",
            DiagnosticStatus::Fail => "✗",
            DiagnosticStatus::Warn => "⚠",
        };
        println!("  {icon} {}: {}", diagnostic.check, diagnostic.message);
    }

    let (pass, fail, warn) = summarize(&diagnostics);
    println!("\nSummary:\n  {pass} passed | {fail} failed | {warn} warnings\n");
    if fail > 0 {
        println!("Some checks failed. Initialize or repair the .vibe/ governance folder.");
        return Ok(ExitCode::ConfigFault);
    }
    if warn > 0 {
        println!("Some warnings detected. Review and address as needed.");
    } else {
        println!("All checks passed.");
    }
    Ok(ExitCode::Success)
}

pub(crate) fn config(repo_root: &Path) -> Result<ExitCode, CliError> {
    let world = RealWorld::new();
    let config = load_ownership_config(&world.fs, repo_root)?;
    let text = canonical_config_json(&config).map_err(|err| CliError::Policy(err.to_string()))?;
    println!("{text}");
    Ok(ExitCode::Success)
}
