use std::path::Path;
use std::process::Command;

use vibescript_core::{AdapterError, Git};

#[derive(Debug, Default, Clone, Copy)]
pub struct RealGit;

fn run_git(repo_root: &Path, args: &[&str]) -> Result<String, AdapterError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .output()
        .map_err(|err| AdapterError::Git {
            detail: err.to_string(),
        })?;
    if !output.status.success() {
        return Err(AdapterError::Git {
            detail: format!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    String::from_utf8(output.stdout).map_err(|err| AdapterError::Git {
        detail: err.to_string(),
    })
}

/// Refs are passed to git as positional arguments and must not read as options.
fn check_ref(reference: &str) -> Result<(), AdapterError> {
    if reference.starts_with('-') {
        return Err(AdapterError::Git {
            detail: format!("refusing base ref that looks like an option: {reference}"),
        });
    }
    Ok(())
}

fn name_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl Git for RealGit {
    fn ref_exists(&self, repo_root: &Path, reference: &str) -> bool {
        check_ref(reference).is_ok()
            && run_git(repo_root, &["rev-parse", "--verify", "--quiet", reference]).is_ok()
    }

    /// Branch diff first, then a plain two-point diff, then the working tree
    /// against `HEAD`.
    fn changed_files(&self, repo_root: &Path, base_ref: &str) -> Result<Vec<String>, AdapterError> {
        check_ref(base_ref)?;
        let range = format!("{base_ref}...HEAD");
        match run_git(repo_root, &["diff", "--name-only", &range]) {
            Ok(text) => return Ok(name_lines(&text)),
            Err(err) => tracing::debug!("three-dot diff unavailable: {err}"),
        }
        match run_git(repo_root, &["diff", "--name-only", base_ref, "HEAD"]) {
            Ok(text) => return Ok(name_lines(&text)),
            Err(err) => tracing::debug!("two-dot diff unavailable: {err}"),
        }
        tracing::warn!(base_ref, "base ref unusable; diffing working tree against HEAD");
        run_git(repo_root, &["diff", "--name-only", "HEAD"]).map(|text| name_lines(&text))
    }
}
