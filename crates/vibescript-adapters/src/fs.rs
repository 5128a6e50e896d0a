// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Component, Path, PathBuf};

use vibescript_core::{AdapterError, Fs, FsWrite};

const GOVERNANCE_DIR: &str = ".vibe";

pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Nearest ancestor of `start` holding `.git` or `.vibe`.
pub fn discover_repo_root(start: &Path) -> Result<PathBuf, AdapterError> {
    let mut current = start.canonicalize().map_err(|err| AdapterError::Io {
        op: "canonicalize",
        path: start.to_path_buf(),
        detail: err.to_string(),
    })?;
    loop {
        if current.join(".git").exists() || current.join(GOVERNANCE_DIR).exists() {
            return Ok(current);
        }
        let Some(parent) = current.parent() else {
            return Err(AdapterError::PathViolation {
                path: start.to_path_buf(),
                detail: "unable to discover repository root from start path".to_string(),
            });
        };
        current = parent.to_path_buf();
    }
}

fn resolve(repo_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}

/// Resolve `target` and reject anything outside the governance folder.
pub fn ensure_write_path_under_governance(
    repo_root: &Path,
    target: &Path,
) -> Result<PathBuf, AdapterError> {
    let write_root = normalize_path(&repo_root.join(GOVERNANCE_DIR));
    let absolute_target = resolve(repo_root, target);
    let normalized_target = normalize_path(&absolute_target);

    if !normalized_target.starts_with(&write_root) || normalized_target == write_root {
        return Err(AdapterError::PathViolation {
            path: absolute_target,
            detail: format!("writes allowed only under {}", write_root.display()),
        });
    }

    if let Some(parent) = normalized_target.parent() {
        fs::create_dir_all(parent).map_err(|err| AdapterError::Io {
            op: "create_dir_all",
            path: parent.to_path_buf(),
            detail: err.to_string(),
        })?;
    }
    Ok(normalized_target)
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl Fs for RealFs {
    fn read_text(&self, repo_root: &Path, path: &Path) -> Result<String, AdapterError> {
        let target = resolve(repo_root, path);
        let text = fs::read_to_string(&target).map_err(|err| AdapterError::Io {
            op: "read_to_string",
            path: target,
            detail: err.to_string(),
        })?;
        Ok(normalize_line_endings(&text))
    }

    fn exists(&self, repo_root: &Path, path: &Path) -> bool {
        resolve(repo_root, path).exists()
    }

    fn list_dir(&self, repo_root: &Path, path: &Path) -> Result<Vec<String>, AdapterError> {
        let dir = resolve(repo_root, path);
        let entries = fs::read_dir(&dir).map_err(|err| AdapterError::Io {
            op: "read_dir",
            path: dir.clone(),
            detail: err.to_string(),
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| AdapterError::Io {
                op: "read_dir_entry",
                path: dir.clone(),
                detail: err.to_string(),
            })?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl FsWrite for RealFs {
    fn write_text(
        &self,
        repo_root: &Path,
        path: &Path,
        content: &str,
    ) -> Result<PathBuf, AdapterError> {
        let target = ensure_write_path_under_governance(repo_root, path)?;
        fs::write(&target, normalize_line_endings(content)).map_err(|err| AdapterError::Io {
            op: "write",
            path: target.clone(),
            detail: err.to_string(),
        })?;
        tracing::debug!(path = %target.display(), "wrote governance file");
        Ok(target)
    }
}
