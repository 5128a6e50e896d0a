// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("path violation: {} ({detail})", path.display())]
    PathViolation { path: PathBuf, detail: String },
    #[error("io error: {op} {} ({detail})", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        detail: String,
    },
    #[error("git error: {detail}")]
    Git { detail: String },
}

pub trait Fs {
    fn read_text(&self, repo_root: &Path, path: &Path) -> Result<String, AdapterError>;
    fn exists(&self, repo_root: &Path, path: &Path) -> bool;
    /// File names (not paths) directly inside `path`, sorted.
    fn list_dir(&self, repo_root: &Path, path: &Path) -> Result<Vec<String>, AdapterError>;
}

pub trait FsWrite {
    fn write_text(
        &self,
        repo_root: &Path,
        path: &Path,
        content: &str,
    ) -> Result<PathBuf, AdapterError>;
}

pub trait Git {
    fn ref_exists(&self, repo_root: &Path, reference: &str) -> bool;
    fn changed_files(&self, repo_root: &Path, base_ref: &str) -> Result<Vec<String>, AdapterError>;
}

/// Explicit ref first, then `origin/main`, `origin/master`, and `HEAD~1`.
pub fn resolve_base_ref(git: &dyn Git, repo_root: &Path, explicit: Option<&str>) -> String {
    if let Some(reference) = explicit.map(str::trim).filter(|r| !r.is_empty()) {
        return reference.to_string();
    }
    for candidate in ["origin/main", "origin/master"] {
        if git.ref_exists(repo_root, candidate) {
            return candidate.to_string();
        }
    }
    "HEAD~1".to_string()
}

/// In-memory [`Fs`] keyed by repository-relative path. `repo_root` is ignored.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeMap<String, String>,
}

impl MemoryFs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: &str, content: &str) {
        self.files.insert(key(Path::new(path)), content.to_string());
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .trim_start_matches("./")
        .trim_end_matches('/')
        .to_string()
}

impl Fs for MemoryFs {
    fn read_text(&self, _repo_root: &Path, path: &Path) -> Result<String, AdapterError> {
        self.files
            .get(&key(path))
            .cloned()
            .ok_or_else(|| AdapterError::Io {
                op: "read_to_string",
                path: path.to_path_buf(),
                detail: "no such file".to_string(),
            })
    }

    fn exists(&self, _repo_root: &Path, path: &Path) -> bool {
        let wanted = key(path);
        let dir_prefix = format!("{wanted}/");
        self.files
            .keys()
            .any(|file| *file == wanted || file.starts_with(&dir_prefix))
    }

    fn list_dir(&self, _repo_root: &Path, path: &Path) -> Result<Vec<String>, AdapterError> {
        let dir_prefix = format!("{}/", key(path));
        Ok(self
            .files
            .keys()
            .filter_map(|file| file.strip_prefix(&dir_prefix))
            .filter(|rest| !rest.contains('/'))
            .map(str::to_string)
            .collect())
    }
}
