#![forbid(unsafe_code)]

mod fs;
mod git;

pub use fs::{discover_repo_root, ensure_write_path_under_governance, normalize_line_endings, RealFs};
pub use git::RealGit;

/// Real implementations of every port, bundled for the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealWorld {
    pub fs: RealFs,
    pub git: RealGit,
}

impl RealWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

pub const CRATE_NAME: &str = "vibescript-adapters";
