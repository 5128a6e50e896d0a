// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;
use std::process::Command;

use vibescript_adapters::{discover_repo_root, RealFs, RealGit};
use vibescript_core::{list_manifests, resolve_base_ref, AdapterError, Fs, FsWrite, Git};

fn git(root: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn init_repo(root: &Path) -> bool {
    git(root, &["init", "-q"])
        && git(root, &["config", "user.email", "ci@example.com"])
        && git(root, &["config", "user.name", "ci"])
        && git(root, &["config", "commit.gpgsign", "false"])
}

fn commit_all(root: &Path, message: &str) -> bool {
    git(root, &["add", "-A"]) && git(root, &["commit", "-q", "-m", message])
}

#[test]
fn real_fs_reads_lists_and_normalizes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let changes = dir.path().join(".vibe/changes");
    fs::create_dir_all(changes.join("nested")).expect("mkdir");
    fs::write(changes.join("2024-01-02T00-00-00-b.md"), "## Summary\r\n").expect("write");
    fs::write(changes.join("2024-01-01T00-00-00-a.md"), "x").expect("write");
    fs::write(changes.join("notes.txt"), "x").expect("write");

    let real = RealFs;
    let names = real
        .list_dir(dir.path(), Path::new(".vibe/changes"))
        .expect("list");
    assert_eq!(
        names,
        vec!["2024-01-01T00-00-00-a.md", "2024-01-02T00-00-00-b.md", "notes.txt"]
    );
    assert_eq!(
        real.read_text(dir.path(), Path::new(".vibe/changes/2024-01-02T00-00-00-b.md"))
            .expect("read"),
        "## Summary\n"
    );

    let manifests = list_manifests(&real, dir.path()).expect("manifests");
    assert_eq!(manifests.len(), 2);
    assert_eq!(manifests[0].slug, "b");
}

#[test]
fn missing_file_read_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = RealFs
        .read_text(dir.path(), Path::new("absent.ts"))
        .expect_err("missing");
    assert!(matches!(err, AdapterError::Io { op: "read_to_string", .. }));
}

#[test]
fn writes_are_confined_to_governance_folder() {
    let dir = tempfile::tempdir().expect("tempdir");
    let written = RealFs
        .write_text(dir.path(), Path::new(".vibe/reports/vibe-guard.txt"), "ok\r\n")
        .expect("write");
    assert_eq!(fs::read_to_string(written).expect("read back"), "ok\n");

    for escape in ["src/main.rs", ".vibe/../src/main.rs", ".vibe"] {
        let err = RealFs
            .write_text(dir.path(), Path::new(escape), "x")
            .expect_err("escape");
        assert!(matches!(err, AdapterError::PathViolation { .. }), "{escape}");
    }
    assert!(!dir.path().join("src").exists());
}

#[test]
fn repo_root_is_discovered_from_nested_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join(".vibe")).expect("mkdir");
    let nested = dir.path().join("src/deep");
    fs::create_dir_all(&nested).expect("mkdir");
    let root = discover_repo_root(&nested).expect("root");
    assert_eq!(root, dir.path().canonicalize().expect("canonical"));
}

#[test]
fn real_git_diffs_against_base_ref() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    if !init_repo(root) {
        eprintln!("git unavailable; skipping");
        return;
    }
    fs::write(root.join("a.ts"), "1").expect("write");
    assert!(commit_all(root, "base"));
    fs::create_dir_all(root.join("src")).expect("mkdir");
    fs::write(root.join("src/b.ts"), "2").expect("write");
    fs::write(root.join("a.ts"), "3").expect("write");
    assert!(commit_all(root, "change"));

    let git = RealGit;
    assert!(git.ref_exists(root, "HEAD~1"));
    assert!(!git.ref_exists(root, "origin/main"));
    assert_eq!(resolve_base_ref(&git, root, None), "HEAD~1");

    let changed = git.changed_files(root, "HEAD~1").expect("diff");
    assert_eq!(changed, vec!["a.ts", "src/b.ts"]);
}

#[test]
fn unknown_base_ref_falls_back_to_working_tree_diff() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    if !init_repo(root) {
        eprintln!("git unavailable; skipping");
        return;
    }
    fs::write(root.join("a.ts"), "1").expect("write");
    assert!(commit_all(root, "only"));
    fs::write(root.join("a.ts"), "2").expect("write");

    let changed = RealGit.changed_files(root, "no-such-ref").expect("diff");
    assert_eq!(changed, vec!["a.ts"]);
}
