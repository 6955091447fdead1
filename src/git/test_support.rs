//! Throwaway repositories for tests that need a real `git`.

use std::{fs, path::Path, process::Command};

pub fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

pub fn run(dir: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .args(["-c", "user.name=test", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(out.status.success(), "git {:?}: {}", args, String::from_utf8_lossy(&out.stderr));
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

/// Write `rel` under `dir`, commit it, and return the new HEAD sha.
pub fn commit_file(dir: &Path, rel: &str, msg: &str) -> String {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, msg).unwrap();
    run(dir, &["add", "."]);
    run(dir, &["commit", "-q", "-m", msg]);
    run(dir, &["rev-parse", "HEAD"])
}

pub fn setup_repository() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    run(dir.path(), &["init", "-q"]);
    dir
}
