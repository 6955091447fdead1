//! Thin wrapper over the `git` binary: base revision resolution and changed files.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),
    #[error("git {args} failed: {stderr}")]
    Command { args: String, stderr: String },
    #[error("no base revision found; pass --base-sha or fetch the base branch first")]
    NoBaseRevision,
}

#[derive(Debug, Clone)]
pub struct Git {
    bin: String,
    root: PathBuf,
}

impl Git {
    /// `root` is the working directory for every git invocation.
    pub fn new(bin: impl Into<String>, root: &Path) -> Self {
        Self { bin: bin.into(), root: root.to_path_buf() }
    }

    /// Use `base_sha` when given, otherwise the merge-base of FETCH_HEAD and HEAD
    /// (fork-point first, then plain).
    pub fn resolve_base(&self, base_sha: Option<&str>) -> Result<String, GitError> {
        if let Some(sha) = base_sha.map(str::trim).filter(|s| !s.is_empty()) {
            return Ok(sha.to_string());
        }

        let candidates: [&[&str]; 2] = [
            &["merge-base", "--fork-point", "FETCH_HEAD", "HEAD"],
            &["merge-base", "FETCH_HEAD", "HEAD"],
        ];
        for args in candidates {
            match self.execute(args) {
                Ok(out) => {
                    let sha = out.trim();
                    if !sha.is_empty() {
                        info!("resolved base revision {} via git {}", sha, args.join(" "));
                        return Ok(sha.to_string());
                    }
                }
                Err(GitError::Command { stderr, .. }) => {
                    debug!("git {} gave no base: {}", args.join(" "), stderr.trim());
                }
                Err(e) => return Err(e),
            }
        }
        Err(GitError::NoBaseRevision)
    }

    /// Paths (relative to the repository root) changed between `base` and HEAD.
    pub fn changed_files(&self, base: &str) -> Result<Vec<String>, GitError> {
        let out = self.execute(&["diff", "--name-only", base, "HEAD"])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn execute(&self, args: &[&str]) -> Result<String, GitError> {
        debug!("git {} (in {})", args.join(" "), self.root.display());
        let output = Command::new(&self.bin)
            .args(args)
            .current_dir(&self.root)
            .env("GIT_OPTIONAL_LOCKS", "0")
            .output()?;

        if !output.status.success() {
            return Err(GitError::Command {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
pub(crate) mod test_support;
