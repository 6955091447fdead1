//! Plugin selection: explicit list, changed packages, or every package.

use std::{
    collections::BTreeSet,
    fs,
    path::Path,
};

use anyhow::{Context, Result};

use crate::git::Git;

/// How the set of plugins to run is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Names given on the command line, used as-is.
    Explicit(Vec<String>),
    /// Packages touched between the base revision and HEAD.
    Changed { base_sha: Option<String> },
    /// Every directory under the packages root.
    All,
}

impl Selection {
    pub fn from_flags(plugins: &[String], changed: bool, base_sha: Option<&str>) -> Self {
        if !plugins.is_empty() {
            Selection::Explicit(plugins.to_vec())
        } else if changed {
            Selection::Changed { base_sha: base_sha.map(String::from) }
        } else {
            Selection::All
        }
    }
}

pub fn select_plugins(
    selection: &Selection,
    exclude: &[String],
    packages_dir: &Path,
    git: &Git,
) -> Result<Vec<String>> {
    let names = match selection {
        Selection::Explicit(names) => dedup(names),
        Selection::Changed { base_sha } => {
            let base = git.resolve_base(base_sha.as_deref())?;
            let files = git
                .changed_files(&base)
                .with_context(|| format!("listing files changed since {}", base))?;
            plugins_from_changed_files(files.iter().map(String::as_str))
        }
        Selection::All => list_plugin_dirs(packages_dir)?,
    };

    Ok(names.into_iter().filter(|n| !exclude.contains(n)).collect())
}

/// Name of the path segment right after the first `packages` segment, per file.
pub fn plugins_from_changed_files<'a>(files: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<String> = files
        .into_iter()
        .filter_map(|file| {
            let mut segments = file.split('/').skip_while(|s| *s != "packages");
            segments.next()?;
            segments.next().filter(|s| !s.is_empty()).map(String::from)
        })
        .collect();
    set.into_iter().collect()
}

pub fn list_plugin_dirs(packages_dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(packages_dir)
        .with_context(|| format!("reading packages directory {}", packages_dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn dedup(names: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    names.iter().filter(|n| seen.insert(n.as_str())).cloned().collect()
}
