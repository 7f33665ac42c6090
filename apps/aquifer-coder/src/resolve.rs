//! Target resolution: turn a CLI target or configured target list into the
//! concrete paths handed to a linter.
//!
//! - A CLI target must exist. Files must carry an allowed extension;
//!   directories pass through and are filtered by the linter pass.
//! - Configured directories expand through a recursive, name-sorted walk
//!   filtered by extension. Root-level patterns such as `*.js` match one
//!   directory level only.
//! - Missing configured entries are skipped, not reported.

use crate::config::LinterConfig;
use crate::error::{CoderError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A path that existed at resolution time.
pub struct ResolvedTarget {
    pub absolute_path: PathBuf,
    pub kind: TargetKind,
}

impl ResolvedTarget {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            absolute_path: path.into(),
            kind: TargetKind::File,
        }
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            absolute_path: path.into(),
            kind: TargetKind::Directory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether the running command named this linter (`jslint`, `phplint`,
/// `cs`) or runs it as part of the combined `lint`.
pub enum RequestScope {
    Explicit,
    Combined,
}

/// Resolve the targets for one linter.
///
/// With `requested` set, only that path is considered. Otherwise every
/// configured target is expanded in order; an empty result means there is
/// nothing to lint.
pub fn resolve(
    requested: Option<&str>,
    config: &LinterConfig,
    project_root: &Path,
    linter: &'static str,
    scope: RequestScope,
) -> Result<Vec<ResolvedTarget>> {
    match requested {
        Some(target) => resolve_requested(target, config, project_root, linter, scope).map(|t| vec![t]),
        None => Ok(resolve_configured(config, project_root)),
    }
}

fn resolve_requested(
    target: &str,
    config: &LinterConfig,
    project_root: &Path,
    linter: &'static str,
    scope: RequestScope,
) -> Result<ResolvedTarget> {
    let path = project_root.join(target);
    if !path.exists() {
        return Err(CoderError::TargetNotFound { path });
    }
    if path.is_dir() {
        return Ok(ResolvedTarget::directory(path));
    }
    if !config.accepts(&path) {
        return Err(CoderError::UnsupportedExtension {
            path,
            linter,
            extensions: config.extension_list(),
            explicit: scope == RequestScope::Explicit,
        });
    }
    Ok(ResolvedTarget::file(path))
}

fn resolve_configured(config: &LinterConfig, project_root: &Path) -> Vec<ResolvedTarget> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut out = Vec::new();
    for entry in &config.targets {
        let files = if has_glob_meta(entry) {
            match_root_pattern(entry, config, project_root)
        } else {
            let path = project_root.join(entry);
            if path.is_dir() {
                walk_filtered(&path, config)
            } else if path.is_file() {
                if config.accepts(&path) {
                    vec![path]
                } else {
                    tracing::debug!(entry = %entry, "configured file has an unsupported extension");
                    Vec::new()
                }
            } else {
                tracing::debug!(entry = %entry, "configured target does not exist; skipping");
                Vec::new()
            }
        };
        for f in files {
            if seen.insert(f.clone()) {
                out.push(ResolvedTarget::file(f));
            }
        }
    }
    out
}

/// All files beneath `dir` whose extension `config` allows, sorted by name
/// within each directory.
pub fn walk_filtered(dir: &Path, config: &LinterConfig) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && config.accepts(e.path()))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Expand resolved targets into plain files, walking directory targets.
pub fn expand_files(targets: &[ResolvedTarget], config: &LinterConfig) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for t in targets {
        match t.kind {
            TargetKind::File => out.push(t.absolute_path.clone()),
            TargetKind::Directory => out.extend(walk_filtered(&t.absolute_path, config)),
        }
    }
    out
}

fn has_glob_meta(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

fn match_root_pattern(entry: &str, config: &LinterConfig, project_root: &Path) -> Vec<PathBuf> {
    let base = glob::Pattern::escape(&project_root.to_string_lossy());
    let pattern = format!("{}/{}", base.trim_end_matches('/'), entry);
    match glob::glob(&pattern) {
        Ok(paths) => paths
            .filter_map(std::result::Result::ok)
            .filter(|p| p.is_file() && config.accepts(p))
            .collect(),
        Err(e) => {
            tracing::warn!(entry = %entry, error = %e, "invalid target pattern; skipping");
            Vec::new()
        }
    }
}
