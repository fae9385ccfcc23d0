//! Input discovery and the per-file pipeline: read → parse → rewrite → write.
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{DriverError, ParseError};
use crate::parser::parse;
use crate::rewrite::{DeclChange, Rewrite, RewriteOptions, rewrite};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rewrite changed files in place.
    Write,
    /// Compute rewrites, touch nothing.
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Updated,
    WouldUpdate,
    Unchanged,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub declarations: Vec<DeclChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rewritten source of a changed file.
    #[serde(skip)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub files: Vec<FileReport>,
}

impl Report {
    pub fn failed(&self) -> usize {
        self.count(FileStatus::Failed)
    }
    pub fn changed(&self) -> usize {
        self.count(FileStatus::Updated) + self.count(FileStatus::WouldUpdate)
    }
    fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PIPELINE
// ————————————————————————————————————————————————————————————————————————————

pub fn process_source(src: &str, options: &RewriteOptions) -> Result<Rewrite, ParseError> {
    let file = parse(src)?;
    Ok(rewrite(src, file, options))
}

/// Files are independent, so they run on the rayon pool; reports keep input order.
pub fn run(paths: &[PathBuf], config: &Config, mode: Mode) -> Report {
    let options = config.rewrite_options();
    let files = paths
        .par_iter()
        .map(|path| match process_file(path, &options, mode) {
            Ok(report) => report,
            Err(error) => {
                warn!("{error}");
                FileReport {
                    path: path.clone(),
                    status: FileStatus::Failed,
                    declarations: Vec::new(),
                    error: Some(error.to_string()),
                    output: None,
                }
            }
        })
        .collect();
    Report { files }
}

fn process_file(path: &Path, options: &RewriteOptions, mode: Mode) -> Result<FileReport, DriverError> {
    let source = std::fs::read_to_string(path)
        .map_err(|source| DriverError::Io { path: path.to_path_buf(), source })?;
    let rewrite = process_source(&source, options)
        .map_err(|source| DriverError::Parse { path: path.to_path_buf(), source })?;

    let changed = rewrite.changed();
    let status = match (changed, mode) {
        (false, _) => FileStatus::Unchanged,
        (true, Mode::Preview) => FileStatus::WouldUpdate,
        (true, Mode::Write) => {
            std::fs::write(path, &rewrite.output)
                .map_err(|source| DriverError::Io { path: path.to_path_buf(), source })?;
            FileStatus::Updated
        }
    };
    if changed {
        info!(path = %path.display(), ?status, "accessors synthesized");
    } else {
        debug!(path = %path.display(), "nothing to add");
    }
    Ok(FileReport {
        path: path.to_path_buf(),
        status,
        declarations: rewrite.changes,
        error: None,
        output: changed.then_some(rewrite.output),
    })
}

// ————————————————————————————————————————————————————————————————————————————
// INPUT RESOLUTION
// ————————————————————————————————————————————————————————————————————————————

/// Literal files, directories (searched recursively by extension) and quoted
/// glob patterns, deduplicated in first-seen order and filtered by `exclude`.
pub fn resolve_inputs<I>(patterns: I, config: &Config) -> Result<Vec<PathBuf>, DriverError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let exclude = config.exclude_patterns()?;
    let mut out = IndexSet::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();
        if has_glob_chars(pattern) {
            let matched = expand_glob(pattern)?;
            if matched.is_empty() {
                return Err(DriverError::NoMatches(pattern.to_string()));
            }
            out.extend(matched);
        } else if Path::new(pattern).is_dir() {
            for ext in &config.extensions {
                let dir = pattern.trim_end_matches('/');
                out.extend(expand_glob(&format!("{dir}/**/*.{ext}"))?);
            }
        } else {
            out.insert(PathBuf::from(pattern));
        }
    }

    Ok(out
        .into_iter()
        .filter(|path| !exclude.iter().any(|p| p.matches_path(path)))
        .collect())
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, DriverError> {
    let paths = glob::glob(pattern)
        .map_err(|source| DriverError::Pattern { pattern: pattern.to_string(), source })?;
    let mut out = Vec::new();
    for entry in paths {
        let path = entry?;
        if path.is_file() {
            out.push(path);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_by_status() {
        let file = |status| FileReport {
            path: PathBuf::from("a.swift"),
            status,
            declarations: Vec::new(),
            error: None,
            output: None,
        };
        let report = Report {
            files: vec![
                file(FileStatus::Updated),
                file(FileStatus::WouldUpdate),
                file(FileStatus::Unchanged),
                file(FileStatus::Failed),
            ],
        };
        assert_eq!(report.changed(), 2);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn process_source_surfaces_parse_errors() {
        let err = process_source("enum A {", &RewriteOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::Unclosed { open: '{', .. }));
    }

    #[test]
    fn literal_paths_pass_through_in_order_without_duplicates() {
        let paths = resolve_inputs(["b.swift", "a.swift", "b.swift"], &Config::default()).unwrap();
        assert_eq!(paths, vec![PathBuf::from("b.swift"), PathBuf::from("a.swift")]);
    }

    #[test]
    fn glob_without_matches_is_an_error() {
        let err = resolve_inputs(["/nonexistent-dir-for-tests/*.swift"], &Config::default());
        assert!(matches!(err, Err(DriverError::NoMatches(_))));
    }
}
