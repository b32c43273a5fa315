//! Directory traversal and the `run_scan` entry point
//!
//! Candidate files are collected with a sequential, name-sorted walk; the
//! per-file scans then run on the rayon pool. Results are gathered back in
//! walk order, so parallelism never changes the output.

use crate::error::ConfigError;
use crate::filters::{to_slash_path, PathFilter};
use crate::markers::{Marker, MarkerMatcher};
use crate::models::{ScanConfig, ScanOutcome, ScanResult, ScanWarning, Task};
use crate::scanner::{is_likely_binary, is_markdown, scan_file};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file that passed the path filter and will be scanned
#[derive(Debug, Clone)]
struct Candidate {
    path: PathBuf,
    display_path: String,
    markdown: bool,
}

/// Validate the configuration, scan every root and return the sorted result
/// together with all non-fatal warnings.
pub fn run_scan(config: &ScanConfig) -> Result<ScanOutcome, ConfigError> {
    let active = Marker::parse_list(&config.active_markers)?;
    let filter = PathFilter::new(&config.ignore_patterns, config.include_hidden)?;
    let matcher =
        MarkerMatcher::new(&active).map_err(|e| ConfigError::MarkerPattern(e.to_string()))?;

    let roots = if config.roots.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        config.roots.clone()
    };
    for root in &roots {
        validate_root(root)?;
    }

    let mut warnings = Vec::new();
    let mut candidates = Vec::new();
    for root in &roots {
        debug!(root = %root.display(), "scanning root");
        collect_files(root, &filter, &matcher, config, &mut candidates, &mut warnings);
    }
    debug!(files = candidates.len(), "collected candidate files");

    let scanned: Vec<Result<Vec<Task>, ScanWarning>> = candidates
        .par_iter()
        .map(|c| scan_file(&c.path, &c.display_path, &matcher, c.markdown))
        .collect();

    let mut tasks = Vec::new();
    for outcome in scanned {
        match outcome {
            Ok(found) => tasks.extend(found),
            Err(warning) => warnings.push(warning),
        }
    }
    debug!(tasks = tasks.len(), warnings = warnings.len(), "scan finished");

    Ok(ScanOutcome {
        result: ScanResult::new(tasks, &active, config.sort_mode),
        warnings,
    })
}

fn validate_root(root: &Path) -> Result<(), ConfigError> {
    if !root.exists() {
        return Err(ConfigError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ConfigError::RootNotDirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Walk one root, pushing eligible files in a deterministic order
fn collect_files(
    root: &Path,
    filter: &PathFilter,
    matcher: &MarkerMatcher,
    config: &ScanConfig,
    candidates: &mut Vec<Candidate>,
    warnings: &mut Vec<ScanWarning>,
) {
    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    // Excluded directories are pruned here, so their contents are never visited
    let entry_filter = filter.clone();
    let entry_root = root.to_path_buf();
    walker.filter_entry(move |entry| {
        let relative = entry.path().strip_prefix(&entry_root).unwrap_or(entry.path());
        !entry_filter.is_excluded(relative)
    });

    for result in walker.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                let (path, message) = split_walk_error(&err);
                warnings.push(ScanWarning::UnreadableEntry {
                    path: path.map(|p| relative_display(root, &p)),
                    message,
                });
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let Some(file_type) = entry.file_type() else {
            continue;
        };

        let path = entry.path();
        if file_type.is_symlink() {
            // Links to files are scanned; links to directories are never followed
            match fs::metadata(path) {
                Ok(meta) if meta.is_file() => {}
                _ => continue,
            }
        } else if !file_type.is_file() {
            continue;
        }

        let display_path = relative_display(root, path);
        if is_likely_binary(path) {
            debug!(path = %display_path, "skipping binary extension");
            continue;
        }

        candidates.push(Candidate {
            path: path.to_path_buf(),
            markdown: matcher.wants_checkboxes() && is_markdown(path, &config.markdown_extensions),
            display_path,
        });
    }
}

fn relative_display(root: &Path, path: &Path) -> String {
    to_slash_path(path.strip_prefix(root).unwrap_or(path))
}

/// Pull the offending path (if any) and the underlying message out of a walk error
fn split_walk_error(err: &ignore::Error) -> (Option<PathBuf>, String) {
    match err {
        ignore::Error::WithPath { path, err } => {
            let (_, message) = split_walk_error(err);
            (Some(path.clone()), message)
        }
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            split_walk_error(err)
        }
        other => (None, other.to_string()),
    }
}
