use crate::error::ConfigError;
use crate::markers::Marker;
use crate::sorter;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// A single task marker found in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Path relative to the scan root, always with `/` separators
    #[serde(rename = "file")]
    pub file_path: String,

    /// Line number where the marker was found (1-indexed)
    #[serde(rename = "line")]
    pub line_number: usize,

    /// Which marker matched
    pub marker: Marker,

    /// The trimmed line containing the marker
    pub text: String,
}

/// Ordering applied to the final task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// By file path, then line number
    #[default]
    File,
    /// By marker priority, then file path, then line number
    Marker,
}

impl FromStr for SortMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "marker" => Ok(Self::Marker),
            other => Err(ConfigError::UnknownSortMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per task with a summary panel
    #[default]
    Text,
    /// JSON document with summary and tasks
    Json,
    /// Markdown document
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

/// Fully resolved scan request handed to the core by its caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directories to scan, in order
    pub roots: Vec<PathBuf>,

    /// Marker names to detect, validated against the registry before scanning
    pub active_markers: Vec<String>,

    /// Glob patterns matched against the relative path and each path segment
    pub ignore_patterns: Vec<String>,

    /// Descend into files and directories whose name starts with `.`
    pub include_hidden: bool,

    pub sort_mode: SortMode,

    pub output_format: OutputFormat,

    /// File extensions (without the dot) eligible for checkbox detection
    pub markdown_extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            active_markers: default_marker_names(),
            ignore_patterns: Vec::new(),
            include_hidden: false,
            sort_mode: SortMode::default(),
            output_format: OutputFormat::default(),
            markdown_extensions: default_markdown_extensions(),
        }
    }
}

pub fn default_marker_names() -> Vec<String> {
    Marker::DEFAULTS.iter().map(|m| m.name().to_string()).collect()
}

pub fn default_markdown_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

/// Sorted tasks plus their summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// All tasks, ordered by `sort_mode`
    pub tasks: Vec<Task>,

    /// Number of distinct files contributing at least one task
    pub files_with_tasks: usize,

    /// Occurrences per active marker, zero entries included
    pub counts_by_marker: BTreeMap<Marker, usize>,

    /// Ordering the tasks were sorted with
    pub sort_mode: SortMode,
}

impl ScanResult {
    /// Sort the tasks and derive the summary counts
    pub fn new(mut tasks: Vec<Task>, active_markers: &[Marker], sort_mode: SortMode) -> Self {
        sorter::sort_tasks(&mut tasks, sort_mode);

        let mut counts_by_marker: BTreeMap<Marker, usize> =
            active_markers.iter().map(|&m| (m, 0)).collect();
        for task in &tasks {
            *counts_by_marker.entry(task.marker).or_insert(0) += 1;
        }

        let files_with_tasks = tasks
            .iter()
            .map(|t| t.file_path.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            tasks,
            files_with_tasks,
            counts_by_marker,
            sort_mode,
        }
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    /// Marker counts with zero entries dropped, in priority order
    pub fn nonzero_counts(&self) -> impl Iterator<Item = (Marker, usize)> + '_ {
        self.counts_by_marker
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(marker, count)| (*marker, *count))
    }
}

/// Non-fatal problem encountered while scanning
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanWarning {
    #[error("cannot read {}: {message}", .path.as_deref().unwrap_or("<unknown path>"))]
    UnreadableEntry {
        path: Option<String>,
        message: String,
    },

    #[error("cannot read file {path}: {message}")]
    UnreadableFile { path: String, message: String },

    #[error("skipped binary file {path}")]
    BinaryFile { path: String },

    #[error("skipped file that is not valid UTF-8 text: {path}")]
    UndecodableFile { path: String },
}

/// Everything a scan produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub result: ScanResult,
    pub warnings: Vec<ScanWarning>,
}
