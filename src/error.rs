use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems with a scan request, detected before any traversal starts
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("No markers selected; choose at least one of TODO, FIXME, BUG, NOTE, HACK, CHECKBOX")]
    NoMarkers,

    #[error("Empty marker name in marker list")]
    EmptyMarker,

    #[error("Unknown marker: {0}")]
    UnknownMarker(String),

    #[error("Unknown sort mode: {0} (expected 'file' or 'marker')")]
    UnknownSortMode(String),

    #[error("Unknown output format: {0} (expected 'text', 'json' or 'markdown')")]
    UnknownFormat(String),

    #[error("Scan root does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("Scan root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("Invalid ignore pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to compile marker pattern: {0}")]
    MarkerPattern(String),
}
