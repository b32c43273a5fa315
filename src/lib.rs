//! Tickle - find outstanding work in a source tree
//!
//! Scans directory trees for task markers (TODO, FIXME, BUG, NOTE, HACK) and
//! unchecked markdown checkboxes, then reports them as text, JSON or Markdown.
//!
//! # Pipeline
//!
//! - [`walker`] traverses each root, applying the [`filters::PathFilter`]
//! - [`scanner`] streams each file through the [`markers::MarkerMatcher`]
//! - [`sorter`] orders the tasks by location or marker priority
//! - [`reporter`] renders the [`ScanResult`]
//!
//! Markers are recognized lexically: the marker word anywhere on a line counts,
//! whatever the host language's comment syntax is.
//!
//! # Example
//!
//! ```rust,no_run
//! use tickle::*;
//! use std::path::PathBuf;
//!
//! let config = ScanConfig {
//!     roots: vec![PathBuf::from(".")],
//!     active_markers: vec!["TODO".to_string(), "FIXME".to_string()],
//!     sort_mode: SortMode::Marker,
//!     ..ScanConfig::default()
//! };
//!
//! let outcome = run_scan(&config).unwrap();
//! let output = render(&outcome.result, OutputFormat::Json).unwrap();
//! println!("{}", output);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod filters;
pub mod markers;
pub mod models;
pub mod reporter;
pub mod scanner;
pub mod sorter;
pub mod walker;

// Re-export commonly used types
pub use error::ConfigError;
pub use markers::{Marker, MarkerDefinition, PatternKind, REGISTRY};
pub use models::{OutputFormat, ScanConfig, ScanOutcome, ScanResult, ScanWarning, SortMode, Task};
pub use reporter::{render, render_with_options, RenderOptions};
pub use walker::run_scan;
