use crate::cli::Cli;
use crate::models::{
    default_marker_names, default_markdown_extensions, OutputFormat, ScanConfig, SortMode,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".tickle.toml";

/// Settings read from a `.tickle.toml` file. Every key is optional; command
/// line flags take precedence over anything set here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    /// Markers to detect
    pub markers: Option<Vec<String>>,

    /// Glob patterns to skip, extended by `--ignore`
    pub ignore: Vec<String>,

    pub include_hidden: Option<bool>,

    pub sort: Option<SortMode>,

    pub format: Option<OutputFormat>,

    /// Extensions treated as markdown for checkbox detection
    pub markdown_extensions: Option<Vec<String>>,
}

/// Load configuration from file or use defaults
///
/// Search order:
/// 1. Custom path if provided via --config
/// 2. .tickle.toml in current directory
/// 3. ~/.tickle.toml in home directory
/// 4. Built-in defaults
pub fn load_config(custom_path: Option<&Path>) -> Result<FileConfig> {
    // If custom path provided, use it exclusively
    if let Some(path) = custom_path {
        return load_config_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let current_config = PathBuf::from(CONFIG_FILE_NAME);
    if current_config.exists() {
        return load_config_from_file(&current_config);
    }

    if let Some(home_config) = get_home_config_path() {
        if home_config.exists() {
            return load_config_from_file(&home_config);
        }
    }

    Ok(FileConfig::default())
}

/// Load config from a specific file
fn load_config_from_file(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

fn get_home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Merge file settings and command line flags into the scan request
pub fn resolve(cli: &Cli, file: FileConfig) -> ScanConfig {
    let active_markers = match &cli.markers {
        Some(raw) => split_list(raw),
        None => file.markers.unwrap_or_else(default_marker_names),
    };

    let mut ignore_patterns = file.ignore;
    if let Some(raw) = &cli.ignore {
        ignore_patterns.extend(split_list(raw).into_iter().filter(|p| !p.is_empty()));
    }

    ScanConfig {
        roots: cli.paths.clone(),
        active_markers,
        ignore_patterns,
        include_hidden: cli.hidden || file.include_hidden.unwrap_or(false),
        sort_mode: cli.sort.or(file.sort).unwrap_or_default(),
        output_format: cli.format.or(file.format).unwrap_or_default(),
        markdown_extensions: file
            .markdown_extensions
            .unwrap_or_else(default_markdown_extensions),
    }
}

/// Split a comma-separated flag value. Empty items are kept so the core can
/// reject them.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|item| item.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("tickle").chain(args.iter().copied()))
    }

    #[test]
    fn test_load_custom_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
markers = ["TODO", "CHECKBOX"]
ignore = ["node_modules", "*.min.js"]
include_hidden = true
sort = "marker"
format = "json"
markdown_extensions = ["md", "mdx"]
"#;
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = load_config(Some(temp_file.path())).unwrap();
        assert_eq!(
            config.markers,
            Some(vec!["TODO".to_string(), "CHECKBOX".to_string()])
        );
        assert_eq!(config.ignore.len(), 2);
        assert_eq!(config.include_hidden, Some(true));
        assert_eq!(config.sort, Some(SortMode::Marker));
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert_eq!(
            config.markdown_extensions,
            Some(vec!["md".to_string(), "mdx".to_string()])
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"ignore = [\"vendor\"]\n").unwrap();

        let config = load_config(Some(temp_file.path())).unwrap();
        assert_eq!(config.markers, None);
        assert_eq!(config.ignore, vec!["vendor".to_string()]);
        assert_eq!(config.sort, None);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"sort = \"age\"\n").unwrap();

        assert!(load_config(Some(temp_file.path())).is_err());
        assert!(load_config(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        let config = resolve(&cli(&[]), FileConfig::default());
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn test_resolve_flags_override_file() {
        let file = FileConfig {
            markers: Some(vec!["NOTE".to_string()]),
            ignore: vec!["vendor".to_string()],
            include_hidden: Some(false),
            sort: Some(SortMode::File),
            format: Some(OutputFormat::Markdown),
            markdown_extensions: None,
        };
        let args = cli(&[
            "src",
            "docs",
            "--markers",
            "TODO, fixme",
            "--ignore",
            "*.min.js,node_modules",
            "--sort",
            "marker",
            "--format",
            "json",
            "--hidden",
        ]);

        let config = resolve(&args, file);
        assert_eq!(config.roots, vec![PathBuf::from("src"), PathBuf::from("docs")]);
        assert_eq!(config.active_markers, vec!["TODO", "fixme"]);
        assert_eq!(config.ignore_patterns, vec!["vendor", "*.min.js", "node_modules"]);
        assert!(config.include_hidden);
        assert_eq!(config.sort_mode, SortMode::Marker);
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_resolve_file_values_apply_without_flags() {
        let file = FileConfig {
            markers: Some(vec!["CHECKBOX".to_string()]),
            format: Some(OutputFormat::Markdown),
            markdown_extensions: Some(vec!["mdx".to_string()]),
            ..FileConfig::default()
        };

        let config = resolve(&cli(&[]), file);
        assert_eq!(config.active_markers, vec!["CHECKBOX"]);
        assert_eq!(config.output_format, OutputFormat::Markdown);
        assert_eq!(config.markdown_extensions, vec!["mdx"]);
    }

    #[test]
    fn test_split_list_keeps_empty_items() {
        assert_eq!(split_list("TODO,,FIXME"), vec!["TODO", "", "FIXME"]);
        assert_eq!(split_list(""), vec![""]);
    }
}
