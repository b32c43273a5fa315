use crate::error::ConfigError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path};

/// Decides which entries below a scan root take part in the scan
#[derive(Debug, Clone)]
pub struct PathFilter {
    ignore: GlobSet,
    include_hidden: bool,
}

impl PathFilter {
    /// Compile the ignore globs. `*` and `?` never cross a `/`, and matching
    /// is case-sensitive.
    pub fn new<S: AsRef<str>>(patterns: &[S], include_hidden: bool) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| invalid_pattern(pattern, e))?;
            builder.add(glob);
        }

        let ignore = builder
            .build()
            .map_err(|e| invalid_pattern(&patterns_label(patterns), e))?;

        Ok(Self {
            ignore,
            include_hidden,
        })
    }

    /// True if the entry at `relative` (relative to the scan root) must be
    /// skipped. An empty path is the root itself and is never excluded.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        let mut segments = 0;

        for component in relative.components() {
            let Component::Normal(name) = component else {
                continue;
            };
            segments += 1;

            if !self.include_hidden && name.to_string_lossy().starts_with('.') {
                return true;
            }

            if self.ignore.is_match(Path::new(name)) {
                return true;
            }
        }

        segments > 0 && self.ignore.is_match(to_slash_path(relative))
    }
}

/// Render a relative path with `/` separators regardless of platform
pub fn to_slash_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn invalid_pattern(pattern: &str, err: globset::Error) -> ConfigError {
    ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.kind().to_string(),
    }
}

fn patterns_label<S: AsRef<str>>(patterns: &[S]) -> String {
    patterns
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str], include_hidden: bool) -> PathFilter {
        PathFilter::new(patterns, include_hidden).unwrap()
    }

    #[test]
    fn test_root_is_never_excluded() {
        let f = filter(&["*"], false);
        assert!(!f.is_excluded(Path::new("")));
        assert!(!f.is_excluded(Path::new(".")));
    }

    #[test]
    fn test_hidden_segments() {
        let f = filter(&[], false);
        assert!(f.is_excluded(Path::new(".git")));
        assert!(f.is_excluded(Path::new(".git/config")));
        assert!(f.is_excluded(Path::new("src/.cache/notes.txt")));
        assert!(f.is_excluded(Path::new(".env")));
        assert!(!f.is_excluded(Path::new("src/main.rs")));

        let f = filter(&[], true);
        assert!(!f.is_excluded(Path::new(".git/config")));
        assert!(!f.is_excluded(Path::new("src/.cache/notes.txt")));
    }

    #[test]
    fn test_segment_patterns() {
        let f = filter(&["*.min.js", "node_modules"], false);
        assert!(f.is_excluded(Path::new("node_modules")));
        assert!(f.is_excluded(Path::new("web/node_modules/lib/index.js")));
        assert!(f.is_excluded(Path::new("static/app.min.js")));
        assert!(!f.is_excluded(Path::new("static/app.js")));
        assert!(!f.is_excluded(Path::new("node_modules_backup/a.js")));
    }

    #[test]
    fn test_full_path_patterns() {
        let f = filter(&["src/generated", "docs/*.md"], false);
        assert!(f.is_excluded(Path::new("src/generated")));
        assert!(f.is_excluded(Path::new("docs/guide.md")));
        assert!(!f.is_excluded(Path::new("docs/api/guide.md")));
        assert!(!f.is_excluded(Path::new("lib/src/generated")));
    }

    #[test]
    fn test_question_mark_and_case() {
        let f = filter(&["file?.txt"], false);
        assert!(f.is_excluded(Path::new("file1.txt")));
        assert!(!f.is_excluded(Path::new("file10.txt")));
        assert!(!f.is_excluded(Path::new("FILE1.txt")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PathFilter::new(&["src/[abc"], false).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "src/[abc"));
    }

    #[test]
    fn test_to_slash_path() {
        let path = Path::new("src").join("nested").join("a.py");
        assert_eq!(to_slash_path(&path), "src/nested/a.py");
        assert_eq!(to_slash_path(Path::new("./a.py")), "a.py");
    }
}
