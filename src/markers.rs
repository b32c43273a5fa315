use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of task marker. Declaration order is the priority order used by
/// marker sorting (BUG first, CHECKBOX last).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Marker {
    Bug,
    Fixme,
    Todo,
    Hack,
    Note,
    Checkbox,
}

/// How a marker is recognized on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Marker word followed by `:`, whitespace, or end of line
    CommentMarker,
    /// Unchecked markdown list item: `- [ ]` or `* [ ]`
    Checkbox,
}

/// Static description of one supported marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerDefinition {
    pub marker: Marker,
    pub name: &'static str,
    pub priority: u8,
    pub pattern: PatternKind,
}

/// Every supported marker, ordered by priority (lower rank = higher priority)
pub const REGISTRY: [MarkerDefinition; 6] = [
    MarkerDefinition {
        marker: Marker::Bug,
        name: "BUG",
        priority: 0,
        pattern: PatternKind::CommentMarker,
    },
    MarkerDefinition {
        marker: Marker::Fixme,
        name: "FIXME",
        priority: 1,
        pattern: PatternKind::CommentMarker,
    },
    MarkerDefinition {
        marker: Marker::Todo,
        name: "TODO",
        priority: 2,
        pattern: PatternKind::CommentMarker,
    },
    MarkerDefinition {
        marker: Marker::Hack,
        name: "HACK",
        priority: 3,
        pattern: PatternKind::CommentMarker,
    },
    MarkerDefinition {
        marker: Marker::Note,
        name: "NOTE",
        priority: 4,
        pattern: PatternKind::CommentMarker,
    },
    MarkerDefinition {
        marker: Marker::Checkbox,
        name: "CHECKBOX",
        priority: 5,
        pattern: PatternKind::Checkbox,
    },
];

impl Marker {
    /// Markers detected when the caller doesn't pick any (CHECKBOX is opt-in)
    pub const DEFAULTS: [Marker; 5] = [
        Marker::Todo,
        Marker::Fixme,
        Marker::Bug,
        Marker::Note,
        Marker::Hack,
    ];

    pub fn definition(self) -> &'static MarkerDefinition {
        &REGISTRY[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn priority(self) -> u8 {
        self.definition().priority
    }

    /// Resolve a list of raw marker names, rejecting empty and unknown ones
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Marker>, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::NoMarkers);
        }

        let mut markers = Vec::with_capacity(names.len());
        for name in names {
            let marker: Marker = name.as_ref().parse()?;
            if !markers.contains(&marker) {
                markers.push(marker);
            }
        }

        Ok(markers)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Marker {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }

        REGISTRY
            .iter()
            .find(|def| def.name.eq_ignore_ascii_case(trimmed))
            .map(|def| def.marker)
            .ok_or_else(|| ConfigError::UnknownMarker(trimmed.to_string()))
    }
}

/// Compiled matcher for the active subset of the registry
#[derive(Debug, Clone)]
pub struct MarkerMatcher {
    comment_rules: Vec<(Marker, Regex)>,
    checkbox: Option<Regex>,
}

impl MarkerMatcher {
    pub fn new(active: &[Marker]) -> Result<Self, regex::Error> {
        let mut comment_rules = Vec::new();
        let mut checkbox = None;

        for def in REGISTRY.iter().filter(|def| active.contains(&def.marker)) {
            match def.pattern {
                PatternKind::CommentMarker => {
                    comment_rules.push((def.marker, comment_marker_regex(def.name)?));
                }
                PatternKind::Checkbox => checkbox = Some(checkbox_regex()?),
            }
        }

        Ok(Self {
            comment_rules,
            checkbox,
        })
    }

    /// Whether CHECKBOX detection is enabled at all
    pub fn wants_checkboxes(&self) -> bool {
        self.checkbox.is_some()
    }

    /// First active marker, in priority order, matching this line.
    /// Checkboxes are only considered when `markdown` is set.
    pub fn match_line(&self, line: &str, markdown: bool) -> Option<Marker> {
        // Registry order puts every comment marker ahead of CHECKBOX
        if let Some((marker, _)) = self.comment_rules.iter().find(|(_, re)| re.is_match(line)) {
            return Some(*marker);
        }

        match &self.checkbox {
            Some(re) if markdown && re.is_match(line) => Some(Marker::Checkbox),
            _ => None,
        }
    }
}

/// Whole marker word followed by `:`, whitespace, or end of line
fn comment_marker_regex(name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\b{}(?::|\s|$)", regex::escape(name)))
}

fn checkbox_regex() -> Result<Regex, regex::Error> {
    Regex::new(r"^\s*[-*] \[ \]")
}
