//! Error types for tweetshape.
//!
//! Two layers:
//!
//! - [`ValidationError`] is what the validator returns: the first offending
//!   field path, the kind of violation, and a human-readable detail.
//! - [`TweetshapeError`] covers everything around the validator (decoding JSON
//!   text, reading files, configuration) and wraps validation failures.

use colored::Colorize;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Field paths
// =============================================================================

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the input document.
///
/// Rendered as `metrics.like_count`, `data[2].author.username` or
/// `[3].text`. The empty path (the document itself) renders as `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The document root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Path of the object member `key` below this path.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Path of the array element `index` below this path.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if idx == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

impl PartialEq<str> for FieldPath {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for FieldPath {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Validation errors
// =============================================================================

/// Why a field was rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// A required key is absent.
    Missing,
    /// The value is present but of the wrong JSON kind.
    WrongType,
    /// A numeric or length bound is violated.
    OutOfRange,
    /// A string could not be converted to its semantic type.
    Unparseable,
}

impl ValidationErrorKind {
    pub const ALL: [Self; 4] = [
        Self::Missing,
        Self::WrongType,
        Self::OutOfRange,
        Self::Unparseable,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::WrongType => "wrong_type",
            Self::OutOfRange => "out_of_range",
            Self::Unparseable => "unparseable",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first violation found while validating a record.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{path}: {kind} ({detail})")]
pub struct ValidationError {
    path: FieldPath,
    kind: ValidationErrorKind,
    detail: String,
}

impl ValidationError {
    pub fn new(path: FieldPath, kind: ValidationErrorKind, detail: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            detail: detail.into(),
        }
    }

    /// A required key is absent.
    #[must_use]
    pub fn missing(path: &FieldPath) -> Self {
        Self::new(
            path.clone(),
            ValidationErrorKind::Missing,
            "required field is absent",
        )
    }

    pub fn wrong_type(path: &FieldPath, detail: impl Into<String>) -> Self {
        Self::new(path.clone(), ValidationErrorKind::WrongType, detail)
    }

    pub fn out_of_range(path: &FieldPath, detail: impl Into<String>) -> Self {
        Self::new(path.clone(), ValidationErrorKind::OutOfRange, detail)
    }

    pub fn unparseable(path: &FieldPath, detail: impl Into<String>) -> Self {
        Self::new(path.clone(), ValidationErrorKind::Unparseable, detail)
    }

    #[must_use]
    pub const fn path(&self) -> &FieldPath {
        &self.path
    }

    #[must_use]
    pub const fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

// =============================================================================
// Crate error
// =============================================================================

/// Primary error type for tweetshape operations.
#[derive(Error, Debug)]
pub enum TweetshapeError {
    /// A record failed validation.
    #[error("Invalid tweet at {0}")]
    Validation(#[from] ValidationError),

    /// Input text is not valid JSON.
    #[error("Invalid JSON{}: {source}", line_suffix(.line))]
    Json {
        line: Option<usize>,
        #[source]
        source: serde_json::Error,
    },

    /// File read error with the path that failed.
    #[error("Failed to {operation} '{path}': {source}")]
    PathError {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Other IO failures (stdin, stdout).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parsing error.
    #[error("Invalid configuration in '{path}': {reason}")]
    ConfigError { path: PathBuf, reason: String },
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|n| format!(" on line {n}")).unwrap_or_default()
}

/// Result type alias for tweetshape operations.
pub type Result<T> = std::result::Result<T, TweetshapeError>;

impl TweetshapeError {
    /// Create a JSON decoding error, optionally tied to a JSON Lines line number.
    #[must_use]
    pub const fn json(source: serde_json::Error, line: Option<usize>) -> Self {
        Self::Json { line, source }
    }

    /// Create a path error with context.
    pub fn path_error(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::PathError {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Get a suggestion for how to fix this error, if applicable.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Json { line: Some(_), .. } => {
                Some("JSON Lines input needs exactly one complete object per line.")
            }
            Self::Json { line: None, .. } => {
                Some("Input must be a JSON object, an array of objects, or JSON Lines.")
            }
            Self::PathError { .. } => Some("Check that the path exists and is readable."),
            Self::ConfigError { .. } => {
                Some("Run 'tweetshape config --path' to locate the config file.")
            }
            _ => None,
        }
    }
}

// =============================================================================
// CLI Error Formatting
// =============================================================================

/// Format a structured CLI error with explanation and suggestions.
#[must_use]
pub fn format_error(title: &str, explanation: &str, suggestions: &[&str]) -> String {
    use std::fmt::Write;

    let mut output = format!("{} {}", "✗".red().bold(), title.bold());

    if !explanation.is_empty() {
        let _ = write!(output, "\n\n   {explanation}");
    }

    if !suggestions.is_empty() {
        output.push_str("\n\n   ");
        if suggestions.len() == 1 {
            let _ = write!(output, "{} {}", "Hint:".cyan(), suggestions[0]);
        } else {
            let _ = write!(output, "{}:", "Try".cyan());
            for suggestion in suggestions {
                let _ = write!(output, "\n     {} {}", "•".dimmed(), suggestion);
            }
        }
    }

    output
}
