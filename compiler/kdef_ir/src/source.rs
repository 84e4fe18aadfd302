//! Origins of text and positions within it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Where a piece of text came from: a file path or a synthetic label
/// such as `Auto imported prelude`.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Source(Arc<str>);

impl Source {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Source(source.into())
    }

    /// Create a source for a file path.
    pub fn from_path(path: &Path) -> Self {
        Source(Arc::from(path.to_string_lossy().as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Literate sources are routed through the markdown extractor.
    pub fn is_markdown(&self) -> bool {
        self.0.ends_with(".md")
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source({})", self.0)
    }
}

/// A 1-based line/column range within a source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Location {
    pub const fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Location {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Location({},{},{},{})",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

/// A textual declaration site.
///
/// One surface declaration may desugar into several productions; all of
/// them share the same site.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclSite {
    pub source: Source,
    pub location: Location,
}

impl DeclSite {
    pub fn new(source: Source, location: Location) -> Self {
        DeclSite { source, location }
    }
}

impl fmt::Display for DeclSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} and {}", self.source, self.location)
    }
}
