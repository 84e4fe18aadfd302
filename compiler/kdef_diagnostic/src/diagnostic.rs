use std::fmt;

use kdef_ir::{Att, Location, Source};

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic tied to an optional source and location.
///
/// Diagnostics are hashable so the sink can deduplicate them: the same
/// violation found along two paths is reported once.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    pub severity: Severity,
    /// Main message.
    pub message: String,
    /// File path or synthetic origin label.
    pub source: Option<Source>,
    pub location: Option<Location>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
    /// Text suggestions for fixing the problem.
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            source: None,
            location: None,
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach whatever origin the attributes carry.
    pub fn with_origin(mut self, att: &Att) -> Self {
        if let Some(source) = att.source() {
            self.source = Some(source.clone());
        }
        if let Some(location) = att.location() {
            self.location = Some(location);
        }
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a suggestion for fixing the problem.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Re-issue a warning as a hard error (`-Werror`).
    pub fn into_error(mut self) -> Self {
        self.severity = Severity::Error;
        self
    }

    /// Check if this is an error (vs warning).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// `path:line:column`, or just the path when the location is unknown.
    pub fn origin(&self) -> Option<String> {
        let source = self.source.as_ref()?;
        Some(match self.location {
            Some(loc) => format!("{}:{}:{}", source.as_str(), loc.start_line, loc.start_column),
            None => source.as_str().to_string(),
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        if let Some(origin) = self.origin() {
            write!(f, "\n  --> {origin}")?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
