//! Shared diagnostic accumulator.
//!
//! One sink travels through resolution, graph building and checking.
//! Hard errors are kept with set semantics (the same violation reached
//! twice is reported once) while warnings are kept in arrival order.

use rustc_hash::FxHashSet;

use crate::emitter::DiagnosticEmitter;
use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Categories of non-fatal findings.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum WarningKind {
    /// Behavior that will become an error (deprecated builtin names).
    FutureError,
    /// A symbol is defined but never referenced.
    UnusedSymbol,
    /// The requested syntax module does not exist.
    MissingSyntaxModule,
}

impl WarningKind {
    pub fn code(self) -> ErrorCode {
        match self {
            WarningKind::FutureError => ErrorCode::W0001,
            WarningKind::MissingSyntaxModule => ErrorCode::W0002,
            WarningKind::UnusedSymbol => ErrorCode::W0003,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SinkConfig {
    /// Promote every registered warning to a hard error.
    pub warnings_as_errors: bool,
}

#[derive(Debug, Default)]
pub struct DiagnosticSink {
    config: SinkConfig,
    errors: Vec<Diagnostic>,
    seen: FxHashSet<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SinkConfig) -> Self {
        DiagnosticSink {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> SinkConfig {
        self.config
    }

    /// Record a hard error. Duplicates are dropped, but the guarantee
    /// holds either way.
    pub fn add_error(&mut self, diagnostic: Diagnostic) -> ErrorGuaranteed {
        let diagnostic = diagnostic.into_error();
        if self.seen.insert(diagnostic.clone()) {
            tracing::trace!(code = %diagnostic.code, "error recorded");
            self.errors.push(diagnostic);
        }
        ErrorGuaranteed::new()
    }

    /// Record a warning of the given kind; it becomes an error under
    /// `warnings_as_errors`.
    pub fn register_warning(&mut self, kind: WarningKind, diagnostic: Diagnostic) {
        let mut diagnostic = diagnostic;
        diagnostic.code = kind.code();
        if self.config.warnings_as_errors {
            self.add_error(diagnostic);
        } else if !self.warnings.contains(&diagnostic) {
            self.warnings.push(diagnostic);
        }
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.errors.len())
    }

    /// `Err` as soon as any hard error has been recorded.
    pub fn abort_if_errors(&self) -> Result<(), ErrorGuaranteed> {
        match self.has_errors() {
            Some(guar) => Err(guar),
            None => Ok(()),
        }
    }

    /// Write warnings, then errors, then a summary line.
    pub fn emit_to(&self, emitter: &mut dyn DiagnosticEmitter) {
        emitter.emit_all(&self.warnings);
        emitter.emit_all(&self.errors);
        emitter.emit_summary(self.error_count(), self.warning_count());
        emitter.flush();
    }
}

#[cfg(test)]
mod tests;
