use std::io;
use std::path::PathBuf;

use kdef_diagnostic::{Diagnostic, ErrorCode};
use kdef_ir::Source;
use kdef_outer::ParseError;

/// A failure that aborts the current load.
///
/// Non-fatal findings never show up here; they go to the
/// [`DiagnosticSink`](kdef_diagnostic::DiagnosticSink).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Could not read file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}", .0.message)]
    Fatal(Box<Diagnostic>),
}

impl LoadError {
    pub fn fatal(diagnostic: Diagnostic) -> Self {
        LoadError::Fatal(Box::new(diagnostic.into_error()))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::Parse(err) => err.code(),
            LoadError::Io { .. } => ErrorCode::E1002,
            LoadError::Fatal(diag) => diag.code,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LoadError::Parse(err) => err.to_diagnostic(),
            LoadError::Io { path, .. } => Diagnostic::error(ErrorCode::E1002)
                .with_message(self.to_string())
                .with_source(Source::from_path(path)),
            LoadError::Fatal(diag) => (**diag).clone(),
        }
    }
}

impl From<Diagnostic> for LoadError {
    fn from(diagnostic: Diagnostic) -> Self {
        LoadError::fatal(diagnostic)
    }
}
