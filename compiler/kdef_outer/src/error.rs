use kdef_diagnostic::{Diagnostic, ErrorCode};
use kdef_ir::{Location, Source};

/// Outer-syntax failure, carrying the origin of the offending token.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unrecognized character `{text}`")]
    InvalidToken {
        text: String,
        origin: Source,
        location: Location,
    },
    #[error("expected {expected}, found `{found}`")]
    UnexpectedToken {
        expected: String,
        found: String,
        origin: Source,
        location: Location,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        expected: String,
        origin: Source,
        location: Location,
    },
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::InvalidToken { .. } => ErrorCode::E0001,
            ParseError::UnexpectedToken { .. } => ErrorCode::E0002,
            ParseError::UnexpectedEof { .. } => ErrorCode::E0003,
        }
    }

    pub fn origin(&self) -> &Source {
        match self {
            ParseError::InvalidToken { origin, .. }
            | ParseError::UnexpectedToken { origin, .. }
            | ParseError::UnexpectedEof { origin, .. } => origin,
        }
    }

    pub fn location(&self) -> Location {
        match self {
            ParseError::InvalidToken { location, .. }
            | ParseError::UnexpectedToken { location, .. }
            | ParseError::UnexpectedEof { location, .. } => *location,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_source(self.origin().clone())
            .with_location(self.location())
    }
}
