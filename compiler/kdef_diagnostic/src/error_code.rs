//! Error codes for all front-end diagnostics.
//!
//! The first digit names the stage that reports the diagnostic.

use std::fmt;

/// Error codes for all front-end diagnostics.
///
/// - E0xxx: outer syntax
/// - E1xxx: import resolution and file loading
/// - E2xxx: module graph and definition assembly
/// - E3xxx: KLabel checks
/// - E4xxx: output
/// - W0xxx: warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Outer syntax (E0xxx)
    /// Unrecognized character
    E0001,
    /// Unexpected token
    E0002,
    /// Unexpected end of input
    E0003,

    // Import resolution (E1xxx)
    /// Required file not found in any lookup directory
    E1001,
    /// Definition file could not be read
    E1002,
    /// No main file given
    E1003,

    // Module graph (E2xxx)
    /// Module declared more than once
    E2001,
    /// Summary of outer parsing errors
    E2002,
    /// Imported module does not exist
    E2003,
    /// Modules import each other
    E2004,
    /// Main module not found
    E2005,

    // KLabel checks (E3xxx)
    /// KLabel used but never defined
    E3001,
    /// KLabel defined in several modules
    E3002,
    /// Symbol defined at several declaration sites
    E3003,

    // Output (E4xxx)
    /// Assembled definition could not be saved
    E4001,

    // Warnings (W0xxx)
    /// Deprecated builtin filename in require
    W0001,
    /// Main syntax module not found
    W0002,
    /// Symbol defined but never used
    W0003,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E4001,
        ErrorCode::W0001,
        ErrorCode::W0002,
        ErrorCode::W0003,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E4001 => "E4001",
            ErrorCode::W0001 => "W0001",
            ErrorCode::W0002 => "W0002",
            ErrorCode::W0003 => "W0003",
        }
    }

    /// One-line explanation, shown by `kdefc explain`.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unrecognized character in definition text",
            ErrorCode::E0002 => "unexpected token in definition text",
            ErrorCode::E0003 => "definition text ended in the middle of an item",
            ErrorCode::E1001 => "a required file was not found in any lookup directory",
            ErrorCode::E1002 => "a definition file could not be read",
            ErrorCode::E1003 => "exactly one main file must be given",
            ErrorCode::E2001 => "a module name is declared more than once",
            ErrorCode::E2002 => "loading stopped after outer parsing errors",
            ErrorCode::E2003 => "an imported module is not declared anywhere",
            ErrorCode::E2004 => "modules import each other in a cycle",
            ErrorCode::E2005 => "the main module is not part of the definition",
            ErrorCode::E3001 => "a klabel is used but no visible production defines it",
            ErrorCode::E3002 => "a klabel is defined in more than one module",
            ErrorCode::E3003 => "a symbol is defined at more than one declaration site",
            ErrorCode::E4001 => "the assembled definition could not be saved",
            ErrorCode::W0001 => "a builtin file is required through a deprecated name",
            ErrorCode::W0002 => "the main syntax module is missing; the main module is used",
            ErrorCode::W0003 => "a symbol is defined but never used",
        }
    }

    pub fn is_warning(self) -> bool {
        matches!(self, ErrorCode::W0001 | ErrorCode::W0002 | ErrorCode::W0003)
    }

    /// Errors raised while reading outer syntax.
    pub fn is_parser_error(self) -> bool {
        matches!(self, ErrorCode::E0001 | ErrorCode::E0002 | ErrorCode::E0003)
    }

    /// Look up a code by its textual form (`"E3001"`).
    pub fn parse(code: &str) -> Option<ErrorCode> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
