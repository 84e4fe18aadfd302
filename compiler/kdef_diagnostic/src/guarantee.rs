//! Proof that at least one error was reported.

use std::fmt;

/// Zero-sized proof that an error was emitted.
///
/// Functions that fail after reporting to a sink return this instead of
/// `()`, so callers cannot forget that diagnostics exist.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// `Some` iff `count` is non-zero.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(Self::new)
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("error(s) emitted")
    }
}

impl std::error::Error for ErrorGuaranteed {}
