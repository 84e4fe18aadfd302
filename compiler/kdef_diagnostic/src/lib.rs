//! Diagnostic system for the definition front-end.
//!
//! - Error codes for searchability (`kdefc explain E3001`)
//! - Clear messages tied to a source and location
//! - A shared [`DiagnosticSink`] that accumulates hard errors and warnings
//!   across the whole pipeline, so one run reports every violation
//!
//! # Error Guarantees
//!
//! `ErrorGuaranteed` can only be obtained from a sink that holds at least
//! one error:
//!
//! ```text
//! sink.add_error(diagnostic);
//! sink.abort_if_errors()?; // Err(ErrorGuaranteed)
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod sink;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use sink::{DiagnosticSink, SinkConfig, WarningKind};
