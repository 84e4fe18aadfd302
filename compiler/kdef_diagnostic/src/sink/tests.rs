use kdef_ir::Source;
use pretty_assertions::assert_eq;

use super::*;
use crate::Severity;

fn not_unique(name: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E3003)
        .with_message(format!("Symbol {name} is not unique."))
        .with_source(Source::new("a.k"))
}

#[test]
fn empty_sink_has_no_errors() {
    let sink = DiagnosticSink::new();
    assert!(sink.has_errors().is_none());
    assert!(sink.abort_if_errors().is_ok());
}

#[test]
fn identical_errors_are_reported_once() {
    let mut sink = DiagnosticSink::new();
    sink.add_error(not_unique("foo"));
    sink.add_error(not_unique("foo"));
    sink.add_error(not_unique("bar"));

    assert_eq!(sink.error_count(), 2);
    assert!(sink.abort_if_errors().is_err());
}

#[test]
fn errors_keep_arrival_order() {
    let mut sink = DiagnosticSink::new();
    sink.add_error(not_unique("b"));
    sink.add_error(not_unique("a"));
    let messages: Vec<_> = sink.errors().iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["Symbol b is not unique.", "Symbol a is not unique."]);
}

#[test]
fn warnings_do_not_fail_the_run() {
    let mut sink = DiagnosticSink::new();
    sink.register_warning(
        WarningKind::UnusedSymbol,
        Diagnostic::warning(ErrorCode::W0003).with_message("unused"),
    );
    assert_eq!(sink.warning_count(), 1);
    assert!(sink.has_errors().is_none());
}

#[test]
fn warning_code_follows_kind() {
    let mut sink = DiagnosticSink::new();
    sink.register_warning(
        WarningKind::FutureError,
        Diagnostic::warning(ErrorCode::W0003).with_message("deprecated"),
    );
    assert_eq!(sink.warnings()[0].code, ErrorCode::W0001);
}

#[test]
fn warnings_as_errors_promotes() {
    let mut sink = DiagnosticSink::with_config(SinkConfig {
        warnings_as_errors: true,
    });
    sink.register_warning(
        WarningKind::MissingSyntaxModule,
        Diagnostic::warning(ErrorCode::W0002).with_message("missing"),
    );
    assert_eq!(sink.warning_count(), 0);
    assert_eq!(sink.error_count(), 1);
    assert_eq!(sink.errors()[0].severity, Severity::Error);
}
