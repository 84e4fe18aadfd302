use kdef_ir::{Att, Location, Source};
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn builder_collects_fields() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("Could not find file: b.k")
        .with_source(Source::new("a.k"))
        .with_location(Location::new(1, 1, 1, 14))
        .with_note("searched 2 directories")
        .with_suggestion("pass -I <dir>");

    assert!(diag.is_error());
    assert_eq!(diag.origin().as_deref(), Some("a.k:1:1"));
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn with_origin_reads_attributes() {
    let att = Att::empty()
        .with_source(Source::new("lang.k"))
        .with_location(Location::new(4, 3, 4, 20));
    let diag = Diagnostic::warning(ErrorCode::W0003).with_origin(&att);

    assert_eq!(diag.source, Some(Source::new("lang.k")));
    assert_eq!(diag.location, Some(Location::new(4, 3, 4, 20)));
    assert!(!diag.is_error());
}

#[test]
fn origin_without_location_is_path_only() {
    let diag = Diagnostic::error(ErrorCode::E2005).with_source(Source::new("main.k"));
    assert_eq!(diag.origin().as_deref(), Some("main.k"));
    assert_eq!(Diagnostic::error(ErrorCode::E2005).origin(), None);
}

#[test]
fn display_renders_header_and_context() {
    let diag = Diagnostic::error(ErrorCode::E3001)
        .with_message("Found klabel foo not defined in any production.")
        .with_source(Source::new("a.k"))
        .with_location(Location::new(7, 10, 7, 13))
        .with_note("klabels are visible through imports");

    assert_eq!(
        diag.to_string(),
        "error [E3001]: Found klabel foo not defined in any production.\n  \
         --> a.k:7:10\n  = note: klabels are visible through imports"
    );
}

#[test]
fn into_error_promotes_warning() {
    let diag = Diagnostic::warning(ErrorCode::W0001).with_message("deprecated");
    let promoted = diag.clone().into_error();
    assert!(promoted.is_error());
    assert_eq!(promoted.code, diag.code);
    assert_ne!(promoted, diag);
}
