use std::path::{Path, PathBuf};
use std::sync::Arc;

use kdef_diagnostic::{DiagnosticSink, ErrorCode};
use kdef_ir::{Att, Source};
use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;

use super::*;
use crate::LoadError;

fn loader(options: LoadOptions) -> Loader {
    Loader::new(Files::new("/nonexistent", "/nonexistent/include", "/nonexistent/tmp"), options)
}

fn no_prelude() -> LoadOptions {
    LoadOptions {
        auto_import_prelude: false,
        ..LoadOptions::default()
    }
}

fn source() -> Source {
    Source::new("mem.k")
}

fn load(
    loader: &Loader,
    main: &str,
    syntax: &str,
    text: &str,
    sink: &mut DiagnosticSink,
) -> Result<DefinitionOutcome, LoadError> {
    loader.load_definition(main, syntax, text, &source(), Path::new("/nonexistent"), &[], sink)
}

fn definition(outcome: DefinitionOutcome) -> Definition {
    match outcome {
        DefinitionOutcome::Definition(def) => def,
        DefinitionOutcome::Preprocessed(text) => panic!("unexpected preprocess output {text}"),
    }
}

#[test]
fn assembles_main_and_syntax_modules() {
    let mut sink = DiagnosticSink::new();
    let def = definition(
        load(
            &loader(no_prelude()),
            "LANG",
            "LANG-SYNTAX",
            r#"module LANG-SYNTAX syntax Exp ::= "a" endmodule
module LANG imports LANG-SYNTAX endmodule"#,
            &mut sink,
        )
        .unwrap(),
    );
    assert_eq!(def.main_module().name(), "LANG");
    assert_eq!(def.syntax_module_name(), Some("LANG-SYNTAX"));
    let names: Vec<_> = def.modules().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["LANG", "LANG$SYNTAX", "LANG-SYNTAX", "LANG-SYNTAX$SYNTAX"]);
    assert_eq!(sink.warning_count(), 0);
}

#[test]
fn missing_syntax_module_falls_back_to_main() {
    let mut sink = DiagnosticSink::new();
    let def = definition(
        load(&loader(no_prelude()), "LANG", "LANG-SYNTAX", "module LANG endmodule", &mut sink)
            .unwrap(),
    );
    assert_eq!(def.syntax_module_name(), Some("LANG"));
    assert_eq!(sink.warnings()[0].code, ErrorCode::W0002);
    assert_eq!(
        sink.warnings()[0].message,
        "Could not find main syntax module with name LANG-SYNTAX in definition.  \
         Use --syntax-module to specify one. Using LANG as default."
    );
}

#[test]
fn missing_main_module_is_fatal() {
    let mut sink = DiagnosticSink::new();
    let err = load(&loader(no_prelude()), "MAIN", "MAIN", "module OTHER endmodule", &mut sink)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2005);
    assert_eq!(
        err.to_string(),
        "Could not find main module with name MAIN in definition. Use --main-module to specify one."
    );
}

#[test]
fn duplicate_modules_are_all_reported() {
    let mut sink = DiagnosticSink::new();
    let err = load(
        &loader(no_prelude()),
        "A",
        "A",
        "module A endmodule\nmodule B endmodule\nmodule A endmodule\nmodule B endmodule\nmodule A endmodule",
        &mut sink,
    )
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2002);
    assert_eq!(err.to_string(), "Had 2 outer parsing errors.");

    let messages: Vec<_> = sink.errors().iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Module A previously declared at Source(mem.k) and Location(1,1,1,18)",
            "Module B previously declared at Source(mem.k) and Location(2,1,2,18)",
        ]
    );
    assert_eq!(sink.errors()[0].location.map(|l| l.start_line), Some(3));
}

#[test]
fn duplicate_modules_follow_first_appearance() {
    let mut sink = DiagnosticSink::new();
    let err = load(
        &loader(no_prelude()),
        "X",
        "X",
        "module X endmodule\nmodule Y endmodule\nmodule Y endmodule\nmodule X endmodule",
        &mut sink,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Had 2 outer parsing errors.");

    let messages: Vec<_> = sink.errors().iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Module X previously declared at Source(mem.k) and Location(1,1,1,18)",
            "Module Y previously declared at Source(mem.k) and Location(2,1,2,18)",
        ]
    );
    assert_eq!(sink.errors()[0].location.map(|l| l.start_line), Some(4));
    assert_eq!(sink.errors()[1].location.map(|l| l.start_line), Some(3));
}

#[test]
fn preprocess_returns_the_rendered_definition() {
    let options = LoadOptions {
        preprocess: true,
        ..no_prelude()
    };
    let mut sink = DiagnosticSink::new();
    let outcome = load(
        &loader(options),
        "A",
        "A",
        "module A imports B endmodule module B endmodule",
        &mut sink,
    )
    .unwrap();
    let DefinitionOutcome::Preprocessed(text) = outcome else {
        panic!("expected preprocess output");
    };
    assert_eq!(text, "module A\n  imports B\nendmodule\n\nmodule B\nendmodule");
}

#[test]
fn preprocess_does_not_translate() {
    let options = LoadOptions {
        preprocess: true,
        ..no_prelude()
    };
    let mut sink = DiagnosticSink::new();
    let outcome = load(&loader(options), "A", "A", "module A imports MISSING endmodule", &mut sink)
        .unwrap();
    let DefinitionOutcome::Preprocessed(text) = outcome else {
        panic!("expected preprocess output");
    };
    assert_eq!(text, "module A\n  imports MISSING\nendmodule");
    assert_eq!(sink.error_count(), 0);
}

#[test]
fn parse_errors_abort_the_load() {
    let mut sink = DiagnosticSink::new();
    let err = load(&loader(no_prelude()), "A", "A", "module A rule endmodule", &mut sink)
        .unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));
    assert_eq!(err.to_diagnostic().source, Some(source()));
}

#[test]
fn translator_errors_abort_the_load() {
    let mut sink = DiagnosticSink::new();
    let err = load(&loader(no_prelude()), "A", "A", "module A imports MISSING endmodule", &mut sink)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2003);
}

#[test]
fn previous_modules_are_visible_and_kept() {
    let base = loader(no_prelude())
        .parse_main_module_outer_syntax(r#"module BASE syntax Exp ::= "b" endmodule"#, &source(), "BASE")
        .unwrap();
    let mut sink = DiagnosticSink::new();
    let def = loader(no_prelude())
        .load_definition_with_previous(
            "MAIN",
            &[Arc::clone(&base)],
            "module MAIN imports BASE endmodule",
            &source(),
            Path::new("/nonexistent"),
            &[],
            &mut sink,
        )
        .unwrap();
    assert!(def.main_module().defines_klabel("b"));
    assert!(def.get_module("BASE").is_some());
    assert_eq!(def.att(), &Att::empty());
}

#[test]
fn redeclaring_a_previous_module_is_reported() {
    let base = loader(no_prelude())
        .parse_main_module_outer_syntax(r#"module BASE syntax Exp ::= "b" endmodule"#, &source(), "BASE")
        .unwrap();
    let mut sink = DiagnosticSink::new();
    let err = loader(no_prelude())
        .load_definition_with_previous(
            "MAIN",
            &[base],
            "module MAIN imports BASE endmodule\nmodule BASE syntax Exp ::= \"mine\" endmodule",
            &source(),
            Path::new("/nonexistent"),
            &[],
            &mut sink,
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2002);
    assert_eq!(err.to_string(), "Had 1 outer parsing errors.");
    assert_eq!(sink.error_count(), 1);
    assert_eq!(sink.errors()[0].code, ErrorCode::E2001);
    assert_eq!(
        sink.errors()[0].message,
        "Module BASE previously declared at Source(mem.k) and Location(1,1,1,40)"
    );
    assert_eq!(sink.errors()[0].location.map(|l| l.start_line), Some(2));
}

#[test]
fn outer_syntax_of_a_single_text() {
    let module = loader(no_prelude())
        .parse_main_module_outer_syntax(
            "require \"ignored.k\"\nmodule A imports B endmodule\nmodule B endmodule",
            &source(),
            "A",
        )
        .unwrap();
    assert_eq!(module.name(), "A");
    assert!(module.imports_module("B"));

    let err = loader(no_prelude())
        .parse_main_module_outer_syntax("module A endmodule", &source(), "Z")
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2005);
}

struct Canned(&'static str);

impl MarkdownExtractor for Canned {
    fn extract(&self, _text: &str, _source: &Source) -> String {
        self.0.to_string()
    }
}

#[test]
fn markdown_sources_go_through_the_extractor() {
    let loader = loader(no_prelude()).with_markdown_extractor(Canned("module FROM-MD endmodule"));
    let mut sink = DiagnosticSink::new();
    let mut resolved = FxHashSet::default();

    let modules = loader
        .slurp("# prose", &Source::new("doc.md"), Path::new("/"), &[], &mut resolved, &mut sink)
        .unwrap();
    assert_eq!(modules[0].name, "FROM-MD");

    // plain sources never reach the extractor
    let modules = loader
        .slurp("module PLAIN endmodule", &source(), Path::new("/"), &[], &mut resolved, &mut sink)
        .unwrap();
    assert_eq!(modules[0].name, "PLAIN");
}

#[test]
fn missing_require_lists_every_lookup_directory() {
    let mut sink = DiagnosticSink::new();
    let mut resolved = FxHashSet::default();
    let err = loader(no_prelude())
        .slurp(
            "require \"nope.k\"",
            &source(),
            Path::new("/cur"),
            &[PathBuf::from("/builtin"), PathBuf::from("/extra")],
            &mut resolved,
            &mut sink,
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E1001);
    assert_eq!(
        err.to_string(),
        "Could not find file: nope.k\nLookup directories:[/builtin, /cur, /extra]"
    );
    assert_eq!(err.to_diagnostic().location.map(|l| l.start_column), Some(1));
}
