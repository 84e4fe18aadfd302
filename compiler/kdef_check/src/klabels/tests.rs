use std::path::Path;

use kdef_diagnostic::SinkConfig;
use kdef_ir::{Definition, Location, NonTerminal, ProductionItem, Rule, Sort, Source};
use kdef_load::{DefinitionOutcome, LoadOptions, Loader};
use pretty_assertions::assert_eq;

use super::*;

fn files() -> Files {
    Files::new("/work", "/nonexistent/include", "/nonexistent/tmp")
}

fn definition(text: &str) -> Definition {
    let options = LoadOptions {
        auto_import_prelude: false,
        ..LoadOptions::default()
    };
    let mut sink = DiagnosticSink::new();
    let outcome = Loader::new(files(), options)
        .load_definition(
            "MAIN",
            "MAIN",
            text,
            &Source::new("/work/lang.k"),
            Path::new("/work"),
            &[],
            &mut sink,
        )
        .unwrap();
    match outcome {
        DefinitionOutcome::Definition(def) => def,
        DefinitionOutcome::Preprocessed(_) => panic!("unexpected preprocess output"),
    }
}

fn check_with(text: &str, policy: DuplicatePolicy) -> DiagnosticSink {
    let mut sink = DiagnosticSink::new();
    crate::check_definition(&definition(text), &mut sink, policy, &files());
    sink
}

fn check(text: &str) -> DiagnosticSink {
    check_with(text, DuplicatePolicy::PerModule)
}

fn error_messages(sink: &DiagnosticSink) -> Vec<&str> {
    sink.errors().iter().map(|d| d.message.as_str()).collect()
}

fn warning_messages(sink: &DiagnosticSink) -> Vec<&str> {
    sink.warnings().iter().map(|d| d.message.as_str()).collect()
}

#[test]
fn undefined_label_is_reported_at_its_use() {
    let sink = check("module MAIN\n  rule `bar`(.KList) => .K\nendmodule");
    assert_eq!(
        error_messages(&sink),
        vec!["Found klabel bar not defined in any production."]
    );
    let diag = &sink.errors()[0];
    assert_eq!(diag.code, ErrorCode::E3001);
    assert_eq!(diag.source, Some(Source::new("/work/lang.k")));
    assert_eq!(diag.location, Some(Location::new(2, 8, 2, 20)));
}

#[test]
fn each_use_site_is_reported_once() {
    let sink = check("module MAIN\n  rule `bar`(.KList) => `bar`(.KList)\nendmodule");
    assert_eq!(sink.error_count(), 2);

    // scanning the same sentence twice adds nothing new
    let def = definition("module MAIN\n  rule `bar`(.KList) => .K\nendmodule");
    let main = def.main_module();
    let mut session = CheckKLabels::new(DuplicatePolicy::PerModule, &files());
    let mut sink = DiagnosticSink::new();
    for _ in 0..2 {
        for sentence in main.local_sentences() {
            session.check(sentence, main, &mut sink);
        }
    }
    assert_eq!(sink.error_count(), 1);
}

#[test]
fn labels_must_be_visible_through_imports() {
    let visible = check(
        r#"module LIB syntax Exp ::= "a" endmodule
module MAIN imports LIB rule `a`(.KList) => .K endmodule"#,
    );
    assert_eq!(visible.error_count(), 0);

    let hidden = check(
        r#"module LIB syntax Exp ::= "a" endmodule
module MAIN rule `a`(.KList) => .K endmodule"#,
    );
    assert_eq!(
        error_messages(&hidden),
        vec!["Found klabel a not defined in any production."]
    );
}

#[test]
fn conditions_and_contexts_are_scanned() {
    let sink = check(
        r#"module MAIN
  syntax Exp ::= "a"
  rule `a`(.KList) => .K requires `p`(.KList) ensures `q`(.KList)
  context `r`(HOLE)
  context alias `s`(HOLE) requires `t`(.KList)
endmodule"#,
    );
    let mut messages = error_messages(&sink);
    messages.sort_unstable();
    assert_eq!(
        messages,
        vec![
            "Found klabel p not defined in any production.",
            "Found klabel q not defined in any production.",
            "Found klabel r not defined in any production.",
            "Found klabel s not defined in any production.",
            "Found klabel t not defined in any production.",
        ]
    );
}

#[test]
fn variables_and_internal_labels_are_exempt() {
    let sink = check(
        r#"module MAIN
  syntax Exp ::= f(x: Exp) | "a"
  rule F(X) => #klabel(L) requires `isExp`(X)
  rule `#cells`(.KList) => `project:Exp`(`project:f:x`(`a`(.KList)))
  rule `#SemanticCastToExp`(`f`(X)) => `_:=K_`(X, X)
endmodule"#,
    );
    assert_eq!(error_messages(&sink), Vec::<&str>::new());
}

#[test]
fn redefinition_across_modules() {
    let text = r#"module A syntax Exp ::= "a" endmodule
module B syntax Exp ::= "a" endmodule
module MAIN imports A imports B rule `a`(.KList) => .K endmodule"#;

    let sink = check_with(text, DuplicatePolicy::PerModule);
    assert_eq!(
        error_messages(&sink),
        vec!["KLabel a defined in multiple modules: A and B."]
    );
    assert_eq!(sink.errors()[0].code, ErrorCode::E3002);

    let sink = check_with(text, DuplicatePolicy::GloballyUnique);
    assert_eq!(
        error_messages(&sink),
        vec!["Symbol a is not unique. Previously defined as: syntax Exp ::= \"a\" [klabel(a)]"]
    );
    assert_eq!(sink.errors()[0].code, ErrorCode::E3003);
}

#[test]
fn redefinition_within_one_module() {
    let text = r#"module MAIN
  syntax Exp ::= "a"
  syntax Stmt ::= "a"
  rule `a`(.KList) => .K
endmodule"#;
    assert_eq!(check_with(text, DuplicatePolicy::PerModule).error_count(), 0);
    assert_eq!(check_with(text, DuplicatePolicy::GloballyUnique).error_count(), 1);
}

#[test]
fn internal_duplicates_are_allowed_for_kore() {
    let text = r#"module A syntax K ::= ".K" [klabel(#EmptyK), unused] endmodule
module MAIN imports A syntax KItem ::= "dotk" [klabel(#EmptyK), unused] endmodule"#;
    let sink = check_with(text, DuplicatePolicy::GloballyUnique);
    assert_eq!(sink.error_count(), 0);

    // the module rule still applies without the kore policy
    let sink = check_with(text, DuplicatePolicy::PerModule);
    assert_eq!(
        error_messages(&sink),
        vec!["KLabel #EmptyK defined in multiple modules: A and MAIN."]
    );
}

#[test]
fn unused_symbols_are_warned_in_order() {
    let sink = check(
        r#"module MAIN
  syntax Exp ::= "b" | "a" | "c"
  rule `c`(.KList) => .K
endmodule"#,
    );
    assert_eq!(
        warning_messages(&sink),
        vec![
            "Symbol 'a' defined but not used. Add the 'unused' attribute if this is intentional.",
            "Symbol 'b' defined but not used. Add the 'unused' attribute if this is intentional.",
        ]
    );
    assert!(sink.warnings().iter().all(|w| w.code == ErrorCode::W0003));
    assert_eq!(sink.warnings()[0].location.map(|l| l.start_line), Some(2));
}

#[test]
fn unused_exemptions() {
    let sink = check(
        r#"module MAIN
  syntax Bag [cellCollection]
  syntax Exp ::= "quiet" [unused]
  syntax Top ::= "<top>" Exp "</top>" [cell, maincell]
  syntax BagCell ::= "<bag>" Bag "</bag>" [cell]
  syntax ExpCell ::= "<exp>" Exp "</exp>" [cell]
  syntax Gen ::= "gen" [klabel(<generatedTop>)]
endmodule"#,
    );
    assert_eq!(
        warning_messages(&sink),
        vec!["Symbol '<exp>_</exp>' defined but not used. Add the 'unused' attribute if this is intentional."]
    );
}

#[test]
fn one_use_covers_the_whole_declaration() {
    let sink = check(
        r#"module MAIN
  syntax Exp ::= "e"
  syntax Exps ::= List{Exp, ","}
  rule `_,_`(`e`(.KList), X) => X
endmodule"#,
    );
    assert_eq!(sink.warning_count(), 0);
    assert_eq!(sink.error_count(), 0);
}

#[test]
fn unsourced_uses_do_not_count() {
    let prod = Production::new(
        Sort::new("Exp"),
        vec![ProductionItem::Terminal("a".into())],
        Some("a".into()),
        Att::empty()
            .with_source(Source::new("/work/lang.k"))
            .with_location(Location::new(1, 1, 1, 3)),
    );
    let rule = Rule {
        body: K::apply(KLabel::symbol("a"), Vec::new()),
        requires: K::bool_true(),
        ensures: K::bool_true(),
        att: Att::empty(),
    };
    let module = Arc::new(Module::new(
        "MAIN",
        Vec::new(),
        vec![Sentence::Production(prod), Sentence::Rule(rule)],
        Att::empty(),
    ));

    let mut session = CheckKLabels::new(DuplicatePolicy::PerModule, &files());
    let mut sink = DiagnosticSink::new();
    for sentence in module.local_sentences() {
        session.check(sentence, &module, &mut sink);
    }
    session.finish(&mut sink);
    assert_eq!(sink.error_count(), 0);
    assert_eq!(sink.warning_count(), 1);
}

#[test]
fn unsourced_productions_are_not_warned() {
    let prod = Production::new(
        Sort::new("Exp"),
        vec![ProductionItem::NonTerminal(NonTerminal::new(Sort::new("Int")))],
        Some("inj".into()),
        Att::empty(),
    );
    let module = Arc::new(Module::new(
        "MAIN",
        Vec::new(),
        vec![Sentence::Production(prod)],
        Att::empty(),
    ));
    let mut session = CheckKLabels::new(DuplicatePolicy::PerModule, &files());
    let mut sink = DiagnosticSink::new();
    session.check(&module.local_sentences()[0], &module, &mut sink);
    session.finish(&mut sink);
    assert_eq!(sink.warning_count(), 0);
}

#[test]
fn include_directory_symbols_are_exempt() {
    let include = tempfile::tempdir().unwrap();
    let root = std::fs::canonicalize(include.path()).unwrap();
    let files = Files::new("/work", &root, "/nonexistent/tmp");

    let declared_in = |path: String| {
        Sentence::Production(Production::new(
            Sort::new("Exp"),
            vec![ProductionItem::Terminal("x".into())],
            Some(format!("x@{path}")),
            Att::empty()
                .with_source(Source::new(path))
                .with_location(Location::new(1, 1, 1, 3)),
        ))
    };
    let module = Arc::new(Module::new(
        "MAIN",
        Vec::new(),
        vec![
            declared_in(format!("{}/builtin/kast.md", root.display())),
            declared_in("/work/lang.k".to_string()),
        ],
        Att::empty(),
    ));

    let mut session = CheckKLabels::new(DuplicatePolicy::PerModule, &files);
    let mut sink = DiagnosticSink::new();
    for sentence in module.local_sentences() {
        session.check(sentence, &module, &mut sink);
    }
    session.finish(&mut sink);
    assert_eq!(
        warning_messages(&sink),
        vec!["Symbol 'x@/work/lang.k' defined but not used. Add the 'unused' attribute if this is intentional."]
    );
}

#[test]
fn unused_symbols_can_be_errors() {
    let mut sink = DiagnosticSink::with_config(SinkConfig {
        warnings_as_errors: true,
    });
    let def = definition(r#"module MAIN syntax Exp ::= "a" endmodule"#);
    crate::check_definition(&def, &mut sink, DuplicatePolicy::PerModule, &files());
    assert_eq!(sink.error_count(), 1);
    assert_eq!(sink.errors()[0].code, ErrorCode::W0003);
    assert!(sink.errors()[0].is_error());
}

#[test]
fn policy_follows_the_backend() {
    assert_eq!(DuplicatePolicy::from_kore(true), DuplicatePolicy::GloballyUnique);
    assert_eq!(DuplicatePolicy::from_kore(false), DuplicatePolicy::PerModule);
    assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::PerModule);
}
