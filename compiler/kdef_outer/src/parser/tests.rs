use kdef_diagnostic::ErrorCode;
use kdef_ir::{
    DefinitionItem, KLabel, Location, NonTerminal, ProductionItem, RawModule, RawProduction,
    RawSentence, Sort, Source, K,
};
use pretty_assertions::assert_eq;

use super::*;

fn source() -> Source {
    Source::new("test.k")
}

fn parse(text: &str) -> Vec<DefinitionItem> {
    parse_definition(&source(), text).unwrap()
}

fn only_module(text: &str) -> RawModule {
    match parse(text).pop().unwrap() {
        DefinitionItem::Module(m) => m,
        DefinitionItem::Require(r) => panic!("expected module, got {r}"),
    }
}

fn term(text: &str) -> K {
    parse_term(&source(), text).unwrap()
}

#[test]
fn requires_and_modules_keep_order() {
    let items = parse(
        r#"require "a.k"
requires "b.md"
module M endmodule"#,
    );
    let rendered: Vec<String> = items
        .iter()
        .map(|item| match item {
            DefinitionItem::Require(r) => r.path.clone(),
            DefinitionItem::Module(m) => m.name.clone(),
        })
        .collect();
    assert_eq!(rendered, vec!["a.k", "b.md", "M"]);
}

#[test]
fn module_records_source_and_location() {
    let module = only_module("\n\nmodule LANG-SYNTAX\n  imports public BOOL\nendmodule\n");
    assert_eq!(module.name, "LANG-SYNTAX");
    assert_eq!(module.source(), Some(&source()));
    assert_eq!(module.location(), Some(Location::new(3, 1, 5, 9)));
    match &module.sentences[0] {
        RawSentence::Import(import) => {
            assert_eq!(import.name, "BOOL");
            assert!(import.att.contains("public"));
        }
        other => panic!("unexpected sentence {other}"),
    }
}

#[test]
fn production_forms() {
    let module = only_module(
        r#"module M
  syntax Exp ::= Int
               | Exp "+" Exp [left, klabel(_+_)]
               > foo(x: Exp, Int) [function]
  syntax Exps ::= List{Exp, ","}
endmodule"#,
    );
    let RawSentence::Syntax {
        sort, productions, ..
    } = &module.sentences[0]
    else {
        panic!("expected syntax block");
    };
    assert_eq!(sort, &Sort::new("Exp"));
    assert_eq!(productions.len(), 3);

    match &productions[1] {
        RawProduction::Items { items, att } => {
            assert_eq!(
                items,
                &vec![
                    ProductionItem::NonTerminal(NonTerminal::new(Sort::new("Exp"))),
                    ProductionItem::Terminal("+".into()),
                    ProductionItem::NonTerminal(NonTerminal::new(Sort::new("Exp"))),
                ]
            );
            assert_eq!(att.get("klabel"), Some("_+_"));
            assert!(att.contains("left"));
            assert_eq!(att.location(), Some(Location::new(3, 18, 3, 48)));
        }
        other => panic!("unexpected production {other}"),
    }

    match &productions[2] {
        RawProduction::Prefix { name, params, att } => {
            assert_eq!(name, "foo");
            assert_eq!(
                params,
                &vec![
                    NonTerminal::named("x", Sort::new("Exp")),
                    NonTerminal::new(Sort::new("Int")),
                ]
            );
            assert!(att.contains("function"));
        }
        other => panic!("unexpected production {other}"),
    }

    let RawSentence::Syntax { productions, .. } = &module.sentences[1] else {
        panic!("expected syntax block");
    };
    assert!(matches!(
        &productions[0],
        RawProduction::List { element, separator, .. }
            if element == &Sort::new("Exp") && separator == ","
    ));
}

#[test]
fn sort_declarations_and_synonyms() {
    let module = only_module("module M syntax Bag [cellCollection] syntax Num = Int endmodule");
    match &module.sentences[..] {
        [RawSentence::SyntaxSort(decl), RawSentence::SortSynonym(syn)] => {
            assert_eq!(decl.sort, Sort::new("Bag"));
            assert!(decl.att.contains("cellCollection"));
            assert_eq!(syn.new_sort, Sort::new("Num"));
            assert_eq!(syn.old_sort, Sort::new("Int"));
        }
        other => panic!("unexpected sentences {other:?}"),
    }
}

#[test]
fn attribute_arguments_are_raw_text() {
    let module = only_module(
        r#"module M
  syntax Exp ::= Exp "*" Exp [format(%1 * (%2)), alias, private]
endmodule"#,
    );
    let RawSentence::Syntax { productions, .. } = &module.sentences[0] else {
        panic!("expected syntax block");
    };
    let att = productions[0].att();
    assert_eq!(att.get("format"), Some("%1 * (%2)"));
    assert!(att.contains("alias"));
    assert!(att.contains("private"));
}

#[test]
fn rule_conditions() {
    let module = only_module(
        "module M\n  rule `f`(X) => X requires `g`(X) ensures true [simplification]\nendmodule",
    );
    let RawSentence::Rule(rule) = &module.sentences[0] else {
        panic!("expected rule");
    };
    assert_eq!(rule.body.to_string(), "`f`(X) => X");
    assert_eq!(rule.requires.to_string(), "`g`(X)");
    assert_eq!(rule.ensures, K::bool_true().with_att(rule.ensures.att().clone()));
    assert!(rule.att.contains("simplification"));
}

#[test]
fn rule_without_conditions_defaults_to_true() {
    let module = only_module("module M rule X endmodule");
    let RawSentence::Rule(rule) = &module.sentences[0] else {
        panic!("expected rule");
    };
    assert_eq!(rule.requires, K::bool_true());
    assert_eq!(rule.ensures, K::bool_true());
}

#[test]
fn contexts_and_aliases() {
    let module =
        only_module("module M context `_+_`(HOLE, _) context alias `[]`(X) requires X endmodule");
    assert!(matches!(module.sentences[0], RawSentence::Context(_)));
    let RawSentence::ContextAlias(alias) = &module.sentences[1] else {
        panic!("expected context alias");
    };
    assert_eq!(alias.requires, K::variable("X").with_att(alias.requires.att().clone()));
}

#[test]
fn term_shapes() {
    let k = term("`a`(.KList) ~> b ~> .K");
    let K::Sequence { items, .. } = &k else {
        panic!("expected sequence, got {k}");
    };
    assert_eq!(items.len(), 3);
    assert_eq!(k.to_string(), "`a`(.KList) ~> `b`(.KList) ~> .K");
}

#[test]
fn variable_heads_are_not_symbols() {
    let K::Apply { label, .. } = term("F(1, \"s\")") else {
        panic!("expected application");
    };
    assert_eq!(label, KLabel::Variable("F".into()));
}

#[test]
fn injected_labels() {
    assert!(matches!(
        term("#klabel(`foo`)"),
        K::InjectedLabel { label: KLabel::Symbol(name), .. } if name == "foo"
    ));
    assert!(matches!(
        term("#klabel(L)"),
        K::InjectedLabel { label: KLabel::Variable(_), .. }
    ));
}

#[test]
fn sorted_variables_and_tokens() {
    let K::Apply { args, .. } = term("`_+_`(X:Int, 42)") else {
        panic!("expected application");
    };
    assert_eq!(args[0].att().get("sort"), Some("Int"));
    assert!(matches!(&args[1], K::Token { value, sort, .. } if value == "42" && sort.name() == "Int"));
}

#[test]
fn term_nodes_carry_locations() {
    let k = term("`f`(\n  X)");
    assert_eq!(k.att().location(), Some(Location::new(1, 1, 2, 4)));
    let K::Apply { args, .. } = k else {
        panic!("expected application");
    };
    assert_eq!(args[0].att().location(), Some(Location::new(2, 3, 2, 3)));
    assert_eq!(args[0].att().source(), Some(&source()));
}

#[test]
fn unknown_character_is_reported() {
    let err = parse_definition(&source(), "module M rule $ endmodule").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0001);
    assert_eq!(err.to_string(), "unrecognized character `$`");
    assert_eq!(err.location(), Location::new(1, 15, 1, 15));
}

#[test]
fn missing_endmodule_is_unexpected_eof() {
    let err = parse_definition(&source(), "module M\n  syntax A\n").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0003);
    assert_eq!(
        err.to_string(),
        "unexpected end of input, expected sentence or `endmodule`"
    );
}

#[test]
fn stray_token_at_top_level() {
    let err = parse_definition(&source(), "rule X").unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0002);
    assert_eq!(err.to_string(), "expected `module` or `require`, found `rule`");
    let diag = err.to_diagnostic();
    assert_eq!(diag.source, Some(source()));
}

#[test]
fn deep_terms_do_not_overflow() {
    let depth = 5_000;
    let text = format!("{}X{}", "`f`(".repeat(depth), ")".repeat(depth));
    assert!(parse_term(&source(), &text).is_ok());
}
