use super::*;
use crate::{Location, NonTerminal, ProductionItem, Source, SyntaxSort};

fn prod(sort: &str, label: &str, site: Option<(&str, u32)>) -> Sentence {
    let mut att = Att::empty();
    if let Some((file, line)) = site {
        att = att
            .with_source(Source::new(file))
            .with_location(Location::new(line, 1, line, 20));
    }
    Sentence::Production(Production::new(
        Sort::new(sort),
        vec![ProductionItem::Terminal(label.to_string())],
        Some(label.to_string()),
        att,
    ))
}

fn module(name: &str, imports: Vec<Arc<Module>>, sentences: Vec<Sentence>) -> Arc<Module> {
    Arc::new(Module::new(name, imports, sentences, Att::empty()))
}

#[test]
fn klabels_are_visible_through_imports() {
    let base = module("BASE", vec![], vec![prod("Exp", "zero", None)]);
    let top = module("TOP", vec![base.clone()], vec![prod("Exp", "one", None)]);

    assert!(top.defines_klabel("zero"));
    assert!(top.defines_klabel("one"));
    assert!(!base.defines_klabel("one"));
}

#[test]
fn diamond_imports_index_each_production_once() {
    let base = module("BASE", vec![], vec![prod("Exp", "zero", None)]);
    let left = module("LEFT", vec![base.clone()], vec![]);
    let right = module("RIGHT", vec![base.clone()], vec![]);
    let top = module("TOP", vec![left, right], vec![]);

    assert_eq!(top.productions_for("zero").len(), 1);
}

#[test]
fn productions_sharing_a_site_are_grouped() {
    let m = module(
        "M",
        vec![],
        vec![
            prod("Exps", "_,_", Some(("m.k", 3))),
            prod("Exps", ".List{\"_,_\"}", Some(("m.k", 3))),
            prod("Exp", "other", Some(("m.k", 4))),
        ],
    );
    let site = DeclSite::new(Source::new("m.k"), Location::new(3, 1, 3, 20));
    let labels: Vec<_> = m
        .productions_for_site(&site)
        .iter()
        .filter_map(|p| p.klabel.as_deref())
        .collect();
    assert_eq!(labels, vec!["_,_", ".List{\"_,_\"}"]);
}

#[test]
fn sort_families_are_derived() {
    let m = module("M", vec![], vec![prod("Exp", "zero", None)]);
    assert!(m.is_semantic_cast("#SemanticCastToExp"));
    assert!(m.is_sort_predicate("isExp"));
    assert!(m.is_sort_projection("project:Exp"));
    assert!(!m.is_sort_predicate("isStmt"));
}

#[test]
fn named_nonterminals_define_record_projections() {
    let p = Production::new(
        Sort::new("Pair"),
        vec![
            ProductionItem::Terminal("pair".into()),
            ProductionItem::Terminal("(".into()),
            ProductionItem::NonTerminal(NonTerminal::named("fst", Sort::new("Int"))),
            ProductionItem::Terminal(")".into()),
        ],
        Some("pair".into()),
        Att::empty(),
    );
    let m = module("M", vec![], vec![Sentence::Production(p)]);
    assert!(m.is_record_projection("project:pair:fst"));
}

#[test]
fn sort_attributes_merge_across_declarations() {
    let decl = |key: &str| {
        Sentence::SyntaxSort(SyntaxSort {
            sort: Sort::new("Bag"),
            att: Att::empty().add_flag(key),
        })
    };
    let base = module("BASE", vec![], vec![decl(Att::CELL_COLLECTION)]);
    let top = module("TOP", vec![base], vec![decl("hook")]);
    let att = top.sort_attributes_for(&Sort::new("Bag"));
    assert!(att.is_some_and(|a| a.contains("cellCollection") && a.contains("hook")));
}

#[test]
fn syntax_companion_name() {
    assert_eq!(Module::syntax_name("FOO"), "FOO$SYNTAX");
}
