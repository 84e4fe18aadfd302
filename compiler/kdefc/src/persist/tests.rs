use std::sync::Arc;

use kdef_ir::{Att, Module, NonTerminal, Production, ProductionItem, Sentence, Sort, Source};
use pretty_assertions::assert_eq;

use super::*;

fn sample() -> Definition {
    let base = Arc::new(Module::new(
        "BASE",
        Vec::new(),
        vec![Sentence::Production(Production::new(
            Sort::new("Exp"),
            vec![
                ProductionItem::NonTerminal(NonTerminal::new(Sort::new("Exp"))),
                ProductionItem::Terminal("+".into()),
                ProductionItem::NonTerminal(NonTerminal::new(Sort::new("Exp"))),
            ],
            Some("_+_".into()),
            Att::empty().with_source(Source::new("/work/base.k")),
        ))],
        Att::empty(),
    ));
    let main = Arc::new(Module::new("MAIN", vec![Arc::clone(&base)], Vec::new(), Att::empty()));
    Definition::new(
        Arc::clone(&main),
        vec![main, base],
        Att::empty().add(Att::SYNTAX_MODULE, "MAIN"),
    )
}

#[test]
fn saved_definitions_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = save_definition(&sample(), dir.path()).unwrap();
    assert_eq!(path, dir.path().join("proof-spec-kompiled").join("definition.bin"));

    let back = read_definition(&path).unwrap();
    assert_eq!(back.main_module().name(), "MAIN");
    assert_eq!(back.syntax_module_name(), Some("MAIN"));
    assert!(back.main_module().defines_klabel("_+_"));
}

#[test]
fn unwritable_target_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "not a directory").unwrap();

    let err = save_definition(&sample(), &blocker).unwrap_err();
    assert_eq!(err.code, ErrorCode::E4001);
    assert!(err.message.starts_with("Could not save definition to "));
}

#[test]
fn garbage_is_not_a_definition() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("definition.bin");
    fs::write(&path, [0xff_u8; 3]).unwrap();
    assert_eq!(read_definition(&path).unwrap_err().code, ErrorCode::E1002);
}
