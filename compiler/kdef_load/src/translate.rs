//! Raw-to-semantic module translation.
//!
//! Desugars the surface forms of the outer syntax:
//!
//! | raw                         | semantic                                   |
//! |-----------------------------|--------------------------------------------|
//! | `Exp "+" Exp`               | production labelled `_+_`                  |
//! | `foo(x: Int)`               | `"foo" "(" x: Int ")"` labelled `foo`      |
//! | `List{Exp, ","}`            | cons `_,_` and nil `.List{"_,_"}`          |
//! | `Int` (single non-terminal) | unlabelled subsort                         |
//!
//! Every module also gets a `NAME$SYNTAX` companion holding copies of its
//! syntax sentences and importing the companions of its imports.

use std::sync::Arc;

use kdef_diagnostic::{Diagnostic, ErrorCode};
use kdef_ir::{
    Att, Module, NonTerminal, Production, ProductionItem, RawModule, RawProduction, RawSentence,
    Sentence, Sort,
};
use rustc_hash::FxHashMap;

use crate::collab::ModuleTranslator;

/// The default [`ModuleTranslator`].
#[derive(Copy, Clone, Debug, Default)]
pub struct KilToKore {
    left_assoc: bool,
}

impl KilToKore {
    pub fn new(left_assoc: bool) -> Self {
        KilToKore { left_assoc }
    }
}

impl ModuleTranslator for KilToKore {
    #[tracing::instrument(level = "trace", skip_all, fields(module = module.name.as_str()))]
    fn translate(
        &self,
        module: &RawModule,
        all: &[RawModule],
        built: &mut FxHashMap<String, Arc<Module>>,
    ) -> Result<Arc<Module>, Diagnostic> {
        let mut in_progress = Vec::new();
        self.translate_module(module, all, built, &mut in_progress)
    }
}

impl KilToKore {
    fn translate_module(
        &self,
        module: &RawModule,
        all: &[RawModule],
        built: &mut FxHashMap<String, Arc<Module>>,
        in_progress: &mut Vec<String>,
    ) -> Result<Arc<Module>, Diagnostic> {
        if let Some(done) = built.get(&module.name) {
            return Ok(Arc::clone(done));
        }
        in_progress.push(module.name.clone());

        let mut imports = Vec::new();
        for sentence in &module.sentences {
            let RawSentence::Import(import) = sentence else {
                continue;
            };
            if let Some(done) = built.get(&import.name) {
                imports.push(Arc::clone(done));
                continue;
            }
            if let Some(start) = in_progress.iter().position(|name| *name == import.name) {
                let mut cycle = in_progress[start..].to_vec();
                cycle.push(import.name.clone());
                return Err(Diagnostic::error(ErrorCode::E2004)
                    .with_message(format!("Import cycle detected: {}", cycle.join(" -> ")))
                    .with_origin(&import.att));
            }
            let Some(raw) = all.iter().find(|m| m.name == import.name) else {
                return Err(Diagnostic::error(ErrorCode::E2003)
                    .with_message(format!(
                        "Could not find module {} imported by {}",
                        import.name, module.name
                    ))
                    .with_origin(&import.att));
            };
            let imported = kdef_stack::ensure_sufficient_stack(|| {
                self.translate_module(raw, all, built, in_progress)
            })?;
            imports.push(imported);
        }
        in_progress.pop();

        let sentences = self.sentences(module);

        let syntax_imports = imports
            .iter()
            .map(|m| {
                built
                    .get(&Module::syntax_name(m.name()))
                    .map_or_else(|| Arc::clone(m), Arc::clone)
            })
            .collect();
        let syntax_sentences = sentences.iter().filter(|s| s.is_syntax()).cloned().collect();
        let companion = Arc::new(Module::new(
            Module::syntax_name(&module.name),
            syntax_imports,
            syntax_sentences,
            module.att.clone(),
        ));
        built.insert(companion.name().to_string(), companion);

        let semantic = Arc::new(Module::new(
            module.name.clone(),
            imports,
            sentences,
            module.att.clone(),
        ));
        built.insert(module.name.clone(), Arc::clone(&semantic));
        tracing::trace!(module = module.name.as_str(), "translated");
        Ok(semantic)
    }

    fn sentences(&self, module: &RawModule) -> Vec<Sentence> {
        let mut out = Vec::new();
        for sentence in &module.sentences {
            match sentence {
                RawSentence::Import(_) => {}
                RawSentence::Syntax {
                    sort, productions, ..
                } => {
                    for production in productions {
                        self.productions(sort, production, &mut out);
                    }
                }
                RawSentence::SyntaxSort(decl) => out.push(Sentence::SyntaxSort(decl.clone())),
                RawSentence::SortSynonym(syn) => out.push(Sentence::SortSynonym(syn.clone())),
                RawSentence::Rule(rule) => out.push(Sentence::Rule(rule.clone())),
                RawSentence::Context(ctx) => out.push(Sentence::Context(ctx.clone())),
                RawSentence::ContextAlias(ctx) => out.push(Sentence::ContextAlias(ctx.clone())),
            }
        }
        out
    }

    fn productions(&self, sort: &Sort, production: &RawProduction, out: &mut Vec<Sentence>) {
        match production {
            RawProduction::Items { items, att } => {
                let klabel = explicit_label(att).or_else(|| generated_label(items, att));
                let att = self.with_assoc(att, items);
                out.push(Sentence::Production(Production::new(
                    sort.clone(),
                    items.clone(),
                    klabel,
                    att,
                )));
            }
            RawProduction::Prefix { name, params, att } => {
                let mut items = vec![
                    ProductionItem::Terminal(name.clone()),
                    ProductionItem::Terminal("(".into()),
                ];
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        items.push(ProductionItem::Terminal(",".into()));
                    }
                    items.push(ProductionItem::NonTerminal(param.clone()));
                }
                items.push(ProductionItem::Terminal(")".into()));
                let klabel = explicit_label(att).unwrap_or_else(|| name.clone());
                out.push(Sentence::Production(Production::new(
                    sort.clone(),
                    items,
                    Some(klabel),
                    att.clone(),
                )));
            }
            RawProduction::List {
                element,
                separator,
                att,
            } => {
                let cons_label = explicit_label(att).unwrap_or_else(|| format!("_{separator}_"));
                let nil_label = format!(".List{{\"{cons_label}\"}}");
                let att = att.clone().add("userList", "*");
                out.push(Sentence::Production(Production::new(
                    sort.clone(),
                    vec![
                        ProductionItem::NonTerminal(NonTerminal::new(element.clone())),
                        ProductionItem::Terminal(separator.clone()),
                        ProductionItem::NonTerminal(NonTerminal::new(sort.clone())),
                    ],
                    Some(cons_label),
                    att.clone().add_flag(Att::RIGHT),
                )));
                out.push(Sentence::Production(Production::new(
                    sort.clone(),
                    Vec::new(),
                    Some(nil_label),
                    att,
                )));
            }
        }
    }

    /// In left-assoc mode, binary-or-wider productions default to `left`.
    fn with_assoc(&self, att: &Att, items: &[ProductionItem]) -> Att {
        let arity = items
            .iter()
            .filter(|item| matches!(item, ProductionItem::NonTerminal(_)))
            .count();
        let has_assoc =
            att.contains(Att::LEFT) || att.contains(Att::RIGHT) || att.contains(Att::NON_ASSOC);
        if self.left_assoc && arity >= 2 && !has_assoc {
            att.clone().add_flag(Att::LEFT)
        } else {
            att.clone()
        }
    }
}

fn explicit_label(att: &Att) -> Option<String> {
    att.get(Att::KLABEL).map(str::to_string)
}

/// `_`-placeholder label: terminals verbatim, non-terminals as `_`.
///
/// Subsorts and token productions without non-terminals get none.
fn generated_label(items: &[ProductionItem], att: &Att) -> Option<String> {
    let has_nonterminal = items
        .iter()
        .any(|item| matches!(item, ProductionItem::NonTerminal(_)));
    let is_subsort = matches!(items, [ProductionItem::NonTerminal(_)]);
    if is_subsort || (att.contains(Att::TOKEN) && !has_nonterminal) {
        return None;
    }
    let label = items
        .iter()
        .map(|item| match item {
            ProductionItem::Terminal(t) => t.as_str(),
            ProductionItem::NonTerminal(_) => "_",
        })
        .collect();
    Some(label)
}
