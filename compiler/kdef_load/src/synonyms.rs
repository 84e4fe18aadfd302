//! Sort synonym expansion.
//!
//! `syntax Num = Int` makes `Num` another name for `Int`. After this pass
//! no production, non-terminal or token visible in a module mentions a
//! synonym: each is replaced by the sort it finally stands for.

use std::sync::Arc;

use kdef_ir::{
    Context, ContextAlias, Module, NonTerminal, Production, ProductionItem, Rule, Sentence, Sort,
    K,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Expand sort synonyms in `modules` and, transitively, in their imports.
///
/// Each module is rebuilt once, so shared imports stay shared.
#[tracing::instrument(level = "debug", skip_all, fields(count = modules.len()))]
pub fn apply_synonyms(modules: &[Arc<Module>]) -> Vec<Arc<Module>> {
    let mut done = FxHashMap::default();
    modules
        .iter()
        .map(|module| rewrite_module(module, &mut done))
        .collect()
}

fn rewrite_module(module: &Arc<Module>, done: &mut FxHashMap<String, Arc<Module>>) -> Arc<Module> {
    if let Some(rewritten) = done.get(module.name()) {
        return Arc::clone(rewritten);
    }
    let imports: Vec<_> = module
        .imports()
        .iter()
        .map(|import| kdef_stack::ensure_sufficient_stack(|| rewrite_module(import, done)))
        .collect();

    let synonyms = module.sort_synonyms();
    let imports_unchanged = imports
        .iter()
        .zip(module.imports())
        .all(|(a, b)| Arc::ptr_eq(a, b));
    let rewritten = if synonyms.is_empty() && imports_unchanged {
        Arc::clone(module)
    } else {
        let expand = Expand { synonyms };
        let sentences = module
            .local_sentences()
            .iter()
            .map(|s| expand.sentence(s))
            .collect();
        Arc::new(Module::new(
            module.name(),
            imports,
            sentences,
            module.att().clone(),
        ))
    };
    done.insert(module.name().to_string(), Arc::clone(&rewritten));
    rewritten
}

struct Expand<'a> {
    synonyms: &'a FxHashMap<Sort, Sort>,
}

impl Expand<'_> {
    /// Follow synonym chains to their end; a cycle stops where it closes.
    fn sort(&self, sort: &Sort) -> Sort {
        let mut current = sort;
        let mut seen = FxHashSet::default();
        while let Some(next) = self.synonyms.get(current) {
            if !seen.insert(current) {
                break;
            }
            current = next;
        }
        current.clone()
    }

    fn sentence(&self, sentence: &Sentence) -> Sentence {
        match sentence {
            Sentence::Production(p) => Sentence::Production(Production::new(
                self.sort(&p.sort),
                p.items
                    .iter()
                    .map(|item| match item {
                        ProductionItem::NonTerminal(nt) => ProductionItem::NonTerminal(NonTerminal {
                            sort: self.sort(&nt.sort),
                            name: nt.name.clone(),
                        }),
                        ProductionItem::Terminal(_) => item.clone(),
                    })
                    .collect(),
                p.klabel.clone(),
                p.att.clone(),
            )),
            Sentence::Rule(r) => Sentence::Rule(Rule {
                body: self.term(&r.body),
                requires: self.term(&r.requires),
                ensures: self.term(&r.ensures),
                att: r.att.clone(),
            }),
            Sentence::Context(c) => Sentence::Context(Context {
                body: self.term(&c.body),
                requires: self.term(&c.requires),
                att: c.att.clone(),
            }),
            Sentence::ContextAlias(c) => Sentence::ContextAlias(ContextAlias {
                body: self.term(&c.body),
                requires: self.term(&c.requires),
                att: c.att.clone(),
            }),
            Sentence::SyntaxSort(_) | Sentence::SortSynonym(_) => sentence.clone(),
        }
    }

    fn term(&self, k: &K) -> K {
        kdef_stack::ensure_sufficient_stack(|| match k {
            K::Token { value, sort, att } => K::Token {
                value: value.clone(),
                sort: self.sort(sort),
                att: att.clone(),
            },
            K::Apply { label, args, att } => K::Apply {
                label: label.clone(),
                args: args.iter().map(|arg| self.term(arg)).collect(),
                att: att.clone(),
            },
            K::Rewrite { left, right, att } => K::Rewrite {
                left: Box::new(self.term(left)),
                right: Box::new(self.term(right)),
                att: att.clone(),
            },
            K::Sequence { items, att } => K::Sequence {
                items: items.iter().map(|item| self.term(item)).collect(),
                att: att.clone(),
            },
            K::Variable { .. } | K::InjectedLabel { .. } => k.clone(),
        })
    }
}
