//! KLabel scope checking.
//!
//! Three properties of a definition:
//! - every label used in a rule, context or context alias is defined by a
//!   production visible from the module the sentence lives in
//! - a label is declared in one module only (or, for the Kore backend,
//!   declared once at all)
//! - a user-defined label is used somewhere, unless it opts out
//!
//! Use is tracked per declaration site: using one label of a `List{..}`
//! declaration counts as using every label that declaration introduced.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use kdef_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, WarningKind};
use kdef_ir::visit::{walk_k, VisitK};
use kdef_ir::{Att, KLabel, Module, Production, Sentence, K};
use kdef_load::Files;
use rustc_hash::{FxHashMap, FxHashSet};

/// Labels the compiler itself introduces; never reported as undefined.
const INTERNAL_NAMES: [&str; 11] = [
    "#cells",
    "#dots",
    "#noDots",
    "#Or",
    "#fun2",
    "#fun3",
    "#withConfig",
    "<generatedTop>",
    "#SemanticCastToBag",
    "_:=K_",
    "_:/=K_",
];

/// Labels every Kore definition declares more than once.
const INTERNAL_DUPLICATES: [&str; 4] = [
    "#EmptyKList",
    "#EmptyK",
    "#ruleRequires",
    "#ruleRequiresEnsures",
];

/// How repeated label declarations are judged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum DuplicatePolicy {
    /// A label may be declared repeatedly, but all in one module.
    #[default]
    PerModule,
    /// Every label is declared exactly once (Kore backend).
    GloballyUnique,
}

impl DuplicatePolicy {
    pub fn from_kore(kore: bool) -> Self {
        if kore {
            DuplicatePolicy::GloballyUnique
        } else {
            DuplicatePolicy::PerModule
        }
    }
}

/// Whether `name` is a label the compiler generates for module `m`.
pub fn is_internal_klabel(name: &str, m: &Module) -> bool {
    m.is_semantic_cast(name)
        || INTERNAL_NAMES.contains(&name)
        || m.is_record_projection(name)
        || m.is_sort_predicate(name)
        || m.is_sort_projection(name)
}

/// One checking session over one definition.
#[derive(Debug)]
pub struct CheckKLabels {
    policy: DuplicatePolicy,
    include_dir: PathBuf,
    /// Module of the latest declaration of each label.
    owners: FxHashMap<String, Arc<Module>>,
    /// Latest declaration of each label.
    productions: FxHashMap<String, Production>,
    used: FxHashSet<String>,
}

impl CheckKLabels {
    pub fn new(policy: DuplicatePolicy, files: &Files) -> Self {
        CheckKLabels {
            policy,
            include_dir: files.include_dir().to_path_buf(),
            owners: FxHashMap::default(),
            productions: FxHashMap::default(),
            used: FxHashSet::default(),
        }
    }

    /// Scan one sentence of `module`. Sentences may arrive in any order.
    pub fn check(&mut self, sentence: &Sentence, module: &Arc<Module>, sink: &mut DiagnosticSink) {
        let terms = match sentence {
            Sentence::Rule(rule) => vec![&rule.body, &rule.requires, &rule.ensures],
            Sentence::Context(ctx) => vec![&ctx.body, &ctx.requires],
            Sentence::ContextAlias(ctx) => vec![&ctx.body, &ctx.requires],
            Sentence::Production(prod) => {
                self.declare(prod, module, sink);
                return;
            }
            Sentence::SyntaxSort(_) | Sentence::SortSynonym(_) => return,
        };
        let mut uses = LabelUses {
            module: module.as_ref(),
            used: &mut self.used,
            sink,
        };
        for term in terms {
            uses.visit(term);
        }
    }

    fn declare(&mut self, prod: &Production, module: &Arc<Module>, sink: &mut DiagnosticSink) {
        let Some(klabel) = &prod.klabel else {
            return;
        };

        if let Some(owner) = self.owners.get(klabel) {
            if owner.name() != module.name() && self.policy == DuplicatePolicy::PerModule {
                sink.add_error(
                    Diagnostic::error(ErrorCode::E3002)
                        .with_message(format!(
                            "KLabel {klabel} defined in multiple modules: {} and {}.",
                            owner.name(),
                            module.name()
                        ))
                        .with_origin(&prod.att),
                );
            }
        }
        if let Some(previous) = self.productions.get(klabel) {
            if self.policy == DuplicatePolicy::GloballyUnique
                && !INTERNAL_DUPLICATES.contains(&klabel.as_str())
            {
                sink.add_error(
                    Diagnostic::error(ErrorCode::E3003)
                        .with_message(format!(
                            "Symbol {klabel} is not unique. Previously defined as: {previous}"
                        ))
                        .with_origin(&prod.att),
                );
            }
        }

        self.owners.insert(klabel.clone(), Arc::clone(module));
        self.productions.insert(klabel.clone(), prod.clone());
    }

    /// Report every user-defined label that was never used.
    ///
    /// Labels declared under the include directory are exempt. When that
    /// directory cannot be canonicalized, nothing is exempt on that ground.
    pub fn finish(self, sink: &mut DiagnosticSink) {
        let include_root = fs::canonicalize(&self.include_dir).ok().map(|path| {
            let mut root = path.to_string_lossy().into_owned();
            if !root.ends_with(std::path::MAIN_SEPARATOR) {
                root.push(std::path::MAIN_SEPARATOR);
            }
            root
        });
        if include_root.is_none() {
            tracing::debug!(dir = %self.include_dir.display(), "include directory not canonical");
        }

        let mut unused: Vec<&String> = self
            .productions
            .keys()
            .filter(|label| !self.used.contains(*label))
            .collect();
        unused.sort();

        for symbol in unused {
            let prod = &self.productions[symbol];
            let Some(source) = prod.source() else {
                continue;
            };
            if prod.att.contains(Att::MAINCELL)
                || prod.att.contains(Att::UNUSED)
                || symbol == "<generatedTop>"
                || self.is_cell_collection(symbol, prod)
            {
                continue;
            }
            let builtin = include_root
                .as_deref()
                .is_some_and(|root| source.as_str().contains(root));
            if builtin {
                continue;
            }
            sink.register_warning(
                WarningKind::UnusedSymbol,
                Diagnostic::warning(ErrorCode::W0003)
                    .with_message(format!(
                        "Symbol '{symbol}' defined but not used. \
                         Add the 'unused' attribute if this is intentional."
                    ))
                    .with_origin(&prod.att),
            );
        }
    }

    /// A cell whose contents are a cell collection.
    fn is_cell_collection(&self, symbol: &str, prod: &Production) -> bool {
        if !prod.att.contains(Att::CELL) {
            return false;
        }
        let Some(owner) = self.owners.get(symbol) else {
            return false;
        };
        prod.nonterminals().any(|nt| {
            owner
                .sort_attributes_for(&nt.sort)
                .is_some_and(|att| att.contains(Att::CELL_COLLECTION))
        })
    }
}

/// Visitor recording label uses within one module.
struct LabelUses<'a> {
    module: &'a Module,
    used: &'a mut FxHashSet<String>,
    sink: &'a mut DiagnosticSink,
}

impl LabelUses<'_> {
    fn label(&mut self, label: &KLabel, att: &Att) {
        let KLabel::Symbol(name) = label else {
            return;
        };
        let m = self.module;
        if att.source().is_some() {
            self.used.insert(name.clone());
            if m.defines_klabel(name) {
                for prod in m.productions_for(name) {
                    let Some(site) = prod.site() else {
                        continue;
                    };
                    self.used.extend(
                        m.productions_for_site(&site)
                            .iter()
                            .filter_map(|p| p.klabel.clone()),
                    );
                }
            }
        }
        if !m.defines_klabel(name) && !is_internal_klabel(name, m) {
            self.sink.add_error(
                Diagnostic::error(ErrorCode::E3001)
                    .with_message(format!("Found klabel {name} not defined in any production."))
                    .with_origin(att),
            );
        }
    }
}

impl VisitK for LabelUses<'_> {
    fn visit(&mut self, k: &K) {
        kdef_stack::ensure_sufficient_stack(|| walk_k(self, k));
    }

    fn visit_apply(&mut self, label: &KLabel, att: &Att) {
        self.label(label, att);
    }

    fn visit_injected_label(&mut self, label: &KLabel, att: &Att) {
        self.label(label, att);
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
