//! Semantic modules and their derived indexes.
//!
//! A `Module` owns its local sentences and shares its imports. Every
//! index below covers the module's full import closure, so a lookup on
//! a module answers "what is visible here", not "what is declared here".

use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Att, DeclSite, Production, Sentence, Sort};

/// Suffix of the synthesized syntax-only companion of a module.
pub const SYNTAX_SUFFIX: &str = "$SYNTAX";

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    name: String,
    imports: Vec<Arc<Module>>,
    local_sentences: Vec<Sentence>,
    att: Att,
    defined_klabels: FxHashSet<String>,
    productions_by_label: FxHashMap<String, Vec<Production>>,
    productions_by_site: FxHashMap<DeclSite, Vec<Production>>,
    sort_attributes: FxHashMap<Sort, Att>,
    sort_synonyms: FxHashMap<Sort, Sort>,
    semantic_casts: FxHashSet<String>,
    sort_predicates: FxHashSet<String>,
    sort_projections: FxHashSet<String>,
    record_projections: FxHashSet<String>,
}

/// Index accumulator used while building a module.
#[derive(Default)]
struct Indexes {
    defined_klabels: FxHashSet<String>,
    productions_by_label: FxHashMap<String, Vec<Production>>,
    productions_by_site: FxHashMap<DeclSite, Vec<Production>>,
    sort_attributes: FxHashMap<Sort, Att>,
    sort_synonyms: FxHashMap<Sort, Sort>,
    sorts: FxHashSet<Sort>,
    record_projections: FxHashSet<String>,
}

impl Indexes {
    fn add_sentences(&mut self, sentences: &[Sentence]) {
        for sentence in sentences {
            match sentence {
                Sentence::Production(prod) => self.add_production(prod),
                Sentence::SyntaxSort(decl) => {
                    self.sorts.insert(decl.sort.clone());
                    let merged = match self.sort_attributes.remove(&decl.sort) {
                        Some(existing) => existing.union(&decl.att),
                        None => decl.att.clone(),
                    };
                    self.sort_attributes.insert(decl.sort.clone(), merged);
                }
                Sentence::SortSynonym(syn) => {
                    self.sorts.insert(syn.new_sort.clone());
                    self.sort_synonyms
                        .entry(syn.new_sort.clone())
                        .or_insert_with(|| syn.old_sort.clone());
                }
                Sentence::Rule(_) | Sentence::Context(_) | Sentence::ContextAlias(_) => {}
            }
        }
    }

    fn add_production(&mut self, prod: &Production) {
        self.sorts.insert(prod.sort.clone());
        for nt in prod.nonterminals() {
            self.sorts.insert(nt.sort.clone());
        }
        if let Some(site) = prod.site() {
            self.productions_by_site
                .entry(site)
                .or_default()
                .push(prod.clone());
        }
        let Some(klabel) = &prod.klabel else {
            return;
        };
        self.defined_klabels.insert(klabel.clone());
        self.productions_by_label
            .entry(klabel.clone())
            .or_default()
            .push(prod.clone());
        for nt in prod.nonterminals() {
            if let Some(name) = &nt.name {
                self.record_projections
                    .insert(format!("project:{klabel}:{name}"));
            }
        }
    }
}

/// Every module reachable through `imports`, each once, in depth-first order.
fn import_closure(imports: &[Arc<Module>]) -> Vec<Arc<Module>> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    let mut stack: Vec<&Arc<Module>> = imports.iter().rev().collect();
    while let Some(module) = stack.pop() {
        if !seen.insert(module.name.as_str()) {
            continue;
        }
        out.push(Arc::clone(module));
        stack.extend(module.imports.iter().rev());
    }
    out
}

impl Module {
    pub fn new(
        name: impl Into<String>,
        imports: Vec<Arc<Module>>,
        local_sentences: Vec<Sentence>,
        att: Att,
    ) -> Self {
        let mut index = Indexes::default();
        index.add_sentences(&local_sentences);
        for imported in import_closure(&imports) {
            index.add_sentences(&imported.local_sentences);
        }

        let sort_set = |prefix: &str| -> FxHashSet<String> {
            index
                .sorts
                .iter()
                .map(|sort| format!("{prefix}{sort}"))
                .collect()
        };
        let semantic_casts = sort_set("#SemanticCastTo");
        let sort_predicates = sort_set("is");
        let sort_projections = sort_set("project:");

        Module {
            name: name.into(),
            imports,
            local_sentences,
            att,
            defined_klabels: index.defined_klabels,
            productions_by_label: index.productions_by_label,
            productions_by_site: index.productions_by_site,
            sort_attributes: index.sort_attributes,
            sort_synonyms: index.sort_synonyms,
            semantic_casts,
            sort_predicates,
            sort_projections,
            record_projections: index.record_projections,
        }
    }

    /// Rebuild this module around a new set of local sentences.
    #[must_use]
    pub fn with_sentences(&self, local_sentences: Vec<Sentence>) -> Module {
        Module::new(
            self.name.clone(),
            self.imports.clone(),
            local_sentences,
            self.att.clone(),
        )
    }

    /// Name of the syntax-only companion of the module called `name`.
    pub fn syntax_name(name: &str) -> String {
        format!("{name}{SYNTAX_SUFFIX}")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn imports(&self) -> &[Arc<Module>] {
        &self.imports
    }

    pub fn imports_module(&self, name: &str) -> bool {
        self.imports.iter().any(|m| m.name == name)
    }

    pub fn local_sentences(&self) -> &[Sentence] {
        &self.local_sentences
    }

    pub fn local_productions(&self) -> impl Iterator<Item = &Production> {
        self.local_sentences.iter().filter_map(|s| match s {
            Sentence::Production(p) => Some(p),
            _ => None,
        })
    }

    pub fn att(&self) -> &Att {
        &self.att
    }

    /// Whether `klabel` is defined by a production visible in this module.
    pub fn defines_klabel(&self, klabel: &str) -> bool {
        self.defined_klabels.contains(klabel)
    }

    pub fn defined_klabels(&self) -> &FxHashSet<String> {
        &self.defined_klabels
    }

    pub fn productions_for(&self, klabel: &str) -> &[Production] {
        self.productions_by_label
            .get(klabel)
            .map_or(&[], Vec::as_slice)
    }

    /// All visible productions declared at `site`.
    pub fn productions_for_site(&self, site: &DeclSite) -> &[Production] {
        self.productions_by_site.get(site).map_or(&[], Vec::as_slice)
    }

    pub fn sort_attributes_for(&self, sort: &Sort) -> Option<&Att> {
        self.sort_attributes.get(sort)
    }

    pub fn sort_synonyms(&self) -> &FxHashMap<Sort, Sort> {
        &self.sort_synonyms
    }

    pub fn is_semantic_cast(&self, klabel: &str) -> bool {
        self.semantic_casts.contains(klabel)
    }

    pub fn is_sort_predicate(&self, klabel: &str) -> bool {
        self.sort_predicates.contains(klabel)
    }

    pub fn is_sort_projection(&self, klabel: &str) -> bool {
        self.sort_projections.contains(klabel)
    }

    pub fn is_record_projection(&self, klabel: &str) -> bool {
        self.record_projections.contains(klabel)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module {}", self.name)?;
        if !self.att.is_empty() {
            write!(f, " {}", self.att)?;
        }
        writeln!(f)?;
        for import in &self.imports {
            writeln!(f, "  imports {}", import.name)?;
        }
        for sentence in &self.local_sentences {
            writeln!(f, "  {sentence}")?;
        }
        f.write_str("endmodule")
    }
}

#[cfg(test)]
mod tests;
