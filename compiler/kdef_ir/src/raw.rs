//! Syntax-level definition items, as produced by the outer parser.
//!
//! Raw modules still refer to their imports by name and keep surface
//! sugar (`List{..}`, prefix productions) that the translator desugars.

use std::fmt;

use crate::{
    Att, Context, ContextAlias, Location, NonTerminal, ProductionItem, Rule, Sort, SortSynonym,
    Source, SyntaxSort,
};

/// `require "file"`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Require {
    pub path: String,
    pub att: Att,
}

/// `imports NAME`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RawImport {
    pub name: String,
    pub att: Att,
}

/// One alternative of a `syntax S ::= ...` block.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum RawProduction {
    /// Terminals and non-terminals in surface order.
    Items { items: Vec<ProductionItem>, att: Att },
    /// `name(x: Sort, Sort)`.
    Prefix {
        name: String,
        params: Vec<NonTerminal>,
        att: Att,
    },
    /// `List{Elem, "sep"}`.
    List {
        element: Sort,
        separator: String,
        att: Att,
    },
}

impl RawProduction {
    pub fn att(&self) -> &Att {
        match self {
            RawProduction::Items { att, .. }
            | RawProduction::Prefix { att, .. }
            | RawProduction::List { att, .. } => att,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum RawSentence {
    Import(RawImport),
    Syntax {
        sort: Sort,
        productions: Vec<RawProduction>,
        att: Att,
    },
    SyntaxSort(SyntaxSort),
    SortSynonym(SortSynonym),
    Rule(Rule),
    Context(Context),
    ContextAlias(ContextAlias),
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RawModule {
    pub name: String,
    pub sentences: Vec<RawSentence>,
    pub att: Att,
}

impl RawModule {
    /// Names of the modules this module imports, in declaration order.
    pub fn import_names(&self) -> impl Iterator<Item = &str> {
        self.sentences.iter().filter_map(|s| match s {
            RawSentence::Import(import) => Some(import.name.as_str()),
            _ => None,
        })
    }

    pub fn source(&self) -> Option<&Source> {
        self.att.source()
    }

    pub fn location(&self) -> Option<Location> {
        self.att.location()
    }
}

/// A top-level item of a definition file.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DefinitionItem {
    Module(RawModule),
    Require(Require),
}

impl fmt::Display for Require {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "require \"{}\"", self.path)
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[ProductionItem]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        match item {
            ProductionItem::Terminal(t) => write!(f, "\"{t}\"")?,
            ProductionItem::NonTerminal(nt) => write_nonterminal(f, nt)?,
        }
    }
    Ok(())
}

fn write_nonterminal(f: &mut fmt::Formatter<'_>, nt: &NonTerminal) -> fmt::Result {
    match &nt.name {
        Some(name) => write!(f, "{name}: {}", nt.sort),
        None => write!(f, "{}", nt.sort),
    }
}

impl fmt::Display for RawProduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawProduction::Items { items, .. } => write_items(f, items)?,
            RawProduction::Prefix { name, params, .. } => {
                write!(f, "{name}(")?;
                for (i, nt) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_nonterminal(f, nt)?;
                }
                f.write_str(")")?;
            }
            RawProduction::List {
                element, separator, ..
            } => write!(f, "List{{{element}, \"{separator}\"}}")?,
        }
        let att = self.att();
        if !att.is_empty() {
            write!(f, " {att}")?;
        }
        Ok(())
    }
}

impl fmt::Display for RawSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawSentence::Import(import) => write!(f, "imports {}", import.name),
            RawSentence::Syntax {
                sort, productions, ..
            } => {
                write!(f, "syntax {sort} ::= ")?;
                for (i, prod) in productions.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n      | ")?;
                    }
                    write!(f, "{prod}")?;
                }
                Ok(())
            }
            RawSentence::SyntaxSort(s) => {
                write!(f, "{}", crate::Sentence::SyntaxSort(s.clone()))
            }
            RawSentence::SortSynonym(s) => {
                write!(f, "{}", crate::Sentence::SortSynonym(s.clone()))
            }
            RawSentence::Rule(r) => write!(f, "{}", crate::Sentence::Rule(r.clone())),
            RawSentence::Context(c) => write!(f, "{}", crate::Sentence::Context(c.clone())),
            RawSentence::ContextAlias(c) => {
                write!(f, "{}", crate::Sentence::ContextAlias(c.clone()))
            }
        }
    }
}

impl fmt::Display for RawModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module {}", self.name)?;
        if !self.att.is_empty() {
            write!(f, " {}", self.att)?;
        }
        writeln!(f)?;
        for sentence in &self.sentences {
            writeln!(f, "  {sentence}")?;
        }
        f.write_str("endmodule")
    }
}
