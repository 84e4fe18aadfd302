//! Productions: declarations of syntax forms.

use std::fmt;

use crate::{Att, DeclSite, Location, Sort, Source};

/// A non-terminal, optionally named (`foo(x: Int)`).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct NonTerminal {
    pub sort: Sort,
    pub name: Option<String>,
}

impl NonTerminal {
    pub fn new(sort: Sort) -> Self {
        NonTerminal { sort, name: None }
    }

    pub fn named(name: impl Into<String>, sort: Sort) -> Self {
        NonTerminal {
            sort,
            name: Some(name.into()),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ProductionItem {
    Terminal(String),
    NonTerminal(NonTerminal),
}

/// A syntax form of `sort`, optionally defining a KLabel.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Production {
    pub sort: Sort,
    pub items: Vec<ProductionItem>,
    pub klabel: Option<String>,
    pub att: Att,
}

impl Production {
    pub fn new(sort: Sort, items: Vec<ProductionItem>, klabel: Option<String>, att: Att) -> Self {
        Production {
            sort,
            items,
            klabel,
            att,
        }
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = &NonTerminal> {
        self.items.iter().filter_map(|item| match item {
            ProductionItem::NonTerminal(nt) => Some(nt),
            ProductionItem::Terminal(_) => None,
        })
    }

    pub fn arity(&self) -> usize {
        self.nonterminals().count()
    }

    /// A production consisting of a single non-terminal.
    pub fn is_subsort(&self) -> bool {
        matches!(self.items.as_slice(), [ProductionItem::NonTerminal(_)])
    }

    pub fn source(&self) -> Option<&Source> {
        self.att.source()
    }

    pub fn location(&self) -> Option<Location> {
        self.att.location()
    }

    pub fn site(&self) -> Option<DeclSite> {
        self.att.site()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax {} ::=", self.sort)?;
        for item in &self.items {
            match item {
                ProductionItem::Terminal(t) => write!(f, " \"{t}\"")?,
                ProductionItem::NonTerminal(NonTerminal {
                    sort,
                    name: Some(name),
                }) => write!(f, " {name}: {sort}")?,
                ProductionItem::NonTerminal(NonTerminal { sort, name: None }) => {
                    write!(f, " {sort}")?;
                }
            }
        }
        if let Some(klabel) = &self.klabel {
            if !self.att.contains(Att::KLABEL) {
                write!(f, " [klabel({klabel})]")?;
            }
        }
        if !self.att.is_empty() {
            write!(f, " {}", self.att)?;
        }
        Ok(())
    }
}
