//! Module-level declarative statements.

use std::fmt;

use crate::{Att, Production, Sort, K};

/// A bare sort declaration, used to attach sort attributes
/// (`syntax Bag [cellCollection]`).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SyntaxSort {
    pub sort: Sort,
    pub att: Att,
}

/// `syntax New = Old`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SortSynonym {
    pub new_sort: Sort,
    pub old_sort: Sort,
    pub att: Att,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub body: K,
    pub requires: K,
    pub ensures: K,
    pub att: Att,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Context {
    pub body: K,
    pub requires: K,
    pub att: Att,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextAlias {
    pub body: K,
    pub requires: K,
    pub att: Att,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Sentence {
    Production(Production),
    SyntaxSort(SyntaxSort),
    SortSynonym(SortSynonym),
    Rule(Rule),
    Context(Context),
    ContextAlias(ContextAlias),
}

impl Sentence {
    pub fn att(&self) -> &Att {
        match self {
            Sentence::Production(p) => &p.att,
            Sentence::SyntaxSort(s) => &s.att,
            Sentence::SortSynonym(s) => &s.att,
            Sentence::Rule(r) => &r.att,
            Sentence::Context(c) => &c.att,
            Sentence::ContextAlias(c) => &c.att,
        }
    }

    /// Whether this sentence belongs in a syntax-only projection.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Sentence::Production(_) | Sentence::SyntaxSort(_) | Sentence::SortSynonym(_)
        )
    }
}

/// Render ` requires X` unless `X` is the trivial condition.
fn write_condition(f: &mut fmt::Formatter<'_>, keyword: &str, k: &K) -> fmt::Result {
    if matches!(k, K::Token { value, .. } if value == "true") {
        return Ok(());
    }
    write!(f, " {keyword} {k}")
}

fn write_att(f: &mut fmt::Formatter<'_>, att: &Att) -> fmt::Result {
    if att.is_empty() {
        Ok(())
    } else {
        write!(f, " {att}")
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentence::Production(p) => write!(f, "{p}"),
            Sentence::SyntaxSort(s) => {
                write!(f, "syntax {}", s.sort)?;
                write_att(f, &s.att)
            }
            Sentence::SortSynonym(s) => {
                write!(f, "syntax {} = {}", s.new_sort, s.old_sort)?;
                write_att(f, &s.att)
            }
            Sentence::Rule(r) => {
                write!(f, "rule {}", r.body)?;
                write_condition(f, "requires", &r.requires)?;
                write_condition(f, "ensures", &r.ensures)?;
                write_att(f, &r.att)
            }
            Sentence::Context(c) => {
                write!(f, "context {}", c.body)?;
                write_condition(f, "requires", &c.requires)?;
                write_att(f, &c.att)
            }
            Sentence::ContextAlias(c) => {
                write!(f, "context alias {}", c.body)?;
                write_condition(f, "requires", &c.requires)?;
                write_att(f, &c.att)
            }
        }
    }
}
