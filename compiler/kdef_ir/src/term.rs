//! K term trees.

use std::fmt;

use crate::{Att, Sort};

/// The head of a constructed term.
///
/// A label written as a variable (`X(...)`) stands for "any symbol" and is
/// not a reference to a definition site.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum KLabel {
    Symbol(String),
    Variable(String),
}

impl KLabel {
    pub fn symbol(name: impl Into<String>) -> Self {
        KLabel::Symbol(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            KLabel::Symbol(name) | KLabel::Variable(name) => name,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, KLabel::Variable(_))
    }
}

impl fmt::Display for KLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KLabel::Symbol(name) => write!(f, "`{name}`"),
            KLabel::Variable(name) => f.write_str(name),
        }
    }
}

/// A term.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum K {
    Apply { label: KLabel, args: Vec<K>, att: Att },
    Variable { name: String, att: Att },
    Token { value: String, sort: Sort, att: Att },
    Rewrite { left: Box<K>, right: Box<K>, att: Att },
    Sequence { items: Vec<K>, att: Att },
    InjectedLabel { label: KLabel, att: Att },
}

impl K {
    pub fn apply(label: KLabel, args: Vec<K>) -> Self {
        K::Apply {
            label,
            args,
            att: Att::empty(),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        K::Variable {
            name: name.into(),
            att: Att::empty(),
        }
    }

    pub fn token(value: impl Into<String>, sort: Sort) -> Self {
        K::Token {
            value: value.into(),
            sort,
            att: Att::empty(),
        }
    }

    /// The default side condition of rules and contexts.
    pub fn bool_true() -> Self {
        K::token("true", Sort::bool())
    }

    pub fn empty_sequence() -> Self {
        K::Sequence {
            items: Vec::new(),
            att: Att::empty(),
        }
    }

    pub fn att(&self) -> &Att {
        match self {
            K::Apply { att, .. }
            | K::Variable { att, .. }
            | K::Token { att, .. }
            | K::Rewrite { att, .. }
            | K::Sequence { att, .. }
            | K::InjectedLabel { att, .. } => att,
        }
    }

    /// Replace this node's attributes.
    #[must_use]
    pub fn with_att(mut self, new_att: Att) -> Self {
        match &mut self {
            K::Apply { att, .. }
            | K::Variable { att, .. }
            | K::Token { att, .. }
            | K::Rewrite { att, .. }
            | K::Sequence { att, .. }
            | K::InjectedLabel { att, .. } => *att = new_att,
        }
        self
    }
}

impl fmt::Display for K {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            K::Apply { label, args, .. } => {
                write!(f, "{label}(")?;
                if args.is_empty() {
                    f.write_str(".KList")?;
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            K::Variable { name, .. } => f.write_str(name),
            K::Token { value, sort, .. } => {
                if sort.name() == "String" {
                    write!(f, "\"{value}\"")
                } else {
                    f.write_str(value)
                }
            }
            K::Rewrite { left, right, .. } => write!(f, "{left} => {right}"),
            K::Sequence { items, .. } => {
                if items.is_empty() {
                    return f.write_str(".K");
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ~> ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            K::InjectedLabel { label, .. } => write!(f, "#klabel({label})"),
        }
    }
}
