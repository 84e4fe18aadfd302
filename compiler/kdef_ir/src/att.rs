//! Attribute sets attached to productions, sentences, modules and terms.

use std::collections::BTreeMap;
use std::fmt;

use crate::{DeclSite, Location, Source};

/// Key/value attributes plus the optional origin of the annotated item.
///
/// Flags are stored with an empty value. Keys are kept sorted so rendering
/// is deterministic.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Att {
    entries: BTreeMap<String, String>,
    source: Option<Source>,
    location: Option<Location>,
}

impl Att {
    pub const CELL: &'static str = "cell";
    pub const MAINCELL: &'static str = "maincell";
    pub const UNUSED: &'static str = "unused";
    pub const CELL_COLLECTION: &'static str = "cellCollection";
    pub const KLABEL: &'static str = "klabel";
    pub const TOKEN: &'static str = "token";
    pub const LEFT: &'static str = "left";
    pub const RIGHT: &'static str = "right";
    pub const NON_ASSOC: &'static str = "non-assoc";
    pub const SYNTAX_MODULE: &'static str = "syntaxModule";

    pub fn empty() -> Self {
        Att::default()
    }

    /// Add a key with a value, replacing any previous value.
    #[must_use]
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Add a valueless flag.
    #[must_use]
    pub fn add_flag(self, key: impl Into<String>) -> Self {
        self.add(key, "")
    }

    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Copy origin information from another attribute set.
    #[must_use]
    pub fn with_origin_of(mut self, other: &Att) -> Self {
        self.source.clone_from(&other.source);
        self.location = other.location;
        self
    }

    /// Add every entry of `other` not already present here.
    #[must_use]
    pub fn union(mut self, other: &Att) -> Self {
        for (key, value) in &other.entries {
            self.entries
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// The declaration site, when both source and location are known.
    pub fn site(&self) -> Option<DeclSite> {
        match (&self.source, self.location) {
            (Some(source), Some(location)) => Some(DeclSite::new(source.clone(), location)),
            _ => None,
        }
    }

    /// Whether no key/value entries are present (origin is ignored).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Att {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if value.is_empty() {
                write!(f, "{key}")?;
            } else {
                write!(f, "{key}({value})")?;
            }
        }
        f.write_str("]")
    }
}
