use std::fmt;

/// A sort name.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Sort(String);

impl Sort {
    pub fn new(name: impl Into<String>) -> Self {
        Sort(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn k() -> Self {
        Sort::new("K")
    }

    pub fn bool() -> Self {
        Sort::new("Bool")
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
