//! The assembled, immutable definition.

use std::sync::Arc;

use crate::{Att, Module};

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Definition {
    main_module: Arc<Module>,
    modules: Vec<Arc<Module>>,
    att: Att,
}

impl Definition {
    /// Modules are deduplicated by name and kept sorted by name.
    pub fn new(main_module: Arc<Module>, mut modules: Vec<Arc<Module>>, att: Att) -> Self {
        modules.sort_by(|a, b| a.name().cmp(b.name()));
        modules.dedup_by(|a, b| a.name() == b.name());
        Definition {
            main_module,
            modules,
            att,
        }
    }

    pub fn main_module(&self) -> &Arc<Module> {
        &self.main_module
    }

    pub fn modules(&self) -> &[Arc<Module>] {
        &self.modules
    }

    pub fn get_module(&self, name: &str) -> Option<&Arc<Module>> {
        self.modules
            .binary_search_by(|m| m.name().cmp(name))
            .ok()
            .map(|idx| &self.modules[idx])
    }

    pub fn att(&self) -> &Att {
        &self.att
    }

    /// Name of the main syntax module, if recorded.
    pub fn syntax_module_name(&self) -> Option<&str> {
        self.att.get(Att::SYNTAX_MODULE)
    }
}
