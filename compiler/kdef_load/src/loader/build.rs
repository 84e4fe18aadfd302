//! Raw modules to semantic modules.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kdef_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode};
use kdef_ir::{Location, Module, RawModule, Source};
use rustc_hash::{FxHashMap, FxHashSet};

use super::Loader;
use crate::{apply_synonyms, LoadError};

/// Modules produced by one [`Loader::load_modules`] call.
#[derive(Debug, Default)]
pub struct LoadedModules {
    /// Every translated module followed by its `$SYNTAX` companion, in
    /// load order. Empty in preprocess mode.
    pub modules: Vec<Arc<Module>>,
    /// The rendered raw definition, in preprocess mode.
    pub preprocessed: Option<String>,
}

impl Loader {
    /// Load `text` and its requires, then translate every raw module.
    ///
    /// `previous` modules are visible to imports but are not part of the
    /// result, and redeclaring one of them is a duplicate. Duplicate module
    /// names are all reported to the sink before the call fails. Preprocess
    /// mode returns the rendering without translating.
    #[tracing::instrument(level = "debug", skip_all, fields(source = source.as_str()))]
    #[expect(clippy::too_many_arguments, reason = "mirrors the resolver inputs plus previous modules")]
    pub fn load_modules(
        &self,
        previous: &[Arc<Module>],
        text: &str,
        source: &Source,
        current_dir: &Path,
        lookup_dirs: &[PathBuf],
        resolved: &mut FxHashSet<PathBuf>,
        sink: &mut DiagnosticSink,
    ) -> Result<LoadedModules, LoadError> {
        let raw = self.slurp(text, source, current_dir, lookup_dirs, resolved, sink)?;
        check_module_names(previous, &raw, sink)?;

        if self.options.preprocess {
            return Ok(LoadedModules {
                modules: Vec::new(),
                preprocessed: Some(render(&raw)),
            });
        }

        let mut built: FxHashMap<String, Arc<Module>> = previous
            .iter()
            .map(|m| (m.name().to_string(), Arc::clone(m)))
            .collect();
        let mut translated = Vec::with_capacity(raw.len() * 2);
        for module in &raw {
            let semantic = self.translator.translate(module, &raw, &mut built)?;
            let companion = built.get(&Module::syntax_name(semantic.name())).cloned();
            translated.push(semantic);
            translated.extend(companion);
        }
        tracing::debug!(count = translated.len(), "translated modules");

        Ok(LoadedModules {
            modules: apply_synonyms(&translated),
            preprocessed: None,
        })
    }
}

/// Report every module name declared more than once, in order of first
/// appearance. A name already among `previous` is reported at its first
/// raw declaration, citing the loaded module; otherwise the second
/// declaration cites the first.
fn check_module_names(
    previous: &[Arc<Module>],
    modules: &[RawModule],
    sink: &mut DiagnosticSink,
) -> Result<(), LoadError> {
    let loaded: FxHashMap<&str, &Module> = previous.iter().map(|m| (m.name(), &**m)).collect();
    let mut seen = FxHashSet::default();
    let mut order: Vec<&RawModule> = Vec::new();
    let mut second: FxHashMap<&str, &RawModule> = FxHashMap::default();
    for module in modules {
        if seen.insert(module.name.as_str()) {
            order.push(module);
        } else {
            second.entry(module.name.as_str()).or_insert(module);
        }
    }

    let mut errors = 0usize;
    for first in order {
        let name = first.name.as_str();
        let (earlier, at) = if let Some(old) = loaded.get(name) {
            (Origin(old.att().source(), old.att().location()), first)
        } else if let Some(&again) = second.get(name) {
            (Origin(first.source(), first.location()), again)
        } else {
            continue;
        };
        sink.add_error(
            Diagnostic::error(ErrorCode::E2001)
                .with_message(format!("Module {name} previously declared at {earlier}"))
                .with_origin(&at.att),
        );
        errors += 1;
    }

    if errors > 0 {
        return Err(LoadError::fatal(
            Diagnostic::error(ErrorCode::E2002)
                .with_message(format!("Had {errors} outer parsing errors.")),
        ));
    }
    Ok(())
}

fn render(modules: &[RawModule]) -> String {
    let rendered: Vec<String> = modules.iter().map(ToString::to_string).collect();
    rendered.join("\n\n")
}

/// `<source> and <location>`, with `<unknown>` for missing parts.
struct Origin<'a>(Option<&'a Source>, Option<Location>);

impl fmt::Display for Origin<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(source) => write!(f, "{source}")?,
            None => f.write_str("<unknown>")?,
        }
        f.write_str(" and ")?;
        match self.1 {
            Some(location) => write!(f, "{location}"),
            None => f.write_str("<unknown>"),
        }
    }
}
