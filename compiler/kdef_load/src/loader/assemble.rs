//! Definition assembly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kdef_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, WarningKind};
use kdef_ir::{Att, Definition, DefinitionItem, Module, Source};
use rustc_hash::{FxHashMap, FxHashSet};

use super::{DefinitionOutcome, Loader, PRELUDE_SOURCE, REQUIRE_PRELUDE};
use crate::LoadError;

impl Loader {
    /// Load a complete definition rooted at `text`.
    ///
    /// When enabled, the prelude is loaded first; it shares the
    /// resolved-file set with the user definition, so a user `require` of
    /// a prelude file is a no-op. A missing syntax module is only a
    /// warning: the main module stands in for it.
    #[tracing::instrument(level = "debug", skip_all, fields(main = main, syntax = syntax))]
    #[expect(clippy::too_many_arguments, reason = "module names plus the resolver inputs")]
    pub fn load_definition(
        &self,
        main: &str,
        syntax: &str,
        text: &str,
        source: &Source,
        current_dir: &Path,
        lookup_dirs: &[PathBuf],
        sink: &mut DiagnosticSink,
    ) -> Result<DefinitionOutcome, LoadError> {
        let mut resolved = FxHashSet::default();
        let mut previous = Vec::new();
        let mut rendered = Vec::new();

        if self.options.auto_import_prelude {
            let prelude = self.load_modules(
                &[],
                REQUIRE_PRELUDE,
                &Source::new(PRELUDE_SOURCE),
                current_dir,
                lookup_dirs,
                &mut resolved,
                sink,
            )?;
            previous = prelude.modules;
            rendered.extend(prelude.preprocessed);
        }

        let loaded = self.load_modules(
            &previous,
            text,
            source,
            current_dir,
            lookup_dirs,
            &mut resolved,
            sink,
        )?;
        if self.options.preprocess {
            rendered.extend(loaded.preprocessed);
            return Ok(DefinitionOutcome::Preprocessed(rendered.join("\n\n")));
        }

        let mut modules = loaded.modules;
        modules.extend(previous);
        let main_module = find_main_module(main, &modules)?;

        let syntax_name = if modules.iter().any(|m| m.name() == syntax) {
            syntax.to_string()
        } else {
            sink.register_warning(
                WarningKind::MissingSyntaxModule,
                Diagnostic::warning(ErrorCode::W0002).with_message(format!(
                    "Could not find main syntax module with name {syntax} in definition.  \
                     Use --syntax-module to specify one. Using {main} as default."
                )),
            );
            main.to_string()
        };

        tracing::debug!(modules = modules.len(), "assembled definition");
        Ok(DefinitionOutcome::Definition(Definition::new(
            main_module,
            modules,
            Att::empty().add(Att::SYNTAX_MODULE, syntax_name),
        )))
    }

    /// Load `text` on top of already-loaded modules.
    ///
    /// No prelude is imported and no syntax module is recorded.
    #[tracing::instrument(level = "debug", skip_all, fields(main = main))]
    #[expect(clippy::too_many_arguments, reason = "module name plus the resolver inputs")]
    pub fn load_definition_with_previous(
        &self,
        main: &str,
        previous: &[Arc<Module>],
        text: &str,
        source: &Source,
        current_dir: &Path,
        lookup_dirs: &[PathBuf],
        sink: &mut DiagnosticSink,
    ) -> Result<Definition, LoadError> {
        let mut resolved = FxHashSet::default();
        let loaded = self.load_modules(
            previous,
            text,
            source,
            current_dir,
            lookup_dirs,
            &mut resolved,
            sink,
        )?;
        let mut modules = loaded.modules;
        modules.extend(previous.iter().cloned());
        let main_module = find_main_module(main, &modules)?;
        Ok(Definition::new(main_module, modules, Att::empty()))
    }

    /// Parse a single text without following its requires and return the
    /// translated module called `main`.
    pub fn parse_main_module_outer_syntax(
        &self,
        text: &str,
        source: &Source,
        main: &str,
    ) -> Result<Arc<Module>, LoadError> {
        let raw: Vec<_> = self
            .parser
            .parse(source, text)?
            .into_iter()
            .filter_map(|item| match item {
                DefinitionItem::Module(module) => Some(module),
                DefinitionItem::Require(_) => None,
            })
            .collect();

        let mut built = FxHashMap::default();
        for module in &raw {
            self.translator.translate(module, &raw, &mut built)?;
        }
        let modules: Vec<_> = built.into_values().collect();
        find_main_module(main, &modules)
    }
}

fn find_main_module(main: &str, modules: &[Arc<Module>]) -> Result<Arc<Module>, LoadError> {
    modules
        .iter()
        .find(|m| m.name() == main)
        .cloned()
        .ok_or_else(|| {
            LoadError::fatal(Diagnostic::error(ErrorCode::E2005).with_message(format!(
                "Could not find main module with name {main} in definition. \
                 Use --main-module to specify one."
            )))
        })
}
