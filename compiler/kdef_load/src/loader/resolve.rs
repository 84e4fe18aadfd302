//! Transitive `require` resolution.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use kdef_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, WarningKind};
use kdef_ir::{DefinitionItem, RawModule, Require, Source};
use rustc_hash::FxHashSet;

use super::Loader;
use crate::LoadError;

/// Builtin files that moved from `.k` to `.md`.
const DEPRECATED_BUILTINS: [&str; 4] = ["ffi.k", "json.k", "rat.k", "substitution.k"];

/// Temp subdirectory receiving extracted markdown in debug mode.
const EXTRACTED_DIR: &str = ".md2.k";

impl Loader {
    /// Parse `text` and every file it transitively requires.
    ///
    /// Each file is loaded at most once per `resolved` set, keyed by its
    /// canonical path; the file behind `source` itself counts as resolved.
    /// The result lists this file's modules first, then the modules
    /// contributed by each require in declaration order.
    #[tracing::instrument(level = "debug", skip_all, fields(source = source.as_str()))]
    pub fn slurp(
        &self,
        text: &str,
        source: &Source,
        current_dir: &Path,
        lookup_dirs: &[PathBuf],
        resolved: &mut FxHashSet<PathBuf>,
        sink: &mut DiagnosticSink,
    ) -> Result<Vec<RawModule>, LoadError> {
        let own_path = self.files.resolve_working(Path::new(source.as_str()));
        if own_path.is_file() {
            resolved.insert(canonical_path(&own_path));
        }

        let text = if source.is_markdown() {
            let extracted = self.markdown.extract(text, source);
            if self.options.debug {
                self.save_extracted(&extracted, source);
            }
            Cow::Owned(extracted)
        } else {
            Cow::Borrowed(text)
        };

        let items = self.parser.parse(source, &text)?;
        if self.options.verbose {
            tracing::info!("Importing: {}", source.as_str());
        }

        let mut modules = Vec::new();
        let mut requires = Vec::new();
        for item in items {
            match item {
                DefinitionItem::Module(module) => modules.push(module),
                DefinitionItem::Require(require) => requires.push(require),
            }
        }

        for require in &requires {
            let name = self.rename_deprecated(require, sink);
            let found = self.locate(&name, require, current_dir, lookup_dirs)?;
            let canonical = canonical_path(&found);
            if !resolved.insert(canonical.clone()) {
                tracing::trace!(path = %canonical.display(), "already resolved");
                continue;
            }
            let contents = fs::read_to_string(&canonical).map_err(|source| LoadError::Io {
                path: canonical.clone(),
                source,
            })?;
            let parent = canonical.parent().unwrap_or(current_dir);
            let required = kdef_stack::ensure_sufficient_stack(|| {
                self.slurp(
                    &contents,
                    &Source::from_path(&canonical),
                    parent,
                    lookup_dirs,
                    resolved,
                    sink,
                )
            })?;
            modules.extend(required);
        }
        Ok(modules)
    }

    /// Map a deprecated builtin name to its `.md` successor, warning once
    /// per require.
    fn rename_deprecated(&self, require: &Require, sink: &mut DiagnosticSink) -> String {
        let name = require.path.as_str();
        if !DEPRECATED_BUILTINS.contains(&name) {
            return name.to_string();
        }
        let replacement = format!("{}.md", &name[..name.len() - 2]);
        sink.register_warning(
            WarningKind::FutureError,
            Diagnostic::warning(ErrorCode::W0001)
                .with_message(format!(
                    "Requiring a K file in the K builtin directory via a deprecated filename. \
                     Please replace \"{name}\" with \"{replacement}\"."
                ))
                .with_origin(&require.att),
        );
        replacement
    }

    /// First existing match among the lookup directories, with the current
    /// directory searched right after the first (builtin) one.
    fn locate(
        &self,
        name: &str,
        require: &Require,
        current_dir: &Path,
        lookup_dirs: &[PathBuf],
    ) -> Result<PathBuf, LoadError> {
        let mut dirs = lookup_dirs.to_vec();
        dirs.insert(dirs.len().min(1), current_dir.to_path_buf());

        let wanted = Path::new(name);
        let found = dirs
            .iter()
            .map(|dir| {
                if wanted.is_absolute() {
                    wanted.to_path_buf()
                } else {
                    self.files.resolve_working(&dir.join(wanted))
                }
            })
            .find(|candidate| candidate.exists());

        found.ok_or_else(|| {
            let listed: Vec<String> = dirs.iter().map(|d| d.display().to_string()).collect();
            LoadError::fatal(
                Diagnostic::error(ErrorCode::E1001)
                    .with_message(format!(
                        "Could not find file: {name}\nLookup directories:[{}]",
                        listed.join(", ")
                    ))
                    .with_origin(&require.att),
            )
        })
    }

    /// Write extracted markdown to `<temp>/.md2.k/<stem>.k`, picking
    /// `<stem>.k_2`, `<stem>.k_3`, ... when the name is taken.
    fn save_extracted(&self, text: &str, source: &Source) {
        let stem = Path::new(source.as_str())
            .file_stem()
            .map_or_else(|| "definition".to_string(), |s| s.to_string_lossy().into_owned());
        let name = format!("{stem}.k");
        let dir = self.files.resolve_temp(EXTRACTED_DIR);

        let mut file = dir.join(&name);
        let mut index = 2;
        while file.exists() {
            file = dir.join(format!("{name}_{index}"));
            index += 1;
        }

        let contents = format!("{text}\n// {}\n", source.as_str());
        match fs::create_dir_all(&dir).and_then(|()| fs::write(&file, contents)) {
            Ok(()) => tracing::debug!(path = %file.display(), "saved extracted markdown"),
            Err(err) => {
                tracing::warn!(path = %file.display(), %err, "could not save extracted markdown");
            }
        }
    }
}

/// Canonical identity of a file, or its absolute path when it cannot be
/// canonicalized.
fn canonical_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
