//! The `load` command: load a definition, check it, report diagnostics.

use std::path::Path;

use kdef_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, ErrorGuaranteed};
use kdef_load::{DefinitionOutcome, Files};

use super::load_and_check;
use crate::options::LoadCommandOptions;

/// Load and check the file named in `options`.
#[tracing::instrument(level = "debug", skip_all, fields(file = options.file.as_deref()))]
pub fn load_file(
    options: &LoadCommandOptions,
    files: &Files,
    sink: &mut DiagnosticSink,
) -> Result<DefinitionOutcome, ErrorGuaranteed> {
    let Some(file) = options.file.as_deref() else {
        return Err(sink.add_error(Diagnostic::error(ErrorCode::E1003).with_message(
            "You have to provide exactly one main file in order to do outer parsing.",
        )));
    };
    let path = files.resolve_working(Path::new(file));
    let loading = &options.definition_loading;
    let main = loading.main_module_for(&path);
    let syntax = loading.syntax_module_for(&main);
    load_and_check(&path, &main, &syntax, &options.global, loading, files, sink)
}
