//! Command handlers for the `kdefc` CLI.
//!
//! Handlers report through a [`DiagnosticSink`] and return
//! `Err(ErrorGuaranteed)` once a hard error has been recorded; the binary
//! decides how to print and exit.

use std::path::Path;

use kdef_check::{check_definition, DuplicatePolicy};
use kdef_diagnostic::emitter::{ColorMode, TerminalEmitter};
use kdef_diagnostic::{DiagnosticSink, ErrorGuaranteed, SinkConfig};
use kdef_ir::Source;
use kdef_load::{DefinitionOutcome, Files, Loader};

use crate::options::{DefinitionLoadingOptions, GlobalOptions};

mod explain;
mod load;
mod prove;

pub use explain::explain_error;
pub use load::load_file;
pub use prove::{prove_file, ProofRequest};

/// A sink configured from the global flags.
pub fn new_sink(global: &GlobalOptions) -> DiagnosticSink {
    DiagnosticSink::with_config(SinkConfig {
        warnings_as_errors: global.warnings_as_errors,
    })
}

/// Print everything in `sink` to stderr.
pub fn report(sink: &DiagnosticSink, color: ColorMode) {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let mut emitter = TerminalEmitter::stderr(color, is_tty);
    sink.emit_to(&mut emitter);
}

/// Load `path` as the main file of a definition and, unless
/// preprocessing, check its labels.
pub(crate) fn load_and_check(
    path: &Path,
    main: &str,
    syntax: &str,
    global: &GlobalOptions,
    loading: &DefinitionLoadingOptions,
    files: &Files,
    sink: &mut DiagnosticSink,
) -> Result<DefinitionOutcome, ErrorGuaranteed> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            let err = kdef_load::LoadError::Io {
                path: path.to_path_buf(),
                source: err,
            };
            return Err(sink.add_error(err.to_diagnostic()));
        }
    };
    let current_dir = path
        .parent()
        .map_or_else(|| files.working_dir().to_path_buf(), Path::to_path_buf);
    let lookup_dirs = loading.lookup_dirs(files);

    let loader = Loader::new(files.clone(), loading.load_options(global));
    let outcome = loader
        .load_definition(
            main,
            syntax,
            &text,
            &Source::from_path(path),
            &current_dir,
            &lookup_dirs,
            sink,
        )
        .map_err(|err| sink.add_error(err.to_diagnostic()))?;

    if let DefinitionOutcome::Definition(definition) = &outcome {
        check_definition(
            definition,
            sink,
            DuplicatePolicy::from_kore(loading.kore),
            files,
        );
    }
    sink.abort_if_errors()?;
    Ok(outcome)
}
