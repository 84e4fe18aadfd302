//! The `prove` command: load and check a spec file for a downstream prover.

use std::fmt;
use std::path::PathBuf;

use kdef_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, ErrorGuaranteed};
use kdef_ir::Definition;
use kdef_load::{DefinitionOutcome, Files};

use super::load_and_check;
use crate::options::{DefinitionLoadingOptions, ProveOptions};
use crate::persist::save_definition;

/// Everything a prover needs: the checked definition plus the flags it was
/// given.
#[derive(Debug)]
pub struct ProofRequest {
    pub definition: Definition,
    pub spec_file: PathBuf,
    pub spec_module: String,
    pub def_module: String,
    pub saved_to: Option<PathBuf>,
    pub depth: Option<u32>,
    pub boundary_cells: Vec<String>,
    pub concrete_rules: Vec<String>,
    pub debugger: bool,
    pub debug_script: Option<String>,
}

impl fmt::Display for ProofRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "spec file: {}", self.spec_file.display())?;
        writeln!(f, "spec module: {}", self.spec_module)?;
        writeln!(f, "definition module: {}", self.def_module)?;
        match self.depth {
            Some(depth) => writeln!(f, "depth: {depth}")?,
            None => writeln!(f, "depth: unbounded")?,
        }
        if !self.boundary_cells.is_empty() {
            writeln!(f, "boundary cells: {}", self.boundary_cells.join(", "))?;
        }
        if !self.concrete_rules.is_empty() {
            writeln!(f, "concrete rules: {}", self.concrete_rules.join(", "))?;
        }
        if self.debugger {
            match &self.debug_script {
                Some(script) => writeln!(f, "debugger: on (script {script})")?,
                None => writeln!(f, "debugger: on")?,
            }
        }
        if let Some(path) = &self.saved_to {
            writeln!(f, "definition saved to {}", path.display())?;
        }
        Ok(())
    }
}

/// Load the spec file of `options`, check it and, when asked, save the
/// assembled definition.
///
/// The definition is always assembled; `--preprocess` has no effect here.
#[tracing::instrument(level = "debug", skip_all)]
pub fn prove_file(
    options: &ProveOptions,
    files: &Files,
    sink: &mut DiagnosticSink,
) -> Result<ProofRequest, ErrorGuaranteed> {
    let spec_file = options.spec_file(files).map_err(|diag| sink.add_error(diag))?;
    let loading = DefinitionLoadingOptions {
        preprocess: false,
        ..options.definition_loading.clone()
    };

    let main = loading.main_module_for(&spec_file);
    let syntax = loading.syntax_module_for(&main);
    let spec_module = options.spec_module.clone().unwrap_or_else(|| main.clone());
    let def_module = options.def_module.clone().unwrap_or_else(|| main.clone());

    let outcome = load_and_check(
        &spec_file,
        &main,
        &syntax,
        &options.global,
        &loading,
        files,
        sink,
    )?;
    let DefinitionOutcome::Definition(definition) = outcome else {
        // preprocessing is switched off above
        return Err(sink.add_error(
            Diagnostic::error(ErrorCode::E2005).with_message("No definition was assembled."),
        ));
    };

    for (name, flag) in [(&spec_module, "--spec-module"), (&def_module, "--def-module")] {
        if definition.get_module(name).is_none() {
            sink.add_error(Diagnostic::error(ErrorCode::E2005).with_message(format!(
                "Could not find module with name {name} in definition. \
                 Use {flag} to specify one."
            )));
        }
    }
    sink.abort_if_errors()?;

    let saved_to = match &options.save_proof_definition_to {
        Some(dir) => Some(
            save_definition(&definition, &files.resolve_working(dir))
                .map_err(|diag| sink.add_error(diag))?,
        ),
        None => None,
    };

    Ok(ProofRequest {
        definition,
        spec_file,
        spec_module,
        def_module,
        saved_to,
        depth: options.depth,
        boundary_cells: options.boundary_cells.clone(),
        concrete_rules: options.concrete_rules.clone(),
        debugger: options.debugger,
        debug_script: options.debug_script.clone(),
    })
}
