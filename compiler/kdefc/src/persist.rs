//! Saving assembled definitions for other tools.
//!
//! The definition is written with `bincode` to
//! `<dir>/proof-spec-kompiled/definition.bin`.

use std::fs;
use std::path::{Path, PathBuf};

use kdef_diagnostic::{Diagnostic, ErrorCode};
use kdef_ir::Definition;

/// Directory created under the requested output directory.
pub const KOMPILED_DIR: &str = "proof-spec-kompiled";

pub const DEFINITION_FILE: &str = "definition.bin";

fn persist_error(path: &Path, err: impl std::fmt::Display) -> Diagnostic {
    Diagnostic::error(ErrorCode::E4001)
        .with_message(format!("Could not save definition to {}: {err}", path.display()))
}

/// Write `definition` under `dir`, returning the file written.
#[tracing::instrument(level = "debug", skip(definition), fields(dir = %dir.display()))]
pub fn save_definition(definition: &Definition, dir: &Path) -> Result<PathBuf, Diagnostic> {
    let out_dir = dir.join(KOMPILED_DIR);
    fs::create_dir_all(&out_dir).map_err(|err| persist_error(&out_dir, err))?;

    let path = out_dir.join(DEFINITION_FILE);
    let bytes = bincode::serialize(definition).map_err(|err| persist_error(&path, err))?;
    fs::write(&path, bytes).map_err(|err| persist_error(&path, err))?;
    tracing::debug!(path = %path.display(), "definition saved");
    Ok(path)
}

/// Read back a definition written by [`save_definition`].
pub fn read_definition(path: &Path) -> Result<Definition, Diagnostic> {
    let bytes = fs::read(path).map_err(|err| {
        Diagnostic::error(ErrorCode::E1002)
            .with_message(format!("Could not read file {}: {err}", path.display()))
    })?;
    bincode::deserialize(&bytes).map_err(|err| {
        Diagnostic::error(ErrorCode::E1002).with_message(format!(
            "Could not decode definition {}: {err}",
            path.display()
        ))
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
