//! Command-line options.
//!
//! Parsing is hand-rolled: every command takes one positional file plus the
//! shared definition-loading flags; `prove` adds its own pass-through flags.

use std::path::{Path, PathBuf};

use kdef_diagnostic::emitter::ColorMode;
use kdef_diagnostic::{Diagnostic, ErrorCode};
use kdef_load::{Files, LoadOptions};
use kdef_outer::MdSelector;
use parking_lot::Mutex;

/// Flags that affect every command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub debug: bool,
    pub verbose: bool,
    pub warnings_as_errors: bool,
    pub color: ColorMode,
}

/// Flags that shape how a definition is found and assembled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefinitionLoadingOptions {
    /// Extra lookup directories (`-I`), searched after the builtin and
    /// current directories.
    pub include_dirs: Vec<PathBuf>,
    pub main_module: Option<String>,
    pub syntax_module: Option<String>,
    pub md_selector: MdSelector,
    pub no_prelude: bool,
    pub kore: bool,
    pub preprocess: bool,
    pub left_assoc: bool,
}

impl DefinitionLoadingOptions {
    pub fn load_options(&self, global: &GlobalOptions) -> LoadOptions {
        LoadOptions {
            debug: global.debug,
            verbose: global.verbose,
            md_selector: self.md_selector.clone(),
            kore: self.kore,
            preprocess: self.preprocess,
            left_assoc: self.left_assoc,
            auto_import_prelude: !self.no_prelude,
        }
    }

    /// Builtin directory first, then every `-I` directory.
    pub fn lookup_dirs(&self, files: &Files) -> Vec<PathBuf> {
        let mut dirs = vec![files.builtin_dir()];
        dirs.extend(self.include_dirs.iter().map(|dir| files.resolve_working(dir)));
        dirs
    }

    /// `--main-module`, else the upper-cased file stem (`lang.k` -> `LANG`).
    pub fn main_module_for(&self, file: &Path) -> String {
        self.main_module
            .clone()
            .unwrap_or_else(|| default_module_name(file))
    }

    /// `--syntax-module`, else the main module name plus `-SYNTAX`.
    pub fn syntax_module_for(&self, main: &str) -> String {
        self.syntax_module
            .clone()
            .unwrap_or_else(|| format!("{main}-SYNTAX"))
    }
}

fn default_module_name(file: &Path) -> String {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}

/// Options of `kdefc load`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadCommandOptions {
    pub global: GlobalOptions,
    pub definition_loading: DefinitionLoadingOptions,
    pub file: Option<String>,
}

/// Options of `kdefc prove`.
///
/// Prover flags are carried as given; this front-end only loads, checks and
/// optionally saves the definition the proof runs under.
#[derive(Debug, Default)]
pub struct ProveOptions {
    pub global: GlobalOptions,
    pub definition_loading: DefinitionLoadingOptions,
    parameters: Vec<String>,
    spec_file: Mutex<Option<PathBuf>>,
    pub spec_module: Option<String>,
    pub def_module: Option<String>,
    pub save_proof_definition_to: Option<PathBuf>,
    pub depth: Option<u32>,
    pub boundary_cells: Vec<String>,
    pub concrete_rules: Vec<String>,
    pub debugger: bool,
    pub debug_script: Option<String>,
}

impl ProveOptions {
    /// The spec file, resolved against the working directory on first use.
    pub fn spec_file(&self, files: &Files) -> Result<PathBuf, Diagnostic> {
        let mut cached = self.spec_file.lock();
        if let Some(path) = cached.as_ref() {
            return Ok(path.clone());
        }
        let Some(first) = self.parameters.first() else {
            return Err(Diagnostic::error(ErrorCode::E1003).with_message(
                "You have to provide exactly one main file in order to do outer parsing.",
            ));
        };
        let path = files.resolve_working(Path::new(first));
        *cached = Some(path.clone());
        Ok(path)
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Try to read one shared flag at `args[i]`.
///
/// Returns how many arguments were consumed, or `None` if the flag is not
/// a shared one.
fn shared_option(
    args: &[String],
    i: usize,
    global: &mut GlobalOptions,
    loading: &mut DefinitionLoadingOptions,
) -> Result<Option<usize>, String> {
    let arg = args[i].as_str();
    if let Some(mode) = arg.strip_prefix("--color=") {
        global.color =
            ColorMode::parse(mode).ok_or_else(|| format!("invalid color mode '{mode}'"))?;
        return Ok(Some(1));
    }
    if let Some(dir) = arg.strip_prefix("-I").filter(|dir| !dir.is_empty()) {
        loading.include_dirs.push(PathBuf::from(dir));
        return Ok(Some(1));
    }
    let consumed = match arg {
        "--debug" => {
            global.debug = true;
            1
        }
        "--verbose" | "-v" => {
            global.verbose = true;
            1
        }
        "-Werror" | "--warnings-to-errors" => {
            global.warnings_as_errors = true;
            1
        }
        "--no-prelude" => {
            loading.no_prelude = true;
            1
        }
        "--kore" => {
            loading.kore = true;
            1
        }
        "--preprocess" => {
            loading.preprocess = true;
            1
        }
        "--left-assoc" => {
            loading.left_assoc = true;
            1
        }
        "-I" => {
            loading.include_dirs.push(PathBuf::from(value(args, i, arg)?));
            2
        }
        "--main-module" => {
            loading.main_module = Some(value(args, i, arg)?.to_string());
            2
        }
        "--syntax-module" => {
            loading.syntax_module = Some(value(args, i, arg)?.to_string());
            2
        }
        "--md-selector" => {
            let raw = value(args, i, arg)?;
            loading.md_selector = raw
                .parse()
                .map_err(|err| format!("invalid --md-selector '{raw}': {err}"))?;
            2
        }
        _ => return Ok(None),
    };
    Ok(Some(consumed))
}

/// Parse the arguments following `kdefc load`.
pub fn parse_load_options(args: &[String]) -> Result<LoadCommandOptions, String> {
    let mut options = LoadCommandOptions::default();
    let mut i = 0;
    while i < args.len() {
        if let Some(n) = shared_option(
            args,
            i,
            &mut options.global,
            &mut options.definition_loading,
        )? {
            i += n;
            continue;
        }
        let arg = &args[i];
        if arg.starts_with('-') {
            return Err(format!("unknown option '{arg}'"));
        }
        if options.file.is_some() {
            return Err(format!("unexpected argument '{arg}'"));
        }
        options.file = Some(arg.clone());
        i += 1;
    }
    Ok(options)
}

/// Parse the arguments following `kdefc prove`.
pub fn parse_prove_options(args: &[String]) -> Result<ProveOptions, String> {
    let mut options = ProveOptions::default();
    let mut i = 0;
    while i < args.len() {
        if let Some(n) = shared_option(
            args,
            i,
            &mut options.global,
            &mut options.definition_loading,
        )? {
            i += n;
            continue;
        }
        let arg = args[i].as_str();
        i += match arg {
            "--spec-module" | "-sm" => {
                options.spec_module = Some(value(args, i, arg)?.to_string());
                2
            }
            "--def-module" | "-m" => {
                options.def_module = Some(value(args, i, arg)?.to_string());
                2
            }
            "--save-proof-definition-to" => {
                options.save_proof_definition_to = Some(PathBuf::from(value(args, i, arg)?));
                2
            }
            "--depth" => {
                let raw = value(args, i, arg)?;
                let depth = raw
                    .parse()
                    .map_err(|_| format!("invalid --depth '{raw}'"))?;
                options.depth = Some(depth);
                2
            }
            "--boundary-cells" => {
                options.boundary_cells = comma_list(value(args, i, arg)?);
                2
            }
            "--concrete-rules" => {
                options.concrete_rules = comma_list(value(args, i, arg)?);
                2
            }
            "--debugger" => {
                options.debugger = true;
                1
            }
            "--debug-script" => {
                options.debug_script = Some(value(args, i, arg)?.to_string());
                2
            }
            _ if arg.starts_with('-') => return Err(format!("unknown option '{arg}'")),
            _ => {
                options.parameters.push(arg.to_string());
                1
            }
        };
    }
    Ok(options)
}
