//! kdefc - loading and checking K definitions from the command line.
//!
//! The binary is a thin shell over this library:
//! - [`options`]: hand-rolled argument parsing
//! - [`commands`]: `load`, `prove` and `explain`
//! - [`persist`]: saving assembled definitions with `bincode`
//! - [`init_tracing`]: the `tracing` subscriber

pub mod commands;
pub mod options;
pub mod persist;
mod tracing_setup;

pub use options::{
    parse_load_options, parse_prove_options, DefinitionLoadingOptions, GlobalOptions,
    LoadCommandOptions, ProveOptions,
};
pub use tracing_setup::init_tracing;
