//! Loading K definitions from disk.
//!
//! Three layers, each built on the one before:
//! - [`Loader::slurp`]: follow `require`s transitively, loading every file
//!   once, and collect raw modules in dependency-respecting order
//! - [`Loader::load_modules`]: reject duplicate module names, translate raw
//!   modules into semantic [`Module`](kdef_ir::Module)s and apply sort
//!   synonyms
//! - [`Loader::load_definition`]: auto-import the prelude, pick the main
//!   and syntax modules and assemble an immutable
//!   [`Definition`](kdef_ir::Definition)
//!
//! Parsing, markdown extraction and translation are reached through the
//! traits in [`collab`], so tests and embedders can swap them out.

pub mod collab;
mod error;
mod files;
mod loader;
mod options;
mod synonyms;
pub mod translate;

pub use collab::{FencedBlockExtractor, KOuterParser, MarkdownExtractor, ModuleTranslator, OuterParser};
pub use error::LoadError;
pub use files::Files;
pub use loader::{DefinitionOutcome, LoadedModules, Loader, PRELUDE_SOURCE, REQUIRE_PRELUDE};
pub use options::LoadOptions;
pub use synonyms::apply_synonyms;
pub use translate::KilToKore;
