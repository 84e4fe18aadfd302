//! kdef IR - Definition Representation Types
//!
//! This crate contains the data structures shared by every stage of the
//! definition front-end:
//! - `Source`/`Location` for diagnostics and declaration sites
//! - `Att` attribute sets
//! - `K` term trees and `KLabel` symbols
//! - Raw (syntax-level) modules produced by the outer parser
//! - Semantic `Module`s with their derived indexes, and the final `Definition`
//!
//! # Serialization
//!
//! With the `cache` feature every semantic type derives serde traits so an
//! assembled `Definition` can be persisted for other tools.

mod att;
mod definition;
mod module;
mod production;
pub mod raw;
mod sentence;
mod sort;
mod source;
mod term;
pub mod visit;

pub use att::Att;
pub use definition::Definition;
pub use module::{Module, SYNTAX_SUFFIX};
pub use production::{NonTerminal, Production, ProductionItem};
pub use raw::{DefinitionItem, RawImport, RawModule, RawProduction, RawSentence, Require};
pub use sentence::{Context, ContextAlias, Rule, Sentence, SortSynonym, SyntaxSort};
pub use sort::Sort;
pub use source::{DeclSite, Location, Source};
pub use term::{KLabel, K};
