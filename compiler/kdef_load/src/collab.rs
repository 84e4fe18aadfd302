//! Collaborator seams of the loader.
//!
//! The loader only orchestrates: turning text into items, markdown into
//! text, and raw modules into semantic modules is delegated to these
//! traits. The defaults wire in `kdef_outer` and [`KilToKore`](crate::KilToKore).

use std::sync::Arc;

use kdef_diagnostic::Diagnostic;
use kdef_ir::{DefinitionItem, Module, RawModule, Source};
use kdef_outer::{MdSelector, ParseError};
use rustc_hash::FxHashMap;

/// Turns the text of one file into its requires and raw modules.
pub trait OuterParser {
    fn parse(&self, source: &Source, text: &str) -> Result<Vec<DefinitionItem>, ParseError>;
}

/// Extracts the definition text embedded in a literate source.
pub trait MarkdownExtractor {
    fn extract(&self, text: &str, source: &Source) -> String;
}

/// Converts a raw module into a semantic module.
///
/// `all` holds every raw module of the current load so imports can be
/// translated on demand. `built` is the running map of finished modules,
/// keyed by name; the translator must insert its result and the result's
/// `$SYNTAX` companion.
pub trait ModuleTranslator {
    fn translate(
        &self,
        module: &RawModule,
        all: &[RawModule],
        built: &mut FxHashMap<String, Arc<Module>>,
    ) -> Result<Arc<Module>, Diagnostic>;
}

/// The `kdef_outer` recursive-descent parser.
#[derive(Copy, Clone, Debug, Default)]
pub struct KOuterParser;

impl OuterParser for KOuterParser {
    fn parse(&self, source: &Source, text: &str) -> Result<Vec<DefinitionItem>, ParseError> {
        kdef_outer::parse_definition(source, text)
    }
}

/// Keeps fenced code blocks whose tags satisfy a selector.
#[derive(Clone, Debug, Default)]
pub struct FencedBlockExtractor {
    selector: MdSelector,
}

impl FencedBlockExtractor {
    pub fn new(selector: MdSelector) -> Self {
        FencedBlockExtractor { selector }
    }
}

impl MarkdownExtractor for FencedBlockExtractor {
    fn extract(&self, text: &str, source: &Source) -> String {
        tracing::trace!(%source, selector = %self.selector, "extracting markdown");
        kdef_outer::extract_markdown(text, &self.selector)
    }
}
