//! The loading pipeline.
//!
//! A [`Loader`] owns the filesystem roots, the options and the three
//! collaborators. It holds no per-load state: the resolved-file set and
//! the running module map are created per call (or passed in) so one
//! loader can serve several independent loads.

mod assemble;
mod build;
mod resolve;

use kdef_ir::Definition;

use crate::collab::{FencedBlockExtractor, KOuterParser, MarkdownExtractor, ModuleTranslator, OuterParser};
use crate::{Files, KilToKore, LoadOptions};

pub use build::LoadedModules;

/// Text loaded ahead of the user definition when the prelude is enabled.
pub const REQUIRE_PRELUDE: &str = "requires \"prelude.md\"\n";

/// Source label of [`REQUIRE_PRELUDE`].
pub const PRELUDE_SOURCE: &str = "Auto imported prelude";

/// Result of [`Loader::load_definition`].
#[derive(Debug)]
pub enum DefinitionOutcome {
    Definition(Definition),
    /// Preprocess mode: the rendered raw definition, nothing assembled.
    Preprocessed(String),
}

pub struct Loader {
    files: Files,
    options: LoadOptions,
    parser: Box<dyn OuterParser>,
    markdown: Box<dyn MarkdownExtractor>,
    translator: Box<dyn ModuleTranslator>,
}

impl Loader {
    /// A loader wired to the default parser, extractor and translator.
    pub fn new(files: Files, options: LoadOptions) -> Self {
        let markdown = FencedBlockExtractor::new(options.md_selector.clone());
        let translator = KilToKore::new(options.left_assoc);
        Loader {
            files,
            options,
            parser: Box::new(KOuterParser),
            markdown: Box::new(markdown),
            translator: Box::new(translator),
        }
    }

    #[must_use]
    pub fn with_parser(mut self, parser: impl OuterParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    #[must_use]
    pub fn with_markdown_extractor(mut self, markdown: impl MarkdownExtractor + 'static) -> Self {
        self.markdown = Box::new(markdown);
        self
    }

    #[must_use]
    pub fn with_translator(mut self, translator: impl ModuleTranslator + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    pub fn files(&self) -> &Files {
        &self.files
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
