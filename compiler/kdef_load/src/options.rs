use kdef_outer::MdSelector;

/// Switches that shape a load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Save extracted markdown under the temp directory.
    pub debug: bool,
    /// Log every imported file at info level.
    pub verbose: bool,
    pub md_selector: MdSelector,
    /// Kore backend: symbols must be globally unique.
    pub kore: bool,
    /// Render the raw definition instead of assembling it.
    pub preprocess: bool,
    /// Default binary productions to `left` associativity.
    pub left_assoc: bool,
    pub auto_import_prelude: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            debug: false,
            verbose: false,
            md_selector: MdSelector::default(),
            kore: false,
            preprocess: false,
            left_assoc: false,
            auto_import_prelude: true,
        }
    }
}
