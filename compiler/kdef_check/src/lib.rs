//! Checks over assembled definitions.
//!
//! [`CheckKLabels`] is a two-phase session: feed it every sentence of every
//! module with [`CheckKLabels::check`], then call [`CheckKLabels::finish`]
//! once. [`check_definition`] does both for a whole [`Definition`].

mod klabels;

use kdef_diagnostic::DiagnosticSink;
use kdef_ir::Definition;
use kdef_load::Files;

pub use klabels::{is_internal_klabel, CheckKLabels, DuplicatePolicy};

/// Run the KLabel checks over every module of `definition`.
///
/// Companion `$SYNTAX` modules are skipped: their sentences are copies of
/// their owner's.
#[tracing::instrument(level = "debug", skip_all, fields(policy = ?policy))]
pub fn check_definition(
    definition: &Definition,
    sink: &mut DiagnosticSink,
    policy: DuplicatePolicy,
    files: &Files,
) {
    let mut session = CheckKLabels::new(policy, files);
    for module in definition.modules() {
        if module.name().ends_with(kdef_ir::SYNTAX_SUFFIX) {
            continue;
        }
        for sentence in module.local_sentences() {
            session.check(sentence, module, sink);
        }
    }
    session.finish(sink);
}
