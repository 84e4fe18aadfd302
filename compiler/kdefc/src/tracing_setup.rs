//! Tracing subscriber for the CLI.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Safe to call more than once.
///
/// With `RUST_LOG` set, spans are printed as a tree filtered by it.
/// Otherwise only `--verbose` output (info events of the loader) is shown.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let tree = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(tree).with(filter).init();
        } else if verbose {
            let filter = EnvFilter::new("kdef_load=info");
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .without_time()
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
