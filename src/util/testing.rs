//! Shared setup for unit and integration tests

use std::sync::Once;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TRACING: Once = Once::new();

const DEFAULT_TEST_FILTER: &str = "curriculum_tree=debug";

/// Route `tracing` output through the test harness, once per test binary.
///
/// `RUST_LOG` overrides the default `curriculum_tree=debug` filter.
pub fn init_test_setup() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

        let installed = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_test_writer()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_filter(filter),
            )
            .try_init();

        // another harness may own the global subscriber already
        if installed.is_ok() {
            tracing::debug!("test tracing ready");
        }
    });
}
