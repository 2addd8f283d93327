pub mod mock_server;

use std::sync::Once;

static LOGGING: Once = Once::new();

/// Installs an env-filtered subscriber once per test binary, quiet by
/// default. `RUST_LOG=outrider_client=debug` surfaces the per-attempt logs
/// when a test needs debugging.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
