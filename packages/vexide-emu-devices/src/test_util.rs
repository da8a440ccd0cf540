//! Shared fixtures for unit tests.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vexide_emu_core::{config::EmulatorConfig, time::ManualClock};

use crate::PortTable;

/// Installs a test-friendly tracing subscriber once per test binary.
pub fn init_tracing() {
    _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates an empty table driven by a stopped manual clock.
pub fn table() -> (Arc<ManualClock>, PortTable) {
    table_with_config(EmulatorConfig::default())
}

/// Creates an empty table with a custom configuration, driven by a stopped manual clock.
pub fn table_with_config(config: EmulatorConfig) -> (Arc<ManualClock>, PortTable) {
    init_tracing();

    let clock = Arc::new(ManualClock::new());
    let table = PortTable::with_config(clock.clone(), config);
    (clock, table)
}
