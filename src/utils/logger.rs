//! Logging utilities
//!
//! Maps the `--debug_level` verbosity onto a tracing subscriber.

use std::io::IsTerminal;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Debug verbosity selected with `-l/--debug_level`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    /// Settings, response status, final inventory
    Basic = 1,
    /// Request direction and raw response bodies
    Verbose = 2,
    /// Every guest record and group decision
    Trace = 3,
}

impl DebugLevel {
    /// Convert the numeric flag value; anything outside 1-3 is rejected
    pub fn from_u8(level: u8) -> Option<Self> {
        match level {
            1 => Some(DebugLevel::Basic),
            2 => Some(DebugLevel::Verbose),
            3 => Some(DebugLevel::Trace),
            _ => None,
        }
    }

    pub fn to_tracing_level(self) -> Level {
        match self {
            DebugLevel::Basic => Level::INFO,
            DebugLevel::Verbose => Level::DEBUG,
            DebugLevel::Trace => Level::TRACE,
        }
    }
}

/// Build the filter directive for an optional debug level.
///
/// Without a level only warnings and errors are emitted.
pub fn filter_directive(level: Option<DebugLevel>) -> String {
    let level = level.map_or(Level::WARN, DebugLevel::to_tracing_level);
    format!("proxmox_inventory={level}")
}

/// Initialize the logger. Output goes to stderr; stdout carries the inventory.
pub fn init_logger(level: Option<DebugLevel>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();
}
