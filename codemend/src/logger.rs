// codemend/src/logger.rs
//! Logger setup for the `codemend` binary.
//!
//! `RUST_LOG` is honoured unless the caller forces a level (from `--debug` or
//! `--quiet`). Without either, the default is `warn` so skipped files still
//! show up on stderr.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::io::Write;

/// Initialises the global logger. Safe to call more than once; later calls
/// are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));

    if let Some(level) = level {
        builder.filter_level(level);
    }

    let _ = builder
        .target(Target::Stderr)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .try_init();
}

/// Maps the `--debug` / `--quiet` flags to a forced level.
pub fn level_for(debug: bool, quiet: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Error)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
