// fieldmask/src/logger.rs
//! Logger initialization for the fieldmask binary.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes `env_logger`.
///
/// With `None`, `RUST_LOG` decides and defaults to `warn`. An explicit level
/// replaces the default level from `RUST_LOG`; per-module directives stay.
/// Calling this more than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}
