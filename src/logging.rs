//! Process-wide log subscriber.
//!
//! Library code only emits `tracing` events. The binary installs a single
//! `fmt` subscriber writing to stderr, so report output on stdout stays
//! clean.

use std::io::IsTerminal;

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Map `-v`/`-q` counts to a level: warn by default, info with `-v`,
/// debug with `-vv`, trace beyond that, errors only with `-q`.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. `RUST_LOG`, when set, overrides `level`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
