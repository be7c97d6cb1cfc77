//! Logging setup. Reports go to stdout; log records go to stderr.

use log::LevelFilter;
use std::env;

/// Initialize the logger: `--debug` wins, then `RUST_LOG`, else warnings only.
pub fn init_logger(debug: bool) {
    let log_level = if debug {
        LevelFilter::Debug
    } else if env::var("RUST_LOG").is_ok() {
        env_logger::init();
        return;
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new().filter_level(log_level).init();
}
