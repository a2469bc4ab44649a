//! Platform logging initialization for tablescrape.
//!
//! Logs go to the terminal, optionally to a file, and always into the shared
//! ring the console reads with `logs`.

use std::fs::File;
use std::path::Path;

use engine_logging::{RingLogger, SharedLogRing};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub(crate) fn level_for(debug_mode: bool) -> LevelFilter {
    if debug_mode {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Narrows the global filter once settings are known.
pub(crate) fn apply_level(debug_mode: bool) {
    log::set_max_level(level_for(debug_mode));
}

/// Installs the global logger. Safe to call once; later calls are ignored.
pub(crate) fn initialize(level: LevelFilter, log_file: Option<&Path>, ring: SharedLogRing) {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(file_logger) = log_file.and_then(|path| create_file_logger(path, level, config)) {
        loggers.push(file_logger);
    }
    loggers.push(RingLogger::new(level, ring));

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
