use log::{LevelFilter, Log, Metadata, Record};
use std::str::FromStr;

pub const LOG_ENV: &str = "VDISK_LOG";

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        return metadata.level() <= self.level;
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{:<5} {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// `-v` wins, then `VDISK_LOG`, then warnings only.
pub fn log_level(verbose: bool, env_value: Option<&str>) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }

    return match env_value.map(|v| LevelFilter::from_str(v.trim())) {
        Some(Ok(level)) => level,
        _ => LevelFilter::Warn,
    };
}

/// Installs the stderr logger. Calling it twice keeps the first logger.
pub fn init_logging(verbose: bool) {
    let env_value = std::env::var(LOG_ENV).ok();
    let level = log_level(verbose, env_value.as_deref());

    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}
