//! Browser Console Logger
//!
//! `log` backend that writes to the devtools console, one line per record:
//! `[QUEUE] flushing 2 update(s)`.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.target(), &record.args().to_string());
        let value = line.into();
        match record.level() {
            Level::Error => web_sys::console::error_1(&value),
            Level::Warn => web_sys::console::warn_1(&value),
            Level::Info => web_sys::console::log_1(&value),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
        }
    }

    fn flush(&self) {}
}

/// Targets that are already bracketed tags are used as-is; module paths are
/// shortened to their last segment.
fn format_line(target: &str, message: &str) -> String {
    if target.starts_with('[') {
        format!("{} {}", target, message)
    } else {
        let short = target.rsplit("::").next().unwrap_or(target);
        format!("[{}] {}", short.to_uppercase(), message)
    }
}

/// Install the console logger. Later calls only adjust the level.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_err() {
        log::debug!(target: "[APP]", "logger already installed");
    }
    log::set_max_level(level);
}
