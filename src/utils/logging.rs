//! Logging backend for the binary
//!
//! Library code only talks to the `log` facade. `main` installs a
//! [`VerboseLogger`] whose level follows the number of `-v` flags.

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;

/// Writes `HH:MM:SS.mmm LEVEL target: message` lines to stderr.
pub struct VerboseLogger {
    level: LevelFilter,
}

impl VerboseLogger {
    pub fn new(verbosity: u8) -> Self {
        Self {
            level: level_for(verbosity),
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Install as the global logger. Fails if one is already set.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format(&self, record: &Record) -> String {
        format!(
            "{} {:<5} {}: {}",
            Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for VerboseLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(std::io::stderr().lock(), "{}", self.format(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// No flag: warnings only. `-v` info, `-vv` debug, `-vvv` and up trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
