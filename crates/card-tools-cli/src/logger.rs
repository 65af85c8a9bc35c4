use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;

/// Timestamped log lines on stderr, keeping stdout for run summaries
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Level chosen by the `-v` / `-q` flags
    pub fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
        match (verbose, quiet) {
            (true, _) => LevelFilter::Debug,
            (false, true) => LevelFilter::Warn,
            (false, false) => LevelFilter::Info,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN ",
            Level::Info => "INFO ",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{} {} {}: {}",
            Local::now().format("%H:%M:%S%.3f"),
            level,
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_flags() {
        assert_eq!(StderrLogger::level_for(false, false), LevelFilter::Info);
        assert_eq!(StderrLogger::level_for(true, false), LevelFilter::Debug);
        assert_eq!(StderrLogger::level_for(false, true), LevelFilter::Warn);
        // Verbose wins
        assert_eq!(StderrLogger::level_for(true, true), LevelFilter::Debug);
    }

    #[test]
    fn test_enabled_respects_level() {
        use log::Log;

        let logger = StderrLogger::new(LevelFilter::Warn);
        let warn = Metadata::builder().level(Level::Warn).build();
        let info = Metadata::builder().level(Level::Info).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&info));
    }

    #[test]
    fn test_init_installs_global_logger() {
        StderrLogger::new(LevelFilter::Warn).init().unwrap();
        assert_eq!(log::max_level(), LevelFilter::Warn);
        assert!(log::log_enabled!(Level::Warn));
        assert!(!log::log_enabled!(Level::Info));

        // Only one global logger per process
        let second: anyhow::Result<()> = StderrLogger::new(LevelFilter::Info)
            .init()
            .map_err(anyhow::Error::from);
        assert!(second.is_err());
    }
}
