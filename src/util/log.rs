// src/util/log.rs

//! Logger Utility - routes `log_*!` macros to `tracing` and, once installed,
//! to per-severity log files.
//!
//! Nothing is written anywhere until either a `tracing` subscriber or a file
//! [`Logger`] is installed, so library code can log freely.
use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::sync::OnceLock;
use chrono::Local;

pub static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// File logger, absent until [`install_file_logger`] is called
static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn as_str(&self) -> &str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn filename(&self) -> &str {
        match self {
            LogLevel::Error => "error.log",
            LogLevel::Warn => "warn.log",
            LogLevel::Info => "info.log",
            LogLevel::Debug => "debug.log",
        }
    }
}

/// Logger that writes to separate files by severity
pub struct Logger {
    error_file: Mutex<File>,
    warn_file: Mutex<File>,
    info_file: Mutex<File>,
    debug_file: Mutex<File>,
}

impl Logger {
    /// Create a new logger with the specified directory
    pub fn new(log_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let log_dir = log_dir.as_ref();

        create_dir_all(log_dir)?;

        // Start fresh each time
        let error_file = File::create(log_dir.join(LogLevel::Error.filename()))?;
        let warn_file = File::create(log_dir.join(LogLevel::Warn.filename()))?;
        let info_file = File::create(log_dir.join(LogLevel::Info.filename()))?;
        let debug_file = File::create(log_dir.join(LogLevel::Debug.filename()))?;

        Ok(Self {
            error_file: Mutex::new(error_file),
            warn_file: Mutex::new(warn_file),
            info_file: Mutex::new(info_file),
            debug_file: Mutex::new(debug_file),
        })
    }

    /// Write a log entry to the appropriate file
    pub fn write_log(&self, level: LogLevel, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let formatted = format!("[{}] [{}] {}\n", timestamp, level.as_str(), message);

        let file = match level {
            LogLevel::Error => &self.error_file,
            LogLevel::Warn => &self.warn_file,
            LogLevel::Info => &self.info_file,
            LogLevel::Debug => &self.debug_file,
        };

        if let Ok(mut file) = file.lock() {
            let _ = file.write_all(formatted.as_bytes());
            let _ = file.flush();
        }
    }
}

/// Install the process-wide file logger. Returns false if one was already installed.
pub fn install_file_logger(logger: Logger) -> bool {
    LOGGER.set(logger).is_ok()
}

pub fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| {
        std::env::var("DEBUG").unwrap_or_default() == "true"
    })
}

#[doc(hidden)]
pub fn dispatch(level: LogLevel, message: &str) {
    match level {
        LogLevel::Error => tracing::error!("{}", message),
        LogLevel::Warn => tracing::warn!("{}", message),
        LogLevel::Info => tracing::info!("{}", message),
        LogLevel::Debug => tracing::debug!("{}", message),
    }

    if let Some(logger) = LOGGER.get() {
        logger.write_log(level, message);
    }
}

/// Convenience macro for error logging with formatting
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::util::log::dispatch($crate::util::log::LogLevel::Error, &message);
    }};
}

/// Convenience macro for warning logging with formatting
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::util::log::dispatch($crate::util::log::LogLevel::Warn, &message);
    }};
}

/// Convenience macro for info logging with formatting
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::util::log::dispatch($crate::util::log::LogLevel::Info, &message);
    }};
}

/// Convenience macro for debug logging with formatting
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if $crate::util::log::debug_enabled() {
            let message = format!($($arg)*);
            $crate::util::log::dispatch($crate::util::log::LogLevel::Debug, &message);
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_logger_creation() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let logger = Logger::new(temp_dir.path()).expect("Failed to create logger");

        logger.write_log(LogLevel::Error, "Test error");
        logger.write_log(LogLevel::Warn, "Test warning");
        logger.write_log(LogLevel::Info, "Test info");
        logger.write_log(LogLevel::Debug, "Test debug");

        assert!(temp_dir.path().join("error.log").exists());
        assert!(temp_dir.path().join("warn.log").exists());
        assert!(temp_dir.path().join("info.log").exists());
        assert!(temp_dir.path().join("debug.log").exists());

        let info = fs::read_to_string(temp_dir.path().join("info.log")).unwrap();
        assert!(info.contains("[INFO] Test info"));
        assert!(!info.contains("Test error"));
    }

    #[test]
    fn test_macros_without_sinks_are_silent() {
        // No subscriber and no file logger: must not panic
        crate::log_info!("state {}", 3);
        crate::log_warn!("body {:?}", "{");
    }
}
