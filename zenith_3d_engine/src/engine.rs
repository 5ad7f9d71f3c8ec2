/// Zenith3D Engine - process-wide logging entry point
///
/// GPU state (binding-point pools, backing registries) is owned by an explicit
/// `RenderContext`, so the only process-wide state left here is the logger
/// sink used by the `engine_*!` macros.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::error::Error;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger_slot() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Engine logging facade
///
/// # Example
///
/// ```no_run
/// use zenith_3d_engine::zenith3d::{Engine, log::{Logger, LogEntry}};
///
/// struct EditorConsole;
/// impl Logger for EditorConsole {
///     fn log(&self, entry: &LogEntry) {
///         // Append to the editor console...
///     }
/// }
///
/// Engine::set_logger(EditorConsole);
/// ```
pub struct Engine;

impl Engine {
    /// Log an error at the point it is raised and hand it back for `Err(..)`
    pub(crate) fn log_and_return_error(source: &str, error: Error) -> Error {
        match &error {
            Error::CompileError { stage, log } => {
                crate::engine_error!(source, "{:?} stage failed to compile:\n{}", stage, log);
            }
            Error::LinkError(log) => {
                crate::engine_error!(source, "Program failed to link:\n{}", log);
            }
            _ => {
                crate::engine_error!(source, "{}", error);
            }
        }
        error
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (editor console, file logger, etc.)
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_slot().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_slot().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger_slot().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger_slot().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
