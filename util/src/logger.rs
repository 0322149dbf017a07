//! Logging setup for the executables
//!
//! Every record goes to the session log file at the requested level. The
//! console only shows records at `INFO` and above so that per-cycle trace
//! output does not swamp the terminal.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level, Record};
use std::fmt::{Arguments, Display};
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Most verbose level shown on the console.
const CONSOLE_LEVEL: LevelFilter = LevelFilter::Info;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("The log file level must be at least as verbose as `INFO`, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Could not open the session log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger has already been set: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `file_level` is the level recorded in the session's log file and must be
/// at least as verbose as `INFO`. Only one logger may be set per process, a
/// second call returns `FernInitError`.
pub fn logger_init(
    file_level: LevelFilter,
    session: &Session
) -> Result<(), LoggerInitError> {

    if file_level < LevelFilter::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(file_level))
    }

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let console = fern::Dispatch::new()
        .level(CONSOLE_LEVEL.min(file_level))
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}", format_record(message, record, level_tag(record.level()))
            ))
        })
        .chain(std::io::stdout());

    // No colour codes in the file
    let file = fern::Dispatch::new()
        .level(file_level)
        .format(|out, message, record| {
            out.finish(format_args!("{}", format_record(message, record, record.level())))
        })
        .chain(log_file);

    fern::Dispatch::new()
        .chain(console)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    File log level: {:?}", file_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Format a record as `[elapsed LVL] message`, with the target included for
/// debug and trace records.
fn format_record(message: &Arguments, record: &Record, tag: impl Display) -> String {
    let stamp = session::get_elapsed_seconds();

    match record.level() {
        Level::Debug | Level::Trace => format!(
            "[{:10.6} {}] {}: {}", stamp, tag, record.target(), message
        ),
        _ => format!("[{:10.6} {}] {}", stamp, tag, message)
    }
}

/// Short coloured tag for the console
fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info  => "INF".normal(),
        Level::Warn  => "WRN".yellow(),
        Level::Error => "ERR".red().bold()
    }
}
