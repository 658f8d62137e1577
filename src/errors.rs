//! Unified application error type.
//! Ledger, counter, remote sync and CLI all return AppError so that the
//! coordinator can decide which failures are warnings and which end a command.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    // ---------------------------
    // Database-related (audit log, workbook backend)
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Scan input
    // ---------------------------
    #[error("{0}")]
    Validation(String),

    #[error("Unknown station code: {0}")]
    InvalidStation(String),

    // ---------------------------
    // Persistence
    // ---------------------------
    /// The CSV backup could not be written. The in-memory ledger entry is kept.
    #[error("Local backup for {station} failed: {source}")]
    LocalPersistence {
        station: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("No remote sheet tab available for {0}")]
    RemoteUnavailable(String),

    #[error("{0}")]
    RemoteSync(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
