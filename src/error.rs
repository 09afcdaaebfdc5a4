//! Error types for grid loading and gait extraction.
//!
//! Extraction distinguishes hard failures from reported ones. Only an
//! unreadable source file is a hard failure for the caller; every other
//! variant below is caught at the batch, gait or column it concerns, logged,
//! and the rest of the dataset is still built.
//!
//! ```
//! use vicon_probe::error::ProbeError;
//!
//! fn describe(err: &ProbeError) -> &'static str {
//!     match err {
//!         ProbeError::AnchorNotFound { .. } => "batch skipped",
//!         ProbeError::InvalidTimeRow { .. } => "gait left empty",
//!         ProbeError::NonNumericCell { .. } => "batch aborted",
//!         _ => "other",
//!     }
//! }
//! ```

use std::fmt;

/// Main error type for vicon-probe operations.
#[derive(Debug)]
pub enum ProbeError {
    /// I/O errors (opening the export, writing output)
    Io(std::io::Error),

    /// CSV tokenizing errors
    Csv(String),

    /// Configuration errors
    Config(String),

    /// File not found or invalid path
    InvalidPath(String),

    /// A required marker or batch name does not appear anywhere in the grid
    AnchorNotFound { anchor: String },

    /// Header block found but its frame/rate cells are unusable
    InvalidLayout(String),

    /// A time maps to a row before the batch's first data row
    InvalidTimeRow { time: f64, row_start: usize },

    /// A cell that should hold a number holds text
    NonNumericCell {
        row: usize,
        column: usize,
        value: String,
    },

    /// A cell skipped while cleaning a series under the lenient policy
    MalformedSeriesInput {
        row: usize,
        column: usize,
        value: String,
    },

    /// Generic error with context
    Other(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::InvalidPath(msg) => write!(f, "Invalid path: {msg}"),
            Self::AnchorNotFound { anchor } => write!(f, "'{anchor}' not found in grid"),
            Self::InvalidLayout(msg) => write!(f, "Invalid batch layout: {msg}"),
            Self::InvalidTimeRow { time, row_start } => write!(
                f,
                "Invalid time value {time}: maps before first data row {row_start}"
            ),
            Self::NonNumericCell { row, column, value } => write!(
                f,
                "Non-numeric cell '{value}' at row {row}, column {column}"
            ),
            Self::MalformedSeriesInput { row, column, value } => write!(
                f,
                "Malformed series value '{value}' at row {row}, column {column} skipped"
            ),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ProbeError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

/// Result type alias for vicon-probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ProbeError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: ProbeError = e.into();
            ProbeError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: ProbeError = e.into();
            ProbeError::Other(format!("{}: {}", f(), err))
        })
    }
}
