//! # Error Types
//!
//! Structured error types for thermal_core. Every failure a calculator page
//! can show maps to one variant, and the `Display` text of each variant is
//! exactly the line the page shows the user.
//!
//! Three tiers exist:
//!
//! - **Local**: [`ThermalError::Validation`], raised before any request is sent
//! - **Server**: [`ThermalError::Server`], a non-2xx reply carrying `{error}`
//! - **Transport**: [`ThermalError::Transport`] and
//!   [`ThermalError::MalformedResponse`], shown with a generic message while
//!   the real reason goes to the log
//!
//! ## Example
//!
//! ```rust
//! use thermal_core::errors::{ThermalError, ThermalResult};
//!
//! fn check_area(area: f64) -> ThermalResult<()> {
//!     if area <= 0.0 {
//!         return Err(ThermalError::validation("area", "Area must be positive."));
//!     }
//!     Ok(())
//! }
//!
//! let err = check_area(0.0).unwrap_err();
//! assert_eq!(err.to_string(), "Area must be positive.");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for thermal_core operations
pub type ThermalResult<T> = Result<T, ThermalError>;

/// Shown for every transport-level failure. The detailed reason is logged.
pub const FETCH_ERROR_MESSAGE: &str =
    "An error occurred while fetching data. Please check the log output.";

/// Used when a non-2xx reply carries no `error` field.
pub const CALCULATION_FAILED: &str = "Calculation failed.";

/// Structured error type for calculator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ThermalError {
    /// A form field failed local validation. No request was sent.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// The backend answered with a non-2xx status.
    #[error("Error: {message}")]
    Server { status: u16, message: String },

    /// The request never produced a reply (connection refused, timeout, ...)
    #[error("{}", FETCH_ERROR_MESSAGE)]
    Transport { reason: String },

    /// A reply arrived but could not be interpreted.
    #[error("{}", FETCH_ERROR_MESSAGE)]
    MalformedResponse { reason: String },

    /// A calculation request is already outstanding for this page.
    #[error("A calculation is already in progress. Wait for it to finish before resubmitting.")]
    Busy,

    /// Export was requested before any successful calculation.
    #[error("Please perform a calculation first to generate data for the PDF.")]
    NoResults,

    /// The report endpoint rejected the request or could not be reached.
    #[error("PDF Export Error: {reason}")]
    Export { reason: String },

    /// File I/O error while saving a report
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// JSON serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl ThermalError {
    /// Create a Validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ThermalError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a Server error
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        ThermalError::Server {
            status,
            message: message.into(),
        }
    }

    /// Create a Transport error
    pub fn transport(reason: impl Into<String>) -> Self {
        ThermalError::Transport {
            reason: reason.into(),
        }
    }

    /// Create a MalformedResponse error
    pub fn malformed(reason: impl Into<String>) -> Self {
        ThermalError::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Create an Export error
    pub fn export(reason: impl Into<String>) -> Self {
        ThermalError::Export {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ThermalError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Config error
    pub fn config(reason: impl Into<String>) -> Self {
        ThermalError::Config {
            reason: reason.into(),
        }
    }

    /// Whether the user can simply try again without changing anything.
    ///
    /// Nothing is retried automatically; this only informs the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ThermalError::Busy | ThermalError::Transport { .. } | ThermalError::Export { .. }
        )
    }

    /// Whether the error was raised before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, ThermalError::Validation { .. } | ThermalError::Busy | ThermalError::NoResults)
    }

    /// Detail suitable for logs. For transport-tier errors this is the
    /// underlying reason rather than the generic user-facing text.
    pub fn detail(&self) -> String {
        match self {
            ThermalError::Transport { reason } | ThermalError::MalformedResponse { reason } => {
                reason.clone()
            }
            other => other.to_string(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ThermalError::Validation { .. } => "VALIDATION",
            ThermalError::Server { .. } => "SERVER_ERROR",
            ThermalError::Transport { .. } => "TRANSPORT_ERROR",
            ThermalError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            ThermalError::Busy => "BUSY",
            ThermalError::NoResults => "NO_RESULTS",
            ThermalError::Export { .. } => "EXPORT_ERROR",
            ThermalError::FileError { .. } => "FILE_ERROR",
            ThermalError::Config { .. } => "CONFIG_ERROR",
            ThermalError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}
