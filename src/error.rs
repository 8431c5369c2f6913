//! Unified error hierarchy for StressCast
//!
//! Module-level errors fold into [`StressCastError`], which carries a
//! severity for logging and a user-facing message for the CLI.

use crate::export::ExportError;
use crate::history::HistoryError;
use crate::models::MetricValidationError;
use thiserror::Error;

/// Top-level error type for all StressCast operations
#[derive(Debug, Error)]
pub enum StressCastError {
    /// Metric input violating its contract
    #[error("Invalid metric: {0}")]
    Metric(#[from] MetricValidationError),

    /// Other input validation failures
    #[error("Validation error: {0}")]
    Validation(String),

    /// History window or storage errors
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for StressCast operations
pub type Result<T> = std::result::Result<T, StressCastError>;

impl StressCastError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StressCastError::Metric(_) => ErrorSeverity::Warning,
            StressCastError::Validation(_) => ErrorSeverity::Warning,
            StressCastError::History(HistoryError::NothingToClose) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            StressCastError::Metric(MetricValidationError::NonFinite { metric, .. }) => {
                format!("Please enter a number for {}.", metric.to_string().to_lowercase())
            }
            StressCastError::History(HistoryError::Parse { path, .. }) => {
                format!(
                    "Your stress history at {} could not be read. Fix or remove the file to start fresh.",
                    path.display()
                )
            }
            StressCastError::History(HistoryError::NothingToClose) => {
                "Nothing recorded today yet. Record today's metrics before closing the day.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Bad input the user can correct and retry
    Warning,
}
